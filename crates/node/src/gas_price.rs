//! Gas price recommendation based on recent blocks.

use hearth_interfaces::ChainStore;
use hearth_primitives::{constants::DEFAULT_GAS_PRICE, Transaction, B256, U256};
use std::collections::BTreeMap;
use tracing::trace;

/// How many blocks the basic pricer samples walking back from the head.
const SAMPLE_BLOCKS: usize = 1000;

/// Urgency of a transaction, mapped onto the sampled price distribution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TxPriority {
    /// Cheapest price observed.
    Lowest,
    /// First quartile.
    Low,
    /// Median.
    #[default]
    Medium,
    /// Third quartile.
    High,
    /// Most expensive price observed.
    Highest,
}

impl TxPriority {
    fn octile(&self) -> usize {
        match self {
            TxPriority::Lowest => 0,
            TxPriority::Low => 2,
            TxPriority::Medium => 4,
            TxPriority::High => 6,
            TxPriority::Highest => 8,
        }
    }
}

/// Produces gas price recommendations.
///
/// `ask` is the minimum price this node accepts when building blocks; `bid`
/// is the price recommended to users submitting transactions.
pub trait GasPricer<C: ChainStore>: Send {
    /// Recomputes the recommendation from the chain.
    fn update(&mut self, chain: &C);

    /// The minimum gas price accepted into mined blocks.
    fn ask(&self) -> U256;

    /// The gas price recommended for the given urgency.
    fn bid(&self, priority: TxPriority) -> U256;
}

/// A gas pricer that always returns the same price.
#[derive(Clone, Debug)]
pub struct TrivialGasPricer {
    price: U256,
}

impl TrivialGasPricer {
    /// Creates a pricer answering with the given constant.
    pub fn new(price: U256) -> Self {
        Self { price }
    }
}

impl Default for TrivialGasPricer {
    fn default() -> Self {
        Self::new(DEFAULT_GAS_PRICE)
    }
}

impl<C: ChainStore> GasPricer<C> for TrivialGasPricer {
    fn update(&mut self, _chain: &C) {}

    fn ask(&self) -> U256 {
        self.price
    }

    fn bid(&self, _priority: TxPriority) -> U256 {
        self.price
    }
}

/// A gas pricer computing octile statistics of the gas-used-weighted price
/// distribution over recent blocks.
///
/// Every update is a full recomputation over up to [`SAMPLE_BLOCKS`]
/// transaction-bearing blocks walking backward from the head.
#[derive(Clone, Debug)]
pub struct BasicGasPricer {
    octiles: [U256; 9],
    gas_per_block: u64,
}

impl Default for BasicGasPricer {
    fn default() -> Self {
        Self { octiles: [DEFAULT_GAS_PRICE; 9], gas_per_block: 0 }
    }
}

impl BasicGasPricer {
    /// The nine octile boundaries, cheapest first.
    pub fn octiles(&self) -> &[U256; 9] {
        &self.octiles
    }

    /// Gas limit of the head block at the last update.
    pub fn gas_per_block(&self) -> u64 {
        self.gas_per_block
    }
}

impl<C: ChainStore> GasPricer<C> for BasicGasPricer {
    fn update(&mut self, chain: &C) {
        let mut hash = chain.current_hash();
        if let Some(info) = chain.info(hash) {
            self.gas_per_block = info.gas_limit;
        }

        let mut dist: BTreeMap<U256, u64> = BTreeMap::new();
        let mut total: u64 = 0;
        let mut sampled = 0usize;
        while sampled < SAMPLE_BLOCKS && hash != B256::ZERO {
            let Some(info) = chain.info(hash) else { break };
            let transactions = chain.transactions(hash);
            if !transactions.is_empty() {
                let receipts = chain.receipts(hash);
                for (raw, receipt) in transactions.iter().zip(receipts.iter()) {
                    if let Ok(tx) = Transaction::decode(raw) {
                        *dist.entry(tx.gas_price).or_default() += receipt.gas_used;
                        total += receipt.gas_used;
                    }
                }
            }
            hash = info.parent_hash;
            sampled += 1;
        }

        if total > 0 {
            self.octiles = compute_octiles(&dist, total);
        }
        trace!(target: "client::gas", blocks = sampled, total_gas = total, "gas price sample updated");
    }

    fn ask(&self) -> U256 {
        self.octiles[TxPriority::Medium.octile()]
    }

    fn bid(&self, priority: TxPriority) -> U256 {
        self.octiles[priority.octile()]
    }
}

/// Computes the nine octile boundaries of a price distribution weighted by
/// gas used. `octiles[k]` is the smallest price whose cumulative weight
/// reaches `k/8` of the total; `octiles[0]` and `octiles[8]` are the extreme
/// observed prices.
fn compute_octiles(dist: &BTreeMap<U256, u64>, total: u64) -> [U256; 9] {
    let mut octiles = [U256::ZERO; 9];
    let Some((&min, _)) = dist.iter().next() else { return octiles };
    let Some((&max, _)) = dist.iter().next_back() else { return octiles };
    octiles[0] = min;
    octiles[8] = max;

    let mut cumulative: u128 = 0;
    let mut q = 1usize;
    for (&price, &gas) in dist {
        cumulative += gas as u128;
        while q <= 7 && cumulative >= total as u128 * q as u128 / 8 {
            octiles[q] = price;
            q += 1;
        }
        if q > 7 {
            break
        }
    }
    octiles
}

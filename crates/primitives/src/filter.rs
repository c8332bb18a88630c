use crate::{LogEntry, Receipt};
use alloy_primitives::{keccak256, Address, Bloom, BloomInput, B256};
use alloy_rlp::RlpEncodable;

/// One bound of a filter's block range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockPoint {
    /// A concrete block number.
    Number(u64),
    /// The start of the chain.
    Earliest,
    /// The current canonical head.
    Latest,
    /// The pending block, i.e. head plus one.
    Pending,
}

impl BlockPoint {
    /// Collapses the bound to a number for canonical encoding. `Latest` and
    /// `Pending` map to the two highest values, which no real chain reaches.
    fn canonical(&self) -> u64 {
        match self {
            BlockPoint::Number(n) => *n,
            BlockPoint::Earliest => 0,
            BlockPoint::Latest => u64::MAX - 1,
            BlockPoint::Pending => u64::MAX,
        }
    }
}

impl From<u64> for BlockPoint {
    fn from(n: u64) -> Self {
        BlockPoint::Number(n)
    }
}

/// Where a queried block sits relative to the canonical chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointInChain {
    /// The block is canonical.
    Latest,
    /// The block is the pending block.
    Pending,
}

/// Identifier of an installed filter.
///
/// Real log filters are identified by the hash of their canonical form. The
/// two pseudo filters have no predicate: watches bound to them receive a
/// single synthetic entry whenever pending state or the canonical chain
/// changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterId {
    /// A log filter, identified by its canonical hash.
    Log(B256),
    /// Pseudo filter signalling a pending-state change.
    PendingChanged,
    /// Pseudo filter signalling a canonical-chain change.
    ChainChanged,
}

/// A predicate over logs: block range, emitting addresses and topics.
///
/// An empty address list matches any address; an empty alternative set at a
/// topic position matches any topic at that position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogFilter {
    /// First block the filter selects.
    pub from_block: BlockPoint,
    /// Last block the filter selects.
    pub to_block: BlockPoint,
    /// Addresses the filter selects. Empty means all.
    pub addresses: Vec<Address>,
    /// Topic alternatives per indexed position. Empty means all.
    pub topics: [Vec<B256>; 4],
}

impl Default for LogFilter {
    fn default() -> Self {
        Self {
            from_block: BlockPoint::Earliest,
            to_block: BlockPoint::Pending,
            addresses: Vec::new(),
            topics: Default::default(),
        }
    }
}

/// Canonical form hashed to derive the filter id.
#[derive(RlpEncodable)]
struct FilterCanon {
    from: u64,
    to: u64,
    addresses: Vec<Address>,
    topic0: Vec<B256>,
    topic1: Vec<B256>,
    topic2: Vec<B256>,
    topic3: Vec<B256>,
}

impl LogFilter {
    /// Creates a filter selecting everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the first block the filter selects.
    #[must_use]
    pub fn from_block(mut self, point: impl Into<BlockPoint>) -> Self {
        self.from_block = point.into();
        self
    }

    /// Sets the last block the filter selects.
    #[must_use]
    pub fn to_block(mut self, point: impl Into<BlockPoint>) -> Self {
        self.to_block = point.into();
        self
    }

    /// Adds an address to select.
    #[must_use]
    pub fn address(mut self, address: Address) -> Self {
        self.addresses.push(address);
        self
    }

    /// Adds a topic alternative at the given position.
    ///
    /// # Panics
    ///
    /// Panics if `index > 3`; logs carry at most four topics.
    #[must_use]
    pub fn topic(mut self, index: usize, topic: B256) -> Self {
        self.topics[index].push(topic);
        self
    }

    /// Hash of the canonical form, used as the filter id. Structurally equal
    /// filters hash identically.
    pub fn hash(&self) -> B256 {
        let canon = FilterCanon {
            from: self.from_block.canonical(),
            to: self.to_block.canonical(),
            addresses: self.addresses.clone(),
            topic0: self.topics[0].clone(),
            topic1: self.topics[1].clone(),
            topic2: self.topics[2].clone(),
            topic3: self.topics[3].clone(),
        };
        keccak256(alloy_rlp::encode(&canon))
    }

    /// The filter id of this filter.
    pub fn id(&self) -> FilterId {
        FilterId::Log(self.hash())
    }

    /// Whether a block at `number`, sitting at `relative` in the chain, falls
    /// inside the filter's range.
    pub fn envelops(&self, relative: PointInChain, number: u64) -> bool {
        let from = match self.from_block {
            BlockPoint::Earliest => 0,
            BlockPoint::Number(n) => n,
            // A lower bound at the (moving) tip only ever selects the tip.
            BlockPoint::Latest | BlockPoint::Pending => u64::MAX,
        };
        if from > number {
            return false
        }
        match self.to_block {
            BlockPoint::Pending => true,
            BlockPoint::Latest => relative == PointInChain::Latest,
            BlockPoint::Number(n) => relative == PointInChain::Latest && number <= n,
            BlockPoint::Earliest => false,
        }
    }

    /// Whether a single log entry satisfies the address and topic predicate.
    pub fn matches_log(&self, log: &LogEntry) -> bool {
        if !self.addresses.is_empty() && !self.addresses.contains(&log.address) {
            return false
        }
        self.topics.iter().enumerate().all(|(i, alternatives)| {
            alternatives.is_empty() ||
                log.topics.get(i).is_some_and(|topic| alternatives.contains(topic))
        })
    }

    /// Returns the logs of a receipt the filter selects.
    pub fn matches(&self, receipt: &Receipt) -> Vec<LogEntry> {
        receipt.logs.iter().filter(|log| self.matches_log(log)).cloned().collect()
    }

    /// Cheap pre-check: whether a block whose header carries `bloom` may
    /// contain a matching log. False positives are possible, false negatives
    /// are not.
    pub fn matches_bloom(&self, bloom: Bloom) -> bool {
        let address_possible = self.addresses.is_empty() ||
            self.addresses
                .iter()
                .any(|address| bloom.contains_input(BloomInput::Raw(address.as_slice())));
        address_possible &&
            self.topics.iter().all(|alternatives| {
                alternatives.is_empty() ||
                    alternatives
                        .iter()
                        .any(|topic| bloom.contains_input(BloomInput::Raw(topic.as_slice())))
            })
    }
}

use crate::LogEntry;
use alloy_primitives::{Bloom, B256};
use serde::{Deserialize, Serialize};

/// Receipt containing the result of a transaction execution.
///
/// Receipts are position-aligned with the transactions of their block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Root of the state trie after this transaction executed.
    pub post_state: B256,
    /// Gas used by this transaction.
    pub gas_used: u64,
    /// Logs emitted during execution.
    pub logs: Vec<LogEntry>,
    /// Union of the bloom filters of all logs.
    pub bloom: Bloom,
}

impl Receipt {
    /// Creates a receipt, deriving the bloom from the given logs.
    pub fn new(post_state: B256, gas_used: u64, logs: Vec<LogEntry>) -> Self {
        let mut bloom = Bloom::ZERO;
        for log in &logs {
            bloom |= log.bloom();
        }
        Self { post_state, gas_used, logs, bloom }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, BloomInput, Bytes};

    #[test]
    fn bloom_is_union_of_log_blooms() {
        let a = LogEntry {
            address: Address::with_last_byte(1),
            topics: vec![B256::with_last_byte(1)],
            data: Bytes::new(),
        };
        let b = LogEntry {
            address: Address::with_last_byte(2),
            topics: vec![B256::with_last_byte(2)],
            data: Bytes::new(),
        };
        let receipt = Receipt::new(B256::ZERO, 21_000, vec![a.clone(), b.clone()]);
        assert!(receipt.bloom.contains_input(BloomInput::Raw(a.address.as_slice())));
        assert!(receipt.bloom.contains_input(BloomInput::Raw(b.address.as_slice())));
    }
}

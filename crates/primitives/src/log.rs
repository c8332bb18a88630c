use alloy_primitives::{Address, Bloom, BloomInput, Bytes, TxHash, B256};
use alloy_rlp::{RlpDecodable, RlpEncodable};
use serde::{Deserialize, Serialize};

/// A log entry emitted during execution.
#[derive(Clone, Debug, Default, PartialEq, Eq, RlpEncodable, RlpDecodable, Serialize, Deserialize)]
pub struct LogEntry {
    /// Address of the contract that emitted the log.
    pub address: Address,
    /// Indexed topics.
    pub topics: Vec<B256>,
    /// Unindexed payload.
    pub data: Bytes,
}

impl LogEntry {
    /// Returns the bloom filter of this single entry.
    pub fn bloom(&self) -> Bloom {
        let mut bloom = Bloom::ZERO;
        bloom.accrue(BloomInput::Raw(self.address.as_slice()));
        for topic in &self.topics {
            bloom.accrue(BloomInput::Raw(topic.as_slice()));
        }
        bloom
    }
}

/// A log entry localised to the block and transaction that produced it.
///
/// The default value doubles as the synthetic "something changed" entry
/// delivered to watches subscribed to the pending/chain pseudo filters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalisedLogEntry {
    /// The log entry itself.
    pub entry: LogEntry,
    /// Number of the block the entry was produced in. For entries produced
    /// by pending transactions this is the head number plus one.
    pub block_number: u64,
    /// Hash of the transaction that produced the entry.
    pub transaction_hash: TxHash,
}

impl LocalisedLogEntry {
    /// Creates a localised entry.
    pub fn new(entry: LogEntry, block_number: u64, transaction_hash: TxHash) -> Self {
        Self { entry, block_number, transaction_hash }
    }

    /// The synthetic entry delivered to pending/chain watches.
    pub fn special() -> Self {
        Self::default()
    }

    /// Returns true if this is a synthetic entry rather than a real log.
    pub fn is_special(&self) -> bool {
        self.entry == LogEntry::default() && self.transaction_hash == TxHash::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bloom_contains_address_and_topics() {
        let entry = LogEntry {
            address: Address::with_last_byte(0xaa),
            topics: vec![B256::with_last_byte(1), B256::with_last_byte(2)],
            data: Bytes::new(),
        };
        let bloom = entry.bloom();
        assert!(bloom.contains_input(BloomInput::Raw(entry.address.as_slice())));
        for topic in &entry.topics {
            assert!(bloom.contains_input(BloomInput::Raw(topic.as_slice())));
        }
        assert!(!bloom.contains_input(BloomInput::Raw(B256::with_last_byte(3).as_slice())));
    }

    #[test]
    fn special_entry_is_detectable() {
        assert!(LocalisedLogEntry::special().is_special());
        let real = LocalisedLogEntry::new(
            LogEntry { address: Address::with_last_byte(1), topics: vec![], data: Bytes::new() },
            1,
            TxHash::with_last_byte(9),
        );
        assert!(!real.is_special());
    }
}

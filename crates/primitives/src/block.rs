use alloy_primitives::{Bloom, B256};
use serde::{Deserialize, Serialize};

/// The slice of a block header the orchestrator cares about.
///
/// Immutable once the block is in the chain store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockInfo {
    /// Hash of the block.
    pub hash: B256,
    /// Hash of the parent block.
    pub parent_hash: B256,
    /// Height of the block in its chain.
    pub number: u64,
    /// Timestamp the block was sealed at.
    pub timestamp: u64,
    /// Gas limit of the block.
    pub gas_limit: u64,
    /// Union of the bloom filters of all logs in the block.
    pub logs_bloom: Bloom,
}

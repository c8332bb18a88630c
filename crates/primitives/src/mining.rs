use alloy_primitives::{B256, U256};
use alloy_rlp::{RlpDecodable, RlpEncodable};
use serde::{Deserialize, Serialize};

/// A frozen candidate block handed to proof-of-work search.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkPackage {
    /// Hash of the candidate header, the input to the proof-of-work function.
    pub header_hash: B256,
    /// Difficulty target the proof has to meet.
    pub difficulty: U256,
}

/// A proof-of-work solution for a [`WorkPackage`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, RlpEncodable, RlpDecodable, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowProof {
    /// Intermediate mix digest.
    pub mix_hash: B256,
    /// The winning nonce.
    pub nonce: u64,
}

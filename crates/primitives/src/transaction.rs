use alloy_primitives::{keccak256, Address, Bytes, TxHash, U256};
use alloy_rlp::{RlpDecodable, RlpEncodable};
use serde::{Deserialize, Serialize};

/// A recovered transaction.
///
/// Sender recovery is performed by the networking / pool layer before a
/// transaction reaches the orchestrator; from this layer's point of view the
/// sender is just another attribute. The signature bytes are carried opaquely
/// so a transaction can be re-encoded and resubmitted (e.g. after a reorg)
/// without access to the signing key.
#[derive(Clone, Debug, Default, PartialEq, Eq, RlpEncodable, RlpDecodable, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Recovered sender of the transaction.
    pub sender: Address,
    /// Sender nonce.
    pub nonce: u64,
    /// Price per unit of gas.
    pub gas_price: U256,
    /// Gas limit of the transaction.
    pub gas: u64,
    /// Recipient. The zero address denotes contract creation.
    pub to: Address,
    /// Transferred value in wei.
    pub value: U256,
    /// Call data.
    pub input: Bytes,
    /// Opaque signature bytes, validated upstream.
    pub signature: Bytes,
}

impl Transaction {
    /// Returns the transaction hash: keccak of the RLP encoding.
    pub fn hash(&self) -> TxHash {
        keccak256(alloy_rlp::encode(self))
    }

    /// RLP-encodes the transaction into a fresh buffer.
    pub fn encoded(&self) -> Bytes {
        alloy_rlp::encode(self).into()
    }

    /// Decodes a transaction from raw RLP bytes.
    pub fn decode(mut raw: &[u8]) -> Result<Self, alloy_rlp::Error> {
        <Self as alloy_rlp::Decodable>::decode(&mut raw)
    }

    /// Returns true if this transaction creates a contract.
    pub fn is_create(&self) -> bool {
        self.to == Address::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transaction {
        Transaction {
            sender: Address::with_last_byte(1),
            nonce: 7,
            gas_price: U256::from(20u64),
            gas: 21_000,
            to: Address::with_last_byte(2),
            value: U256::from(1_000u64),
            input: Bytes::new(),
            signature: Bytes::from_static(&[1u8; 65]),
        }
    }

    #[test]
    fn encode_roundtrip() {
        let tx = sample();
        let raw = tx.encoded();
        let decoded = Transaction::decode(&raw).unwrap();
        assert_eq!(tx, decoded);
        assert_eq!(tx.hash(), decoded.hash());
    }

    #[test]
    fn hash_depends_on_nonce() {
        let a = sample();
        let mut b = sample();
        b.nonce += 1;
        assert_ne!(a.hash(), b.hash());
    }
}

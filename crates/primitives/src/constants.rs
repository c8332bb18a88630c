//! Protocol and database constants.

use alloy_primitives::U256;

/// The wire protocol version spoken by this node.
pub const PROTOCOL_VERSION: u32 = 61;

/// The minor protocol version.
///
/// A store written under a different minor version can be reused after
/// re-verification; it does not need to be rebuilt.
pub const MINOR_PROTOCOL_VERSION: u32 = 2;

/// The on-disk database layout version.
pub const DATABASE_VERSION: u32 = 9;

/// One szabo in wei.
pub const SZABO: u128 = 1_000_000_000_000;

/// The gas price assumed when no better estimate is available: 10 szabo.
pub const DEFAULT_GAS_PRICE: U256 = U256::from_limbs([10_000_000_000_000u64, 0, 0, 0]);

/// The intrinsic gas cost of a plain value transfer.
pub const TX_GAS: u64 = 21_000;

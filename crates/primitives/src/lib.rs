#![warn(missing_docs, unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]
#![doc(test(
    no_crate_inject,
    attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_variables))
))]

//! Commonly used types for the hearth node.
//!
//! This crate contains the value types that cross crate boundaries: block
//! headers as the orchestrator sees them, recovered transactions, execution
//! receipts and their log entries, log filters, and mining work packages.

mod block;
mod call;
pub mod constants;
mod filter;
mod log;
mod mining;
mod receipt;
mod transaction;

pub use block::BlockInfo;
pub use call::{CallRequest, ExecutionResult};
pub use filter::{BlockPoint, FilterId, LogFilter, PointInChain};
pub use log::{LocalisedLogEntry, LogEntry};
pub use mining::{PowProof, WorkPackage};
pub use receipt::Receipt;
pub use transaction::Transaction;

// Re-exported so downstream crates do not need a direct alloy-primitives
// dependency for the common cases.
pub use alloy_primitives::{keccak256, Address, Bloom, BloomInput, Bytes, TxHash, B256, U256};

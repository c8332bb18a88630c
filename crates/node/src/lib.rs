#![warn(missing_docs, unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]
#![doc(test(
    no_crate_inject,
    attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_variables))
))]

//! The hearth node orchestrator.
//!
//! The [`Client`] owns the head-of-chain view and reconciles three
//! independently advancing sources of truth into it: blocks arriving from
//! peers through the block queue, transactions arriving from users through
//! the pool, and candidate blocks sealed by local or remote miners. Each
//! pass of its work loop drains completed miners, folds queued peer blocks
//! into the chain (resurrecting transactions displaced by reorgs), rebuilds
//! the pending state, and delivers log notifications to installed watches.
//!
//! The chain store, state database, transaction pool, block queue, P2P host
//! and proof-of-work engine are collaborators behind the traits in
//! `hearth-interfaces`; the client is generic over a [`NodeTypes`]
//! bundle of them.
//!
//! [`NodeTypes`]: hearth_interfaces::NodeTypes
//!
//! ## Feature Flags
//!
//! - `test-utils`: Export in-memory mock collaborators for testing

pub mod client;
pub use client::Client;

pub mod config;
pub use config::{ClientConfig, GasPricerKind};

pub mod filter;
pub use filter::{FilterError, WatchId};

pub mod gas_price;
pub use gas_price::{BasicGasPricer, GasPricer, TrivialGasPricer, TxPriority};

pub mod miner;
pub use miner::MiningProgress;

pub mod version;
pub use version::VersionChecker;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

#![warn(missing_docs, unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]
#![doc(test(
    no_crate_inject,
    attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_variables))
))]

//! Traits the hearth node consumes from its collaborators.
//!
//! The orchestrator coordinates a chain store, a state database, a
//! transaction pool, a block queue, a P2P host and a proof-of-work engine,
//! but defines none of them. This crate is the seam: implementations live in
//! the storage / networking / consensus layers, the node is generic over
//! them via [`NodeTypes`].

mod chain;
mod error;
mod host;
mod pool;
mod pow;
mod queue;
mod state;

pub use chain::{ChainStore, ChainSync, ImportRoute, StoreAction};
pub use error::{CallError, ImportError, PoolError, StoreError};
pub use host::HostHandle;
pub use pool::TxPool;
pub use pow::Pow;
pub use queue::BlockQueue;
pub use state::StateView;

/// Bundles the component types a node instance is built from.
///
/// This exists so the orchestrator can be generic over a single parameter
/// instead of five.
pub trait NodeTypes: Send + Sync + 'static {
    /// The chain store implementation.
    type Chain: ChainStore;
    /// The transaction pool implementation.
    type Pool: TxPool;
    /// The peer block queue implementation.
    type Queue: BlockQueue;
    /// The P2P host, held weakly by the node.
    type Host: HostHandle;
    /// The proof-of-work engine.
    type Pow: Pow;
}

/// The state type of a node bundle.
pub type StateOf<N> = <<N as NodeTypes>::Chain as ChainStore>::State;

/// The state database handle type of a node bundle.
pub type StateDbOf<N> = <<N as NodeTypes>::Chain as ChainStore>::StateDb;

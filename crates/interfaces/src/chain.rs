use crate::{BlockQueue, ImportError, StateView, StoreError};
use hearth_primitives::{BlockInfo, Bytes, Receipt, TxHash, B256};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What to do with an existing on-disk store when opening it.
///
/// Totally ordered: a more destructive action always wins when two sources
/// of truth disagree, so actions combine with `max`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreAction {
    /// Use the store as-is.
    #[default]
    Trust,
    /// Use the store, re-verifying stored blocks on access.
    Verify,
    /// Discard the store and rebuild from genesis.
    Kill,
}

/// Outcome of importing a single block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportRoute {
    /// Blocks that became canonical through this import, in ascending
    /// order. Empty if the block was rejected, already known, or landed on a
    /// side chain.
    pub canonical: Vec<B256>,
    /// The canonical head after the import.
    pub head: B256,
}

/// Outcome of bulk-syncing the peer block queue into the chain.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChainSync {
    /// Blocks that became canonical, in ascending order.
    pub fresh: Vec<B256>,
    /// Previously canonical blocks displaced by a reorg, in ascending order.
    pub dead: Vec<B256>,
    /// Whether the queue still holds blocks after this round.
    pub more: bool,
}

/// The canonical block chain store.
///
/// Implementations are internally synchronized: all methods take `&self` and
/// may be called from any thread. The orchestrator's own locking (described
/// on the client) only sequences the state views derived from the store.
pub trait ChainStore: Sized + Send + Sync + 'static {
    /// Copy-on-write handle to the backing state database. Clones share the
    /// underlying store; a clone taken before a batch of writes observes
    /// none of them.
    type StateDb: Clone + Send + Sync + 'static;
    /// The state view type produced from this store.
    type State: StateView<Self>;

    /// Opens the chain store at `path`.
    fn open(path: &Path, action: StoreAction) -> Result<Self, StoreError>;

    /// Opens the backing state database at `path`.
    fn open_db(path: &Path, action: StoreAction) -> Result<Self::StateDb, StoreError>;

    /// Discards in-memory state and reopens the store, applying `action` to
    /// whatever is on disk.
    fn reopen(&self, path: &Path, action: StoreAction) -> Result<(), StoreError>;

    /// Hash of the canonical head.
    fn current_hash(&self) -> B256;

    /// Number of the canonical head.
    fn number(&self) -> u64;

    /// Header data of a stored block.
    fn info(&self, hash: B256) -> Option<BlockInfo>;

    /// Receipts of a stored block, position-aligned with its transactions.
    fn receipts(&self, hash: B256) -> Vec<Receipt>;

    /// Raw transaction bytes of a stored block, in block order.
    fn transactions(&self, hash: B256) -> Vec<Bytes>;

    /// Transaction hashes of a stored block, in block order.
    fn transaction_hashes(&self, hash: B256) -> Vec<TxHash>;

    /// Attempts to import a single sealed block, executing it against `db`.
    ///
    /// Returns the blocks that became canonical and the resulting head. A
    /// valid block on a losing side chain yields an empty route.
    fn attempt_import(&self, block: &[u8], db: &Self::StateDb) -> Result<ImportRoute, ImportError>;

    /// Drains up to `max` blocks from the peer queue into the chain,
    /// executing them against `db`. Individual invalid blocks are dropped
    /// without failing the batch.
    fn sync<Q: BlockQueue>(&self, queue: &Q, db: &Self::StateDb, max: usize) -> ChainSync;

    /// Releases memory held for blocks that can no longer be reorged to.
    fn garbage_collect(&self);

    /// A state view positioned at the genesis block.
    fn genesis_state(&self, db: &Self::StateDb) -> Self::State;

    /// A state view positioned at the given stored block, with that block's
    /// transactions recorded as its pending list. Returns `None` for unknown
    /// blocks.
    fn state_at(&self, db: &Self::StateDb, block: B256) -> Option<Self::State>;
}

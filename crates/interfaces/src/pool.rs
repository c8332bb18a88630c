use crate::PoolError;
use hearth_primitives::{Transaction, TxHash};

/// The transaction pool.
///
/// Implementations are internally thread-safe. Economic validity is the
/// pool's own concern on import; the orchestrator re-imports transactions
/// displaced by a reorg without pre-validating them, relying on the pool and
/// the pending-state apply to weed out anything that no longer fits.
#[auto_impl::auto_impl(&, Arc)]
pub trait TxPool: Send + Sync + 'static {
    /// Imports a raw transaction.
    fn import(&self, raw: &[u8]) -> Result<TxHash, PoolError>;

    /// Removes a transaction by hash, if present.
    fn remove(&self, hash: TxHash);

    /// Removes every transaction.
    fn clear(&self);

    /// A snapshot of the pool contents in arrival order.
    fn transactions(&self) -> Vec<Transaction>;

    /// Whether the pool holds the given transaction.
    fn contains(&self, hash: TxHash) -> bool;

    /// Whether the pool is empty.
    fn is_empty(&self) -> bool;
}

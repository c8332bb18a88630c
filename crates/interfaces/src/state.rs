use crate::{CallError, ChainStore, TxPool};
use hearth_primitives::{
    Address, Bytes, CallRequest, ExecutionResult, PowProof, Receipt, Transaction, WorkPackage,
    B256, U256,
};

/// A mutable account-state view rooted at some canonical block.
///
/// The orchestrator keeps two of these: the canonical head state and the
/// pending state derived from it by applying pool transactions. Views are
/// cheap to clone; a clone is fully independent of its source.
pub trait StateView<C: ChainStore>: Clone + Send + Sync + 'static {
    /// Re-roots the view at the chain's canonical head, discarding any
    /// applied pending transactions. Returns true if the head differed from
    /// the block the view was previously rooted at.
    fn sync_to_head(&mut self, chain: &C) -> bool;

    /// Hash of the block this view is rooted at.
    fn head_hash(&self) -> B256;

    /// The beneficiary credited when a block built from this view is mined.
    fn beneficiary(&self) -> Address;

    /// Sets the mining beneficiary.
    fn set_beneficiary(&mut self, address: Address);

    /// Applies every eligible pool transaction that is not already part of
    /// the pending list, in pool order, skipping transactions priced under
    /// `min_gas_price`. Returns receipts for the newly applied transactions
    /// only, position-aligned with the new tail of [`Self::pending`].
    fn apply_pool<P: TxPool>(&mut self, chain: &C, pool: &P, min_gas_price: U256)
        -> Vec<Receipt>;

    /// Transactions applied on top of the root block, in application order.
    fn pending(&self) -> &[Transaction];

    /// A copy of this view with only the first `index` pending transactions
    /// applied.
    fn from_pending(&self, index: usize) -> Self;

    /// Account balance.
    fn balance(&self, address: Address) -> U256;

    /// Account nonce.
    fn nonce(&self, address: Address) -> u64;

    /// Credits `amount` to `address`.
    fn add_balance(&mut self, address: Address, amount: U256);

    /// Freezes the pending transactions into a candidate block header and
    /// returns the work package for proof-of-work search.
    fn commit_to_mine(&mut self, chain: &C) -> WorkPackage;

    /// Re-executes the committed candidate and checks it against this view.
    /// Used before mining when the operator distrusts the node's own state
    /// transitions.
    fn self_check(&self, chain: &C) -> bool;

    /// Attaches a proof-of-work solution to the committed candidate.
    fn complete_mine(&mut self, proof: &PowProof);

    /// The sealed block produced by [`Self::complete_mine`], ready for chain
    /// import. `None` until a proof has been attached.
    fn sealed_block(&self) -> Option<Bytes>;

    /// Executes a call against this view, mutating it. Callers that need
    /// isolation execute against a clone.
    fn call(&mut self, request: &CallRequest) -> Result<ExecutionResult, CallError>;
}

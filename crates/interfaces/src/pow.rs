use hearth_primitives::{PowProof, WorkPackage};

/// The proof-of-work engine.
#[auto_impl::auto_impl(&, Arc)]
pub trait Pow: Send + Sync + 'static {
    /// Searches `rounds` nonces starting at `start_nonce` for a solution to
    /// the given work package. Returns `None` when the range is exhausted
    /// without a solution.
    fn solve(&self, work: &WorkPackage, start_nonce: u64, rounds: u64) -> Option<PowProof>;

    /// Verifies a proof against a work package.
    fn verify(&self, work: &WorkPackage, proof: &PowProof) -> bool;
}

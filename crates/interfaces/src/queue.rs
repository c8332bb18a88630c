use hearth_primitives::Bytes;

/// The queue of blocks received from peers, awaiting chain import.
///
/// Ingestion happens on the P2P host's threads; the orchestrator only drains
/// and clears. Implementations are internally thread-safe.
#[auto_impl::auto_impl(&, Arc)]
pub trait BlockQueue: Send + Sync + 'static {
    /// Enqueues a raw block.
    fn push(&self, block: Bytes);

    /// Removes and returns up to `max` blocks in arrival order.
    fn drain(&self, max: usize) -> Vec<Bytes>;

    /// Discards all queued blocks.
    fn clear(&self);

    /// Whether the queue is empty.
    fn is_empty(&self) -> bool;
}

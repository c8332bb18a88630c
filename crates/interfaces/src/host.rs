use hearth_primitives::U256;

/// Handle to the P2P host.
///
/// The node holds this behind a [`Weak`](std::sync::Weak) reference: the
/// host's lifetime belongs to whoever wired the node up, and every call site
/// upgrades first, treating a failed upgrade as a silent no-op.
#[auto_impl::auto_impl(&, Arc)]
pub trait HostHandle: Send + Sync + 'static {
    /// Changes the network id announced to peers.
    fn set_network_id(&self, id: U256);

    /// Tells the host that new pending transactions are available to relay.
    fn note_new_transactions(&self);

    /// Tells the host that new canonical blocks are available to relay.
    fn note_new_blocks(&self);

    /// Drops all peer sync state.
    fn reset(&self);

    /// Whether the host is currently syncing from a peer.
    fn is_syncing(&self) -> bool;
}

//! The node orchestrator.

use crate::{
    config::{ClientConfig, GasPricerKind},
    filter::{FilterError, FilterWatches, WatchId, GC_INTERVAL},
    gas_price::{BasicGasPricer, GasPricer, TrivialGasPricer, TxPriority},
    miner::{LocalMiner, MiningProgress, RemoteMiner},
    version::VersionChecker,
};
use hearth_interfaces::{
    BlockQueue, ChainStore, HostHandle, NodeTypes, StateDbOf, StateOf, StateView, StoreAction,
    StoreError, TxPool,
};
use hearth_primitives::{
    Address, CallRequest, ExecutionResult, FilterId, LocalisedLogEntry, LogFilter, PowProof,
    Transaction, WorkPackage, B256, U256,
};
use parking_lot::{Condvar, Mutex, RwLock};
use std::{
    collections::HashSet,
    fmt,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Weak,
    },
    thread,
    time::{Duration, Instant},
};
use tracing::{debug, info, trace, warn};

/// Upper bound on peer blocks folded into the chain per pass.
const MAX_SYNC_BLOCKS: usize = 100;

/// How long an idle pass sleeps before the next one runs. Any external
/// change wakes the loop early, so a pass runs within this bound of the
/// change.
const IDLE_SLEEP: Duration = Duration::from_millis(100);

/// Wakes the work loop out of its idle sleep.
#[derive(Default)]
struct WorkSignal {
    pending: Mutex<bool>,
    cond: Condvar,
}

impl WorkSignal {
    fn wake(&self) {
        *self.pending.lock() = true;
        self.cond.notify_all();
    }

    fn wait(&self, timeout: Duration) {
        let mut pending = self.pending.lock();
        if !*pending {
            let _ = self.cond.wait_for(&mut pending, timeout);
        }
        *pending = false;
    }
}

/// The states guarded by the state-DB lock.
struct States<N: NodeTypes> {
    /// Handle to the backing state database.
    db: StateDbOf<N>,
    /// Canonical head state. Replaced, never mutated, when the head moves.
    pre_mine: StateOf<N>,
    /// Pending state: head state plus applied pool transactions. Source for
    /// call simulation and mining.
    post_mine: StateOf<N>,
}

/// The node orchestrator.
///
/// Owns the chain store, the state views, the miners and the watch
/// registries, and reconciles peer blocks, user transactions and locally
/// sealed blocks into one canonical view. A dedicated thread drives
/// [`work passes`](Client::flush_transactions); the public API is safe to
/// call from any thread.
///
/// Three locks guard disjoint state: the state-DB lock (head and pending
/// state), the miner locks, and the filters-and-watches mutex. When nested
/// they are always taken in that order; the work loop additionally runs the
/// long peer-block sync on a cloned database overlay so API readers are not
/// starved while peers are drained.
pub struct Client<N: NodeTypes> {
    inner: Arc<ClientInner<N>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
}

pub(crate) struct ClientInner<N: NodeTypes> {
    chain: N::Chain,
    pool: N::Pool,
    queue: N::Queue,
    pow: N::Pow,
    /// The host is never kept alive by the node; every use upgrades and
    /// degrades to a no-op when the host is gone.
    host: Weak<N::Host>,
    gas_pricer: Mutex<Box<dyn GasPricer<N::Chain>>>,
    state: RwLock<States<N>>,
    local_miners: RwLock<Vec<LocalMiner>>,
    remote_miner: Mutex<RemoteMiner<N>>,
    watches: Mutex<FilterWatches>,
    /// Serializes work passes between the loop thread and `flush` callers.
    pass: Mutex<()>,
    signal: WorkSignal,
    stop: AtomicBool,
    mining: AtomicBool,
    force_mining: AtomicBool,
    turbo_mining: AtomicBool,
    paranoia: AtomicBool,
    verify_own_blocks: AtomicBool,
    last_gc: Mutex<Instant>,
    db_path: PathBuf,
    weak_self: Weak<ClientInner<N>>,
}

// === impl Client ===

impl<N: NodeTypes> Client<N> {
    /// Creates a client over the given collaborators, opening the chain
    /// store and state database at the configured path, and starts the work
    /// loop.
    ///
    /// The on-disk store is version-checked first; a mismatch (or the
    /// configured `force_action`) can escalate the open into a rebuild.
    pub fn new(
        config: ClientConfig,
        pool: N::Pool,
        queue: N::Queue,
        pow: N::Pow,
        host: Weak<N::Host>,
    ) -> Result<Self, StoreError> {
        let gas_pricer: Box<dyn GasPricer<N::Chain>> = match config.gas_pricer {
            GasPricerKind::Trivial => Box::new(TrivialGasPricer::default()),
            GasPricerKind::Basic => Box::new(BasicGasPricer::default()),
        };
        Self::with_gas_pricer(config, gas_pricer, pool, queue, pow, host)
    }

    /// Like [`Client::new`] but with a caller-supplied gas pricer.
    pub fn with_gas_pricer(
        config: ClientConfig,
        mut gas_pricer: Box<dyn GasPricer<N::Chain>>,
        pool: N::Pool,
        queue: N::Queue,
        pow: N::Pow,
        host: Weak<N::Host>,
    ) -> Result<Self, StoreError> {
        let checker = VersionChecker::new(&config.db_path);
        let action = checker.action().max(config.force_action);
        if action != StoreAction::Trust {
            info!(target: "client", ?action, path = ?config.db_path, "opening store");
        }
        let chain = N::Chain::open(&config.db_path, action)?;
        let db = N::Chain::open_db(&config.db_path, action)?;
        let mut pre_mine = chain.genesis_state(&db);
        pre_mine.sync_to_head(&chain);
        let post_mine = pre_mine.clone();
        gas_pricer.update(&chain);

        let inner = Arc::new_cyclic(|weak| ClientInner {
            chain,
            pool,
            queue,
            pow,
            host,
            gas_pricer: Mutex::new(gas_pricer),
            state: RwLock::new(States { db, pre_mine, post_mine }),
            local_miners: RwLock::new(Vec::new()),
            remote_miner: Mutex::new(RemoteMiner::new()),
            watches: Mutex::new(FilterWatches::default()),
            pass: Mutex::new(()),
            signal: WorkSignal::default(),
            stop: AtomicBool::new(false),
            mining: AtomicBool::new(false),
            force_mining: AtomicBool::new(config.force_mining),
            turbo_mining: AtomicBool::new(config.turbo_mining),
            paranoia: AtomicBool::new(config.paranoia),
            verify_own_blocks: AtomicBool::new(config.verify_own_blocks),
            last_gc: Mutex::new(Instant::now()),
            db_path: config.db_path.clone(),
            weak_self: weak.clone(),
        });

        if let Some(host) = Weak::<N::Host>::upgrade(&inner.host) {
            host.set_network_id(config.network_id);
        }
        inner.set_mining_threads(config.miners.max(0) as usize);
        checker.set_ok();
        inner.do_work();

        let client = Self { inner, worker: Mutex::new(None) };
        client.start_working();
        Ok(client)
    }

    fn start_working(&self) {
        let mut worker = self.worker.lock();
        if worker.is_some() {
            return
        }
        self.inner.stop.store(false, Ordering::SeqCst);
        let inner = Arc::clone(&self.inner);
        let spawned = thread::Builder::new().name("client".into()).spawn(move || {
            trace!(target: "client", "work loop started");
            while !inner.stop.load(Ordering::SeqCst) {
                let busy = inner.do_work();
                if !busy && !inner.stop.load(Ordering::SeqCst) {
                    inner.signal.wait(IDLE_SLEEP);
                }
            }
            trace!(target: "client", "work loop stopped");
        });
        match spawned {
            Ok(handle) => *worker = Some(handle),
            Err(err) => warn!(target: "client", %err, "failed to spawn work loop"),
        }
    }

    /// Stops the work loop, waiting for the pass in flight to finish.
    fn stop_working(&self) {
        let handle = self.worker.lock().take();
        if let Some(handle) = handle {
            self.inner.stop.store(true, Ordering::SeqCst);
            self.inner.signal.wake();
            let _ = handle.join();
        }
    }

    /// The chain store.
    pub fn chain(&self) -> &N::Chain {
        &self.inner.chain
    }

    /// Simulates a call against a transient copy of the pending state.
    ///
    /// The caller is credited `value + gas · gasPrice` in the copy, so the
    /// simulation cannot fail for lack of funds. Neither the head state nor
    /// the pending state is touched; any execution failure is swallowed and
    /// reported as the empty result.
    pub fn call(&self, request: &CallRequest) -> ExecutionResult {
        let mut temp = {
            let state = self.inner.state.read();
            let mut temp = state.post_mine.clone();
            temp.add_balance(
                request.from,
                request.value + U256::from(request.gas) * request.gas_price,
            );
            temp
        };
        match temp.call(request) {
            Ok(result) => result,
            Err(err) => {
                debug!(target: "client", %err, "call simulation failed");
                ExecutionResult::default()
            }
        }
    }

    /// Pushes a raw transaction into the pool and wakes the work loop.
    ///
    /// Transactions the pool rejects are dropped silently; this layer
    /// reports no error to the caller.
    pub fn inject(&self, raw: &[u8]) {
        match self.inner.pool.import(raw) {
            Ok(hash) => trace!(target: "client", ?hash, "injected transaction"),
            Err(err) => debug!(target: "client", %err, "rejected injected transaction"),
        }
        self.inner.signal.wake();
    }

    /// Runs one work pass on the calling thread.
    pub fn flush_transactions(&self) {
        self.inner.do_work();
    }

    /// Drops every applied pending transaction and clears the pool.
    pub fn clear_pending(&self) {
        let mut changed = HashSet::new();
        {
            let mut state = self.inner.state.write();
            if state.post_mine.pending().is_empty() {
                return
            }
            changed.insert(FilterId::PendingChanged);
            self.inner.pool.clear();
            state.post_mine = state.pre_mine.clone();
        }
        self.inner.note_state_change_miners();
        self.inner.watches.lock().note_changed(&changed);
    }

    /// Transactions currently applied to the pending state, in order.
    pub fn pending_transactions(&self) -> Vec<Transaction> {
        self.inner.state.read().post_mine.pending().to_vec()
    }

    /// A state snapshot at the given stored block.
    pub fn as_of(&self, block: B256) -> Option<StateOf<N>> {
        let state = self.inner.state.read();
        self.inner.chain.state_at(&state.db, block)
    }

    /// A state snapshot at the given stored block with only its first
    /// `index` transactions applied.
    pub fn state_at_index(&self, index: usize, block: B256) -> Option<StateOf<N>> {
        self.as_of(block).map(|state| state.from_pending(index))
    }

    /// The pending state with only its first `index` transactions applied.
    pub fn pending_state_at(&self, index: usize) -> StateOf<N> {
        self.inner.state.read().post_mine.from_pending(index)
    }

    /// Stops mining and the loop, discards the pool, the queue and every
    /// miner, rebuilds the chain store and the state database from scratch,
    /// then restarts. Mining resumes if it was running.
    pub fn kill_chain(&self) -> Result<(), StoreError> {
        let was_mining = self.is_mining();
        if was_mining {
            self.stop_mining();
        }
        self.stop_working();

        self.inner.pool.clear();
        self.inner.queue.clear();
        self.inner.local_miners.write().clear();
        *self.inner.remote_miner.lock() = RemoteMiner::new();

        {
            let mut state = self.inner.state.write();
            self.inner.chain.reopen(&self.inner.db_path, StoreAction::Kill)?;
            state.db = N::Chain::open_db(&self.inner.db_path, StoreAction::Kill)?;
            state.pre_mine = self.inner.chain.genesis_state(&state.db);
            state.pre_mine.sync_to_head(&self.inner.chain);
            state.post_mine = state.pre_mine.clone();
        }
        self.inner.gas_pricer.lock().update(&self.inner.chain);
        if let Some(host) = self.inner.host.upgrade() {
            host.reset();
        }
        info!(target: "client", path = ?self.inner.db_path, "chain killed and rebuilt");

        self.inner.do_work();
        self.inner.set_mining_threads(0);
        self.start_working();
        if was_mining {
            self.start_mining();
        }
        Ok(())
    }

    // === mining ===

    /// Starts the local miners.
    pub fn start_mining(&self) {
        self.inner.mining.store(true, Ordering::SeqCst);
        self.inner.note_state_change_miners();
    }

    /// Stops the local miners. Workers stay allocated but idle.
    pub fn stop_mining(&self) {
        self.inner.mining.store(false, Ordering::SeqCst);
    }

    /// Whether local mining is active.
    pub fn is_mining(&self) -> bool {
        self.inner.mining.load(Ordering::SeqCst)
    }

    /// Mine even without pending transactions or while syncing.
    pub fn set_force_mining(&self, enable: bool) {
        self.inner.force_mining.store(enable, Ordering::SeqCst);
        self.inner.note_state_change_miners();
    }

    /// Replaces the local miners with `threads` fresh workers; `0` selects
    /// the hardware default. Mining is stopped; restart it explicitly.
    pub fn set_mining_threads(&self, threads: usize) {
        self.stop_mining();
        self.inner.set_mining_threads(threads);
    }

    /// Number of allocated local miners.
    pub fn mining_threads(&self) -> usize {
        self.inner.local_miners.read().len()
    }

    /// The beneficiary mined blocks are credited to.
    pub fn beneficiary(&self) -> Address {
        self.inner.state.read().pre_mine.beneficiary()
    }

    /// Changes the beneficiary of future mined blocks. The pending state is
    /// rebuilt on the next pass.
    pub fn set_beneficiary(&self, address: Address) {
        self.inner.state.write().pre_mine.set_beneficiary(address);
        self.inner.signal.wake();
    }

    /// Combined progress counters of all local miners.
    pub fn mining_progress(&self) -> MiningProgress {
        let mut combined = MiningProgress::default();
        for miner in self.inner.local_miners.read().iter() {
            combined.combine(&miner.progress());
        }
        combined
    }

    /// Hash rate over the local miners, in kilohashes per second.
    pub fn hashrate(&self) -> u64 {
        let mut rate = 0u64;
        for miner in self.inner.local_miners.read().iter() {
            let progress = miner.progress();
            if progress.ms > 0 {
                rate += progress.hashes / progress.ms;
            }
        }
        rate / 1000
    }

    /// Per-round progress samples combined index-wise across miners.
    pub fn mining_history(&self) -> Vec<MiningProgress> {
        let miners = self.inner.local_miners.read();
        let mut iter = miners.iter();
        let Some(first) = iter.next() else { return Vec::new() };
        let mut combined = first.history();
        for miner in iter {
            for (slot, sample) in combined.iter_mut().zip(miner.history()) {
                slot.combine(&sample);
            }
        }
        combined
    }

    /// Freezes the current pending state into a candidate block and returns
    /// its work package for an external miner.
    pub fn get_work(&self) -> WorkPackage {
        let state = { self.inner.state.read().post_mine.clone() };
        self.inner.remote_miner.lock().update(state, &self.inner.chain)
    }

    /// Submits an external proof for the most recently advertised work
    /// package. Returns false for stale or invalid proofs.
    pub fn submit_work(&self, proof: &PowProof) -> bool {
        let accepted = self.inner.remote_miner.lock().submit(&self.inner.pow, proof);
        if accepted {
            self.inner.signal.wake();
        }
        accepted
    }

    // === watches ===

    /// Installs a log filter and subscribes a watch to it.
    pub fn watch_logs(&self, filter: LogFilter) -> WatchId {
        self.inner.watches.lock().install(filter)
    }

    /// Subscribes a watch to pending-state changes.
    pub fn watch_pending(&self) -> WatchId {
        self.inner.watches.lock().install_special(FilterId::PendingChanged)
    }

    /// Subscribes a watch to canonical-chain changes.
    pub fn watch_chain(&self) -> WatchId {
        self.inner.watches.lock().install_special(FilterId::ChainChanged)
    }

    /// Removes a watch. Returns false if it did not exist.
    pub fn uninstall_watch(&self, id: WatchId) -> bool {
        self.inner.watches.lock().uninstall(id)
    }

    /// Returns and clears the entries a watch accumulated.
    pub fn check_watch(&self, id: WatchId) -> Result<Vec<LocalisedLogEntry>, FilterError> {
        self.inner.watches.lock().poll(id)
    }

    /// Returns the entries a watch accumulated without clearing them.
    pub fn peek_watch(&self, id: WatchId) -> Result<Vec<LocalisedLogEntry>, FilterError> {
        self.inner.watches.lock().peek(id)
    }

    /// Removes watches that have not been polled for the watch TTL as of
    /// `now`. The work loop runs this periodically; it is exposed so
    /// operators and tests can force a sweep.
    pub fn collect_stale_watches(&self, now: Instant) {
        for id in self.inner.watches.lock().gc(now) {
            debug!(target: "client::filters", ?id, "collected idle watch");
        }
    }

    // === network ===

    /// Changes the network id announced to peers.
    pub fn set_network_id(&self, id: U256) {
        if let Some(host) = self.inner.host.upgrade() {
            host.set_network_id(id);
        }
    }

    /// Whether the host is syncing from peers. False when the host is gone.
    pub fn is_syncing(&self) -> bool {
        self.inner.host.upgrade().map(|host| host.is_syncing()).unwrap_or(false)
    }

    /// Recommended gas price for a medium-priority transaction.
    pub fn suggested_gas_price(&self) -> U256 {
        self.inner.gas_pricer.lock().bid(TxPriority::Medium)
    }

    /// Recommended gas price for the given urgency.
    pub fn gas_price_bid(&self, priority: TxPriority) -> U256 {
        self.inner.gas_pricer.lock().bid(priority)
    }

    /// Recomputes the gas price recommendation from the chain.
    pub fn update_gas_pricer(&self) {
        self.inner.gas_pricer.lock().update(&self.inner.chain);
    }

    /// Whether locally mined blocks run through full verification.
    pub fn verify_own_blocks(&self) -> bool {
        self.inner.verify_own_blocks.load(Ordering::SeqCst)
    }
}

impl<N: NodeTypes> Drop for Client<N> {
    fn drop(&mut self) {
        self.stop_working();
        self.inner.local_miners.write().clear();
    }
}

impl<N: NodeTypes> fmt::Debug for Client<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("mining", &self.is_mining())
            .field("head", &self.inner.chain.current_hash())
            .finish_non_exhaustive()
    }
}

// === impl ClientInner ===

impl<N: NodeTypes> ClientInner<N> {
    pub(crate) fn pow(&self) -> &N::Pow {
        &self.pow
    }

    /// Copies the pending state and freezes it into a candidate block for a
    /// local miner. Returns `None` when there is nothing worth mining:
    /// mining is off, the host is still syncing, or the pending list is
    /// empty (unless force mining), or the paranoid self check failed.
    pub(crate) fn setup_mine_state(&self) -> Option<(StateOf<N>, WorkPackage)> {
        if !self.mining.load(Ordering::SeqCst) {
            return None
        }
        let force = self.force_mining.load(Ordering::SeqCst);
        if !force && self.host.upgrade().map(|host| host.is_syncing()).unwrap_or(false) {
            return None
        }
        let mut state = { self.state.read().post_mine.clone() };
        if !force && state.pending().is_empty() {
            return None
        }
        if self.paranoia.load(Ordering::SeqCst) {
            if state.self_check(&self.chain) {
                debug!(target: "client::miner", "self check passed; block is fine");
            } else {
                warn!(target: "client::miner", "self check failed; refusing to mine");
                return None
            }
        }
        let package = state.commit_to_mine(&self.chain);
        Some((state, package))
    }

    fn note_state_change_miners(&self) {
        for miner in self.local_miners.read().iter() {
            miner.note_state_change();
        }
    }

    /// Replaces the worker pool. `0` selects the hardware default; turbo
    /// mining clamps the count to one worker.
    fn set_mining_threads(&self, threads: usize) {
        let count = if threads == 0 {
            thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
        } else {
            threads
        };
        let count = if self.turbo_mining.load(Ordering::SeqCst) { 1 } else { count };
        let mut miners = self.local_miners.write();
        miners.clear();
        for index in 0..count {
            miners.push(LocalMiner::spawn::<N>(index, self.weak_self.clone()));
        }
        debug!(target: "client::miner", count, "local miners configured");
    }

    /// One orchestrator pass. Returns true if miners or the block queue
    /// still have work outstanding, in which case the caller should not
    /// sleep before the next pass.
    pub(crate) fn do_work(&self) -> bool {
        let _pass = self.pass.lock();
        let mut still_got_work = false;
        let mut changed: HashSet<FilterId> = HashSet::new();

        // 1. drain sealed blocks out of the miners into the chain
        let mut sealed = Vec::new();
        for miner in self.local_miners.read().iter() {
            if let Some(block) = miner.take_sealed() {
                sealed.push(block);
            }
        }
        if let Some(block) = self.remote_miner.lock().take_sealed() {
            sealed.push(block);
        }
        for block in &sealed {
            let route = {
                let state = self.state.write();
                self.chain.attempt_import(block, &state.db)
            };
            match route {
                Ok(route) if !route.canonical.is_empty() => {
                    for hash in &route.canonical {
                        if *hash != route.head {
                            self.append_from_new_block(*hash, &mut changed);
                        }
                    }
                    changed.insert(FilterId::ChainChanged);
                    still_got_work = true;
                }
                Ok(_) => debug!(target: "client", "mined block did not extend the canonical chain"),
                Err(err) => warn!(target: "client", %err, "failed to import mined block"),
            }
        }
        if !sealed.is_empty() {
            // whatever happened to the blocks, the workers need new packages
            self.note_state_change_miners();
        }

        // 2. fold queued peer blocks into the chain. The sync runs on a
        // cloned database overlay without the state lock so readers stay
        // live; the overlay is adopted below once fresh blocks exist.
        let db = self.state.read().db.clone();
        let outcome = self.chain.sync(&self.queue, &db, MAX_SYNC_BLOCKS);
        still_got_work |= outcome.more;

        for hash in &outcome.dead {
            debug!(target: "client", block = ?hash, "dead block");
            for raw in self.chain.transactions(*hash) {
                trace!(target: "client", "resubmitting displaced transaction");
                if let Err(err) = self.pool.import(&raw) {
                    debug!(target: "client", %err, "displaced transaction not resubmitted");
                }
            }
        }
        for hash in &outcome.fresh {
            trace!(target: "client", block = ?hash, "live block");
            for tx_hash in self.chain.transaction_hashes(*hash) {
                self.pool.remove(tx_hash);
            }
        }
        if !outcome.fresh.is_empty() {
            for hash in &outcome.fresh {
                self.append_from_new_block(*hash, &mut changed);
            }
            changed.insert(FilterId::ChainChanged);
        }

        let mut pending_changed = false;
        {
            let mut state = self.state.write();
            if !outcome.fresh.is_empty() {
                state.db = db;
            }

            // 3. re-root the head state; pending is derived from it and has
            // to be rebuilt whenever it (or the beneficiary) moves
            let beneficiary_moved = state.post_mine.beneficiary() != state.pre_mine.beneficiary();
            if state.pre_mine.sync_to_head(&self.chain) || beneficiary_moved {
                if self.mining.load(Ordering::SeqCst) {
                    debug!(target: "client", "new block on chain; restarting mining");
                }
                state.post_mine = state.pre_mine.clone();
                pending_changed = true;
                changed.insert(FilterId::PendingChanged);
            }

            // 4. apply pool transactions to the pending state
            let min_gas_price = self.gas_pricer.lock().ask();
            let receipts = state.post_mine.apply_pool(&self.chain, &self.pool, min_gas_price);
            if !receipts.is_empty() {
                let pending_number = self.chain.number() + 1;
                let pending = state.post_mine.pending();
                let offset = pending.len().saturating_sub(receipts.len());
                {
                    let mut watches = self.watches.lock();
                    for (i, receipt) in receipts.iter().enumerate() {
                        let transaction_hash =
                            pending.get(offset + i).map(Transaction::hash).unwrap_or_default();
                        watches.notify_pending(
                            receipt,
                            transaction_hash,
                            pending_number,
                            &mut changed,
                        );
                    }
                }
                changed.insert(FilterId::PendingChanged);
                pending_changed = true;
                if self.mining.load(Ordering::SeqCst) {
                    debug!(
                        target: "client",
                        count = receipts.len(),
                        "additional transactions ready; restarting mining"
                    );
                }
                if let Some(host) = self.host.upgrade() {
                    host.note_new_transactions();
                }
            }
        }

        // 5. move accumulated matches into the watches
        self.watches.lock().note_changed(&changed);

        // 6. let the host relay what changed
        if !changed.is_empty() {
            if let Some(host) = self.host.upgrade() {
                host.note_new_blocks();
            }
        }

        // 7. invalidate miner work packages
        if pending_changed {
            self.note_state_change_miners();
        }

        // 8. periodic housekeeping
        let now = Instant::now();
        let gc_due = {
            let mut last = self.last_gc.lock();
            if now.duration_since(*last) >= GC_INTERVAL {
                *last = now;
                true
            } else {
                false
            }
        };
        if gc_due {
            for id in self.watches.lock().gc(now) {
                debug!(target: "client::filters", ?id, "collected idle watch");
            }
            self.chain.garbage_collect();
        }

        still_got_work
    }

    /// Feeds a block that just became canonical through the installed
    /// filters.
    fn append_from_new_block(&self, hash: B256, changed: &mut HashSet<FilterId>) {
        let Some(info) = self.chain.info(hash) else { return };
        let receipts = self.chain.receipts(hash);
        let transaction_hashes = self.chain.transaction_hashes(hash);
        self.watches.lock().notify_block(&info, &receipts, &transaction_hashes, changed);
    }
}

//! Local mining workers and the remote miner endpoint.

use crate::client::ClientInner;
use hearth_interfaces::{NodeTypes, Pow, StateOf, StateView};
use hearth_primitives::{Bytes, PowProof, WorkPackage, U256};
use parking_lot::Mutex;
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Weak,
    },
    thread,
    time::{Duration, Instant},
};
use tracing::{debug, trace, warn};

/// Nonces a local miner searches per round before re-checking whether its
/// work package is still current.
const ROUND_NONCES: u64 = 50_000;

/// How long an idle miner sleeps before looking for work again.
const IDLE_WAIT: Duration = Duration::from_millis(50);

/// Number of per-round history samples retained per miner.
const HISTORY_LIMIT: usize = 64;

/// Progress counters of a mining worker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MiningProgress {
    /// Nonces tried.
    pub hashes: u64,
    /// Wall time spent searching, in milliseconds.
    pub ms: u64,
    /// Highest difficulty target worked against.
    pub best: U256,
}

impl MiningProgress {
    /// Folds another worker's counters into this one.
    pub fn combine(&mut self, other: &MiningProgress) {
        self.hashes += other.hashes;
        self.ms += other.ms;
        self.best = self.best.max(other.best);
    }
}

/// State shared between a local miner handle and its worker thread.
#[derive(Debug)]
struct MinerCore {
    index: usize,
    stop: AtomicBool,
    state_changed: AtomicBool,
    sealed: Mutex<Option<Bytes>>,
    progress: Mutex<MiningProgress>,
    history: Mutex<Vec<MiningProgress>>,
}

/// Handle to one local mining worker.
///
/// The worker owns a dedicated thread that repeatedly asks the client for a
/// work package and searches it. A worker holds at most one work package at
/// a time; [`LocalMiner::note_state_change`] makes it abandon the current
/// one and fetch a fresh package on its next round.
#[derive(Debug)]
pub(crate) struct LocalMiner {
    core: Arc<MinerCore>,
    handle: Option<thread::JoinHandle<()>>,
}

impl LocalMiner {
    /// Spawns a worker serving the given client.
    pub(crate) fn spawn<N: NodeTypes>(index: usize, client: Weak<ClientInner<N>>) -> Self {
        let core = Arc::new(MinerCore {
            index,
            stop: AtomicBool::new(false),
            state_changed: AtomicBool::new(true),
            sealed: Mutex::new(None),
            progress: Mutex::new(MiningProgress::default()),
            history: Mutex::new(Vec::new()),
        });
        let thread_core = Arc::clone(&core);
        let handle = thread::Builder::new()
            .name(format!("miner-{index}"))
            .spawn(move || mine_loop(thread_core, client));
        let handle = match handle {
            Ok(handle) => Some(handle),
            Err(err) => {
                warn!(target: "client::miner", %err, index, "failed to spawn mining worker");
                None
            }
        };
        Self { core, handle }
    }

    /// Invalidates the worker's current work package.
    pub(crate) fn note_state_change(&self) {
        self.core.state_changed.store(true, Ordering::SeqCst);
    }

    /// Takes the sealed block the worker produced, if any.
    pub(crate) fn take_sealed(&self) -> Option<Bytes> {
        self.core.sealed.lock().take()
    }

    /// Progress counters accumulated on the current work package.
    pub(crate) fn progress(&self) -> MiningProgress {
        *self.core.progress.lock()
    }

    /// Progress samples of past work packages, oldest first.
    pub(crate) fn history(&self) -> Vec<MiningProgress> {
        self.core.history.lock().clone()
    }
}

impl Drop for LocalMiner {
    fn drop(&mut self) {
        self.core.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn mine_loop<N: NodeTypes>(core: Arc<MinerCore>, client: Weak<ClientInner<N>>) {
    let mut work: Option<(StateOf<N>, WorkPackage)> = None;
    let mut nonce: u64 = 0;
    loop {
        if core.stop.load(Ordering::SeqCst) {
            break
        }
        // the worker never keeps the client alive
        let Some(client) = client.upgrade() else { break };

        if core.state_changed.swap(false, Ordering::SeqCst) {
            if work.take().is_some() {
                trace!(target: "client::miner", miner = core.index, "work package invalidated");
            }
            let finished = std::mem::take(&mut *core.progress.lock());
            if finished.hashes > 0 {
                let mut history = core.history.lock();
                history.push(finished);
                if history.len() > HISTORY_LIMIT {
                    history.remove(0);
                }
            }
        }

        // a sealed block waits for the work loop to drain it
        if core.sealed.lock().is_some() {
            drop(client);
            thread::sleep(IDLE_WAIT);
            continue
        }

        if work.is_none() {
            match client.setup_mine_state() {
                Some((state, package)) => {
                    debug!(
                        target: "client::miner",
                        miner = core.index,
                        header = ?package.header_hash,
                        "picked up work"
                    );
                    nonce = 0;
                    work = Some((state, package));
                }
                None => {
                    drop(client);
                    thread::sleep(IDLE_WAIT);
                    continue
                }
            }
        }

        let mut sealed = false;
        if let Some((state, package)) = work.as_mut() {
            let started = Instant::now();
            let solution = client.pow().solve(package, nonce, ROUND_NONCES);
            nonce = nonce.wrapping_add(ROUND_NONCES);
            {
                let mut progress = core.progress.lock();
                progress.hashes += ROUND_NONCES;
                progress.ms += started.elapsed().as_millis() as u64;
                progress.best = progress.best.max(package.difficulty);
            }
            if let Some(proof) = solution {
                state.complete_mine(&proof);
                match state.sealed_block() {
                    Some(block) => {
                        debug!(target: "client::miner", miner = core.index, "sealed block");
                        *core.sealed.lock() = Some(block);
                    }
                    None => warn!(target: "client::miner", miner = core.index, "solution produced no block"),
                }
                sealed = true;
            }
        }
        if sealed {
            work = None;
        }
    }
    trace!(target: "client::miner", miner = core.index, "worker exiting");
}

/// The single miner fed through the external work API.
///
/// `update` freezes the given pending state into a candidate and advertises
/// its work package; a submitted proof is accepted only against the most
/// recently advertised package.
pub(crate) struct RemoteMiner<N: NodeTypes> {
    current: Option<(StateOf<N>, WorkPackage)>,
    sealed: Option<Bytes>,
}

impl<N: NodeTypes> RemoteMiner<N> {
    pub(crate) fn new() -> Self {
        Self { current: None, sealed: None }
    }

    /// Commits `state` to a candidate block and returns its work package.
    pub(crate) fn update(&mut self, mut state: StateOf<N>, chain: &N::Chain) -> WorkPackage {
        let package = state.commit_to_mine(chain);
        trace!(target: "client::miner", header = ?package.header_hash, "advertised remote work");
        self.current = Some((state, package.clone()));
        package
    }

    /// Accepts a proof against the currently advertised work package.
    /// Returns false for stale or invalid proofs.
    pub(crate) fn submit(&mut self, pow: &N::Pow, proof: &PowProof) -> bool {
        let Some((state, package)) = self.current.as_mut() else { return false };
        if !pow.verify(package, proof) {
            debug!(target: "client::miner", "rejecting stale or invalid remote proof");
            return false
        }
        state.complete_mine(proof);
        self.sealed = state.sealed_block();
        self.current = None;
        true
    }

    /// Takes the sealed block a successful submission produced, if any.
    pub(crate) fn take_sealed(&mut self) -> Option<Bytes> {
        self.sealed.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_combines_by_summation() {
        let mut a = MiningProgress { hashes: 100, ms: 10, best: U256::from(5u64) };
        let b = MiningProgress { hashes: 50, ms: 30, best: U256::from(9u64) };
        a.combine(&b);
        assert_eq!(a.hashes, 150);
        assert_eq!(a.ms, 40);
        assert_eq!(a.best, U256::from(9u64));
    }
}

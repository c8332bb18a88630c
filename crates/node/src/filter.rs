//! Installed log filters and the watches subscribed to them.

use hearth_primitives::{
    BlockInfo, FilterId, LocalisedLogEntry, LogFilter, PointInChain, Receipt, TxHash, B256,
};
use std::{
    collections::{HashMap, HashSet},
    time::{Duration, Instant},
};
use tracing::trace;

/// Watches idle for at least this long are garbage collected.
pub const WATCH_TTL: Duration = Duration::from_secs(20);

/// Minimum interval between garbage collection sweeps.
pub const GC_INTERVAL: Duration = Duration::from_secs(5);

/// Identifier of an installed watch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WatchId(u64);

/// Errors of the watch API.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FilterError {
    /// The watch does not exist, or was garbage collected.
    #[error("unknown watch {0:?}")]
    UnknownWatch(WatchId),
}

/// A filter plus the matches accumulated since the last dispatch.
///
/// Filters are immutable once installed and shared by reference count:
/// installing a structurally equal filter twice yields one entry.
#[derive(Debug)]
struct InstalledFilter {
    filter: LogFilter,
    refs: usize,
    changes: Vec<LocalisedLogEntry>,
}

/// A subscriber: binds a filter id to an accumulator of localised entries.
#[derive(Debug)]
struct Watch {
    filter: FilterId,
    changes: Vec<LocalisedLogEntry>,
    /// When the watch was last polled. `None` until the first poll; such
    /// watches are exempt from garbage collection.
    last_poll: Option<Instant>,
}

/// The filter and watch registries.
///
/// Not internally synchronized; the client guards the whole registry with
/// one mutex and performs every notification burst under it.
#[derive(Debug, Default)]
pub(crate) struct FilterWatches {
    filters: HashMap<B256, InstalledFilter>,
    watches: HashMap<WatchId, Watch>,
    next_watch: u64,
}

impl FilterWatches {
    /// Installs a log filter and subscribes a new watch to it.
    pub(crate) fn install(&mut self, filter: LogFilter) -> WatchId {
        let hash = filter.hash();
        let installed = self
            .filters
            .entry(hash)
            .or_insert_with(|| InstalledFilter { filter, refs: 0, changes: Vec::new() });
        installed.refs += 1;
        self.new_watch(FilterId::Log(hash))
    }

    /// Subscribes a new watch to one of the pseudo filters.
    pub(crate) fn install_special(&mut self, id: FilterId) -> WatchId {
        debug_assert!(!matches!(id, FilterId::Log(_)), "log filters are installed with a predicate");
        self.new_watch(id)
    }

    fn new_watch(&mut self, filter: FilterId) -> WatchId {
        let id = WatchId(self.next_watch);
        self.next_watch += 1;
        self.watches.insert(id, Watch { filter, changes: Vec::new(), last_poll: None });
        trace!(target: "client::filters", ?id, ?filter, "installed watch");
        id
    }

    /// Removes a watch, dropping its filter when no other watch references
    /// it. Returns false for unknown watches.
    pub(crate) fn uninstall(&mut self, id: WatchId) -> bool {
        let Some(watch) = self.watches.remove(&id) else { return false };
        if let FilterId::Log(hash) = watch.filter {
            if let Some(installed) = self.filters.get_mut(&hash) {
                installed.refs -= 1;
                if installed.refs == 0 {
                    self.filters.remove(&hash);
                }
            }
        }
        trace!(target: "client::filters", ?id, "uninstalled watch");
        true
    }

    /// Returns and clears the entries accumulated by a watch.
    pub(crate) fn poll(&mut self, id: WatchId) -> Result<Vec<LocalisedLogEntry>, FilterError> {
        let watch = self.watches.get_mut(&id).ok_or(FilterError::UnknownWatch(id))?;
        watch.last_poll = Some(Instant::now());
        Ok(std::mem::take(&mut watch.changes))
    }

    /// Returns the accumulated entries without clearing them.
    pub(crate) fn peek(&mut self, id: WatchId) -> Result<Vec<LocalisedLogEntry>, FilterError> {
        let watch = self.watches.get_mut(&id).ok_or(FilterError::UnknownWatch(id))?;
        watch.last_poll = Some(Instant::now());
        Ok(watch.changes.clone())
    }

    /// Whether the watch exists.
    #[cfg(test)]
    pub(crate) fn contains(&self, id: WatchId) -> bool {
        self.watches.contains_key(&id)
    }

    /// Runs every installed filter against a receipt produced by a pending
    /// transaction, accumulating matches localised to the pending block.
    pub(crate) fn notify_pending(
        &mut self,
        receipt: &Receipt,
        transaction_hash: TxHash,
        pending_number: u64,
        changed: &mut HashSet<FilterId>,
    ) {
        for (hash, installed) in &mut self.filters {
            if !installed.filter.envelops(PointInChain::Pending, pending_number) {
                continue
            }
            let matches = installed.filter.matches(receipt);
            if matches.is_empty() {
                continue
            }
            for entry in matches {
                installed
                    .changes
                    .push(LocalisedLogEntry::new(entry, pending_number, transaction_hash));
            }
            changed.insert(FilterId::Log(*hash));
        }
    }

    /// Runs every installed filter against the receipts of a block that just
    /// became canonical. The block's bloom is consulted first so filters
    /// that cannot match skip the receipt scan.
    pub(crate) fn notify_block(
        &mut self,
        info: &BlockInfo,
        receipts: &[Receipt],
        transaction_hashes: &[TxHash],
        changed: &mut HashSet<FilterId>,
    ) {
        for (hash, installed) in &mut self.filters {
            if !installed.filter.envelops(PointInChain::Latest, info.number) ||
                !installed.filter.matches_bloom(info.logs_bloom)
            {
                continue
            }
            for (index, receipt) in receipts.iter().enumerate() {
                let matches = installed.filter.matches(receipt);
                if matches.is_empty() {
                    continue
                }
                let transaction_hash = transaction_hashes.get(index).copied().unwrap_or_default();
                for entry in matches {
                    installed
                        .changes
                        .push(LocalisedLogEntry::new(entry, info.number, transaction_hash));
                }
                changed.insert(FilterId::Log(*hash));
            }
        }
    }

    /// Moves accumulated filter matches into the watches subscribed to the
    /// changed filters; watches on pseudo filters receive one synthetic
    /// entry per event. Every filter accumulator is cleared afterwards.
    pub(crate) fn note_changed(&mut self, changed: &HashSet<FilterId>) {
        if changed.is_empty() {
            return
        }
        trace!(target: "client::filters", count = changed.len(), "dispatching filter changes");
        for watch in self.watches.values_mut() {
            if !changed.contains(&watch.filter) {
                continue
            }
            match watch.filter {
                FilterId::Log(hash) => {
                    if let Some(installed) = self.filters.get(&hash) {
                        watch.changes.extend(installed.changes.iter().cloned());
                    }
                }
                FilterId::PendingChanged | FilterId::ChainChanged => {
                    watch.changes.push(LocalisedLogEntry::special());
                }
            }
        }
        for installed in self.filters.values_mut() {
            installed.changes.clear();
        }
    }

    /// Removes watches that have not been polled for [`WATCH_TTL`] as of
    /// `now`. Watches that were never polled are kept.
    pub(crate) fn gc(&mut self, now: Instant) -> Vec<WatchId> {
        let stale: Vec<WatchId> = self
            .watches
            .iter()
            .filter(|(_, watch)| {
                watch
                    .last_poll
                    .and_then(|at| now.checked_duration_since(at))
                    .is_some_and(|idle| idle >= WATCH_TTL)
            })
            .map(|(id, _)| *id)
            .collect();
        for id in &stale {
            self.uninstall(*id);
        }
        stale
    }
}

//! Queue statistics

use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free counters updated from producer and consumer paths.
#[derive(Debug, Default)]
pub(crate) struct StatCounters {
    pub(crate) scheduled: AtomicU64,
    pub(crate) cancelled: AtomicU64,
    pub(crate) expired: AtomicU64,
    pub(crate) undercut_wakes: AtomicU64,
    pub(crate) promoted: AtomicU64,
    pub(crate) stale_discarded: AtomicU64,
}

/// Point-in-time statistics snapshot for the expiration queue
#[derive(Debug, Clone, Default)]
pub struct QueueStats {
    /// Total expirations scheduled via notify
    pub scheduled: u64,
    /// Total schedulings removed via cancel
    pub cancelled: u64,
    /// Total items returned to the consumer as expired
    pub expired: u64,
    /// Times the consumer abandoned a sleep for an earlier deadline
    pub undercut_wakes: u64,
    /// Entries moved from the intake buffer into the priority structure
    pub promoted: u64,
    /// Stale entries silently dropped at promotion or dequeue
    pub stale_discarded: u64,
    /// Sessions currently holding a live scheduling
    pub registered: usize,
    /// Entries currently sitting in the intake buffer
    pub buffered: usize,
}

impl StatCounters {
    /// Snapshot the counters; depth gauges are supplied by the queue.
    pub(crate) fn snapshot(&self, registered: usize, buffered: usize) -> QueueStats {
        QueueStats {
            scheduled: self.scheduled.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            undercut_wakes: self.undercut_wakes.load(Ordering::Relaxed),
            promoted: self.promoted.load(Ordering::Relaxed),
            stale_discarded: self.stale_discarded.load(Ordering::Relaxed),
            registered,
            buffered,
        }
    }
}

//! Expiration queue core
//!
//! A concurrent delay scheduler for session idle expiration. Producers
//! register deadlines with [`ExpirationQueue::notify`] and withdraw them
//! with [`ExpirationQueue::cancel`]; a single consumer loop drives
//! [`ExpirationQueue::next_expired`], which suspends until the earliest
//! still-valid deadline passes and yields that session's payload.
//!
//! Internally the queue is layered:
//! - an intake buffer that absorbs producer writes without touching the
//!   priority structure;
//! - a min-heap over promoted entries, mutated only by the consumer loop;
//! - the immunity registry, which validates every queued entry at
//!   promotion and dequeue (stale entries stay in place and are reaped
//!   lazily);
//! - a wake gate for the empty-queue case and a replaceable undercut
//!   signal that interrupts a sleeping consumer when an earlier deadline
//!   arrives.

mod entry;
mod immunity;
mod stats;

pub use stats::QueueStats;

use std::collections::BinaryHeap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::time::{Instant, sleep};

use crate::config::QueueConfig;
use crate::domain::events::ExpiryEvent;
use crate::domain::ports::{Clock, ExpiryItem, ExpiryObserver};
use crate::domain::value_objects::SessionId;
use crate::error::{Error, Result};
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::observers::TracingObserver;
use crate::sync::ShutdownToken;

use entry::ScheduledExpiration;
use immunity::ImmunityRegistry;
use stats::StatCounters;

/// Consumer wait state shared with producers.
///
/// `armed` is the deadline the consumer is currently sleeping on, if any;
/// `signal` is the undercut notifier installed for the current consumer
/// round. Producers inspect both under the slot lock, so an armed consumer
/// cannot miss an undercut and a replaced signal cannot deliver one.
#[derive(Debug)]
struct WaitSlot {
    armed: Option<Instant>,
    signal: Arc<Notify>,
}

/// How a candidate sleep ended.
enum WaitOutcome {
    Due,
    Undercut,
    Cancelled,
}

/// Releases the single-consumer flag on every exit path, including panics.
struct ConsumerGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for ConsumerGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Priority-ordered expiration queue shared by many producers and one
/// consumer.
///
/// A single long-lived instance is owned by the surrounding service;
/// clock and observer are injected at construction.
pub struct ExpirationQueue<T: ExpiryItem> {
    intake: Mutex<Vec<ScheduledExpiration<T>>>,
    heap: Mutex<BinaryHeap<ScheduledExpiration<T>>>,
    immunity: ImmunityRegistry,
    gate: Notify,
    wait_slot: Mutex<WaitSlot>,
    consumer_active: AtomicBool,
    clock: Arc<dyn Clock>,
    observer: Arc<dyn ExpiryObserver>,
    config: QueueConfig,
    counters: StatCounters,
}

impl<T: ExpiryItem> ExpirationQueue<T> {
    /// Create a queue with default configuration, the runtime clock and
    /// tracing diagnostics
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    /// Create a queue with custom configuration
    pub fn with_config(config: QueueConfig) -> Self {
        Self {
            intake: Mutex::new(Vec::with_capacity(config.intake_initial_capacity)),
            heap: Mutex::new(BinaryHeap::new()),
            immunity: ImmunityRegistry::new(),
            gate: Notify::new(),
            wait_slot: Mutex::new(WaitSlot {
                armed: None,
                signal: Arc::new(Notify::new()),
            }),
            consumer_active: AtomicBool::new(false),
            clock: Arc::new(SystemClock),
            observer: Arc::new(TracingObserver),
            config,
            counters: StatCounters::default(),
        }
    }

    /// Replace the injected clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the injected observer
    pub fn with_observer(mut self, observer: Arc<dyn ExpiryObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Schedule `item` to expire at `deadline`.
    ///
    /// Overwrites any scheduling the session already holds; the previous
    /// entry stays queued but is stale from this point on and will never
    /// be returned. If the consumer is asleep waiting on a later deadline,
    /// it is woken to re-evaluate.
    ///
    /// Fails only on invalid arguments: a nil identifier, or an item whose
    /// own identifier disagrees with `session_id`.
    pub fn notify(&self, session_id: SessionId, item: T, deadline: Instant) -> Result<()> {
        if session_id.is_nil() {
            return Err(Error::invalid_session_id("nil session identifier"));
        }
        let reported = item.session_id();
        if reported != session_id {
            return Err(Error::identifier_mismatch(
                session_id.as_str(),
                reported.as_str(),
            ));
        }

        self.immunity.grant(session_id, deadline);

        let was_empty = {
            let mut intake = self.intake.lock();
            let was_empty = intake.is_empty();
            intake.push(ScheduledExpiration::new(session_id, item, deadline));
            was_empty
        };
        // One stored permit is enough: the consumer drains the whole
        // buffer per wake, so only the empty-to-non-empty edge signals.
        if was_empty {
            self.gate.notify_one();
        }

        self.undercut_if_earlier(deadline);
        self.counters.scheduled.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Withdraw the live scheduling for a session, if any.
    ///
    /// Queued entries are left in place; the missing immunity record makes
    /// them stale and they are reaped the next time the consumer meets
    /// them. Returns whether a scheduling was actually removed.
    pub fn cancel(&self, session_id: &SessionId) -> bool {
        let removed = self.immunity.revoke(session_id);
        if removed {
            self.counters.cancelled.fetch_add(1, Ordering::Relaxed);
            self.observer.record(ExpiryEvent::ExpirationCancelled {
                session_id: *session_id,
            });
        }
        removed
    }

    /// Suspend until the next session expires, or until `shutdown` fires.
    ///
    /// Returns `Ok(Some(item))` for the expired session, with its immunity
    /// record removed atomically; `Ok(None)` when cancelled while waiting.
    /// At most one caller may be inside this method; a concurrent second
    /// call fails immediately with [`Error::ConsumerBusy`].
    pub async fn next_expired(&self, shutdown: &ShutdownToken) -> Result<Option<T>> {
        if self
            .consumer_active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::consumer_busy());
        }
        let _guard = ConsumerGuard {
            flag: &self.consumer_active,
        };

        loop {
            // Fresh undercut signal per round; a leftover permit from an
            // abandoned round must not wake this one.
            let undercut = self.install_wait_signal();

            let candidate = loop {
                if let Some(entry) = self.pop_authoritative() {
                    break entry;
                }
                self.observer.record(ExpiryEvent::QueueIdle);
                tokio::select! {
                    _ = self.gate.notified() => {}
                    _ = shutdown.cancelled() => return Ok(None),
                }
                self.promote_pending();
            };

            let deadline = candidate.deadline();
            let remaining = deadline.saturating_duration_since(self.clock.now());
            if remaining > self.config.due_threshold {
                self.arm(deadline);
                // A notify that landed between candidate selection and
                // arming saw no armed deadline and could not undercut;
                // one intake scan closes that window.
                if self.intake_holds_earlier(deadline) {
                    self.disarm();
                    self.handle_undercut(candidate);
                    continue;
                }
                let outcome = tokio::select! {
                    _ = sleep(remaining) => WaitOutcome::Due,
                    _ = undercut.notified() => WaitOutcome::Undercut,
                    _ = shutdown.cancelled() => WaitOutcome::Cancelled,
                };
                self.disarm();
                match outcome {
                    WaitOutcome::Due => {}
                    WaitOutcome::Undercut => {
                        self.handle_undercut(candidate);
                        continue;
                    }
                    WaitOutcome::Cancelled => {
                        // Keep the entry available for a later consumer call.
                        self.restore(candidate);
                        return Ok(None);
                    }
                }
            }

            // The session may have been cancelled or superseded during the
            // wait; only an exact-deadline claim may return the item.
            let session_id = candidate.session_id();
            if self.immunity.claim(&session_id, deadline) {
                self.counters.expired.fetch_add(1, Ordering::Relaxed);
                let item = candidate.into_item();
                self.observer.record(ExpiryEvent::ItemExpired {
                    session_id,
                    label: item.label(),
                });
                return Ok(Some(item));
            }
            self.counters.stale_discarded.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Current statistics snapshot
    pub fn stats(&self) -> QueueStats {
        self.counters
            .snapshot(self.immunity.len(), self.intake.lock().len())
    }

    /// Number of sessions currently holding a live scheduling
    pub fn registered_len(&self) -> usize {
        self.immunity.len()
    }

    /// Number of entries waiting in the intake buffer
    pub fn buffered_len(&self) -> usize {
        self.intake.lock().len()
    }

    /// Whether no session currently holds a live scheduling
    pub fn is_idle(&self) -> bool {
        self.immunity.is_empty()
    }

    /// Pop entries until one is still authoritative; stale entries are
    /// dropped on the way.
    fn pop_authoritative(&self) -> Option<ScheduledExpiration<T>> {
        let mut heap = self.heap.lock();
        while let Some(entry) = heap.pop() {
            if self
                .immunity
                .is_authoritative(&entry.session_id(), entry.deadline())
            {
                return Some(entry);
            }
            self.counters.stale_discarded.fetch_add(1, Ordering::Relaxed);
        }
        None
    }

    /// Drain the intake buffer into the priority structure in one batch.
    /// Entries already stale are dropped instead of promoted.
    fn promote_pending(&self) {
        let drained: Vec<_> = {
            let mut intake = self.intake.lock();
            intake.drain(..).collect()
        };
        if drained.is_empty() {
            return;
        }
        let mut heap = self.heap.lock();
        for entry in drained {
            if self
                .immunity
                .is_authoritative(&entry.session_id(), entry.deadline())
            {
                self.observer.record(ExpiryEvent::EntryPromoted {
                    session_id: entry.session_id(),
                    deadline: entry.deadline(),
                });
                self.counters.promoted.fetch_add(1, Ordering::Relaxed);
                heap.push(entry);
            } else {
                self.counters.stale_discarded.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Return an abandoned candidate to the pool and fold in everything
    /// buffered since, so the next selection sees the new earliest.
    fn handle_undercut(&self, candidate: ScheduledExpiration<T>) {
        self.counters.undercut_wakes.fetch_add(1, Ordering::Relaxed);
        self.observer.record(ExpiryEvent::ConsumerUndercut {
            abandoned_deadline: candidate.deadline(),
        });
        self.restore(candidate);
        self.promote_pending();
    }

    fn restore(&self, entry: ScheduledExpiration<T>) {
        self.heap.lock().push(entry);
    }

    /// Install a fresh undercut signal for a consumer round, invalidating
    /// the previous one.
    fn install_wait_signal(&self) -> Arc<Notify> {
        let mut slot = self.wait_slot.lock();
        slot.armed = None;
        slot.signal = Arc::new(Notify::new());
        Arc::clone(&slot.signal)
    }

    fn arm(&self, deadline: Instant) {
        self.wait_slot.lock().armed = Some(deadline);
    }

    fn disarm(&self) {
        self.wait_slot.lock().armed = None;
    }

    /// Producer-side undercut check: wake the consumer if it is known to
    /// be sleeping on a strictly later deadline.
    fn undercut_if_earlier(&self, deadline: Instant) {
        let slot = self.wait_slot.lock();
        if let Some(armed) = slot.armed {
            if deadline < armed {
                slot.signal.notify_one();
            }
        }
    }

    /// Consumer-side counterpart for the arming race: anything buffered
    /// with an earlier deadline than the candidate forces re-selection.
    fn intake_holds_earlier(&self, deadline: Instant) -> bool {
        self.intake
            .lock()
            .iter()
            .any(|entry| entry.deadline() < deadline)
    }

    #[cfg(test)]
    fn heap_len(&self) -> usize {
        self.heap.lock().len()
    }
}

impl<T: ExpiryItem> Default for ExpirationQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

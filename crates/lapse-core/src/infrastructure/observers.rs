//! Observer adapters for queue diagnostics

use crate::domain::events::ExpiryEvent;
use crate::domain::ports::ExpiryObserver;

/// Observer that forwards queue events to the `tracing` macros.
///
/// Expirations and cancellations log at debug level; the chattier
/// promotion/idle events at trace level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ExpiryObserver for TracingObserver {
    fn record(&self, event: ExpiryEvent) {
        match event {
            ExpiryEvent::EntryPromoted {
                session_id,
                deadline,
            } => {
                tracing::trace!("Promoted expiration for session {session_id} at {deadline:?}");
            }
            ExpiryEvent::ExpirationCancelled { session_id } => {
                tracing::debug!("Cancelled pending expiration for session {session_id}");
            }
            ExpiryEvent::ConsumerUndercut { abandoned_deadline } => {
                tracing::debug!(
                    "Consumer undercut: abandoned wait on deadline {abandoned_deadline:?}"
                );
            }
            ExpiryEvent::ItemExpired { session_id, label } => {
                tracing::debug!("Session {session_id} expired: {label}");
            }
            ExpiryEvent::QueueIdle => {
                tracing::trace!("Expiration queue idle, waiting for schedules");
            }
        }
    }
}

/// Observer that drops all events
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl ExpiryObserver for NullObserver {
    fn record(&self, _event: ExpiryEvent) {}
}

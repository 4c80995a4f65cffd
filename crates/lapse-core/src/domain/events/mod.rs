//! Queue observability events

use tokio::time::Instant;

use crate::domain::value_objects::SessionId;

/// Observability events emitted by the expiration queue.
///
/// Delivered to the injected [`ExpiryObserver`](crate::domain::ports::ExpiryObserver);
/// operational visibility only.
#[derive(Debug, Clone)]
pub enum ExpiryEvent {
    /// A pending entry moved from the intake buffer into the priority structure
    EntryPromoted {
        session_id: SessionId,
        deadline: Instant,
    },
    /// A pending expiration was cancelled before it became due
    ExpirationCancelled { session_id: SessionId },
    /// The consumer abandoned a sleep because an earlier deadline arrived
    ConsumerUndercut { abandoned_deadline: Instant },
    /// An item was returned to the consumer as expired
    ItemExpired {
        session_id: SessionId,
        label: String,
    },
    /// The consumer found no candidates and is waiting for new schedules
    QueueIdle,
}

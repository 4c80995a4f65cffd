//! Domain ports
//!
//! Interfaces the queue consumes from its environment. Adapters live in
//! the infrastructure layer; tests inject their own.

use tokio::time::Instant;

use crate::domain::events::ExpiryEvent;
use crate::domain::value_objects::SessionId;

/// Time source for deadline evaluation.
///
/// Injected rather than sampled ambiently so tests can drive the queue
/// deterministically.
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> Instant;
}

/// Payload tracked for a session and handed back when it expires.
pub trait ExpiryItem: Send + 'static {
    /// Stable identifier of the session this item belongs to
    fn session_id(&self) -> SessionId;

    /// Diagnostic label used in observability events
    fn label(&self) -> String;
}

/// Sink for queue observability events.
///
/// Implementations must be cheap and non-blocking; they are invoked from
/// producer and consumer paths. Events never affect correctness.
pub trait ExpiryObserver: Send + Sync {
    /// Record a single event
    fn record(&self, event: ExpiryEvent);
}

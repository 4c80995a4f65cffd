//! # Lapse Core
//!
//! Core expiration queue for session idle tracking. This crate provides a
//! concurrent, priority-ordered delay scheduler: many producers register
//! "expire this session at time T" requests, any of them can cancel or
//! reschedule a pending request at any time, and a single consumer loop
//! suspends until the next still-valid deadline passes and yields the
//! expired session's payload.
//!
//! The policy that decides *when* a session becomes idle, and the action
//! taken once it is returned as expired, live in the surrounding service.

#![warn(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod queue;
pub mod sync;

// Domain layer exports
pub use domain::{
    SessionId,
    events::ExpiryEvent,
    ports::{Clock, ExpiryItem, ExpiryObserver},
};

// Infrastructure adapters
pub use infrastructure::{
    clock::{ManualClock, SystemClock},
    observers::{NullObserver, TracingObserver},
};

// Core exports
pub use config::QueueConfig;
pub use error::{Error, Result};
pub use queue::{ExpirationQueue, QueueStats};
pub use sync::ShutdownToken;

/// Re-export commonly used types
pub mod prelude {
    pub use super::{
        Clock,
        Error,
        ExpirationQueue,
        ExpiryEvent,
        ExpiryItem,
        ExpiryObserver,
        QueueConfig,
        QueueStats,
        Result,
        SessionId,
        ShutdownToken,
    };
}

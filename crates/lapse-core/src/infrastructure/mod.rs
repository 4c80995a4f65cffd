//! Infrastructure layer - Adapters for the domain ports

pub mod clock;
pub mod observers;

pub use clock::{ManualClock, SystemClock};
pub use observers::{NullObserver, TracingObserver};

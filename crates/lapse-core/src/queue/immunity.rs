//! Immunity registry
//!
//! The single source of truth for which scheduled expiration is live per
//! session. Entries in the intake buffer or the heap are only valid while
//! a record with the exact same deadline exists here; the registry acts
//! as an optimistic compare token, not a lock.

use dashmap::DashMap;
use tokio::time::Instant;

use crate::domain::value_objects::SessionId;

#[derive(Debug, Default)]
pub(crate) struct ImmunityRegistry {
    records: DashMap<SessionId, Instant>,
}

impl ImmunityRegistry {
    pub(crate) fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Install or overwrite the authoritative deadline for a session.
    /// Overwriting makes every previously queued entry for the session stale.
    pub(crate) fn grant(&self, session_id: SessionId, deadline: Instant) {
        self.records.insert(session_id, deadline);
    }

    /// Remove the record for a session; returns whether one existed.
    pub(crate) fn revoke(&self, session_id: &SessionId) -> bool {
        self.records.remove(session_id).is_some()
    }

    /// Check whether a queued entry is still the live scheduling.
    pub(crate) fn is_authoritative(&self, session_id: &SessionId, deadline: Instant) -> bool {
        self.records
            .get(session_id)
            .map(|record| *record.value() == deadline)
            .unwrap_or(false)
    }

    /// Atomically remove the record if it still matches `deadline`.
    ///
    /// Returns true when the caller won the claim; false means the session
    /// was cancelled or superseded in the meantime.
    pub(crate) fn claim(&self, session_id: &SessionId, deadline: Instant) -> bool {
        self.records
            .remove_if(session_id, |_, recorded| *recorded == deadline)
            .is_some()
    }

    /// Number of sessions with a live scheduling
    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

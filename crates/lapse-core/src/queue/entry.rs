//! Scheduled expiration entries and their heap ordering

use std::cmp::Ordering;

use tokio::time::Instant;

use crate::domain::value_objects::SessionId;

/// A single "expire this session at time T" request.
///
/// Lives in the intake buffer until promoted, then in the priority
/// structure until popped. Ordering is by deadline only; entries with
/// equal deadlines have no guaranteed relative order.
#[derive(Debug)]
pub(crate) struct ScheduledExpiration<T> {
    session_id: SessionId,
    deadline: Instant,
    item: T,
}

impl<T> ScheduledExpiration<T> {
    pub(crate) fn new(session_id: SessionId, item: T, deadline: Instant) -> Self {
        Self {
            session_id,
            deadline,
            item,
        }
    }

    pub(crate) fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub(crate) fn deadline(&self) -> Instant {
        self.deadline
    }

    pub(crate) fn into_item(self) -> T {
        self.item
    }
}

impl<T> PartialEq for ScheduledExpiration<T> {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline
    }
}

impl<T> Eq for ScheduledExpiration<T> {}

impl<T> Ord for ScheduledExpiration<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (earliest deadline first)
        other.deadline.cmp(&self.deadline)
    }
}

impl<T> PartialOrd for ScheduledExpiration<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;
    use tokio::time::Duration;

    #[test]
    fn test_heap_pops_earliest_deadline_first() {
        let base = Instant::now();
        let mut heap = BinaryHeap::new();

        heap.push(ScheduledExpiration::new(
            SessionId::new(),
            "late",
            base + Duration::from_millis(300),
        ));
        heap.push(ScheduledExpiration::new(
            SessionId::new(),
            "early",
            base + Duration::from_millis(100),
        ));
        heap.push(ScheduledExpiration::new(
            SessionId::new(),
            "middle",
            base + Duration::from_millis(200),
        ));

        let order: Vec<_> = std::iter::from_fn(|| heap.pop().map(|e| e.into_item())).collect();
        assert_eq!(order, vec!["early", "middle", "late"]);
    }

    #[test]
    fn test_entry_accessors() {
        let id = SessionId::new();
        let deadline = Instant::now() + Duration::from_secs(1);
        let entry = ScheduledExpiration::new(id, 7u32, deadline);

        assert_eq!(entry.session_id(), id);
        assert_eq!(entry.deadline(), deadline);
        assert_eq!(entry.into_item(), 7);
    }
}

//! Event store seam
//!
//! The aggregation engine never owns persistence; it consumes a snapshot of
//! the event log through the [`EventStore`] trait. Hosts back this with
//! whatever storage they have (the reference host keeps a SQLite log);
//! this crate ships [`MemoryEventStore`] as an in-memory implementation.

use crate::error::Result;
use crate::types::EventRecord;
use std::collections::HashMap;

/// A complete snapshot of recorded activity, subject to a cutoff.
#[derive(Debug, Clone, Default)]
pub struct ActivitySnapshot {
    /// Every recorded event, grouped by file identity. Each group is
    /// sorted ascending by timestamp.
    pub per_file_events: Vec<Vec<EventRecord>>,
    /// Smallest event timestamp observed (epoch ms)
    pub range_start: i64,
    /// Largest event timestamp observed (epoch ms)
    pub range_end: i64,
}

impl ActivitySnapshot {
    /// True when the snapshot holds no events at all.
    pub fn is_empty(&self) -> bool {
        self.per_file_events.iter().all(|list| list.is_empty())
    }
}

/// Read-only source of truth for recorded edit events.
///
/// Queried exactly once per stats calculation; the engine never mutates
/// the store and keeps no state across calls.
pub trait EventStore {
    /// Return all events with `timestamp >= cutoff_ms`, grouped per file.
    ///
    /// A `cutoff_ms` of 0 means no cutoff.
    fn activities_since(&self, cutoff_ms: i64) -> Result<ActivitySnapshot>;
}

/// In-memory event store.
///
/// Groups events by file id in first-seen order and sorts each group by
/// timestamp, so callers may push events in any order.
#[derive(Debug, Default)]
pub struct MemoryEventStore {
    events: Vec<EventRecord>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(events: Vec<EventRecord>) -> Self {
        Self { events }
    }

    /// Record one event.
    pub fn push(&mut self, event: EventRecord) {
        self.events.push(event);
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventStore for MemoryEventStore {
    fn activities_since(&self, cutoff_ms: i64) -> Result<ActivitySnapshot> {
        let mut order: Vec<i64> = Vec::new();
        let mut groups: HashMap<i64, Vec<EventRecord>> = HashMap::new();
        let mut range_start = i64::MAX;
        let mut range_end = i64::MIN;

        for event in &self.events {
            if cutoff_ms > 0 && event.timestamp < cutoff_ms {
                continue;
            }
            range_start = range_start.min(event.timestamp);
            range_end = range_end.max(event.timestamp);
            groups
                .entry(event.file_id)
                .or_insert_with(|| {
                    order.push(event.file_id);
                    Vec::new()
                })
                .push(event.clone());
        }

        if groups.is_empty() {
            return Ok(ActivitySnapshot::default());
        }

        let mut per_file_events = Vec::with_capacity(order.len());
        for file_id in order {
            if let Some(mut list) = groups.remove(&file_id) {
                list.sort_by_key(|e| e.timestamp);
                per_file_events.push(list);
            }
        }

        Ok(ActivitySnapshot {
            per_file_events,
            range_start,
            range_end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventType;

    fn event(file_id: i64, ts: i64) -> EventRecord {
        EventRecord {
            file_id,
            event_type: EventType::Update,
            char_count: 10,
            word_count: 5,
            timestamp: ts,
        }
    }

    #[test]
    fn test_groups_by_file_and_sorts_by_timestamp() {
        let store = MemoryEventStore::from_events(vec![
            event(2, 300),
            event(1, 200),
            event(1, 100),
            event(2, 250),
        ]);

        let snapshot = store.activities_since(0).unwrap();
        assert_eq!(snapshot.per_file_events.len(), 2);
        assert_eq!(snapshot.range_start, 100);
        assert_eq!(snapshot.range_end, 300);

        // First-seen order: file 2 first, each group ascending.
        assert_eq!(snapshot.per_file_events[0][0].file_id, 2);
        assert_eq!(snapshot.per_file_events[0][0].timestamp, 250);
        assert_eq!(snapshot.per_file_events[1][0].timestamp, 100);
        assert_eq!(snapshot.per_file_events[1][1].timestamp, 200);
    }

    #[test]
    fn test_cutoff_filters_events_and_range() {
        let store = MemoryEventStore::from_events(vec![
            event(1, 100),
            event(1, 200),
            event(1, 300),
        ]);

        let snapshot = store.activities_since(150).unwrap();
        assert_eq!(snapshot.per_file_events.len(), 1);
        assert_eq!(snapshot.per_file_events[0].len(), 2);
        assert_eq!(snapshot.range_start, 200);

        let empty = store.activities_since(1_000).unwrap();
        assert!(empty.is_empty());
    }
}

//! Core domain types for notepulse
//!
//! These types model the event log the engine consumes and the time
//! segments it produces.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Event** | One recorded change to a file: create, update, delete or rename, carrying the file's character/word counts at that moment |
//! | **File id** | Integer identity for a file, stable across renames |
//! | **Segment** | A time bucket `(start, end]` accumulating statistics |
//! | **Cumulative mode** | Segment totals represent running state as of the segment's end |
//! | **Incremental mode** | Segment totals represent only the change occurring within the segment |

use serde::{Deserialize, Serialize};

// ============================================
// Events
// ============================================

/// Kind of change recorded for a file.
///
/// The event log stores these as single letters (`c`/`u`/`d`/`r`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "c")]
    Create,
    #[serde(rename = "u")]
    Update,
    #[serde(rename = "d")]
    Delete,
    #[serde(rename = "r")]
    Rename,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Create => "c",
            EventType::Update => "u",
            EventType::Delete => "d",
            EventType::Rename => "r",
        }
    }
}

impl std::str::FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "c" => Ok(EventType::Create),
            "u" => Ok(EventType::Update),
            "d" => Ok(EventType::Delete),
            "r" => Ok(EventType::Rename),
            _ => Err(format!("unknown event type: {}", s)),
        }
    }
}

/// One recorded edit event for a file.
///
/// Events for a given `file_id` arrive pre-sorted ascending by `timestamp`;
/// the engine never re-sorts them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    /// File identity, stable across renames
    pub file_id: i64,
    /// Kind of change
    pub event_type: EventType,
    /// Character count of the file as of this event
    pub char_count: i64,
    /// Word count of the file as of this event
    pub word_count: i64,
    /// When the event occurred (epoch milliseconds)
    pub timestamp: i64,
}

// ============================================
// Segments
// ============================================

/// A time bucket accumulating statistics.
///
/// Membership is open-start, closed-end: an event at `t` belongs to the
/// segment where `start_time < t <= end_time`. Totals are signed because
/// relative modes can report values below the window baseline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSegment {
    /// Bucket start (epoch milliseconds, exclusive for membership)
    pub start_time: i64,
    /// Bucket end (epoch milliseconds, inclusive for membership)
    pub end_time: i64,
    /// Accumulated character count
    pub total_chars: i64,
    /// Accumulated word count
    pub total_words: i64,
    /// Number of files present during this bucket
    pub file_count: i64,
}

impl TimeSegment {
    /// Create a segment with zeroed accumulators.
    pub fn new(start_time: i64, end_time: i64) -> Self {
        Self {
            start_time,
            end_time,
            total_chars: 0,
            total_words: 0,
            file_count: 0,
        }
    }

    /// Whether an event at `timestamp` belongs to this segment.
    pub fn contains(&self, timestamp: i64) -> bool {
        timestamp > self.start_time && timestamp <= self.end_time
    }

    pub fn add_counts(&mut self, chars: i64, words: i64) {
        self.total_chars += chars;
        self.total_words += words;
    }

    pub fn add_file_count(&mut self, files: i64) {
        self.file_count += files;
    }
}

//! Event aggregation into time segments
//!
//! Walks each file's chronological event stream exactly once and
//! distributes character/word/file-presence counts into the prepared
//! segments. Two orthogonal booleans select the numeric semantics:
//!
//! - **cumulative**: totals are a step function held flat across empty
//!   buckets (vs. incremental per-bucket deltas);
//! - **relative_to_recent**: cumulative totals are reported relative to the
//!   first observed state inside the window instead of as absolute counts.
//!
//! All running state is owned by one call and discarded when it returns.

use crate::types::{EventRecord, EventType, TimeSegment};
use std::collections::HashMap;

/// Running totals for a file, as of its most recently processed event.
#[derive(Debug, Clone, Copy)]
struct FileState {
    char_count: i64,
    word_count: i64,
    /// 1 while the file exists, 0 after a delete
    present: i64,
}

/// Distribute `per_file_events` into `segments`, mutating them in place.
///
/// Within one file's list events are consumed strictly in the given order;
/// files are independent of each other. Events with no containing segment
/// are skipped without touching any state.
pub fn aggregate(
    segments: &mut [TimeSegment],
    per_file_events: &[Vec<EventRecord>],
    cumulative: bool,
    relative_to_recent: bool,
) {
    if segments.is_empty() {
        return;
    }

    let mut last_stats: HashMap<i64, FileState> = HashMap::new();
    let mut last_indexes: HashMap<i64, usize> = HashMap::new();

    for events in per_file_events {
        let Some(first) = events.first() else {
            continue;
        };
        let file_id = first.file_id;

        let mut baseline_chars: i64 = 0;
        let mut baseline_words: i64 = 0;
        let mut baseline_set = false;
        let mut seen_in_range = false;
        let mut last_index: usize = 0;

        for event in events {
            let Some(index) = find_segment(segments, event.timestamp) else {
                continue;
            };

            // Relative baseline: captured once at the first in-range event.
            // A create means nothing pre-existed, so the baseline stays
            // zero; anything else reports change against its own counts.
            if cumulative && relative_to_recent && !baseline_set {
                baseline_set = true;
                if event.event_type != EventType::Create {
                    baseline_chars = event.char_count;
                    baseline_words = event.word_count;
                }
            }

            // A file whose first in-range event is an update existed before
            // the window; treat it as present (and, in cumulative mode, at
            // this event's level) across the leading buckets. The true
            // pre-window value is not reconstructible from the fetched
            // slice; this is a documented approximation.
            let leading_update =
                !seen_in_range && index > 0 && event.event_type == EventType::Update;

            // File presence carries into every bucket between events.
            if leading_update {
                for seg in &mut segments[last_index..index] {
                    seg.add_file_count(1);
                }
            } else {
                let carried = last_stats.get(&event.file_id).map_or(0, |s| s.present);
                for seg in &mut segments[last_index..index] {
                    seg.add_file_count(carried);
                }
            }

            if cumulative {
                // Hold the previous value flat up to this event's bucket.
                if leading_update {
                    for seg in &mut segments[last_index..index] {
                        seg.add_counts(
                            event.char_count - baseline_chars,
                            event.word_count - baseline_words,
                        );
                    }
                } else if let Some(prev) = last_stats.get(&event.file_id).copied() {
                    for seg in &mut segments[last_index..index] {
                        seg.add_counts(
                            prev.char_count - baseline_chars,
                            prev.word_count - baseline_words,
                        );
                    }
                }
                // No prior state for this file: nothing to carry.
            } else {
                // Incremental: only the delta lands in this event's bucket.
                if !seen_in_range {
                    if event.event_type == EventType::Create {
                        segments[index].add_counts(event.char_count, event.word_count);
                    }
                    // A non-create first event has an unknown pre-window
                    // value; its delta is zero.
                } else if let Some(prev) = last_stats.get(&event.file_id) {
                    segments[index].add_counts(
                        event.char_count - prev.char_count,
                        event.word_count - prev.word_count,
                    );
                }
            }

            last_stats.insert(
                event.file_id,
                FileState {
                    char_count: event.char_count,
                    word_count: event.word_count,
                    present: if event.event_type == EventType::Delete {
                        0
                    } else {
                        1
                    },
                },
            );
            last_index = index;
            seen_in_range = true;

            // A fresh lifetime resets the relative baseline.
            if relative_to_recent
                && matches!(event.event_type, EventType::Create | EventType::Delete)
            {
                baseline_chars = 0;
                baseline_words = 0;
            }
        }

        // Fold the baseline into the final state so the trailing closure
        // below reports relative values as well.
        if relative_to_recent && baseline_set {
            if let Some(stats) = last_stats.get_mut(&file_id) {
                stats.char_count -= baseline_chars;
                stats.word_count -= baseline_words;
            }
        }
        last_indexes.insert(file_id, last_index);
    }

    // Close the open step: every file's final state carries from its last
    // touched segment to the end of the list. Chars/words only close in
    // cumulative mode; incremental buckets hold deltas, not levels.
    for (file_id, stats) in &last_stats {
        let from = last_indexes.get(file_id).copied().unwrap_or(0);
        for seg in &mut segments[from..] {
            seg.add_file_count(stats.present);
        }
        if cumulative {
            for seg in &mut segments[from..] {
                seg.add_counts(stats.char_count, stats.word_count);
            }
        }
    }
}

fn find_segment(segments: &[TimeSegment], timestamp: i64) -> Option<usize> {
    segments.iter().position(|seg| seg.contains(timestamp))
}

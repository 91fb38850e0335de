//! Period statistics
//!
//! The facade over the whole engine: fetch a snapshot from the event
//! store, build segments for the requested bucketing strategy, then run
//! the aggregator over every file's event stream.
//!
//! ```text
//! EventStore ──snapshot──▶ StatsEngine ──▶ segment builder ──▶ aggregator ──▶ Vec<TimeSegment>
//! ```
//!
//! One call performs the entire computation in memory and returns; no
//! state survives between calls, so identical inputs over an unmodified
//! store yield identical output.

pub mod aggregate;
pub mod interval;
pub mod segments;

pub use interval::{parse_calendar_span, parse_interval, CalendarUnit};

use crate::error::{Error, Result};
use crate::store::EventStore;
use crate::types::TimeSegment;
use serde::Deserialize;

/// Segment bucketing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Telescoping buckets: configurable widths per window offset
    Variable,
    /// Uniform buckets aligned to local calendar boundaries
    Const,
    /// Natural calendar periods (minute/hour/day/week/month/year)
    Natural,
}

/// Inputs for one stats calculation.
#[derive(Debug, Clone)]
pub struct StatsRequest {
    /// For [`Strategy::Variable`], each pair is `(bucket width, offset
    /// from now)`; for `Const`/`Natural` only the first pair's width is
    /// read.
    pub periods: Vec<(String, String)>,
    /// Running totals held flat across buckets vs. per-bucket deltas
    pub cumulative: bool,
    /// Report change since the window began instead of absolute totals
    pub relative_to_recent: bool,
    pub strategy: Strategy,
    /// Ignore events before this timestamp (epoch ms); 0 means no cutoff
    pub cutoff_ms: i64,
}

impl Default for StatsRequest {
    fn default() -> Self {
        Self {
            periods: Vec::new(),
            cumulative: true,
            relative_to_recent: false,
            strategy: Strategy::Variable,
            cutoff_ms: 0,
        }
    }
}

/// Parsed strategy config, dispatched once per call.
enum SegmentSpec {
    Variable(Vec<(i64, i64)>),
    Const(i64),
    Natural(u32, CalendarUnit),
}

impl SegmentSpec {
    fn parse(strategy: Strategy, periods: &[(String, String)]) -> Result<Self> {
        match strategy {
            Strategy::Variable => {
                let pairs = periods
                    .iter()
                    .map(|(width, offset)| {
                        Ok((parse_interval(width)?, parse_interval(offset)?))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(SegmentSpec::Variable(pairs))
            }
            Strategy::Const => {
                let (width, _) = first_period(periods)?;
                Ok(SegmentSpec::Const(parse_interval(width)?))
            }
            Strategy::Natural => {
                let (span, _) = first_period(periods)?;
                let (amount, unit) = parse_calendar_span(span)?;
                Ok(SegmentSpec::Natural(amount, unit))
            }
        }
    }

    fn build(
        &self,
        range_start: i64,
        range_end: i64,
        cutoff_ms: i64,
    ) -> Result<Vec<TimeSegment>> {
        match self {
            SegmentSpec::Variable(pairs) => {
                segments::build_variable_segments(pairs, range_start, range_end, cutoff_ms)
            }
            SegmentSpec::Const(width) => {
                segments::build_const_segments(*width, range_start, range_end)
            }
            SegmentSpec::Natural(amount, unit) => {
                segments::build_natural_segments(*amount, *unit, range_start, range_end)
            }
        }
    }
}

fn first_period(periods: &[(String, String)]) -> Result<(&str, &str)> {
    periods
        .first()
        .map(|(a, b)| (a.as_str(), b.as_str()))
        .ok_or_else(|| Error::Format("at least one period is required".to_string()))
}

/// Computes time-bucketed activity statistics from an event store.
pub struct StatsEngine<'a> {
    store: &'a dyn EventStore,
}

impl<'a> StatsEngine<'a> {
    pub fn new(store: &'a dyn EventStore) -> Self {
        Self { store }
    }

    /// Calculate populated segments for one request.
    ///
    /// Queries the store once, builds segments covering the observed
    /// range, and distributes every in-range event into them. An empty
    /// snapshot yields an empty list.
    pub fn calculate_period_stats(&self, request: &StatsRequest) -> Result<Vec<TimeSegment>> {
        let snapshot = self.store.activities_since(request.cutoff_ms)?;
        if snapshot.is_empty() {
            tracing::debug!(cutoff_ms = request.cutoff_ms, "no events in range");
            return Ok(Vec::new());
        }

        let spec = SegmentSpec::parse(request.strategy, &request.periods)?;
        let mut segments =
            spec.build(snapshot.range_start, snapshot.range_end, request.cutoff_ms)?;

        tracing::debug!(
            strategy = ?request.strategy,
            segments = segments.len(),
            files = snapshot.per_file_events.len(),
            cumulative = request.cumulative,
            relative_to_recent = request.relative_to_recent,
            "aggregating period stats"
        );

        aggregate::aggregate(
            &mut segments,
            &snapshot.per_file_events,
            request.cumulative,
            request.relative_to_recent,
        );
        Ok(segments)
    }
}

//! Segment builders
//!
//! Each bucketing strategy is a pure function from a range (and strategy
//! config) to an ordered, non-overlapping list of [`TimeSegment`]s with
//! zeroed accumulators. The aggregator fills them afterwards.

use crate::error::{Error, Result};
use crate::stats::interval::CalendarUnit;
use crate::types::TimeSegment;
use chrono::{DateTime, Datelike, Days, Duration, Local, Months, NaiveDate, Timelike, Utc};

/// Build telescoping segments from `(bucket width, offset from now)` pairs.
///
/// Pairs are processed from the last to the first: pair `i` covers
/// `[range_end - offset_{i-1}, range_end - offset_i]` in buckets of its own
/// width, and the first pair extends down past `range_start`. Offsets must
/// therefore decrease with the index (the last pair, usually offset 0, is
/// the window touching `range_end`). Buckets starting before the cutoff
/// are dropped.
pub fn build_variable_segments(
    pairs: &[(i64, i64)],
    range_start: i64,
    range_end: i64,
    cutoff_ms: i64,
) -> Result<Vec<TimeSegment>> {
    for &(interval, _) in pairs {
        if interval <= 0 {
            return Err(Error::Format(
                "bucket width must be positive".to_string(),
            ));
        }
    }

    let mut segments = Vec::new();
    for i in (0..pairs.len()).rev() {
        let interval = pairs[i].0;
        let window_start = if i == 0 {
            range_start - interval
        } else {
            range_end - pairs[i - 1].1
        };
        let window_end = range_end - pairs[i].1;

        // Walk backward so the newest bucket ends exactly at the window end.
        let mut time = window_end;
        while time >= window_start + interval {
            segments.push(TimeSegment::new(time - interval, time));
            time -= interval;
        }
    }

    segments.reverse();
    segments.retain(|seg| seg.start_time >= cutoff_ms);
    Ok(segments)
}

/// Build uniform-width segments aligned to local calendar boundaries.
///
/// The range is shifted into local time, floored/ceiled to multiples of the
/// width, and shifted back, so e.g. daily buckets start at local midnight.
pub fn build_const_segments(
    width_ms: i64,
    range_start: i64,
    range_end: i64,
) -> Result<Vec<TimeSegment>> {
    if width_ms <= 0 {
        return Err(Error::Format(
            "bucket width must be positive".to_string(),
        ));
    }
    Ok(const_segments_with_offset(
        width_ms,
        range_start,
        range_end,
        local_utc_offset_ms(),
    ))
}

fn const_segments_with_offset(
    width_ms: i64,
    range_start: i64,
    range_end: i64,
    offset_ms: i64,
) -> Vec<TimeSegment> {
    let first = floor_to(range_start + offset_ms, width_ms) - offset_ms;
    let last = ceil_to(range_end + offset_ms, width_ms) - offset_ms;

    let mut segments = Vec::new();
    let mut time = first;
    while time < last {
        segments.push(TimeSegment::new(time, time + width_ms));
        time += width_ms;
    }
    segments
}

/// Build natural-calendar segments of `amount` units each.
///
/// The first segment starts at the beginning of the calendar unit
/// containing `range_start` (ISO week start for weeks); each segment ends
/// one millisecond before the next starts. Month and year advancement is
/// calendar-aware.
pub fn build_natural_segments(
    amount: u32,
    unit: CalendarUnit,
    range_start: i64,
    range_end: i64,
) -> Result<Vec<TimeSegment>> {
    if amount == 0 {
        return Err(Error::Format(
            "calendar span amount must be positive".to_string(),
        ));
    }

    let mut cursor = period_floor(local_from_millis(range_start)?, unit)?;
    let mut segments = Vec::new();
    while cursor.timestamp_millis() <= range_end {
        let next = period_advance(cursor, amount, unit).ok_or_else(|| {
            Error::Time(format!("calendar overflow advancing past {}", cursor))
        })?;
        segments.push(TimeSegment::new(
            cursor.timestamp_millis(),
            next.timestamp_millis() - 1,
        ));
        cursor = next;
    }
    Ok(segments)
}

// ============================================
// Calendar helpers
// ============================================

fn local_utc_offset_ms() -> i64 {
    Local::now().offset().local_minus_utc() as i64 * 1_000
}

fn local_from_millis(ms: i64) -> Result<DateTime<Local>> {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.with_timezone(&Local))
        .ok_or_else(|| Error::Time(format!("timestamp out of range: {}", ms)))
}

fn local_midnight(date: NaiveDate) -> Result<DateTime<Local>> {
    date.and_hms_opt(0, 0, 0)
        .and_then(|naive| naive.and_local_timezone(Local).earliest())
        .ok_or_else(|| Error::Time(format!("no local midnight for {}", date)))
}

/// Start of the calendar unit containing `dt`, in local time.
fn period_floor(dt: DateTime<Local>, unit: CalendarUnit) -> Result<DateTime<Local>> {
    let truncation_err = || Error::Time(format!("cannot truncate {} to unit start", dt));
    match unit {
        CalendarUnit::Minute => dt
            .with_second(0)
            .and_then(|d| d.with_nanosecond(0))
            .ok_or_else(truncation_err),
        CalendarUnit::Hour => dt
            .with_minute(0)
            .and_then(|d| d.with_second(0))
            .and_then(|d| d.with_nanosecond(0))
            .ok_or_else(truncation_err),
        CalendarUnit::Day => local_midnight(dt.date_naive()),
        CalendarUnit::Week => {
            let days_into_week = dt.weekday().num_days_from_monday() as u64;
            let monday = dt
                .date_naive()
                .checked_sub_days(Days::new(days_into_week))
                .ok_or_else(truncation_err)?;
            local_midnight(monday)
        }
        CalendarUnit::Month => {
            let first = dt.date_naive().with_day(1).ok_or_else(truncation_err)?;
            local_midnight(first)
        }
        CalendarUnit::Year => {
            let first = NaiveDate::from_ymd_opt(dt.year(), 1, 1).ok_or_else(truncation_err)?;
            local_midnight(first)
        }
    }
}

fn period_advance(
    dt: DateTime<Local>,
    amount: u32,
    unit: CalendarUnit,
) -> Option<DateTime<Local>> {
    match unit {
        CalendarUnit::Minute => dt.checked_add_signed(Duration::minutes(amount as i64)),
        CalendarUnit::Hour => dt.checked_add_signed(Duration::hours(amount as i64)),
        CalendarUnit::Day => dt.checked_add_days(Days::new(amount as u64)),
        CalendarUnit::Week => dt.checked_add_days(Days::new(amount as u64 * 7)),
        CalendarUnit::Month => dt.checked_add_months(Months::new(amount)),
        CalendarUnit::Year => dt.checked_add_months(Months::new(amount.checked_mul(12)?)),
    }
}

fn floor_to(value: i64, step: i64) -> i64 {
    value.div_euclid(step) * step
}

fn ceil_to(value: i64, step: i64) -> i64 {
    let floored = floor_to(value, step);
    if floored == value {
        value
    } else {
        floored + step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn assert_contiguous(segments: &[TimeSegment]) {
        for pair in segments.windows(2) {
            assert_eq!(pair[0].end_time, pair[1].start_time, "gap between buckets");
        }
    }

    fn local_ms(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> i64 {
        Local
            .with_ymd_and_hms(y, mo, d, h, mi, s)
            .single()
            .expect("unambiguous local time")
            .timestamp_millis()
    }

    #[test]
    fn test_variable_single_pair_covers_range() {
        // One pair: minute buckets from before range_start up to range_end.
        let start = 1_717_200_000_000;
        let end = start + 540_000; // nine minutes later
        let segments =
            build_variable_segments(&[(60_000, 0)], start, end, 0).unwrap();

        assert_eq!(segments.len(), 10);
        assert_contiguous(&segments);
        assert_eq!(segments.last().unwrap().end_time, end);
        assert_eq!(segments[0].start_time, start - 60_000);
    }

    #[test]
    fn test_variable_telescoping_pairs() {
        // Hourly buckets up to one day ago, then minute buckets to the end.
        let day = 86_400_000;
        let hour = 3_600_000;
        let end = 1_717_200_000_000;
        let start = end - 2 * day;
        let pairs = [(hour, day), (60_000, 0)];

        let segments = build_variable_segments(&pairs, start, end, 0).unwrap();
        assert_contiguous(&segments);

        // Coarse buckets first, fine buckets after, meeting at end - day.
        let boundary = end - day;
        let coarse: Vec<_> = segments.iter().filter(|s| s.end_time <= boundary).collect();
        let fine: Vec<_> = segments.iter().filter(|s| s.end_time > boundary).collect();
        assert!(coarse.iter().all(|s| s.end_time - s.start_time == hour));
        assert!(fine.iter().all(|s| s.end_time - s.start_time == 60_000));
        assert_eq!(fine.len(), 1_440);
        assert_eq!(segments.last().unwrap().end_time, end);
    }

    #[test]
    fn test_variable_cutoff_drops_old_buckets() {
        let start = 1_717_200_000_000;
        let end = start + 540_000;
        let cutoff = start + 180_000;
        let segments =
            build_variable_segments(&[(60_000, 0)], start, end, cutoff).unwrap();

        assert!(segments.iter().all(|s| s.start_time >= cutoff));
        assert_eq!(segments.last().unwrap().end_time, end);
    }

    #[test]
    fn test_variable_rejects_zero_width() {
        assert!(build_variable_segments(&[(0, 0)], 0, 1_000, 0).is_err());
    }

    #[test]
    fn test_const_segments_align_to_width() {
        let width = 3_600_000;
        let start = 1_717_201_234_567;
        let end = start + 7_000_000;
        let segments = const_segments_with_offset(width, start, end, 0);

        assert!(!segments.is_empty());
        assert_contiguous(&segments);
        assert!(segments.iter().all(|s| s.end_time - s.start_time == width));
        assert!(segments[0].start_time <= start);
        assert!(segments.last().unwrap().end_time >= end);
        assert_eq!(segments[0].start_time % width, 0);
    }

    #[test]
    fn test_const_segments_respect_local_offset() {
        let width = 86_400_000;
        let offset = 8 * 3_600_000; // UTC+8
        let start = 1_717_201_234_567;
        let segments = const_segments_with_offset(width, start, start + width, offset);

        // Bucket boundaries land on local midnight, not UTC midnight.
        assert_eq!((segments[0].start_time + offset) % width, 0);
    }

    #[test]
    fn test_natural_minute_segments() {
        let start = local_ms(2024, 6, 6, 12, 0, 30);
        let end = local_ms(2024, 6, 6, 12, 9, 0);
        let segments =
            build_natural_segments(1, CalendarUnit::Minute, start, end).unwrap();

        assert_eq!(segments.len(), 10);
        assert_eq!(segments[0].start_time, local_ms(2024, 6, 6, 12, 0, 0));
        // Each segment ends one ms before the next starts.
        for pair in segments.windows(2) {
            assert_eq!(pair[0].end_time + 1, pair[1].start_time);
        }
        assert_eq!(
            segments[0].end_time,
            local_ms(2024, 6, 6, 12, 1, 0) - 1
        );
    }

    #[test]
    fn test_natural_week_starts_on_monday() {
        // 2024-06-06 is a Thursday; the ISO week starts Monday 06-03.
        let start = local_ms(2024, 6, 6, 15, 0, 0);
        let segments =
            build_natural_segments(1, CalendarUnit::Week, start, start).unwrap();

        assert_eq!(segments[0].start_time, local_ms(2024, 6, 3, 0, 0, 0));
    }

    #[test]
    fn test_natural_month_segments_vary_in_length() {
        let start = local_ms(2024, 1, 15, 0, 0, 0);
        let end = local_ms(2024, 3, 1, 0, 0, 0);
        let segments =
            build_natural_segments(1, CalendarUnit::Month, start, end).unwrap();

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].start_time, local_ms(2024, 1, 1, 0, 0, 0));
        assert_eq!(segments[1].start_time, local_ms(2024, 2, 1, 0, 0, 0));
        // 2024 is a leap year: February has 29 days.
        assert_eq!(segments[2].start_time, local_ms(2024, 3, 1, 0, 0, 0));
    }

    #[test]
    fn test_natural_year_segments() {
        let start = local_ms(2023, 7, 1, 0, 0, 0);
        let end = local_ms(2024, 2, 1, 0, 0, 0);
        let segments =
            build_natural_segments(1, CalendarUnit::Year, start, end).unwrap();

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].start_time, local_ms(2023, 1, 1, 0, 0, 0));
        assert_eq!(segments[1].start_time, local_ms(2024, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_natural_rejects_zero_amount() {
        assert!(build_natural_segments(0, CalendarUnit::Day, 0, 1_000).is_err());
    }

    #[test]
    fn test_floor_and_ceil_handle_negative_values() {
        assert_eq!(floor_to(-1, 60_000), -60_000);
        assert_eq!(ceil_to(-1, 60_000), 0);
        assert_eq!(ceil_to(120_000, 60_000), 120_000);
    }
}

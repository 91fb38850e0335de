//! Interval string parsing
//!
//! Two grammars share the `<amount><unit>` shape:
//! - fixed-duration intervals (`1min`, `2hour`, `5day`, `4week`) parse to
//!   milliseconds;
//! - calendar spans additionally accept `month` and `year`, which are not
//!   fixed-duration and are advanced with calendar arithmetic by the
//!   natural segment builder.

use crate::error::{Error, Result};

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 3_600_000;
const DAY_MS: i64 = 86_400_000;
const WEEK_MS: i64 = 604_800_000;

/// Calendar unit for natural-period segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarUnit {
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

/// Split `<digits><suffix>`; `None` when the digit run is empty.
fn split_amount(s: &str) -> Option<(&str, &str)> {
    let digits_end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    if digits_end == 0 {
        return None;
    }
    Some((&s[..digits_end], &s[digits_end..]))
}

/// Parse a fixed-duration interval string into milliseconds.
///
/// Grammar: `^(\d+)(min|hour|day|week)$`. There is no unit defaulting;
/// anything else is an [`Error::Format`].
pub fn parse_interval(s: &str) -> Result<i64> {
    let err = || {
        Error::Format(format!(
            "'{}' (expected forms like 1min, 2hour, 5day, 4week)",
            s
        ))
    };

    let (digits, unit) = split_amount(s).ok_or_else(err)?;
    let amount: i64 = digits.parse().map_err(|_| err())?;
    let unit_ms = match unit {
        "min" => MINUTE_MS,
        "hour" => HOUR_MS,
        "day" => DAY_MS,
        "week" => WEEK_MS,
        _ => return Err(err()),
    };

    amount.checked_mul(unit_ms).ok_or_else(err)
}

/// Parse a calendar span string (`1week`, `4month`, `2year`, ...).
pub fn parse_calendar_span(s: &str) -> Result<(u32, CalendarUnit)> {
    let err = || {
        Error::Format(format!(
            "'{}' (expected forms like 1min, 4week, 2year)",
            s
        ))
    };

    let (digits, unit) = split_amount(s).ok_or_else(err)?;
    let amount: u32 = digits.parse().map_err(|_| err())?;
    let unit = match unit {
        "min" => CalendarUnit::Minute,
        "hour" => CalendarUnit::Hour,
        "day" => CalendarUnit::Day,
        "week" => CalendarUnit::Week,
        "month" => CalendarUnit::Month,
        "year" => CalendarUnit::Year,
        _ => return Err(err()),
    };

    Ok((amount, unit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_interval_units() {
        assert_eq!(parse_interval("1min").unwrap(), 60_000);
        assert_eq!(parse_interval("2hour").unwrap(), 7_200_000);
        assert_eq!(parse_interval("5day").unwrap(), 432_000_000);
        assert_eq!(parse_interval("4week").unwrap(), 2_419_200_000);
    }

    #[test]
    fn test_parse_interval_scales_linearly() {
        assert_eq!(
            parse_interval("4week").unwrap(),
            4 * parse_interval("1week").unwrap()
        );
    }

    #[test]
    fn test_parse_interval_rejects_malformed_input() {
        for bad in ["", "min", "1", "1 min", "1sec", "1.5min", "-1min", "1month"] {
            assert!(
                matches!(parse_interval(bad), Err(Error::Format(_))),
                "expected format error for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_parse_interval_zero_is_zero_ms() {
        // "0min" is grammatical; a zero recent-window means "no cutoff".
        assert_eq!(parse_interval("0min").unwrap(), 0);
    }

    #[test]
    fn test_parse_interval_overflow() {
        assert!(parse_interval("99999999999999999999min").is_err());
        assert!(parse_interval("9223372036854775807week").is_err());
    }

    #[test]
    fn test_parse_calendar_span() {
        assert_eq!(
            parse_calendar_span("4month").unwrap(),
            (4, CalendarUnit::Month)
        );
        assert_eq!(
            parse_calendar_span("2year").unwrap(),
            (2, CalendarUnit::Year)
        );
        assert_eq!(
            parse_calendar_span("1min").unwrap(),
            (1, CalendarUnit::Minute)
        );
        assert!(parse_calendar_span("1decade").is_err());
        assert!(parse_calendar_span("month").is_err());
    }
}

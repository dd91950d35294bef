//! String-level evaluation and human-readable breakdowns.
//!
//! [`evaluate`] takes every input as text (an RFC 3339 reference, an ISO 8601
//! duration and an IANA timezone name) and returns a serializable
//! [`DurationReport`]. It is the entry point used by the `isodur` CLI.

use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::duration::apply_duration;
use crate::error::{DurationError, Result};

// ── ElapsedBreakdown ────────────────────────────────────────────────────────

/// A signed elapsed time decomposed into days, hours, minutes and seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElapsedBreakdown {
    /// Total duration in whole seconds (negative for backwards durations).
    pub total_seconds: i64,
    /// Days component of the absolute duration.
    pub days: i64,
    /// Hours component (0-23).
    pub hours: i64,
    /// Minutes component (0-59).
    pub minutes: i64,
    /// Seconds component (0-59).
    pub seconds: i64,
    /// Human-readable representation (e.g., "2 days, 3 hours, 15 minutes").
    pub human_readable: String,
}

impl ElapsedBreakdown {
    /// Decompose `delta`, truncating sub-second precision toward zero.
    ///
    /// The components describe the absolute value; the sign lives in
    /// `total_seconds` and as a leading `-` in `human_readable`.
    pub fn from_delta(delta: TimeDelta) -> Self {
        let total_seconds = delta.num_seconds();
        let abs_seconds = total_seconds.unsigned_abs();

        let days = (abs_seconds / 86400) as i64;
        let remainder = abs_seconds % 86400;
        let hours = (remainder / 3600) as i64;
        let remainder = remainder % 3600;
        let minutes = (remainder / 60) as i64;
        let seconds = (remainder % 60) as i64;

        let mut human_readable = format_human_duration(days, hours, minutes, seconds);
        if total_seconds < 0 {
            human_readable.insert(0, '-');
        }

        ElapsedBreakdown {
            total_seconds,
            days,
            hours,
            minutes,
            seconds,
            human_readable,
        }
    }
}

/// Format a human-readable duration string from non-negative components.
///
/// Zero components are omitted; an all-zero duration reads `"0 seconds"`.
pub fn format_human_duration(days: i64, hours: i64, minutes: i64, seconds: i64) -> String {
    let mut parts = Vec::new();
    for (count, unit) in [(days, "day"), (hours, "hour"), (minutes, "minute")] {
        if count > 0 {
            parts.push(pluralize(count, unit));
        }
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(pluralize(seconds, "second"));
    }
    parts.join(", ")
}

fn pluralize(count: i64, unit: &str) -> String {
    format!("{} {}{}", count, unit, if count == 1 { "" } else { "s" })
}

// ── evaluate ────────────────────────────────────────────────────────────────

/// The result of evaluating a duration against a reference instant.
#[derive(Debug, Clone, Serialize)]
pub struct DurationReport {
    /// The duration expression (echoed back).
    pub expression: String,
    /// The reference instant in the evaluation timezone (RFC 3339 with offset).
    pub reference: String,
    /// The moved instant in UTC (RFC 3339).
    pub adjusted_utc: String,
    /// The moved instant in the evaluation timezone (RFC 3339 with offset).
    pub adjusted_local: String,
    /// The IANA timezone name used for calendar arithmetic.
    pub timezone: String,
    /// Elapsed time from `reference` to `adjusted_utc`.
    #[serde(flatten)]
    pub elapsed: ElapsedBreakdown,
}

/// Evaluate an ISO 8601 duration against an RFC 3339 reference instant.
///
/// Calendar components are resolved in `timezone`, so `P1D` across a DST
/// transition keeps the local wall-clock time.
///
/// # Errors
///
/// Returns [`DurationError::InvalidDatetime`] if `reference` is not RFC 3339,
/// [`DurationError::InvalidTimezone`] if `timezone` is not an IANA name, or
/// any error of [`parse_duration`](crate::parse_duration).
///
/// # Examples
///
/// ```
/// use iso_duration::evaluate;
///
/// let report = evaluate("2023-01-01T12:00:00Z", "P1DT2H30M", "UTC").unwrap();
/// assert_eq!(report.elapsed.total_seconds, 95_400);
/// assert_eq!(report.elapsed.human_readable, "1 day, 2 hours, 30 minutes");
/// ```
pub fn evaluate(reference: &str, text: &str, timezone: &str) -> Result<DurationReport> {
    let reference_utc = parse_rfc3339(reference)?;
    let tz = parse_timezone(timezone)?;
    let local = reference_utc.with_timezone(&tz);

    let adjusted = apply_duration(&local, text)?;
    let elapsed = ElapsedBreakdown::from_delta(adjusted.signed_duration_since(local));

    Ok(DurationReport {
        expression: text.to_string(),
        reference: local.to_rfc3339(),
        adjusted_utc: adjusted.with_timezone(&Utc).to_rfc3339(),
        adjusted_local: adjusted.to_rfc3339(),
        timezone: timezone.to_string(),
        elapsed,
    })
}

/// Parse an RFC 3339 datetime string into `DateTime<Utc>`.
pub fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DurationError::InvalidDatetime(format!("'{}': {}", s, e)))
}

/// Parse an IANA timezone string into `Tz`.
pub fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse::<Tz>()
        .map_err(|_| DurationError::InvalidTimezone(format!("'{}'", s)))
}

//! ISO 8601 duration parsing and calendar-aware evaluation.
//!
//! A duration such as `P1Y2M3DT4H5M6S` has no fixed length on its own: one
//! month after January 1st is 31 days, one month after February 1st of a
//! leap year is 29. Every function here therefore takes an explicit
//! reference instant and resolves the calendar components against it.
//!
//! # Evaluation
//!
//! 1. Calendar components (years, months, weeks, days) move the reference
//!    with calendar arithmetic. Month arithmetic clamps to the last day of
//!    the target month, and zoned references keep their wall-clock time. A
//!    wall-clock result repeated by a DST change takes the earlier instant;
//!    one skipped by a DST change moves forward by the gap.
//! 2. Time components (hours, minutes, seconds) move the result by a fixed
//!    number of seconds.
//! 3. The elapsed time is the difference between the moved instant and the
//!    reference.
//!
//! # Fractional components
//!
//! Fractional values are converted to a whole count of a finer unit,
//! truncating toward zero:
//!
//! | component | converted to | accumulation |
//! |-----------|--------------|--------------|
//! | year      | months       | added        |
//! | month     | error        | n/a          |
//! | week      | days         | added        |
//! | day       | seconds      | replaces the running seconds total |
//! | hour      | seconds      | replaces the running seconds total |
//! | minute    | seconds      | replaces the running seconds total |
//! | second    | seconds      | replaces the running seconds total |
//!
//! Whole-number components always add into their own totals.

use std::sync::LazyLock;

use chrono::{DateTime, Days, Months, NaiveDateTime, Offset, TimeDelta, TimeZone};
use regex::Regex;

use crate::error::{DurationError, Result};

/// `sign? P (nY)? (nM)? (nW)? (nD)? (T (nH)? (nM)? (nS)?)?`, case-insensitive.
static DURATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^(?P<sign>[+-])?P",
        r"(?:(?P<year>[0-9]+(?:\.[0-9]+)?)Y)?",
        r"(?:(?P<month>[0-9]+(?:\.[0-9]+)?)M)?",
        r"(?:(?P<week>[0-9]+(?:\.[0-9]+)?)W)?",
        r"(?:(?P<day>[0-9]+(?:\.[0-9]+)?)D)?",
        r"(?:T",
        r"(?:(?P<hour>[0-9]+(?:\.[0-9]+)?)H)?",
        r"(?:(?P<minute>[0-9]+(?:\.[0-9]+)?)M)?",
        r"(?:(?P<second>[0-9]+(?:\.[0-9]+)?)S)?",
        r")?$",
    ))
    .expect("duration pattern must compile")
});

const SECONDS_PER_MINUTE: f64 = 60.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

// ── Public API ──────────────────────────────────────────────────────────────

/// Parse an ISO 8601 duration and return the signed time it spans when
/// applied to `reference`.
///
/// # Arguments
///
/// * `reference` — The anchor instant calendar components are resolved against
/// * `text` — A duration such as `"P1Y2M3DT4H5M6S"`, `"-P1DT2H"` or `"PT1.5H"`
///
/// # Errors
///
/// - [`DurationError::Format`] if `text` does not match the duration grammar
///   (including the empty string and strings without the `P` marker)
/// - [`DurationError::FractionalMonth`] for a month component like `P1.5M`
/// - [`DurationError::NumericParse`] if a magnitude does not fit in 64 bits
/// - [`DurationError::OutOfRange`] if the moved instant is not representable
///
/// # Examples
///
/// ```
/// use chrono::{TimeDelta, TimeZone, Utc};
/// use iso_duration::parse_duration;
///
/// let reference = Utc.with_ymd_and_hms(2020, 2, 1, 12, 0, 0).unwrap();
/// // February 2020 has 29 days
/// assert_eq!(parse_duration(&reference, "P1M").unwrap(), TimeDelta::days(29));
/// assert_eq!(parse_duration(&reference, "PT1.5H").unwrap(), TimeDelta::minutes(90));
/// ```
pub fn parse_duration<Tz: TimeZone>(reference: &DateTime<Tz>, text: &str) -> Result<TimeDelta> {
    let adjusted = apply_duration(reference, text)?;
    Ok(adjusted.signed_duration_since(reference.clone()))
}

/// Move `reference` by an ISO 8601 duration and return the resulting instant.
///
/// Negative durations (`-P...`) move backwards. See [`parse_duration`] for
/// the accepted grammar and errors.
pub fn apply_duration<Tz: TimeZone>(
    reference: &DateTime<Tz>,
    text: &str,
) -> Result<DateTime<Tz>> {
    let spec = DurationSpec::parse(text)?;
    spec.apply(reference.clone(), text)
}

// ── Parsed components ───────────────────────────────────────────────────────

/// A capture group of [`DURATION_PATTERN`], in processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
}

impl Field {
    const ALL: [Field; 7] = [
        Field::Year,
        Field::Month,
        Field::Week,
        Field::Day,
        Field::Hour,
        Field::Minute,
        Field::Second,
    ];

    fn group(self) -> &'static str {
        match self {
            Field::Year => "year",
            Field::Month => "month",
            Field::Week => "week",
            Field::Day => "day",
            Field::Hour => "hour",
            Field::Minute => "minute",
            Field::Second => "second",
        }
    }
}

/// Sign and accumulated totals of one parsed duration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct DurationSpec {
    negative: bool,
    years: i64,
    months: i64,
    weeks: i64,
    days: i64,
    hours: i64,
    minutes: i64,
    seconds: i64,
}

impl DurationSpec {
    fn parse(text: &str) -> Result<Self> {
        let captures = DURATION_PATTERN
            .captures(text)
            .ok_or_else(|| DurationError::Format(text.to_string()))?;

        let mut spec = DurationSpec {
            negative: captures.name("sign").is_some_and(|m| m.as_str() == "-"),
            ..Default::default()
        };

        for field in Field::ALL {
            let Some(value) = captures.name(field.group()) else {
                continue;
            };
            let value = value.as_str();
            if value.contains('.') {
                spec.add_fraction(text, field, value)?;
            } else {
                spec.add_whole(text, field, value)?;
            }
        }

        Ok(spec)
    }

    fn add_whole(&mut self, text: &str, field: Field, value: &str) -> Result<()> {
        let n: i64 = value
            .parse()
            .map_err(|_| numeric_error(text, field, value))?;
        let total = match field {
            Field::Year => &mut self.years,
            Field::Month => &mut self.months,
            Field::Week => &mut self.weeks,
            Field::Day => &mut self.days,
            Field::Hour => &mut self.hours,
            Field::Minute => &mut self.minutes,
            Field::Second => &mut self.seconds,
        };
        *total = total
            .checked_add(n)
            .ok_or_else(|| numeric_error(text, field, value))?;
        Ok(())
    }

    fn add_fraction(&mut self, text: &str, field: Field, value: &str) -> Result<()> {
        // Magnitudes are read at single precision; the truncated counts
        // below depend on it (PT0.7H is 2519 seconds, not 2520).
        let magnitude = value
            .parse::<f32>()
            .ok()
            .filter(|m| m.is_finite())
            .map(f64::from)
            .ok_or_else(|| numeric_error(text, field, value))?;
        let convert =
            |scaled: f64| truncate(scaled).ok_or_else(|| numeric_error(text, field, value));

        match field {
            Field::Month => return Err(DurationError::FractionalMonth(text.to_string())),
            Field::Year => {
                let months = convert(magnitude * 12.0)?;
                self.months = self
                    .months
                    .checked_add(months)
                    .ok_or_else(|| numeric_error(text, field, value))?;
            }
            Field::Week => {
                let days = convert(magnitude * 7.0)?;
                self.days = self
                    .days
                    .checked_add(days)
                    .ok_or_else(|| numeric_error(text, field, value))?;
            }
            Field::Day => self.seconds = convert(magnitude * SECONDS_PER_DAY)?,
            Field::Hour => self.seconds = convert(magnitude * SECONDS_PER_HOUR)?,
            Field::Minute => self.seconds = convert(magnitude * SECONDS_PER_MINUTE)?,
            Field::Second => self.seconds = convert(magnitude)?,
        }
        Ok(())
    }

    fn has_calendar_part(&self) -> bool {
        self.years != 0 || self.months != 0 || self.weeks != 0 || self.days != 0
    }

    fn has_time_part(&self) -> bool {
        self.hours != 0 || self.minutes != 0 || self.seconds != 0
    }

    fn total_months(&self) -> Option<u32> {
        let months = self.years.checked_mul(12)?.checked_add(self.months)?;
        u32::try_from(months).ok()
    }

    fn total_days(&self) -> Option<u64> {
        let days = self.weeks.checked_mul(7)?.checked_add(self.days)?;
        u64::try_from(days).ok()
    }

    fn total_seconds(&self) -> Option<i64> {
        self.hours
            .checked_mul(3_600)?
            .checked_add(self.minutes.checked_mul(60)?)?
            .checked_add(self.seconds)
    }

    fn apply<Tz: TimeZone>(&self, reference: DateTime<Tz>, text: &str) -> Result<DateTime<Tz>> {
        let mut adjusted = reference;

        if self.has_calendar_part() {
            let months = self
                .total_months()
                .map(Months::new)
                .ok_or_else(|| out_of_range(text, "too many months"))?;
            let days = self
                .total_days()
                .map(Days::new)
                .ok_or_else(|| out_of_range(text, "too many days"))?;

            // One calendar step on the wall clock, converted back to the zone once.
            let mut local = Some(adjusted.naive_local());
            if months != Months::new(0) {
                local = if self.negative {
                    local.and_then(|dt| dt.checked_sub_months(months))
                } else {
                    local.and_then(|dt| dt.checked_add_months(months))
                };
            }
            local = if self.negative {
                local.and_then(|dt| dt.checked_sub_days(days))
            } else {
                local.and_then(|dt| dt.checked_add_days(days))
            };

            let tz = adjusted.timezone();
            adjusted = local
                .and_then(|dt| resolve_local(&tz, &dt))
                .ok_or_else(|| out_of_range(text, "date outside the supported range"))?;
        }

        if self.has_time_part() {
            let offset = self
                .total_seconds()
                .and_then(TimeDelta::try_seconds)
                .ok_or_else(|| out_of_range(text, "too many seconds"))?;

            adjusted = if self.negative {
                adjusted.checked_sub_signed(offset)
            } else {
                adjusted.checked_add_signed(offset)
            }
            .ok_or_else(|| out_of_range(text, "instant overflows after time arithmetic"))?;
        }

        Ok(adjusted)
    }
}

// ── Internal helpers ────────────────────────────────────────────────────────

/// Place a wall-clock time in `tz`.
///
/// A time repeated by a backward transition takes the earlier instant. A time
/// skipped by a forward transition is read with the offset in effect before
/// the transition, which moves it forward by the length of the gap.
fn resolve_local<Tz: TimeZone>(tz: &Tz, local: &NaiveDateTime) -> Option<DateTime<Tz>> {
    if let Some(dt) = tz.from_local_datetime(local).earliest() {
        return Some(dt);
    }
    let before_gap = local.checked_sub_days(Days::new(1))?;
    let offset = tz.offset_from_utc_datetime(&before_gap).fix();
    let utc =
        local.checked_sub_signed(TimeDelta::seconds(i64::from(offset.local_minus_utc())))?;
    Some(tz.from_utc_datetime(&utc))
}

/// Truncate toward zero, or `None` if the value does not fit in an `i64`.
fn truncate(value: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
    if value.is_finite() && value >= i64::MIN as f64 && value < i64::MAX as f64 {
        Some(value.trunc() as i64)
    } else {
        None
    }
}

fn numeric_error(text: &str, field: Field, value: &str) -> DurationError {
    DurationError::NumericParse {
        text: text.to_string(),
        field: field.group(),
        value: value.to_string(),
    }
}

fn out_of_range(text: &str, reason: &str) -> DurationError {
    DurationError::OutOfRange(format!("'{text}': {reason}"))
}

//! # iso-duration
//!
//! Calendar-aware evaluation of ISO 8601 durations.
//!
//! `P1M` is 31 days in January and 29 days in February 2020; the number of
//! seconds a duration spans depends on where it starts. This crate resolves
//! durations such as `P1Y2M3DT4H5M6S`, `-P1DT2H` or `PT1.5H` against an
//! explicit reference instant and returns the signed elapsed time. Nothing
//! here reads the system clock.
//!
//! ## Modules
//!
//! - [`duration`] — ISO 8601 duration string + reference instant → signed elapsed time
//! - [`report`] — String-level evaluation with serializable, human-readable results
//! - [`error`] — Error types

pub mod duration;
pub mod error;
pub mod report;

pub use duration::{apply_duration, parse_duration};
pub use error::DurationError;
pub use report::{
    evaluate, format_human_duration, parse_rfc3339, parse_timezone, DurationReport,
    ElapsedBreakdown,
};

//! Error types for iso-duration operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    /// The text does not match the ISO 8601 duration grammar.
    #[error("Invalid duration format: '{0}'")]
    Format(String),

    /// A month component carries a decimal point.
    #[error("Fractional months are not supported: '{0}'")]
    FractionalMonth(String),

    /// A captured magnitude could not be read as a number of the expected width.
    #[error("Invalid number in duration '{text}': {field} = '{value}'")]
    NumericParse {
        text: String,
        field: &'static str,
        value: String,
    },

    /// The moved instant falls outside the representable range.
    #[error("Duration out of range: {0}")]
    OutOfRange(String),

    /// A reference instant is not valid RFC 3339.
    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    /// A timezone name is not a known IANA zone.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}

pub type Result<T> = std::result::Result<T, DurationError>;

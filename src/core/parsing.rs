// src/core/parsing.rs

//! Converters for the tokens a leaf receives.
//!
//! The `is_partial_*` checks are meant for completers: they accept what a user
//! may still be in the middle of typing (an empty token, a lone minus sign).

use chrono::NaiveTime;
use thiserror::Error;

/// A token that does not convert to the requested kind. Carries the token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Not an `i32`.
    #[error("The value \"{0}\" cannot be parsed as an integer.")]
    Int(String),
    /// Not a floating point number.
    #[error("The value \"{0}\" cannot be parsed as a number.")]
    Double(String),
    /// Not a time of day.
    #[error("The value \"{0}\" cannot be parsed as a time (expected HH:MM or HH:MM:SS).")]
    Time(String),
    /// Neither `true` nor `false`.
    #[error("The value \"{0}\" cannot be parsed as boolean.")]
    Boolean(String),
}

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];

/// Parses a 32-bit signed integer.
pub fn parse_int(token: &str) -> Result<i32, ParseError> {
    token
        .parse()
        .map_err(|_| ParseError::Int(token.to_string()))
}

/// Parses an `f64`.
pub fn parse_double(token: &str) -> Result<f64, ParseError> {
    token
        .parse()
        .map_err(|_| ParseError::Double(token.to_string()))
}

/// Accepts `HH:MM`, `HH:MM:SS` and `HH:MM:SS.fff`.
pub fn parse_time(token: &str) -> Result<NaiveTime, ParseError> {
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(token, format).ok())
        .ok_or_else(|| ParseError::Time(token.to_string()))
}

/// Case-insensitive `true` / `false`.
pub fn parse_bool(token: &str) -> Result<bool, ParseError> {
    if token.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if token.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ParseError::Boolean(token.to_string()))
    }
}

/// Whether `token` could still become an integer.
pub fn is_partial_int(token: &str) -> bool {
    token.is_empty() || token == "-" || parse_int(token).is_ok()
}

/// Whether `token` could still become a number.
pub fn is_partial_double(token: &str) -> bool {
    token.is_empty() || token == "-" || parse_double(token).is_ok()
}

/// Whether `token` is empty or already a full time.
pub fn is_partial_time(token: &str) -> bool {
    token.is_empty() || parse_time(token).is_ok()
}

//! Human-readable duration parsing.
//!
//! Accepts either an integer millisecond count or a suffixed string: `Ns`,
//! `Nm`, `Nh`, `Nms`. Anything else is a malformed-duration error. Not
//! cached: tier count per invocation is at most 4, so re-parsing is cheap.

use std::fmt;

/// A duration as configured by a caller: either a raw millisecond count or
/// a string to be parsed by [`parse_duration`].
#[derive(Debug, Clone)]
pub enum DurationSpec {
    Millis(u64),
    Text(String),
}

impl DurationSpec {
    /// Resolve to a millisecond count, parsing the text form if needed.
    pub fn resolve_ms(&self) -> Result<u64, DurationParseError> {
        match self {
            DurationSpec::Millis(ms) => Ok(*ms),
            DurationSpec::Text(s) => parse_duration(s),
        }
    }
}

impl From<u64> for DurationSpec {
    fn from(ms: u64) -> Self {
        DurationSpec::Millis(ms)
    }
}

impl From<&str> for DurationSpec {
    fn from(s: &str) -> Self {
        DurationSpec::Text(s.to_string())
    }
}

impl From<String> for DurationSpec {
    fn from(s: String) -> Self {
        DurationSpec::Text(s)
    }
}

/// The given string did not match any accepted duration shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationParseError {
    pub input: String,
}

impl fmt::Display for DurationParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed duration: {:?}", self.input)
    }
}

impl std::error::Error for DurationParseError {}

/// Parse `"5s"`, `"30s"`, `"5m"`, `"24h"`, `"250ms"`, or a bare non-negative
/// integer (interpreted as milliseconds) into a millisecond count.
pub fn parse_duration(input: &str) -> Result<u64, DurationParseError> {
    let trimmed = input.trim();
    let err = || DurationParseError {
        input: input.to_string(),
    };

    if trimmed.is_empty() {
        return Err(err());
    }

    if let Ok(ms) = trimmed.parse::<u64>() {
        return Ok(ms);
    }

    let (digits, unit_ms) = if let Some(digits) = trimmed.strip_suffix("ms") {
        (digits, 1)
    } else if let Some(digits) = trimmed.strip_suffix('s') {
        (digits, 1_000)
    } else if let Some(digits) = trimmed.strip_suffix('m') {
        (digits, 60_000)
    } else if let Some(digits) = trimmed.strip_suffix('h') {
        (digits, 3_600_000)
    } else {
        return Err(err());
    };

    let count: u64 = digits.parse().map_err(|_| err())?;
    count.checked_mul(unit_ms).ok_or_else(err)
}

//! Timestamp parsing for chapter start markers.
//!
//! Chapter artifacts carry their start as a literal `HH:MM:SS` string; the
//! conversion to seconds happens at presentation time, per chapter.

/// Parse a chapter timestamp into whole seconds.
///
/// Supports formats:
/// - `HH:MM:SS`
/// - `MM:SS`
/// - `SS`
///
/// A fractional part on the seconds component (`SS.mmm`) is truncated.
///
/// # Examples
/// ```
/// use vsum_models::timestamp::parse_timestamp_secs;
/// assert_eq!(parse_timestamp_secs("01:02:03").unwrap(), 3723);
/// assert_eq!(parse_timestamp_secs("05:30").unwrap(), 330);
/// assert_eq!(parse_timestamp_secs("90").unwrap(), 90);
/// ```
pub fn parse_timestamp_secs(ts: &str) -> Result<u32, TimestampError> {
    let ts = ts.trim();
    if ts.is_empty() {
        return Err(TimestampError::Empty);
    }

    let parts: Vec<&str> = ts.split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [s] => (0, 0, parse_seconds(s)?),
        [m, s] => (0, parse_component("minutes", m)?, parse_seconds(s)?),
        [h, m, s] => (
            parse_component("hours", h)?,
            parse_component("minutes", m)?,
            parse_seconds(s)?,
        ),
        _ => return Err(TimestampError::InvalidFormat(ts.to_string())),
    };

    hours
        .checked_mul(3600)
        .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
        .and_then(|hm| hm.checked_add(seconds))
        .ok_or_else(|| TimestampError::Overflow(ts.to_string()))
}

fn parse_component(name: &'static str, value: &str) -> Result<u32, TimestampError> {
    let value = value.trim();
    if value.starts_with('-') {
        return Err(TimestampError::Negative);
    }
    value
        .parse()
        .map_err(|_| TimestampError::InvalidValue(name, value.to_string()))
}

fn parse_seconds(value: &str) -> Result<u32, TimestampError> {
    let whole = value.trim().split('.').next().unwrap_or_default();
    parse_component("seconds", whole)
}

/// Timestamp parsing error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    /// Timestamp string is empty
    Empty,
    /// Timestamp contains negative values
    Negative,
    /// Invalid numeric value for a component
    InvalidValue(&'static str, String),
    /// Invalid timestamp format
    InvalidFormat(String),
    /// Total does not fit in 32 bits
    Overflow(String),
}

impl std::fmt::Display for TimestampError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "Timestamp cannot be empty"),
            Self::Negative => write!(f, "Timestamp cannot be negative"),
            Self::InvalidValue(component, value) => {
                write!(f, "Invalid {} value: {}", component, value)
            }
            Self::InvalidFormat(ts) => write!(
                f,
                "Invalid timestamp format '{}'. Use HH:MM:SS, MM:SS or SS",
                ts
            ),
            Self::Overflow(ts) => write!(f, "Timestamp '{}' is out of range", ts),
        }
    }
}

impl std::error::Error for TimestampError {}

//! Decoding of the loosely typed scalars found in API responses.
//!
//! Both decoders take the raw JSON value of a field (`None` when the key is
//! absent). A JSON `null`, the string `"null"` or a missing key decode to the
//! unknown value, which displays as an empty string.

use std::fmt;

use chrono::{DateTime, NaiveTime};
use serde_json::Value;

use crate::error::CodecError;

// Full ISO-8601 timestamp with a `±hh:mm` offset, as sent with `formatted=0`
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Local clock time of a moment, or unknown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeOfDay(Option<NaiveTime>);

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(time) => write!(f, "{}", time.format("%H:%M:%S")),
            None => Ok(()),
        }
    }
}

/// Whole-second duration shown as hours, minutes and seconds, or unknown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HumanDuration(Option<i64>);

impl HumanDuration {
    /// Floor-divides the seconds into `(hours, minutes, seconds)`.
    ///
    /// Minutes and seconds are always in `0..60`.
    pub fn hms(&self) -> Option<(i64, i64, i64)> {
        self.0.map(|total| {
            (
                total.div_euclid(3600),
                total.rem_euclid(3600) / 60,
                total.rem_euclid(60),
            )
        })
    }
}

impl fmt::Display for HumanDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.hms() {
            Some((hours, minutes, seconds)) => write!(f, "{hours}h {minutes}m {seconds}s"),
            None => Ok(()),
        }
    }
}

/// Text of a scalar with quotes stripped, `None` when it means "no value".
fn scalar_text(raw: Option<&Value>) -> Option<String> {
    let text = match raw? {
        Value::String(s) => s.trim().to_owned(),
        other => other.to_string(),
    };
    (text != "null").then_some(text)
}

/// True when the text ends in a `±hh:mm` offset. chrono's `%:z` also
/// parses `±hhmm`, which is not accepted here.
fn has_colon_offset(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() >= 6
        && matches!(bytes[bytes.len() - 6], b'+' | b'-')
        && bytes[bytes.len() - 3] == b':'
}

/// Decodes an offset timestamp into the clock time it names.
///
/// The offset only fixes the instant; the result is the wall-clock time as
/// written, so `05:12:00+05:00` and `05:12:00+00:00` both give `05:12:00`.
pub fn decode_timestamp(raw: Option<&Value>) -> Result<TimeOfDay, CodecError> {
    let Some(text) = scalar_text(raw) else {
        return Ok(TimeOfDay::default());
    };
    if !has_colon_offset(&text) {
        return Err(CodecError::MalformedTimestamp(text));
    }
    match DateTime::parse_from_str(&text, TIMESTAMP_FORMAT) {
        Ok(instant) => Ok(TimeOfDay(Some(instant.time()))),
        Err(_) => Err(CodecError::MalformedTimestamp(text)),
    }
}

/// Decodes a count of seconds.
///
/// Strings must hold an integer. JSON numbers are accepted too and rounded
/// to the nearest second; numbers that do not fit an `i64` are malformed.
pub fn decode_duration(raw: Option<&Value>) -> Result<HumanDuration, CodecError> {
    let Some(text) = scalar_text(raw) else {
        return Ok(HumanDuration::default());
    };
    let seconds = match raw {
        Some(Value::Number(number)) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .map(f64::round)
                // Upper bound is exclusive: `i64::MAX as f64` rounds up to 2^63
                .filter(|secs| (i64::MIN as f64..i64::MAX as f64).contains(secs))
                .map(|secs| secs as i64)
        }),
        _ => text.parse::<i64>().ok(),
    };
    seconds
        .map(|secs| HumanDuration(Some(secs)))
        .ok_or(CodecError::MalformedDuration(text))
}

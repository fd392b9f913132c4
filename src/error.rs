use std::{io, num::ParseFloatError, path::PathBuf};
use thiserror::Error;

use crate::fetch::Api;
use crate::geo_location::Axis;

/// Errors raised while decoding a single JSON scalar
#[derive(Error, Debug)]
pub enum CodecError {
    /// Timestamp is not in `YYYY-MM-DDThh:mm:ss±hh:mm` form
    #[error("malformed timestamp `{0}`: expected YYYY-MM-DDThh:mm:ss±hh:mm")]
    MalformedTimestamp(String),

    /// Duration is not a whole number of seconds
    #[error("malformed duration `{0}`")]
    MalformedDuration(String),
}

/// Errors raised by a fetch capability
#[derive(Error, Debug)]
pub enum FetchError {
    /// Error when a request URL cannot be built
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Wrapper for reqwest errors
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("{api} responded with {status}")]
    Status {
        api: Api,
        status: reqwest::StatusCode,
    },

    /// Offline mode is on but no fixture path was given for this api
    #[error("environment variable `{0}` is not set")]
    FixtureNotConfigured(String),

    /// The configured fixture path is not an existing file
    #[error("fixture file does not exist: `{}`", .0.display())]
    FixtureMissing(PathBuf),

    /// Wrapper for I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Errors raised while turning a time-of-day response into a report
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Body is not valid JSON
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Body has no `results` object
    #[error("response has no `results` object")]
    MissingResults,

    /// API reported a status other than `OK`
    #[error("API returned status `{0}`")]
    Status(String),

    /// A single field failed to decode
    #[error("field `{field}`: {source}")]
    Field {
        field: &'static str,
        #[source]
        source: CodecError,
    },
}

/// Custom error types for the suntimes application
#[derive(Error, Debug)]
pub enum AppError {
    /// Coordinates are not a `lat,lon` pair
    #[error("invalid coordinates `{0}`: expected `lat,lon`")]
    InvalidCoordinateFormat(String),

    /// A coordinate component is not a number
    #[error("invalid number `{value}`: {source}")]
    InvalidNumber {
        value: String,
        #[source]
        source: ParseFloatError,
    },

    /// A coordinate lies outside its valid range
    #[error("invalid {axis}: {value} (must be between {min} and {max})")]
    OutOfRange {
        axis: Axis,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Geolocation response lacks a required key
    #[error("geolocation response is missing `{0}`")]
    MissingField(&'static str),

    /// Geolocation response has a key of the wrong JSON type
    #[error("geolocation response field `{field}` is not a {expected}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
    },

    /// Error when retrieving a response
    #[error("fetch failed: {0}")]
    FetchFailed(#[from] FetchError),

    /// Error when decoding a response
    #[error("decode failed: {0}")]
    DecodeFailed(#[from] DecodeError),

    /// Error when writing the report
    #[error("failed to write report: {0}")]
    Output(#[from] io::Error),
}


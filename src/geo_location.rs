// Field extraction for the geolocation response
mod response;

use std::fmt;

use tracing::{debug, info};

use crate::error::{AppError, DecodeError};
use crate::fetch::{Api, Fetch};

// API endpoint for the ip-api.com geolocation service
const GEO_LOCATION_ENDPOINT: &str = "http://ip-api.com/json";

/// A place to report times for
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub city: String,
    /// IANA zone name, passed to the times API as `tzid`
    pub timezone: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Which half of a coordinate pair a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    /// Inclusive `(min, max)` bounds.
    pub fn bounds(self) -> (f64, f64) {
        match self {
            Axis::Latitude => (-90.0, 90.0),
            Axis::Longitude => (-180.0, 180.0),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Latitude => f.write_str("latitude"),
            Axis::Longitude => f.write_str("longitude"),
        }
    }
}

/// Where the location comes from. Exactly one source is used per run.
#[derive(Debug, Clone)]
pub enum LocationSource {
    /// User-supplied labels and a `lat,lon` pair
    Explicit {
        city: String,
        timezone: String,
        coordinates: String,
    },
    /// Look the location up from the caller's IP address
    Detect,
}

impl Location {
    /// Builds a location from labels and a `"lat,lon"` string.
    pub fn from_coordinates(
        city: &str,
        timezone: &str,
        coordinates: &str,
    ) -> Result<Self, AppError> {
        let (lat, lon) = coordinates
            .split_once(',')
            .ok_or_else(|| AppError::InvalidCoordinateFormat(coordinates.to_string()))?;

        Ok(Self {
            city: city.to_string(),
            timezone: timezone.to_string(),
            latitude: parse_coordinate(Axis::Latitude, lat)?,
            longitude: parse_coordinate(Axis::Longitude, lon)?,
        })
    }
}

fn parse_coordinate(axis: Axis, text: &str) -> Result<f64, AppError> {
    let text = text.trim();
    let value: f64 = text.parse().map_err(|source| AppError::InvalidNumber {
        value: text.to_string(),
        source,
    })?;

    let (min, max) = axis.bounds();
    // NaN fails the range check too
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(AppError::OutOfRange {
            axis,
            value,
            min,
            max,
        })
    }
}

/// Looks up the caller's location from their public IP address.
///
/// # Arguments
/// * `fetcher` - Source of the ip-api.com response (network or fixture)
///
/// # Returns
/// * `Location` with the city, timezone and coordinates reported by the service
/// * `FetchFailed` if the lookup cannot be retrieved, `DecodeFailed` if the
///   body is not JSON, `MissingField`/`TypeMismatch` if a field is absent or
///   has the wrong type
pub async fn detect_location(fetcher: &dyn Fetch) -> Result<Location, AppError> {
    info!("Detecting location from IP address");

    let body = fetcher.fetch(Api::IpApi, GEO_LOCATION_ENDPOINT).await?;
    let data: serde_json::Value = serde_json::from_slice(&body).map_err(DecodeError::from)?;
    let location = response::location_from(&data)?;

    debug!("Location detected: {:?}", location);
    Ok(location)
}

/// Produces the location from whichever source the caller picked.
pub async fn resolve(source: LocationSource, fetcher: &dyn Fetch) -> Result<Location, AppError> {
    match source {
        LocationSource::Explicit {
            city,
            timezone,
            coordinates,
        } => Location::from_coordinates(&city, &timezone, &coordinates),
        LocationSource::Detect => detect_location(fetcher).await,
    }
}

use chrono::NaiveDate;
use reqwest::Url;
use tracing::{debug, info};

use crate::error::{AppError, FetchError};
use crate::fetch::{Api, Fetch};
use crate::geo_location::Location;

mod response;

pub use response::{SunApiResponse, TimeOfDayReport};

const SUN_TIMES_ENDPOINT: &str = "https://api.sunrise-sunset.org/json";

/// Query URL for one location and date.
///
/// `formatted=0` makes the API send full ISO-8601 timestamps with offsets.
pub fn times_url(location: &Location, date: NaiveDate) -> Result<Url, FetchError> {
    Url::parse_with_params(
        SUN_TIMES_ENDPOINT,
        &[
            ("lat", format!("{:.6}", location.latitude)),
            ("lng", format!("{:.6}", location.longitude)),
            ("tzid", location.timezone.clone()),
            ("formatted", "0".to_string()),
            ("date", date.format("%Y-%m-%d").to_string()),
        ],
    )
    // Only a bad base URL fails here, and the endpoint is a constant
    .map_err(|e| FetchError::InvalidUrl(e.to_string()))
}

/// Fetches sunrise, sunset and twilight times for a location on a date.
///
/// Times are computed by the API from the coordinates, so two points in the
/// same city can differ slightly.
///
/// # Arguments
/// * `fetcher` - Source of the api.sunrise-sunset.org response (network or fixture)
/// * `location` - Coordinates and timezone to query for
/// * `date` - Calendar day, already validated by the caller
///
/// # Returns
/// * `SunApiResponse` with all ten fields decoded, unknown ones left empty
/// * `FetchFailed` if the response cannot be retrieved, `DecodeFailed` if the
///   body or any field fails to decode
pub async fn get_times(
    fetcher: &dyn Fetch,
    location: &Location,
    date: NaiveDate,
) -> Result<SunApiResponse, AppError> {
    info!("Fetching sun times for {} on {}", location.city, date);

    let url = times_url(location, date)?;
    let body = fetcher.fetch(Api::SunTimes, url.as_str()).await?;
    let response = SunApiResponse::decode(&body)?;

    debug!(
        "Sun times fetched successfully (status {:?}, tzid {:?}): {:?}",
        response.status, response.tzid, response.report
    );
    Ok(response)
}

use serde_json::{Map, Value};

use crate::codec::{HumanDuration, TimeOfDay, decode_duration, decode_timestamp};
use crate::error::DecodeError;

/// Sun times for one day, as returned in the `results` object of
/// api.sunrise-sunset.org/json
///
/// Any field may be unknown; near the poles twilight often does not happen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeOfDayReport {
    pub sunrise: TimeOfDay,
    pub sunset: TimeOfDay,
    pub solar_noon: TimeOfDay,
    /// Time between sunrise and sunset
    pub day_length: HumanDuration,
    pub civil_twilight_begin: TimeOfDay,
    pub civil_twilight_end: TimeOfDay,
    pub nautical_twilight_begin: TimeOfDay,
    pub nautical_twilight_end: TimeOfDay,
    pub astronomical_twilight_begin: TimeOfDay,
    pub astronomical_twilight_end: TimeOfDay,
}

/// Full response of the times endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct SunApiResponse {
    pub report: TimeOfDayReport,
    /// `OK` on success, e.g. `INVALID_DATE` otherwise
    pub status: Option<String>,
    /// Timezone the API used for the timestamps
    pub tzid: Option<String>,
}

impl SunApiResponse {
    /// Decodes a response body. Either every field decodes or nothing does.
    pub fn decode(body: &[u8]) -> Result<Self, DecodeError> {
        let data: Value = serde_json::from_slice(body)?;

        let status = text_field(&data, "status");
        if let Some(status) = status.as_deref().filter(|status| *status != "OK") {
            return Err(DecodeError::Status(status.to_string()));
        }

        let results = data
            .get("results")
            .and_then(Value::as_object)
            .ok_or(DecodeError::MissingResults)?;

        Ok(Self {
            report: TimeOfDayReport::decode(results)?,
            status,
            tzid: text_field(&data, "tzid"),
        })
    }
}

impl TimeOfDayReport {
    fn decode(results: &Map<String, Value>) -> Result<Self, DecodeError> {
        let timestamp = |field: &'static str| {
            decode_timestamp(results.get(field)).map_err(|source| DecodeError::Field { field, source })
        };
        let duration = |field: &'static str| {
            decode_duration(results.get(field)).map_err(|source| DecodeError::Field { field, source })
        };

        Ok(Self {
            sunrise: timestamp("sunrise")?,
            sunset: timestamp("sunset")?,
            solar_noon: timestamp("solar_noon")?,
            day_length: duration("day_length")?,
            civil_twilight_begin: timestamp("civil_twilight_begin")?,
            civil_twilight_end: timestamp("civil_twilight_end")?,
            nautical_twilight_begin: timestamp("nautical_twilight_begin")?,
            nautical_twilight_end: timestamp("nautical_twilight_end")?,
            astronomical_twilight_begin: timestamp("astronomical_twilight_begin")?,
            astronomical_twilight_end: timestamp("astronomical_twilight_end")?,
        })
    }
}

fn text_field(data: &Value, key: &str) -> Option<String> {
    data.get(key).and_then(Value::as_str).map(str::to_owned)
}

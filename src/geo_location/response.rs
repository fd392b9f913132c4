//! Field-by-field extraction of the ip-api.com response.
//!
//! The response carries many more keys (`country`, `isp`, `query`, ...);
//! only the four below are read.

use serde_json::{Map, Value};

use super::Location;
use crate::error::AppError;

pub fn location_from(data: &Value) -> Result<Location, AppError> {
    let object = data.as_object().ok_or(AppError::TypeMismatch {
        field: "response",
        expected: "object",
    })?;

    Ok(Location {
        city: string_field(object, "city")?,
        timezone: string_field(object, "timezone")?,
        latitude: number_field(object, "lat")?,
        longitude: number_field(object, "lon")?,
    })
}

fn field<'a>(object: &'a Map<String, Value>, key: &'static str) -> Result<&'a Value, AppError> {
    object.get(key).ok_or(AppError::MissingField(key))
}

fn string_field(object: &Map<String, Value>, key: &'static str) -> Result<String, AppError> {
    field(object, key)?
        .as_str()
        .map(str::to_owned)
        .ok_or(AppError::TypeMismatch {
            field: key,
            expected: "string",
        })
}

fn number_field(object: &Map<String, Value>, key: &'static str) -> Result<f64, AppError> {
    field(object, key)?.as_f64().ok_or(AppError::TypeMismatch {
        field: key,
        expected: "number",
    })
}

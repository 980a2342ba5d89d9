use chrono::NaiveDateTime;
use serde_json::Value;
use thiserror::Error;
use crate::manager_weather::models::{CurrentPayload, ForecastPayload};
use crate::models::{CurrentWeatherRecord, ForecastRecord};

const SLOT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Maps a current conditions payload to a flat record.
/// A payload carrying the not-found status marker yields no record, while a payload that
/// is found but structurally malformed is an error for the caller to deal with.
///
/// # Arguments
///
/// * 'payload' - decoded current conditions payload
/// * 'captured' - timestamp to stamp the record with
pub fn current_record(payload: Value, captured: NaiveDateTime) -> Result<Option<CurrentWeatherRecord>, RecordError> {
    if is_not_found(&payload) {
        return Ok(None);
    }

    let data: CurrentPayload = serde_json::from_value(payload)?;
    let condition = data.weather.into_iter().next().ok_or(RecordError::MissingCondition)?;

    Ok(Some(CurrentWeatherRecord {
        city: data.name,
        country: data.sys.country,
        temperature: data.main.temp,
        feels_like: data.main.feels_like,
        humidity: data.main.humidity,
        pressure: data.main.pressure,
        wind_speed: data.wind.speed,
        description: condition.description,
        icon: condition.icon,
        timestamp: captured,
    }))
}

/// Maps a forecast payload to one flat record per 3-hour slot, each carrying the
/// parent city name. A payload carrying the not-found status marker yields no records.
///
/// # Arguments
///
/// * 'payload' - decoded forecast payload
pub fn forecast_records(payload: Value) -> Result<Vec<ForecastRecord>, RecordError> {
    if is_not_found(&payload) {
        return Ok(Vec::new());
    }

    let data: ForecastPayload = serde_json::from_value(payload)?;

    let mut records: Vec<ForecastRecord> = Vec::with_capacity(data.list.len());
    for entry in data.list {
        let date_time = NaiveDateTime::parse_from_str(&entry.dt_txt, SLOT_TIME_FORMAT)
            .map_err(|e| RecordError::DateError(format!("forecast slot time: {}", e)))?;
        let condition = entry.weather.into_iter().next().ok_or(RecordError::MissingCondition)?;

        records.push(ForecastRecord {
            city: data.city.name.clone(),
            date_time,
            temperature: entry.main.temp,
            humidity: entry.main.humidity,
            description: condition.description,
            wind_speed: entry.wind.speed,
        });
    }

    Ok(records)
}

/// Checks the payload status marker for a missed city lookup.
/// The API reports the marker as a string for some endpoints and as a number for others.
///
/// # Arguments
///
/// * 'payload' - the payload to inspect
fn is_not_found(payload: &Value) -> bool {
    match payload.get("cod") {
        Some(Value::String(cod)) => cod == "404",
        Some(Value::Number(cod)) => cod.as_u64() == Some(404),
        _ => false,
    }
}

/// Error depicting errors that occur while mapping payloads to records
///
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("DocumentError: {0}")]
    DocumentError(#[from] serde_json::Error),
    #[error("DateError: {0}")]
    DateError(String),
    #[error("MissingCondition")]
    MissingCondition,
}

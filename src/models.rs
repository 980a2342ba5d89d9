use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

/// Flattened current conditions for one city, one CSV row
#[derive(Serialize, Debug, Clone)]
pub struct CurrentWeatherRecord {
    pub city: String,
    pub country: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub pressure: u32,
    pub wind_speed: f64,
    pub description: String,
    pub icon: String,
    #[serde(serialize_with = "table_timestamp")]
    pub timestamp: NaiveDateTime,
}

/// Flattened forecast slot for one city, one CSV row.
/// There is one record per 3-hour slot over the 5-day forecast window.
#[derive(Serialize, Debug, Clone)]
pub struct ForecastRecord {
    pub city: String,
    #[serde(serialize_with = "table_timestamp")]
    pub date_time: NaiveDateTime,
    pub temperature: f64,
    pub humidity: u8,
    pub description: String,
    pub wind_speed: f64,
}

/// Serializes timestamps in the table format used by the output files
///
/// # Arguments
///
/// * 'date_time' - the timestamp to serialize
/// * 'serializer' - serde serializer
fn table_timestamp<S: Serializer>(date_time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&date_time.format("%Y-%m-%d %H:%M:%S").to_string())
}

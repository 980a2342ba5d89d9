use chrono::Local;
use log::info;
use serde::Serialize;
use anyhow::Result;
use thiserror::Error;
use crate::charts::render_dashboard;
use crate::config::Files;
use crate::initialization::Mgr;
use crate::manager_weather::WeatherError;
use crate::models::{CurrentWeatherRecord, ForecastRecord};
use crate::records::{current_record, forecast_records, RecordError};

/// Runs one fetch-transform-render pass over the configured cities
///
/// # Arguments
///
/// * 'mgr' - struct with the configured weather manager
/// * 'cities' - cities to fetch data for, in order
/// * 'files' - output files config
pub fn run(mgr: &Mgr, cities: &[String], files: &Files) -> Result<(), WorkerError> {

    let mut current: Vec<CurrentWeatherRecord> = Vec::new();
    let mut forecast: Vec<ForecastRecord> = Vec::new();

    // Fetch and flatten per city. A city whose fetch fails is skipped, the run
    // continues with whatever data the remaining cities yield.
    for city in cities {
        info!("fetching weather data for {}", city);

        if let Some(payload) = mgr.weather.current_weather(city)? {
            if let Some(record) = current_record(payload, Local::now().naive_local())? {
                current.push(record);
            }
        }

        if let Some(payload) = mgr.weather.forecast(city)? {
            forecast.extend(forecast_records(payload)?);
        }
    }

    // Nothing to report on means no output files at all
    if current.is_empty() {
        return Err(WorkerError::NoDataError("no current weather data could be fetched for any city".to_string()));
    }

    save_table(&files.current_csv, &current)?;
    save_table(&files.forecast_csv, &forecast)?;
    info!("weather data saved to {} and {}", files.current_csv, files.forecast_csv);

    render_dashboard(&files.dashboard_png, &current, &forecast)
        .map_err(|e| WorkerError::RenderError(e.to_string()))?;
    info!("dashboard saved to {}", files.dashboard_png);

    for record in current.iter() {
        info!("{}: {:.1}°C, {}% humidity, {:.1} m/s wind",
            record.city, record.temperature, record.humidity, record.wind_speed);
    }

    Ok(())
}

/// Saves records as a table file with a header row, one row per record in input order
///
/// # Arguments
///
/// * 'path' - path to the table file
/// * 'records' - records to write
fn save_table<T: Serialize>(path: &str, records: &[T]) -> Result<(), WorkerError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| WorkerError::SaveTableError(format!("error opening {}: {}", path, e)))?;

    for record in records {
        writer.serialize(record)
            .map_err(|e| WorkerError::SaveTableError(format!("error writing row to {}: {}", path, e)))?;
    }

    writer.flush()
        .map_err(|e| WorkerError::SaveTableError(format!("error flushing {}: {}", path, e)))?;

    Ok(())
}

/// Error depicting errors that occur while running the dashboard pass
///
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("FetchError: {0}")]
    FetchError(#[from] WeatherError),
    #[error("RecordError: {0}")]
    RecordError(#[from] RecordError),
    #[error("NoDataError: {0}")]
    NoDataError(String),
    #[error("SaveTableError: {0}")]
    SaveTableError(String),
    #[error("RenderError: {0}")]
    RenderError(String),
}

#[cfg(test)]
mod tests {
    use std::fs;
    use chrono::{NaiveDate, NaiveDateTime};
    use crate::config::Api;
    use crate::manager_weather::Weather;
    use super::*;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap().and_hms_opt(9, 0, 0).unwrap()
    }

    fn record(city: &str, temperature: f64) -> CurrentWeatherRecord {
        CurrentWeatherRecord {
            city: city.to_string(),
            country: "IN".to_string(),
            temperature,
            feels_like: temperature,
            humidity: 60,
            pressure: 1010,
            wind_speed: 3.4,
            description: "clear sky".to_string(),
            icon: "01d".to_string(),
            timestamp: timestamp(),
        }
    }

    #[test]
    fn table_has_header_and_one_row_per_record_in_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("current.csv");
        let records = vec![record("New Delhi", 41.2), record("Mumbai", 32.9), record("Chennai", 35.5)];

        save_table(path.to_str().unwrap(), &records).unwrap();

        let table = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "city,country,temperature,feels_like,humidity,pressure,wind_speed,description,icon,timestamp");
        assert_eq!(lines[1], "New Delhi,IN,41.2,41.2,60,1010,3.4,clear sky,01d,2025-06-01 09:00:00");
        assert!(lines[2].starts_with("Mumbai,"));
        assert!(lines[3].starts_with("Chennai,"));
    }

    #[test]
    fn run_without_any_current_data_produces_no_output_files() {
        let dir = tempfile::tempdir().unwrap();
        let files = Files {
            current_csv: dir.path().join("current.csv").to_str().unwrap().to_string(),
            forecast_csv: dir.path().join("forecast.csv").to_str().unwrap().to_string(),
            dashboard_png: dir.path().join("dashboard.png").to_str().unwrap().to_string(),
        };

        // Nothing listens on port 1, so every fetch fails and every city is skipped
        let api = Api {
            base_url: "http://127.0.0.1:1".to_string(),
            api_key: "unused".to_string(),
            units: "metric".to_string(),
        };
        let mgr = Mgr { weather: Weather::new(&api).unwrap() };

        let result = run(&mgr, &["New Delhi".to_string(), "Mumbai".to_string()], &files);

        assert!(matches!(result, Err(WorkerError::NoDataError(_))));
        assert!(!dir.path().join("current.csv").exists());
        assert!(!dir.path().join("forecast.csv").exists());
        assert!(!dir.path().join("dashboard.png").exists());
    }

    #[test]
    fn forecast_table_rows_follow_record_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forecast.csv");
        let records = vec![
            ForecastRecord {
                city: "Kolkata".to_string(),
                date_time: timestamp(),
                temperature: 33.0,
                humidity: 78,
                description: "broken clouds".to_string(),
                wind_speed: 2.8,
            },
            ForecastRecord {
                city: "Kolkata".to_string(),
                date_time: timestamp(),
                temperature: 31.5,
                humidity: 82,
                description: "light rain".to_string(),
                wind_speed: 3.1,
            },
        ];

        save_table(path.to_str().unwrap(), &records).unwrap();

        let table = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "city,date_time,temperature,humidity,description,wind_speed");
        assert_eq!(lines[1], "Kolkata,2025-06-01 09:00:00,33.0,78,broken clouds,2.8");
        assert_eq!(lines[2], "Kolkata,2025-06-01 09:00:00,31.5,82,light rain,3.1");
    }
}

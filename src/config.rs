use std::{env, fs};
use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;

const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";
const FALLBACK_API_KEY: &str = "5dfe1d2dd87128f61cdba9b8f1dcf9d8";

#[derive(Deserialize)]
pub struct Api {
    pub base_url: String,
    #[serde(default = "fallback_api_key")]
    pub api_key: String,
    pub units: String,
}

#[derive(Deserialize)]
pub struct Cities {
    pub names: Vec<String>,
}

#[derive(Deserialize)]
pub struct Files {
    pub current_csv: String,
    pub forecast_csv: String,
    pub dashboard_png: String,
}

#[derive(Deserialize)]
pub struct General {
    pub log_path: String,
    pub log_level: LevelFilter,
    pub log_to_stdout: bool,
}

#[derive(Deserialize)]
pub struct Config {
    pub api: Api,
    pub cities: Cities,
    pub files: Files,
    pub general: General,
}

fn fallback_api_key() -> String {
    FALLBACK_API_KEY.to_string()
}

/// Loads the configuration file and returns a struct with all configuration items
///
/// The API key can be left out of the configuration file, in which case a fallback key is used.
/// Either way, the OPENWEATHER_API_KEY environment variable takes precedence when set.
///
/// # Arguments
///
/// * 'config_path' - path to the configuration file
pub fn load_config(config_path: &str) -> Result<Config, LoadConfigurationError> {

    let toml = fs::read_to_string(config_path)?;
    let mut config: Config = toml::from_str(&toml)?;

    if let Ok(api_key) = env::var(API_KEY_ENV) {
        config.api.api_key = api_key;
    }

    Ok(config)
}

/// Error depicting errors that occur while loading configuration
///
#[derive(Debug, Error)]
pub enum LoadConfigurationError {
    #[error("IOError: {0}")]
    IOError(#[from] std::io::Error),
    #[error("ParseError: {0}")]
    ParseError(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use std::fs;
    use super::*;

    const SAMPLE: &str = r#"
[api]
base_url = "http://api.openweathermap.org/data/2.5"
api_key = "test-key"
units = "metric"

[cities]
names = ["New Delhi", "Mumbai", "Bangalore", "Chennai", "Kolkata"]

[files]
current_csv = "current_weather_data.csv"
forecast_csv = "forecast_data.csv"
dashboard_png = "weather_dashboard.png"

[general]
log_path = "weather_dashboard.log"
log_level = "info"
log_to_stdout = true
"#;

    #[test]
    fn loads_sample_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.toml");
        fs::write(&path, SAMPLE).unwrap();

        let config = load_config(path.to_str().unwrap()).unwrap();

        assert_eq!(config.api.base_url, "http://api.openweathermap.org/data/2.5");
        assert_eq!(config.api.units, "metric");
        assert_eq!(config.cities.names.len(), 5);
        assert_eq!(config.cities.names[0], "New Delhi");
        assert_eq!(config.files.dashboard_png, "weather_dashboard.png");
        assert_eq!(config.general.log_level, LevelFilter::Info);
    }

    #[test]
    fn missing_api_key_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.toml");
        let sample = SAMPLE.replace("api_key = \"test-key\"\n", "");
        fs::write(&path, sample).unwrap();

        // The environment variable takes precedence when set, the fallback key otherwise
        let expected = env::var(API_KEY_ENV).unwrap_or_else(|_| FALLBACK_API_KEY.to_string());

        let config = load_config(path.to_str().unwrap()).unwrap();

        assert_eq!(config.api.api_key, expected);
    }
}

use std::env;
use log::info;
use thiserror::Error;
use crate::config::{load_config, Config, LoadConfigurationError};
use crate::logging::{setup_logger, LoggerError};
use crate::manager_weather::{Weather, WeatherError};

const DEFAULT_CONFIG_PATH: &str = "dashboard.toml";

pub struct Mgr {
    pub weather: Weather,
}

/// Initializes and returns configuration and a Mgr struct holding the weather manager
///
pub fn init() -> Result<(Config, Mgr), InitializationError> {
    let args: Vec<String> = env::args().collect();
    let config_path = args.iter()
        .find_map(|p| p.strip_prefix("--config="))
        .unwrap_or(DEFAULT_CONFIG_PATH);


    // Load configuration
    let config = load_config(config_path)?;

    // Setup logging
    setup_logger(&config.general.log_path, config.general.log_level, config.general.log_to_stdout)?;


    // Print version
    info!("starting weather dashboard version: {}", env!("CARGO_PKG_VERSION"));


    // Instantiate structs
    let weather = Weather::new(&config.api)?;

    let mgr = Mgr {
        weather,
    };

    Ok((config, mgr))
}

/// Error depicting errors that occur while initializing the dashboard
///
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("ConfigurationError: {0}")]
    ConfigurationError(#[from] LoadConfigurationError),
    #[error("SetupLoggerError: {0}")]
    SetupLoggerError(#[from] LoggerError),
    #[error("WeatherSetupError: {0}")]
    WeatherSetupError(#[from] WeatherError),
}

pub mod models;

use std::time::Duration;
use log::error;
use reqwest::blocking::Client;
use serde_json::Value;
use anyhow::Result;
use thiserror::Error;
use crate::config::Api;

/// Struct for managing fetches from the weather API
pub struct Weather {
    client: Client,
    base_url: String,
    api_key: String,
    units: String,
}

impl Weather {
    /// Returns a weather struct ready for fetching current conditions and forecasts
    ///
    /// # Arguments
    ///
    /// * 'config' - API configuration to use
    pub fn new(config: &Api) -> Result<Weather, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Weather {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            units: config.units.clone(),
        })
    }

    /// Retrieves the current conditions payload for the given city.
    /// A network failure or non-2xx status is logged and reported as None,
    /// the caller is expected to tolerate missing cities.
    ///
    /// # Arguments
    ///
    /// * 'city' - name of the city to fetch current conditions for
    pub fn current_weather(&self, city: &str) -> Result<Option<Value>, WeatherError> {
        self.get_payload("weather", city)
    }

    /// Retrieves the 5-day/3-hour forecast payload for the given city.
    /// A network failure or non-2xx status is logged and reported as None.
    ///
    /// # Arguments
    ///
    /// * 'city' - name of the city to fetch the forecast for
    pub fn forecast(&self, city: &str) -> Result<Option<Value>, WeatherError> {
        self.get_payload("forecast", city)
    }

    /// Fetches and decodes one payload from the given endpoint.
    /// Transport failures are reported as None; a body that is not valid JSON is an error.
    ///
    /// # Arguments
    ///
    /// * 'endpoint' - the API endpoint, excluding the base url
    /// * 'city' - the city to query for
    fn get_payload(&self, endpoint: &str, city: &str) -> Result<Option<Value>, WeatherError> {
        let json = match self.fetch(endpoint, city) {
            Ok(json) => json,
            Err(e) => {
                error!("error fetching {} data for {}: {}", endpoint, city, e);
                return Ok(None);
            }
        };

        let payload: Value = serde_json::from_str(&json)
            .map_err(|e| WeatherError::ParseError(e.to_string()))?;

        Ok(Some(payload))
    }

    /// Issues one GET against the weather API and returns the response body
    ///
    /// # Arguments
    ///
    /// * 'endpoint' - the API endpoint, excluding the base url
    /// * 'city' - the city to query for
    fn fetch(&self, endpoint: &str, city: &str) -> Result<String, reqwest::Error> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self.client
            .get(url)
            .query(&vec![("q", city), ("appid", &self.api_key), ("units", &self.units)])
            .send()?
            .error_for_status()?;

        response.text()
    }
}

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("ParseError: {0}")]
    ParseError(String),
    #[error("NetworkError: {0}")]
    NetworkError(#[from] reqwest::Error),
}

use super::WeatherRecord;
use crate::coordinate::Coordinate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("weather source is not configured")]
    NotConfigured,
    #[error("invalid weather endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("weather request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("weather service returned status {0}")]
    Status(u16),
    #[error("malformed weather response: {0}")]
    Malformed(String),
}

impl WeatherError {
    /// Whether a later attempt could succeed. `NotConfigured` and a bad
    /// endpoint are permanent until the configuration changes.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            WeatherError::Transport(_) | WeatherError::Status(_) | WeatherError::Malformed(_)
        )
    }
}

/// A provider of live conditions for a single coordinate.
pub trait WeatherSource {
    /// Whether a usable credential is present. An unconfigured source is
    /// never asked to fetch.
    fn is_configured(&self) -> bool;

    /// Wind speed in the returned record must already be in km/h.
    fn fetch(&self, coordinate: Coordinate) -> Result<WeatherRecord, WeatherError>;
}

/// Source that is never configured; every plan using it runs on synthetic weather.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoWeatherSource;

impl WeatherSource for NoWeatherSource {
    fn is_configured(&self) -> bool {
        false
    }

    fn fetch(&self, _coordinate: Coordinate) -> Result<WeatherRecord, WeatherError> {
        Err(WeatherError::NotConfigured)
    }
}

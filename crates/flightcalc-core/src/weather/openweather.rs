use super::source::{WeatherError, WeatherSource};
use super::WeatherRecord;
use crate::config::Settings;
use crate::coordinate::Coordinate;
use log::{debug, info};
use serde::Deserialize;
use std::time::Duration;

/// The service reports wind in m/s with `units=metric`.
const MS_TO_KMH: f64 = 3.6;

/// Probe point used by [`OpenWeatherClient::check_status`] (London).
const STATUS_PROBE: Coordinate = Coordinate::trusted(51.5074, -0.1278);

#[derive(Deserialize)]
struct CurrentWeather {
    wind: Wind,
    main: Main,
    weather: Vec<Condition>,
}

#[derive(Deserialize)]
struct Wind {
    speed: f64,
    #[serde(default)]
    deg: f64,
}

#[derive(Deserialize)]
struct Main {
    temp: f64,
    humidity: f64,
    pressure: f64,
}

#[derive(Deserialize)]
struct Condition {
    description: String,
}

/// Current-conditions client for the OpenWeatherMap API.
pub struct OpenWeatherClient {
    api_key: Option<String>,
    base_url: String,
    client: reqwest::blocking::Client,
}

impl OpenWeatherClient {
    pub fn new(settings: &Settings) -> Result<Self, WeatherError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs.max(1)))
            .build()?;

        Ok(Self {
            api_key: settings.credential().map(str::to_string),
            base_url: settings.base_url.clone(),
            client,
        })
    }

    /// Probes the service with a known coordinate.
    pub fn check_status(&self) -> bool {
        match self.fetch(STATUS_PROBE) {
            Ok(_) => true,
            Err(e) => {
                info!("Weather service status check failed — error={}", e);
                false
            }
        }
    }
}

impl WeatherSource for OpenWeatherClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn fetch(&self, coordinate: Coordinate) -> Result<WeatherRecord, WeatherError> {
        let api_key = self.api_key.as_deref().ok_or(WeatherError::NotConfigured)?;

        let url = reqwest::Url::parse_with_params(
            &self.base_url,
            &[
                ("lat", coordinate.lat().to_string()),
                ("lon", coordinate.lon().to_string()),
                ("appid", api_key.to_string()),
                ("units", "metric".to_string()),
            ],
        )
        .map_err(|e| WeatherError::InvalidEndpoint(format!("{}: {}", self.base_url, e)))?;

        debug!(
            "Fetching current weather — coordinate={} endpoint={}",
            coordinate, self.base_url
        );
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status(status.as_u16()));
        }

        let body = response.text()?;
        let record = parse_current_weather(&body)?;
        debug!(
            "Weather received — coordinate={} wind_kmh={:.1} description={}",
            coordinate, record.wind_speed, record.description
        );
        Ok(record)
    }
}

/// Decodes a current-weather response body, normalizing wind speed to km/h.
pub fn parse_current_weather(body: &str) -> Result<WeatherRecord, WeatherError> {
    let data: CurrentWeather =
        serde_json::from_str(body).map_err(|e| WeatherError::Malformed(e.to_string()))?;

    let description = data
        .weather
        .into_iter()
        .next()
        .map(|c| c.description)
        .ok_or_else(|| WeatherError::Malformed("empty weather condition list".to_string()))?;

    Ok(WeatherRecord::new(
        data.wind.speed * MS_TO_KMH,
        data.wind.deg.rem_euclid(360.0),
        data.main.temp,
        data.main.humidity,
        data.main.pressure,
        description,
    ))
}

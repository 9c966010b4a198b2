pub mod openweather;
pub mod source;

pub use openweather::OpenWeatherClient;
pub use source::{NoWeatherSource, WeatherError, WeatherSource};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::fmt;

/// Condition labels used when weather has to be simulated.
pub const SYNTHETIC_DESCRIPTIONS: [&str; 5] = ["Clear", "Cloudy", "Rainy", "Snowy", "Windy"];

/// Wind above this speed (km/h) at either end of the route triggers a warning.
pub const HIGH_WIND_KMH: f64 = 20.0;

/// Observed or simulated conditions at a single point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherRecord {
    /// km/h
    pub wind_speed: f64,
    /// degrees
    pub wind_direction: f64,
    /// °C
    pub temperature: f64,
    /// percent
    pub humidity: f64,
    /// hPa
    pub pressure: f64,
    pub description: String,
}

impl WeatherRecord {
    pub fn new(
        wind_speed: f64,
        wind_direction: f64,
        temperature: f64,
        humidity: f64,
        pressure: f64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            wind_speed,
            wind_direction,
            temperature,
            humidity,
            pressure,
            description: description.into(),
        }
    }

    /// Uniformly random conditions, used whenever live data can't be had.
    pub fn synthetic<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let description = SYNTHETIC_DESCRIPTIONS
            .choose(rng)
            .copied()
            .unwrap_or("Clear");
        Self {
            wind_speed: rng.gen_range(0.0..=100.0),
            wind_direction: rng.gen_range(0.0..360.0),
            temperature: rng.gen_range(-10.0..=40.0),
            humidity: rng.gen_range(0.0..=100.0),
            pressure: rng.gen_range(950.0..=1050.0),
            description: description.to_string(),
        }
    }

    /// Wind component along `flight_direction` (degrees), in km/h.
    /// Positive when the wind pushes the aircraft along, negative against it.
    pub fn impact_on_speed(&self, flight_direction: f64) -> f64 {
        let angle_diff = (self.wind_direction.to_radians() - flight_direction.to_radians()).abs();
        self.wind_speed * angle_diff.cos()
    }
}

impl fmt::Display for WeatherRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Wind Speed: {:.2} km/h", self.wind_speed)?;
        writeln!(f, "Wind Direction: {:.2}°", self.wind_direction)?;
        writeln!(f, "Temperature: {:.2}°C", self.temperature)?;
        writeln!(f, "Humidity: {:.0}%", self.humidity)?;
        writeln!(f, "Pressure: {:.0} hPa", self.pressure)?;
        write!(f, "Description: {}", self.description)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WeatherAdvisory {
    HighWinds,
    Rain,
    Suitable,
}

impl WeatherAdvisory {
    pub fn assess(departure: &WeatherRecord, arrival: &WeatherRecord) -> Self {
        if departure.wind_speed > HIGH_WIND_KMH || arrival.wind_speed > HIGH_WIND_KMH {
            return WeatherAdvisory::HighWinds;
        }
        let rainy = |w: &WeatherRecord| w.description.to_lowercase().contains("rain");
        if rainy(departure) || rainy(arrival) {
            return WeatherAdvisory::Rain;
        }
        WeatherAdvisory::Suitable
    }

    pub fn message(&self) -> &'static str {
        match self {
            WeatherAdvisory::HighWinds => {
                "High winds detected. Consider adjusting flight path or time of departure."
            }
            WeatherAdvisory::Rain => "Rain conditions detected. Check for updates before departure.",
            WeatherAdvisory::Suitable => "Weather conditions suitable for flight.",
        }
    }
}

pub mod aircraft;
pub mod cities;
pub mod config;
pub mod coordinate;
pub mod geo;
pub mod plan;
pub mod report;
pub mod weather;

pub use coordinate::{Coordinate, CoordinateError};
pub use plan::{PlanError, RoutePlan};
pub use weather::{WeatherRecord, WeatherSource};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Unknown aircraft: {0}")]
    UnknownAircraft(String),
    #[error("Unknown city: {0}")]
    UnknownCity(String),
    #[error("Cruise speed {speed} km/h is outside the {min}-{max} km/h range for {aircraft}")]
    SpeedOutOfRange {
        aircraft: String,
        speed: f64,
        min: f64,
        max: f64,
    },
}

/// Directory holding `settings.json`.
pub fn get_config_root() -> PathBuf {
    directories::ProjectDirs::from("org", "flightcalc", "flightcalc")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".flightcalc"))
}

use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

/// Number of fractional digits every coordinate component must carry.
pub const REQUIRED_DECIMALS: usize = 4;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinateError {
    #[error("Coordinates must be finite numbers. Given value: {0}")]
    NotFinite(f64),
    #[error("Coordinates must have 4 decimal places. Given value: {0}")]
    Precision(String),
    #[error("Latitude {0} is not valid. Must be between -90 and 90.")]
    Latitude(f64),
    #[error("Longitude {0} is not valid. Must be between -180 and 180.")]
    Longitude(f64),
    #[error("Could not parse coordinate component '{0}'")]
    Parse(String),
    #[error("Expected a coordinate as 'lat,lon', got '{0}'")]
    Format(String),
}

/// A validated latitude/longitude pair in decimal degrees.
///
/// Equality and hashing use the exact bit pattern of both components so a
/// coordinate can key the weather and distance caches.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    /// Validates numeric input. The decimal check inspects the shortest
    /// representation of each value, so `40.41` fails even if it was typed as `40.4100`.
    pub fn validate(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        for value in [lat, lon] {
            if !value.is_finite() {
                return Err(CoordinateError::NotFinite(value));
            }
            let repr = value.to_string();
            if fractional_digits(&repr) != REQUIRED_DECIMALS {
                return Err(CoordinateError::Precision(repr));
            }
        }
        check_ranges(lat, lon)?;
        Ok(Self { lat, lon })
    }

    /// Validates literal text input, applying the decimal gate to the text as typed.
    pub fn parse(lat: &str, lon: &str) -> Result<Self, CoordinateError> {
        let lat = parse_component(lat)?;
        let lon = parse_component(lon)?;
        check_ranges(lat, lon)?;
        Ok(Self { lat, lon })
    }

    pub(crate) const fn trusted(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

fn fractional_digits(text: &str) -> usize {
    text.split_once('.').map(|(_, frac)| frac.len()).unwrap_or(0)
}

fn parse_component(text: &str) -> Result<f64, CoordinateError> {
    let text = text.trim();
    if fractional_digits(text) != REQUIRED_DECIMALS {
        return Err(CoordinateError::Precision(text.to_string()));
    }
    let value: f64 = text
        .parse()
        .map_err(|_| CoordinateError::Parse(text.to_string()))?;
    if !value.is_finite() {
        return Err(CoordinateError::NotFinite(value));
    }
    Ok(value)
}

fn check_ranges(lat: f64, lon: f64) -> Result<(), CoordinateError> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(CoordinateError::Latitude(lat));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(CoordinateError::Longitude(lon));
    }
    Ok(())
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.lat.to_bits() == other.lat.to_bits() && self.lon.to_bits() == other.lon.to_bits()
    }
}

impl Eq for Coordinate {}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lat.to_bits().hash(state);
        self.lon.to_bits().hash(state);
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lon)
    }
}

impl FromStr for Coordinate {
    type Err = CoordinateError;

    /// Parses `"lat,lon"`, e.g. `"40.4168,-3.7038"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| CoordinateError::Format(s.to_string()))?;
        Self::parse(lat, lon)
    }
}

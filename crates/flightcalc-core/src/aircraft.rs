use crate::weather::WeatherRecord;
use crate::CatalogError;
use serde::Serialize;
use std::fmt;

/// Below this temperature (°C) at either end, a higher cruise altitude is recommended.
const COLD_TEMPERATURE_C: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FuelUnit {
    Liters,
    Kilograms,
}

impl FuelUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            FuelUnit::Liters => "L",
            FuelUnit::Kilograms => "kg",
        }
    }
}

impl fmt::Display for FuelUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FuelEfficiency {
    Excellent,
    Commercial,
    Good,
    Moderate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AircraftProfile {
    pub name: &'static str,
    pub cruise_speed_kmh: f64,
    pub range_km: f64,
    pub ceiling_ft: f64,
    /// Per hour, in `fuel_unit`.
    pub fuel_consumption: f64,
    pub fuel_unit: FuelUnit,
    /// Airliners fly higher and carry a longer reserve.
    pub commercial: bool,
}

const fn light(
    name: &'static str,
    cruise_speed_kmh: f64,
    range_km: f64,
    ceiling_ft: f64,
    fuel_consumption: f64,
) -> AircraftProfile {
    AircraftProfile {
        name,
        cruise_speed_kmh,
        range_km,
        ceiling_ft,
        fuel_consumption,
        fuel_unit: FuelUnit::Liters,
        commercial: false,
    }
}

pub const AIRCRAFT: [AircraftProfile; 6] = [
    light("Cessna 172", 226.0, 1289.0, 14000.0, 36.0),
    light("Cirrus SR22", 300.0, 1600.0, 17500.0, 60.0),
    light("Piper PA-28", 235.0, 1100.0, 14000.0, 40.0),
    light("Diamond DA40", 280.0, 1400.0, 16400.0, 33.0),
    light("Beechcraft Bonanza", 320.0, 1800.0, 18500.0, 68.0),
    AircraftProfile {
        name: "Airbus A320",
        cruise_speed_kmh: 840.0,
        range_km: 6100.0,
        ceiling_ft: 39000.0,
        fuel_consumption: 2500.0,
        fuel_unit: FuelUnit::Kilograms,
        commercial: true,
    },
];

pub const DEFAULT_AIRCRAFT: &str = "Cessna 172";

/// Case-insensitive lookup in the built-in catalogue.
pub fn find_aircraft(name: &str) -> Result<&'static AircraftProfile, CatalogError> {
    let wanted = name.trim();
    AIRCRAFT
        .iter()
        .find(|a| a.name.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| CatalogError::UnknownAircraft(wanted.to_string()))
}

impl AircraftProfile {
    /// Selectable cruise speeds: 70% to 120% of the book figure, truncated to whole km/h.
    pub fn speed_bounds(&self) -> (f64, f64) {
        (
            (self.cruise_speed_kmh * 0.7).floor(),
            (self.cruise_speed_kmh * 1.2).floor(),
        )
    }

    pub fn check_cruise_speed(&self, speed_kmh: f64) -> Result<f64, CatalogError> {
        let (min, max) = self.speed_bounds();
        if (min..=max).contains(&speed_kmh) {
            Ok(speed_kmh)
        } else {
            Err(CatalogError::SpeedOutOfRange {
                aircraft: self.name.to_string(),
                speed: speed_kmh,
                min,
                max,
            })
        }
    }

    pub fn fuel_required(&self, flight_hours: f64) -> f64 {
        self.fuel_consumption * flight_hours
    }

    pub fn reserve_hours(&self) -> f64 {
        if self.commercial {
            0.75
        } else {
            0.5
        }
    }

    pub fn reserve_fuel(&self) -> f64 {
        self.fuel_consumption * self.reserve_hours()
    }

    pub fn exceeds_range(&self, distance_km: f64) -> bool {
        distance_km > self.range_km
    }

    /// Cruise altitude in feet, raised when either endpoint is cold.
    pub fn recommended_altitude_ft(&self, departure: &WeatherRecord, arrival: &WeatherRecord) -> f64 {
        let cold = departure.temperature < COLD_TEMPERATURE_C || arrival.temperature < COLD_TEMPERATURE_C;
        let (factor, cap) = match (self.commercial, cold) {
            (true, false) => (0.85, 35000.0),
            (true, true) => (0.9, 37000.0),
            (false, false) => (0.7, 8000.0),
            (false, true) => (0.8, 10000.0),
        };
        (self.ceiling_ft * factor).min(cap)
    }

    pub fn efficiency(&self, fuel_required: f64) -> FuelEfficiency {
        if self.name == "Diamond DA40" {
            FuelEfficiency::Excellent
        } else if self.commercial {
            FuelEfficiency::Commercial
        } else if fuel_required < 50.0 {
            FuelEfficiency::Good
        } else {
            FuelEfficiency::Moderate
        }
    }
}

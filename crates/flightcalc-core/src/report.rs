use crate::aircraft::{AircraftProfile, FuelEfficiency, FuelUnit};
use crate::plan::{PlanError, RoutePlan};
use crate::weather::{WeatherAdvisory, WeatherRecord};
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;

/// Flat record of a finished plan, handed to whatever renders or exports it.
#[derive(Debug, Clone, Serialize)]
pub struct FlightSummary {
    pub origin: String,
    pub destination: String,
    pub aircraft: String,
    pub distance_km: f64,
    pub cruise_speed_kmh: f64,
    pub estimated_time_hours: f64,
    pub adjusted_speed_kmh: f64,
    pub fuel_required: f64,
    pub reserve_fuel: f64,
    pub fuel_unit: FuelUnit,
    pub recommended_altitude_ft: f64,
    pub exceeds_range: bool,
    pub efficiency: FuelEfficiency,
    pub advisory: WeatherAdvisory,
    pub departure_weather: WeatherRecord,
    pub arrival_weather: WeatherRecord,
    /// False when the weather above was simulated.
    pub live_weather: bool,
    pub generated_at: DateTime<Local>,
}

impl FlightSummary {
    /// Runs the route and time calculations on `plan` and derives fuel and altitude.
    pub fn compute(
        plan: &mut RoutePlan,
        origin: &str,
        destination: &str,
        aircraft: &AircraftProfile,
        cruise_speed_kmh: f64,
    ) -> Result<Self, PlanError> {
        let distance_km = plan.calculate_route();
        let estimated_time_hours = plan.estimate_time(cruise_speed_kmh)?;

        let departure = plan.departure();
        let arrival = plan.arrival();
        let departure_weather = plan.weather_at(departure).clone();
        let arrival_weather = plan.weather_at(arrival).clone();

        let fuel_required = aircraft.fuel_required(estimated_time_hours);

        Ok(Self {
            origin: origin.to_string(),
            destination: destination.to_string(),
            aircraft: aircraft.name.to_string(),
            distance_km,
            cruise_speed_kmh,
            estimated_time_hours,
            adjusted_speed_kmh: plan.adjusted_speed_kmh(),
            fuel_required,
            reserve_fuel: aircraft.reserve_fuel(),
            fuel_unit: aircraft.fuel_unit,
            recommended_altitude_ft: aircraft
                .recommended_altitude_ft(&departure_weather, &arrival_weather),
            exceeds_range: aircraft.exceeds_range(distance_km),
            efficiency: aircraft.efficiency(fuel_required),
            advisory: WeatherAdvisory::assess(&departure_weather, &arrival_weather),
            departure_weather,
            arrival_weather,
            live_weather: plan.has_live_weather(),
            generated_at: Local::now(),
        })
    }

    pub fn total_fuel_with_reserve(&self) -> f64 {
        self.fuel_required + self.reserve_fuel
    }

    fn weather_source_label(&self) -> &'static str {
        if self.live_weather {
            "Live"
        } else {
            "Simulated"
        }
    }

    /// Writes one header row and one data row.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let unit = self.fuel_unit.symbol();
        let mut headers = vec![
            "Origin".to_string(),
            "Destination".to_string(),
            "Distance (km)".to_string(),
            "Aircraft".to_string(),
            "Cruise Speed (km/h)".to_string(),
            "Flight Time (hours)".to_string(),
            "Average Speed (km/h)".to_string(),
            format!("Fuel Required ({})", unit),
            format!("Reserve Fuel ({})", unit),
            "Recommended Altitude (ft)".to_string(),
            "Weather Source".to_string(),
        ];
        let mut row = vec![
            self.origin.clone(),
            self.destination.clone(),
            format!("{:.1}", self.distance_km),
            self.aircraft.clone(),
            format!("{:.0}", self.cruise_speed_kmh),
            format!("{:.2}", self.estimated_time_hours),
            format!("{:.1}", self.adjusted_speed_kmh),
            format!("{:.1}", self.fuel_required),
            format!("{:.1}", self.reserve_fuel),
            format!("{:.0}", self.recommended_altitude_ft),
            self.weather_source_label().to_string(),
        ];

        for (prefix, weather) in [
            ("Origin", &self.departure_weather),
            ("Destination", &self.arrival_weather),
        ] {
            headers.extend([
                format!("{} Weather", prefix),
                format!("{} Wind Speed (km/h)", prefix),
                format!("{} Wind Direction (deg)", prefix),
                format!("{} Temperature (C)", prefix),
                format!("{} Humidity (%)", prefix),
                format!("{} Pressure (hPa)", prefix),
            ]);
            row.extend([
                weather.description.clone(),
                format!("{:.1}", weather.wind_speed),
                format!("{:.0}", weather.wind_direction),
                format!("{:.1}", weather.temperature),
                format!("{:.0}", weather.humidity),
                format!("{:.0}", weather.pressure),
            ]);
        }

        headers.push("Generation Date".to_string());
        row.push(self.generated_at.format("%Y-%m-%d %H:%M:%S").to_string());

        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&headers)?;
        wtr.write_record(&row)?;
        wtr.flush()?;
        Ok(())
    }

    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create report {}", path.display()))?;
        self.write_csv(file)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        log::info!("Flight plan report written — path={}", path.display());
        Ok(())
    }

    /// Human-readable summary for a terminal.
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FlightSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = self.fuel_unit.symbol();
        let total_minutes = (self.estimated_time_hours * 60.0).round() as u32;

        writeln!(f, "Flight Plan: {} -> {}", self.origin, self.destination)?;
        writeln!(f, "Aircraft: {}", self.aircraft)?;
        writeln!(f, "Distance: {:.1} km", self.distance_km)?;
        writeln!(f, "Cruise Speed: {:.0} km/h", self.cruise_speed_kmh)?;
        writeln!(
            f,
            "Estimated Time: {:.2} h ({}h {:02}m)",
            self.estimated_time_hours,
            total_minutes / 60,
            total_minutes % 60
        )?;
        writeln!(f, "Average Speed: {:.1} km/h", self.adjusted_speed_kmh)?;
        writeln!(
            f,
            "Fuel Required: {:.1} {} (reserve {:.1} {}, total {:.1} {})",
            self.fuel_required,
            unit,
            self.reserve_fuel,
            unit,
            self.total_fuel_with_reserve(),
            unit
        )?;
        writeln!(f, "Fuel Efficiency: {:?}", self.efficiency)?;
        writeln!(
            f,
            "Recommended Cruise Altitude: {:.0} ft",
            self.recommended_altitude_ft
        )?;
        if self.exceeds_range {
            writeln!(
                f,
                "WARNING: distance exceeds {} range. Consider refueling stops.",
                self.aircraft
            )?;
        }
        writeln!(f, "\nWeather ({}):", self.weather_source_label())?;
        writeln!(f, "\nDeparture ({}):\n{}", self.origin, self.departure_weather)?;
        writeln!(f, "\nArrival ({}):\n{}", self.destination, self.arrival_weather)?;
        write!(f, "\n{}", self.advisory.message())
    }
}

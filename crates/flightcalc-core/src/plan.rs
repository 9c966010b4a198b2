//! Route planning: distance over the route, wind-adjusted flight time, and
//! per-point weather with a synthetic fallback.

use crate::coordinate::{Coordinate, CoordinateError};
use crate::geo::{initial_bearing, DistanceCache};
use crate::weather::{WeatherRecord, WeatherSource};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub const TAXI_HOURS: f64 = 10.0 / 60.0;
pub const CLIMB_HOURS: f64 = 15.0 / 60.0;
pub const DESCENT_HOURS: f64 = 15.0 / 60.0;

/// Floor for the wind-adjusted cruise speed, in km/h.
pub const MIN_ADJUSTED_SPEED_KMH: f64 = 100.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(#[from] CoordinateError),
    #[error("Speed must be greater than 0. Given speed: {0}")]
    InvalidParameter(f64),
}

pub struct RoutePlan {
    departure: Coordinate,
    arrival: Coordinate,
    waypoints: Vec<Coordinate>,
    weather_conditions: HashMap<Coordinate, WeatherRecord>,
    total_distance_km: f64,
    adjusted_speed_kmh: f64,
    weather_source: Box<dyn WeatherSource>,
    distances: Arc<DistanceCache>,
    rng: StdRng,
}

impl RoutePlan {
    pub fn new(
        departure: Coordinate,
        arrival: Coordinate,
        waypoints: Vec<Coordinate>,
        weather_source: Box<dyn WeatherSource>,
    ) -> Self {
        Self {
            departure,
            arrival,
            waypoints,
            weather_conditions: HashMap::new(),
            total_distance_km: 0.0,
            adjusted_speed_kmh: 0.0,
            weather_source,
            distances: Arc::new(DistanceCache::new()),
            rng: StdRng::from_entropy(),
        }
    }

    /// Builds a plan from raw degrees, validating every point first.
    pub fn from_degrees(
        departure: (f64, f64),
        arrival: (f64, f64),
        waypoints: &[(f64, f64)],
        weather_source: Box<dyn WeatherSource>,
    ) -> Result<Self, PlanError> {
        let departure = Coordinate::validate(departure.0, departure.1)?;
        let arrival = Coordinate::validate(arrival.0, arrival.1)?;
        let waypoints = waypoints
            .iter()
            .map(|&(lat, lon)| Coordinate::validate(lat, lon))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(departure, arrival, waypoints, weather_source))
    }

    /// Shares a distance memo with other plans.
    pub fn with_distance_cache(mut self, distances: Arc<DistanceCache>) -> Self {
        self.distances = distances;
        self
    }

    /// Makes synthetic weather reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn departure(&self) -> Coordinate {
        self.departure
    }

    pub fn arrival(&self) -> Coordinate {
        self.arrival
    }

    pub fn waypoints(&self) -> &[Coordinate] {
        &self.waypoints
    }

    /// Kilometers; zero until [`RoutePlan::calculate_route`] runs.
    pub fn total_distance_km(&self) -> f64 {
        self.total_distance_km
    }

    /// Realized average speed from the last [`RoutePlan::estimate_time`], in km/h.
    pub fn adjusted_speed_kmh(&self) -> f64 {
        self.adjusted_speed_kmh
    }

    /// Whether weather can come from the live source. Callers use this to
    /// label results as live or simulated.
    pub fn has_live_weather(&self) -> bool {
        self.weather_source.is_configured()
    }

    pub fn cached_weather(&self, coordinate: &Coordinate) -> Option<&WeatherRecord> {
        self.weather_conditions.get(coordinate)
    }

    /// Departure, waypoints, then arrival.
    pub fn route_points(&self) -> Vec<Coordinate> {
        let mut points = Vec::with_capacity(self.waypoints.len() + 2);
        points.push(self.departure);
        points.extend_from_slice(&self.waypoints);
        points.push(self.arrival);
        points
    }

    /// Weather for `coordinate`, fetched once per plan and cached.
    ///
    /// Never fails: when the source is unconfigured or the fetch errors,
    /// synthetic conditions are generated and cached in its place.
    pub fn weather_at(&mut self, coordinate: Coordinate) -> &WeatherRecord {
        match self.weather_conditions.entry(coordinate) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let record =
                    resolve_weather(self.weather_source.as_ref(), &mut self.rng, coordinate);
                entry.insert(record)
            }
        }
    }

    /// Sums the great-circle legs of the route and prefetches endpoint weather.
    pub fn calculate_route(&mut self) -> f64 {
        let points = self.route_points();
        let total: f64 = points
            .windows(2)
            .map(|leg| self.distances.distance(leg[0], leg[1]))
            .sum();
        self.total_distance_km = total;

        let departure = self.departure;
        let arrival = self.arrival;
        let departure_desc = self.weather_at(departure).description.clone();
        let arrival_desc = self.weather_at(arrival).description.clone();

        info!(
            "Route calculated — legs={} distance_km={:.1} departure={} ({}) arrival={} ({})",
            points.len() - 1,
            total,
            departure,
            departure_desc,
            arrival,
            arrival_desc
        );
        total
    }

    /// Initial bearing from departure to arrival. Waypoints are not considered.
    pub fn flight_direction(&self) -> f64 {
        initial_bearing(self.departure, self.arrival)
    }

    /// Total block time in hours for `cruise_speed_kmh`, including taxi, climb
    /// and descent. Uses the distance from the last [`RoutePlan::calculate_route`].
    pub fn estimate_time(&mut self, cruise_speed_kmh: f64) -> Result<f64, PlanError> {
        if !cruise_speed_kmh.is_finite() || cruise_speed_kmh <= 0.0 {
            return Err(PlanError::InvalidParameter(cruise_speed_kmh));
        }

        let flight_direction = self.flight_direction();
        let departure = self.departure;
        let wind_impact = self.weather_at(departure).impact_on_speed(flight_direction);
        let adjusted_cruise = (cruise_speed_kmh + wind_impact).max(MIN_ADJUSTED_SPEED_KMH);

        // Climb and descent are flown at roughly half cruise speed.
        let climb_descent_distance = (CLIMB_HOURS + DESCENT_HOURS) * (adjusted_cruise / 2.0);
        let cruise_distance = (self.total_distance_km - climb_descent_distance).max(0.0);
        let cruise_time = cruise_distance / adjusted_cruise;

        let total_time = TAXI_HOURS + CLIMB_HOURS + cruise_time + DESCENT_HOURS;
        self.adjusted_speed_kmh = self.total_distance_km / total_time;

        debug!(
            "Time estimated — bearing={:.1} wind_impact_kmh={:.1} adjusted_cruise_kmh={:.1} total_hours={:.3}",
            flight_direction, wind_impact, adjusted_cruise, total_time
        );
        Ok(total_time)
    }
}

fn resolve_weather(
    source: &dyn WeatherSource,
    rng: &mut StdRng,
    coordinate: Coordinate,
) -> WeatherRecord {
    if !source.is_configured() {
        debug!(
            "Weather source not configured; simulating — coordinate={}",
            coordinate
        );
        return WeatherRecord::synthetic(rng);
    }

    match source.fetch(coordinate) {
        Ok(record) => record,
        Err(e) => {
            warn!(
                "Error obtaining weather data; simulating — coordinate={} transient={} error={}",
                coordinate,
                e.is_transient(),
                e
            );
            WeatherRecord::synthetic(rng)
        }
    }
}

impl fmt::Display for RoutePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FlightPlan(departure={}, arrival={}, waypoints=[",
            self.departure, self.arrival
        )?;
        for (i, wp) in self.waypoints.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", wp)?;
        }
        write!(f, "])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::WeatherError;

    struct FixedWeather(WeatherRecord);

    impl WeatherSource for FixedWeather {
        fn is_configured(&self) -> bool {
            true
        }

        fn fetch(&self, _coordinate: Coordinate) -> Result<WeatherRecord, WeatherError> {
            Ok(self.0.clone())
        }
    }

    fn plan_with_wind(wind_speed: f64, wind_direction: f64) -> RoutePlan {
        let weather = WeatherRecord::new(wind_speed, wind_direction, 20.0, 50.0, 1013.0, "Clear");
        RoutePlan::from_degrees(
            (40.4168, -3.7038),
            (41.6528, -4.7244),
            &[],
            Box::new(FixedWeather(weather)),
        )
        .unwrap()
    }

    #[test]
    fn test_short_flight_under_an_hour() {
        let mut plan = plan_with_wind(0.0, 0.0);
        plan.total_distance_km = 100.0;

        let hours = plan.estimate_time(800.0).unwrap();
        assert!(hours > 0.0);
        assert!(hours < 1.0);
        // Climb and descent alone cover more than 100 km, so only the fixed phases remain.
        assert!((hours - 40.0 / 60.0).abs() < 1e-9);
        assert!((plan.adjusted_speed_kmh() - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_cruise_segment_included() {
        let mut plan = plan_with_wind(0.0, 0.0);
        plan.total_distance_km = 1000.0;

        let hours = plan.estimate_time(400.0).unwrap();
        // 100 km in climb/descent, 900 km at 400 km/h.
        let expected = TAXI_HOURS + CLIMB_HOURS + 900.0 / 400.0 + DESCENT_HOURS;
        assert!((hours - expected).abs() < 1e-9);
        assert!((plan.adjusted_speed_kmh() - 1000.0 / expected).abs() < 1e-9);
    }

    #[test]
    fn test_headwind_floor() {
        let bearing = plan_with_wind(0.0, 0.0).flight_direction();
        // Point the wind straight at the nose.
        let mut plan = plan_with_wind(1000.0, (bearing + 180.0) % 360.0);
        plan.total_distance_km = 500.0;

        let hours = plan.estimate_time(200.0).unwrap();
        let climb_descent = (CLIMB_HOURS + DESCENT_HOURS) * MIN_ADJUSTED_SPEED_KMH / 2.0;
        let expected = TAXI_HOURS
            + CLIMB_HOURS
            + (500.0 - climb_descent) / MIN_ADJUSTED_SPEED_KMH
            + DESCENT_HOURS;
        assert!((hours - expected).abs() < 1e-6);
    }

    #[test]
    fn test_tailwind_shortens_flight() {
        let bearing = plan_with_wind(0.0, 0.0).flight_direction();

        let mut calm = plan_with_wind(0.0, 0.0);
        calm.total_distance_km = 800.0;
        let mut tail = plan_with_wind(80.0, bearing);
        tail.total_distance_km = 800.0;

        assert!(tail.estimate_time(300.0).unwrap() < calm.estimate_time(300.0).unwrap());
    }

    #[test]
    fn test_rejects_non_positive_speed() {
        let mut plan = plan_with_wind(0.0, 0.0);
        assert_eq!(plan.estimate_time(0.0), Err(PlanError::InvalidParameter(0.0)));
        assert_eq!(
            plan.estimate_time(-120.0),
            Err(PlanError::InvalidParameter(-120.0))
        );
        assert!(plan.estimate_time(f64::NAN).is_err());
    }

    #[test]
    fn test_display() {
        let plan = RoutePlan::from_degrees(
            (40.4168, -3.7038),
            (41.6528, -4.7244),
            &[(40.9429, -4.1088)],
            Box::new(crate::weather::NoWeatherSource),
        )
        .unwrap();
        assert_eq!(
            plan.to_string(),
            "FlightPlan(departure=(40.4168, -3.7038), arrival=(41.6528, -4.7244), waypoints=[(40.9429, -4.1088)])"
        );
    }
}

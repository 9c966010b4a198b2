use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use flightcalc_core::cities::find_city;
use flightcalc_core::geo::{haversine_km, DistanceCache};
use flightcalc_core::weather::{NoWeatherSource, WeatherError, SYNTHETIC_DESCRIPTIONS};
use flightcalc_core::{Coordinate, CoordinateError, PlanError, RoutePlan, WeatherRecord, WeatherSource};

// --- Fake Sources ---

/// Counts fetches and answers with a fixed record, or fails when `fail` is set.
struct CountingSource {
    calls: Rc<Cell<usize>>,
    configured: bool,
    fail: bool,
}

impl CountingSource {
    fn new(configured: bool, fail: bool) -> (Self, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        (
            Self {
                calls: Rc::clone(&calls),
                configured,
                fail,
            },
            calls,
        )
    }
}

impl WeatherSource for CountingSource {
    fn is_configured(&self) -> bool {
        self.configured
    }

    fn fetch(&self, _coordinate: Coordinate) -> Result<WeatherRecord, WeatherError> {
        self.calls.set(self.calls.get() + 1);
        if self.fail {
            Err(WeatherError::Status(503))
        } else {
            Ok(WeatherRecord::new(10.0, 180.0, 20.0, 50.0, 1013.0, "Cloudy"))
        }
    }
}

fn init_logging() {
    let _ = simplelog::TestLogger::init(log::LevelFilter::Debug, simplelog::Config::default());
}

fn madrid() -> Coordinate {
    Coordinate::validate(40.4168, -3.7038).unwrap()
}

fn valladolid() -> Coordinate {
    Coordinate::validate(41.6528, -4.7244).unwrap()
}

fn segovia() -> Coordinate {
    Coordinate::validate(40.9429, -4.1088).unwrap()
}

fn assert_synthetic(w: &WeatherRecord) {
    assert!((0.0..=100.0).contains(&w.wind_speed), "wind {}", w.wind_speed);
    assert!((0.0..360.0).contains(&w.wind_direction));
    assert!((-10.0..=40.0).contains(&w.temperature));
    assert!((0.0..=100.0).contains(&w.humidity));
    assert!((950.0..=1050.0).contains(&w.pressure));
    assert!(SYNTHETIC_DESCRIPTIONS.contains(&w.description.as_str()));
}

// --- Construction ---

#[test]
fn test_from_degrees_keeps_points() {
    let plan = RoutePlan::from_degrees(
        (40.4168, -3.7038),
        (41.6528, -4.7244),
        &[(40.9429, -4.1088)],
        Box::new(NoWeatherSource),
    )
    .unwrap();

    assert_eq!(plan.departure(), madrid());
    assert_eq!(plan.arrival(), valladolid());
    assert_eq!(plan.waypoints(), &[segovia()]);
    assert_eq!(plan.total_distance_km(), 0.0);
    assert_eq!(plan.adjusted_speed_kmh(), 0.0);
}

#[test]
fn test_from_degrees_rejects_invalid_points() {
    let err = RoutePlan::from_degrees(
        (91.0000, 181.0000),
        (41.6528, -4.7244),
        &[],
        Box::new(NoWeatherSource),
    )
    .err()
    .unwrap();
    assert!(matches!(err, PlanError::InvalidCoordinate(_)));

    let err = RoutePlan::from_degrees(
        (40.4168, -3.7038),
        (41.6528, -4.7244),
        &[(40.94, -4.1088)],
        Box::new(NoWeatherSource),
    )
    .err()
    .unwrap();
    assert_eq!(
        err,
        PlanError::InvalidCoordinate(CoordinateError::Precision("40.94".to_string()))
    );
}

// --- Distance ---

#[test]
fn test_madrid_to_valladolid_distance() {
    let mut plan = RoutePlan::new(madrid(), valladolid(), Vec::new(), Box::new(NoWeatherSource));
    let km = plan.calculate_route();

    // Direct haversine for this pair is about 161.9 km.
    assert!(km > 155.0 && km < 170.0, "distance was {}", km);
    assert_eq!(km, haversine_km(madrid(), valladolid()));
    assert_eq!(plan.total_distance_km(), km);
}

#[test]
fn test_waypoint_adds_legs() {
    let mut direct = RoutePlan::new(madrid(), valladolid(), Vec::new(), Box::new(NoWeatherSource));
    let mut via = RoutePlan::new(
        madrid(),
        valladolid(),
        vec![segovia()],
        Box::new(NoWeatherSource),
    );

    let direct_km = direct.calculate_route();
    let via_km = via.calculate_route();
    let expected = haversine_km(madrid(), segovia()) + haversine_km(segovia(), valladolid());

    assert!((via_km - expected).abs() < 1e-9);
    assert!(via_km >= direct_km);
    // Segovia sits close to the direct line.
    assert!(via_km - direct_km < 1.0);
}

#[test]
fn test_bearing_ignores_waypoints() {
    let direct = RoutePlan::new(madrid(), valladolid(), Vec::new(), Box::new(NoWeatherSource));
    let far_waypoint = Coordinate::validate(41.3874, 2.1686).unwrap();
    let detour = RoutePlan::new(
        madrid(),
        valladolid(),
        vec![far_waypoint],
        Box::new(NoWeatherSource),
    );

    let bearing = direct.flight_direction();
    assert_eq!(bearing, detour.flight_direction());
    // Valladolid lies north-west of Madrid.
    assert!(bearing > 270.0 && bearing < 360.0);
}

#[test]
fn test_shared_distance_cache() {
    let cache = Arc::new(DistanceCache::new());

    let mut first = RoutePlan::new(madrid(), valladolid(), vec![segovia()], Box::new(NoWeatherSource))
        .with_distance_cache(Arc::clone(&cache));
    let mut second = RoutePlan::new(madrid(), valladolid(), vec![segovia()], Box::new(NoWeatherSource))
        .with_distance_cache(Arc::clone(&cache));

    let a = first.calculate_route();
    assert_eq!(cache.len(), 2);
    let b = second.calculate_route();
    assert_eq!(cache.len(), 2);
    assert_eq!(a, b);
}

// --- Weather ---

#[test]
fn test_unconfigured_source_is_never_asked() {
    init_logging();
    let (source, calls) = CountingSource::new(false, false);
    let mut plan = RoutePlan::new(madrid(), valladolid(), Vec::new(), Box::new(source));

    assert!(!plan.has_live_weather());
    plan.calculate_route();
    let w = plan.weather_at(madrid()).clone();

    assert_eq!(calls.get(), 0);
    assert_synthetic(&w);
}

#[test]
fn test_weather_is_cached_per_coordinate() {
    init_logging();
    let (source, calls) = CountingSource::new(true, false);
    let mut plan = RoutePlan::new(madrid(), valladolid(), vec![segovia()], Box::new(source));

    plan.calculate_route();
    // Departure and arrival were prefetched.
    assert_eq!(calls.get(), 2);
    assert!(plan.cached_weather(&madrid()).is_some());
    assert!(plan.cached_weather(&segovia()).is_none());

    let first = plan.weather_at(madrid()).clone();
    let second = plan.weather_at(madrid()).clone();
    assert_eq!(first, second);
    assert_eq!(first.description, "Cloudy");
    assert_eq!(calls.get(), 2);

    plan.weather_at(segovia());
    assert_eq!(calls.get(), 3);

    plan.estimate_time(226.0).unwrap();
    assert_eq!(calls.get(), 3);
}

#[test]
fn test_synthetic_weather_is_not_rerandomized() {
    let mut plan = RoutePlan::new(madrid(), valladolid(), Vec::new(), Box::new(NoWeatherSource));

    let first = plan.weather_at(valladolid()).clone();
    for _ in 0..10 {
        assert_eq!(plan.weather_at(valladolid()), &first);
    }
}

#[test]
fn test_failing_source_falls_back_to_synthetic() {
    init_logging();
    let (source, calls) = CountingSource::new(true, true);
    let mut plan = RoutePlan::new(madrid(), valladolid(), Vec::new(), Box::new(source));

    let w = plan.weather_at(madrid()).clone();
    assert_synthetic(&w);
    assert_eq!(calls.get(), 1);

    // The fallback record is cached like a real one.
    assert_eq!(plan.weather_at(madrid()), &w);
    assert_eq!(calls.get(), 1);
    assert!(plan.has_live_weather());
}

#[test]
fn test_seeded_plans_simulate_identically() {
    let mut a = RoutePlan::new(madrid(), valladolid(), Vec::new(), Box::new(NoWeatherSource)).with_seed(5);
    let mut b = RoutePlan::new(madrid(), valladolid(), Vec::new(), Box::new(NoWeatherSource)).with_seed(5);

    a.calculate_route();
    b.calculate_route();
    assert_eq!(a.weather_at(madrid()), b.weather_at(madrid()));
    assert_eq!(a.estimate_time(226.0).unwrap(), b.estimate_time(226.0).unwrap());
}

// --- Time ---

#[test]
fn test_estimate_time_rejects_bad_speed() {
    let mut plan = RoutePlan::new(madrid(), valladolid(), Vec::new(), Box::new(NoWeatherSource));
    plan.calculate_route();

    assert_eq!(plan.estimate_time(0.0), Err(PlanError::InvalidParameter(0.0)));
    assert_eq!(plan.estimate_time(-5.0), Err(PlanError::InvalidParameter(-5.0)));
}

#[test]
fn test_estimate_time_for_city_pair() {
    let (source, _) = CountingSource::new(true, false);
    let dep = find_city("Madrid").unwrap().coordinate;
    let arr = find_city("Barcelona").unwrap().coordinate;
    let mut plan = RoutePlan::new(dep, arr, Vec::new(), Box::new(source));

    let km = plan.calculate_route();
    let hours = plan.estimate_time(226.0).unwrap();

    // Fixed phases alone are 40 minutes.
    assert!(hours > 40.0 / 60.0);
    assert!(hours < km / 100.0 + 1.0);
    assert!((plan.adjusted_speed_kmh() - km / hours).abs() < 1e-9);
}

#[test]
fn test_estimate_before_route_is_phase_time_only() {
    let mut plan = RoutePlan::new(madrid(), valladolid(), Vec::new(), Box::new(NoWeatherSource));

    let hours = plan.estimate_time(800.0).unwrap();
    assert!((hours - 40.0 / 60.0).abs() < 1e-9);
    assert_eq!(plan.adjusted_speed_kmh(), 0.0);
}

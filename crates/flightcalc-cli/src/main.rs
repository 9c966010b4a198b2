// SPDX-License-Identifier: MIT
// Copyright (c) 2020 Austin Goudge
// Copyright (c) 2026 StarTuz

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flightcalc_core::aircraft::{find_aircraft, AIRCRAFT, DEFAULT_AIRCRAFT};
use flightcalc_core::cities::{city_name, find_city, CITIES};
use flightcalc_core::config::Settings;
use flightcalc_core::report::FlightSummary;
use flightcalc_core::weather::OpenWeatherClient;
use flightcalc_core::{Coordinate, RoutePlan, WeatherSource};
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// OpenWeatherMap API key; overrides settings.json
    #[arg(long, env = "FLIGHTCALC_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// HTTP timeout for weather requests, in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a flight between two places (city name or "lat,lon")
    Plan {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// Intermediate waypoint, may be repeated
        #[arg(long = "via")]
        via: Vec<String>,
        #[arg(long, default_value = DEFAULT_AIRCRAFT)]
        aircraft: String,
        /// Cruise speed in km/h; defaults to the aircraft's book figure
        #[arg(long)]
        speed: Option<f64>,
        /// Export the plan as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Print the plan as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show current weather at a place
    Weather { place: String },
    /// List built-in cities
    Cities,
    /// List built-in aircraft
    Aircraft,
    /// Check that the weather service answers with the configured key
    CheckApi,
    /// Store --api-key, --timeout and the endpoint in settings.json
    Configure {
        #[arg(long)]
        base_url: Option<String>,
    },
}

/// A place resolved from the command line, with the label used in output.
struct Place {
    label: String,
    coordinate: Coordinate,
}

fn resolve_place(text: &str) -> Result<Place> {
    if text.contains(',') {
        let coordinate: Coordinate = text.parse()?;
        let label = city_name(&coordinate)
            .map(str::to_string)
            .unwrap_or_else(|| coordinate.to_string());
        return Ok(Place { label, coordinate });
    }

    let city = find_city(text)?;
    Ok(Place {
        label: city.name.to_string(),
        coordinate: city.coordinate,
    })
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = Settings::load()?;
    if let Some(key) = &cli.api_key {
        settings.api_key = Some(key.clone());
    }
    if let Some(timeout) = cli.timeout {
        settings.timeout_secs = timeout;
    }
    Ok(settings)
}

fn weather_client(settings: &Settings) -> Result<OpenWeatherClient> {
    let client = OpenWeatherClient::new(settings).context("Failed to build weather client")?;
    if !client.is_configured() {
        eprintln!("No weather API key configured; using simulated weather.");
    }
    Ok(client)
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

fn init_logging(verbose: u8) -> Result<()> {
    TermLogger::init(
        log_level(verbose),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logging")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match &cli.command {
        Commands::Plan {
            from,
            to,
            via,
            aircraft,
            speed,
            csv,
            json,
        } => {
            let origin = resolve_place(from)?;
            let destination = resolve_place(to)?;
            let waypoints = via
                .iter()
                .map(|p| resolve_place(p).map(|place| place.coordinate))
                .collect::<Result<Vec<_>>>()?;

            let profile = find_aircraft(aircraft)?;
            let speed = profile.check_cruise_speed(speed.unwrap_or(profile.cruise_speed_kmh))?;

            let settings = load_settings(&cli)?;
            let client = weather_client(&settings)?;
            let mut plan = RoutePlan::new(
                origin.coordinate,
                destination.coordinate,
                waypoints,
                Box::new(client),
            );
            log::info!("Planning — plan={}", plan);

            let summary = FlightSummary::compute(
                &mut plan,
                &origin.label,
                &destination.label,
                profile,
                speed,
            )?;

            if *json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", summary.render_text());
            }

            if let Some(path) = csv {
                summary.save_csv(path)?;
                println!("Report saved to {}", path.display());
            }
        }
        Commands::Weather { place } => {
            let place = resolve_place(place)?;
            let settings = load_settings(&cli)?;
            let client = weather_client(&settings)?;
            let mut plan = RoutePlan::new(
                place.coordinate,
                place.coordinate,
                Vec::new(),
                Box::new(client),
            );
            let weather = plan.weather_at(place.coordinate);
            println!("Weather at {} {}:\n{}", place.label, place.coordinate, weather);
        }
        Commands::Cities => {
            for city in &CITIES {
                println!("{:<12} {}", city.name, city.coordinate);
            }
        }
        Commands::Aircraft => {
            for profile in &AIRCRAFT {
                let (min, max) = profile.speed_bounds();
                println!(
                    "{:<20} cruise {:>4.0} km/h ({:.0}-{:.0}), range {:>5.0} km, ceiling {:>5.0} ft, {:.0} {}/h",
                    profile.name,
                    profile.cruise_speed_kmh,
                    min,
                    max,
                    profile.range_km,
                    profile.ceiling_ft,
                    profile.fuel_consumption,
                    profile.fuel_unit
                );
            }
        }
        Commands::CheckApi => {
            let settings = load_settings(&cli)?;
            let client = OpenWeatherClient::new(&settings)?;
            if !client.is_configured() {
                println!("Weather API: not configured (simulated weather in use)");
            } else if client.check_status() {
                println!("Weather API: OK");
            } else {
                println!("Weather API: unavailable (simulated weather will be used)");
            }
        }
        Commands::Configure { base_url } => {
            let path = Settings::default_path();
            let mut settings = Settings::load_from(&path)?;
            if let Some(key) = &cli.api_key {
                settings.api_key = Some(key.clone());
            }
            if let Some(url) = base_url {
                settings.base_url = url.clone();
            }
            if let Some(timeout) = cli.timeout {
                settings.timeout_secs = timeout;
            }
            settings.save_to(&path)?;
            println!("Settings saved to {}", path.display());
        }
    }

    Ok(())
}

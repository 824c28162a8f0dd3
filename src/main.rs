use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::{Local, Timelike};
use clap::Parser;
use tracing::{info, warn};

use weatherdash::api::{GEOCODE_LIMIT, NEARBY_COUNT};
use weatherdash::radar::{Extrapolation, Metric, color_for_with};
use weatherdash::recommendations::{activities, recommendations};
use weatherdash::{
    DashboardConfig, DashboardError, DashboardStore, Density, PersistentCache, RadarSweeper,
    SweepStatus, TemperatureUnit, WeatherApiClient, WeatherSnapshot, evaluate, logging,
};

/// Weather dashboard for the terminal
#[derive(Parser)]
#[command(name = "weatherdash", version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to <config dir>/weatherdash/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Toggle the city in the favorites list
    #[arg(long)]
    favorite: bool,

    /// Show temperatures in the other unit and remember the choice
    #[arg(long)]
    toggle_unit: bool,

    /// Skip the radar sweep
    #[arg(long)]
    no_radar: bool,

    /// Radar grid density: low, medium or high
    #[arg(short, long)]
    density: Option<Density>,

    /// City to show; defaults to the last searched city
    city: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<DashboardError>() {
                Some(dashboard_error) => eprintln!("Error: {}", dashboard_error.user_message()),
                None => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = DashboardConfig::load_from_path(cli.config)?;
    logging::init(&config.logging)?;
    info!("weatherdash v{} starting", weatherdash::VERSION);

    let cache = PersistentCache::open(&config.cache.location)
        .with_context(|| format!("Failed to open cache database at {}", config.cache.location))?;
    let store = DashboardStore::new(cache.clone());

    let mut unit = store
        .temperature_unit(config.preferences.temperature_unit)
        .await?;
    if cli.toggle_unit {
        unit = unit.toggled();
        store.set_temperature_unit(unit).await?;
    }

    let city = match cli.city {
        Some(city) => city,
        None => match store.last_city().await? {
            Some(city) => city,
            None => bail!("No city given and no previous search to fall back to"),
        },
    };

    let client = WeatherApiClient::new(&config.weather)?.with_cache(cache, config.cache.ttl());

    let snapshot = client.current_by_city(&city).await?;
    store.set_last_city(&snapshot.name).await?;
    if let Some(location) = client
        .geocode(&snapshot.name, GEOCODE_LIMIT)
        .await
        .unwrap_or_default()
        .into_iter()
        .next()
    {
        store.record_search(location).await?;
    }

    if cli.favorite {
        let added = store.toggle_favorite(&snapshot.name).await?;
        println!(
            "{} {} favorites",
            snapshot.name,
            if added { "added to" } else { "removed from" }
        );
    }

    print_current(&snapshot, unit, store.is_favorite(&snapshot.name).await?);
    print_advice(&snapshot);
    print_extras(&client, &snapshot, unit).await;

    let favorites = store.favorites().await?;
    if !favorites.is_empty() {
        println!("\nFavorites: {}", favorites.join(", "));
    }

    if !cli.no_radar {
        let density = cli.density.unwrap_or(config.radar.default_density);
        run_radar(
            client,
            &snapshot,
            density,
            config.radar.fetch_delay(),
            config.radar.extrapolation,
        )
        .await;
    }

    Ok(())
}

fn print_current(snapshot: &WeatherSnapshot, unit: TemperatureUnit, favorite: bool) {
    let star = if favorite { " ★" } else { "" };
    println!("{}{}", snapshot.name, star);
    println!(
        "  {} (feels like {}), {}",
        snapshot.format_temperature(unit),
        unit.format(snapshot.feels_like),
        snapshot.description
    );
    println!(
        "  Wind {}  Humidity {}%  Pressure {}  Clouds {}%",
        snapshot.format_wind(),
        snapshot.humidity,
        snapshot.format_pressure(),
        snapshot.cloud_cover
    );
}

fn print_advice(snapshot: &WeatherSnapshot) {
    let conditions = evaluate(snapshot);
    if !conditions.is_empty() {
        println!("\nAlerts");
        for condition in &conditions {
            println!("  [{}] {}: {}", condition.kind.as_str(), condition.title, condition.message);
        }
    }

    let advice = recommendations(snapshot, Local::now().hour());
    if !advice.is_empty() {
        println!("\nRecommendations");
        for line in advice {
            println!("  - {line}");
        }
    }

    println!("\nActivities");
    for group in activities(snapshot) {
        println!("  {}: {}", group.name, group.suggestions.join(", "));
    }
}

/// Air quality, outlook and nearby cities. Failures here are not fatal.
async fn print_extras(client: &WeatherApiClient, snapshot: &WeatherSnapshot, unit: TemperatureUnit) {
    let coordinates = snapshot.coordinates;

    match client.air_quality(coordinates).await {
        Ok(air) => println!("\nAir quality: {} (AQI {})", air.label(), air.aqi),
        Err(e) => warn!("Air quality unavailable: {e}"),
    }

    match client.forecast(coordinates).await {
        Ok(forecast) => {
            println!("\n5-day outlook");
            for entry in forecast.daily() {
                println!(
                    "  {}  {:>5}  {}",
                    entry.timestamp.with_timezone(&Local).format("%a %d %b"),
                    unit.format(entry.temperature),
                    entry.condition
                );
            }
        }
        Err(e) => warn!("Forecast unavailable: {e}"),
    }

    match client.nearby(coordinates, NEARBY_COUNT).await {
        Ok(cities) if !cities.is_empty() => {
            println!("\nNearby");
            for city in cities {
                println!(
                    "  {:<20} {:>5}  {}",
                    city.name,
                    unit.format(city.temperature),
                    city.condition
                );
            }
        }
        Ok(_) => {}
        Err(e) => warn!("Nearby cities unavailable: {e}"),
    }
}

async fn run_radar(
    client: WeatherApiClient,
    snapshot: &WeatherSnapshot,
    density: Density,
    delay: Duration,
    extrapolation: Extrapolation,
) {
    let sweeper = RadarSweeper::new(Arc::new(client), delay);
    let mut updates = sweeper.subscribe();
    let generation = sweeper.start(snapshot.coordinates, density);
    let layer = Metric::Temperature.layer();

    println!(
        "\nRadar ({density}, {} km circles, {})",
        density.display_radius_km(),
        layer.name
    );

    let mut shown = 0;
    loop {
        let state = updates.borrow_and_update().clone();
        if state.generation == generation {
            for point in &state.points[shown.min(state.points.len())..] {
                println!(
                    "  {:>8.2} {:>8.2}  {:>6.1}{}  {}",
                    point.coordinates.latitude,
                    point.coordinates.longitude,
                    point.metrics.temperature,
                    layer.unit,
                    color_for_with(point.metrics.temperature, layer, extrapolation)
                );
            }
            shown = state.points.len();

            match state.status {
                SweepStatus::Complete => {
                    println!("  {shown} points sampled");
                    break;
                }
                SweepStatus::Failed { message } => {
                    eprintln!("  Radar sweep stopped: {message}");
                    break;
                }
                SweepStatus::Idle | SweepStatus::Running => {}
            }
        }

        if updates.changed().await.is_err() {
            break;
        }
    }
}

use anyhow::Context;
use clap::{Parser, Subcommand};

use wxboard_core::{
    Config, Coordinates, ResultCache, SourceSelector, UnitSystem, WeatherQuery,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "wxboard", version, about = "Multi-source weather dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key used by the primary source.
    Configure,

    /// Show current conditions and the forecast for a location.
    Show {
        /// City name, e.g. "Seoul".
        city: Option<String>,

        /// Latitude, used together with --lon instead of a city name.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude, used together with --lat.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Unit system: "metric" or "imperial".
        #[arg(long)]
        units: Option<String>,

        /// Print the normalized result as JSON instead of formatted text.
        #[arg(long)]
        json: bool,
    },

    /// Interactive loop: look up cities, keep favorites, toggle units.
    Dashboard,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, lat, lon, units, json } => {
                show(city, lat, lon, units, json).await
            }
            Command::Dashboard => dashboard().await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key = inquire::Password::new("OpenWeather API key (empty clears it):")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_openweather_api_key(key);

    config.save()?;
    if config.openweather_api_key().is_some() {
        println!("API key saved to {}", Config::config_file_path()?.display());
    } else {
        println!("API key cleared; queries will use the keyless fallback provider.");
    }

    Ok(())
}

fn resolve_units(config: &Config, flag: Option<&str>) -> anyhow::Result<UnitSystem> {
    match flag {
        Some(value) => UnitSystem::try_from(value),
        None => Ok(config.default_units()),
    }
}

async fn show(
    city: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    units: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let config = Config::load()?;
    let units = resolve_units(&config, units.as_deref())?;

    let coordinates = match (lat, lon) {
        (Some(lat), Some(lon)) => Some(Coordinates { lat, lon }),
        _ => None,
    };
    if city.is_none() && coordinates.is_none() {
        anyhow::bail!("Provide a city name or --lat/--lon coordinates.");
    }

    let query = WeatherQuery { city_name: city, coordinates, units };
    let selector = SourceSelector::from_config(&config);

    let result = selector.run(&query).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        render::print_result(&result, units);
    }

    Ok(())
}

/// Seed list shown before the user has favorites of their own.
const DEFAULT_CITIES: [&str; 10] = [
    "Seoul",
    "Busan",
    "Tokyo",
    "New York",
    "London",
    "Paris",
    "Sydney",
    "Beijing",
    "Los Angeles",
    "Singapore",
];

async fn dashboard() -> anyhow::Result<()> {
    let config = Config::load()?;
    let selector = SourceSelector::from_config(&config);
    let cache = ResultCache::default();

    let mut units = config.default_units();
    let mut favorites: Vec<String> = DEFAULT_CITIES.iter().map(ToString::to_string).collect();

    loop {
        let choice = inquire::Select::new(
            "Dashboard:",
            vec![
                "Look up a city",
                "Pick from favorites",
                "Toggle units",
                "Refresh (clear cache)",
                "Quit",
            ],
        )
        .prompt()?;

        match choice {
            "Look up a city" => {
                let city = inquire::Text::new("City:").prompt()?;
                if city.trim().is_empty() {
                    continue;
                }
                let city = city.trim().to_string();
                if lookup(&selector, &cache, &city, units).await
                    && !favorites.contains(&city)
                {
                    favorites.push(city);
                }
            }
            "Pick from favorites" => {
                let city = inquire::Select::new("Favorites:", favorites.clone()).prompt()?;
                lookup(&selector, &cache, &city, units).await;
            }
            "Toggle units" => {
                units = match units {
                    UnitSystem::Metric => UnitSystem::Imperial,
                    UnitSystem::Imperial => UnitSystem::Metric,
                };
                println!("Units: {units}");
            }
            "Refresh (clear cache)" => {
                cache.clear();
                println!("Cache cleared; the next lookup hits the providers again.");
            }
            _ => return Ok(()),
        }
    }
}

/// Run one cached lookup and render it. Returns whether the lookup produced
/// data (so the caller can decide to remember the city).
async fn lookup(
    selector: &SourceSelector,
    cache: &ResultCache,
    city: &str,
    units: UnitSystem,
) -> bool {
    if let Some(result) = cache.lookup(city, units) {
        render::print_result(&result, units);
        return true;
    }

    let query = WeatherQuery::for_city(city, units);
    match selector.run(&query).await {
        Ok(result) => {
            cache.store(city, units, &result);
            render::print_result(&result, units);
            true
        }
        Err(err) => {
            eprintln!("{err}");
            false
        }
    }
}

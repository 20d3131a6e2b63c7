//! Plain-text rendering of a normalized weather result.

use wxboard_core::{UnitSystem, WeatherResult};

/// Warn when any forecast entry crosses these thresholds.
const RAIN_ALERT_PCT: f64 = 80.0;
const HOT_ALERT_METRIC: f64 = 30.0;
const HOT_ALERT_IMPERIAL: f64 = 86.0;

/// How many forecast entries to print; the series itself keeps the
/// provider-native granularity.
const FORECAST_ROWS: usize = 12;

pub fn print_result(result: &WeatherResult, units: UnitSystem) {
    let current = &result.current;
    let temp_symbol = units.temperature_symbol();

    println!();
    match &current.description {
        Some(description) => println!("{} - {}", current.location_name, description),
        None => println!("{}", current.location_name),
    }
    println!("Observed at {} (source: {})", current.observed_at_local, result.source);

    match current.feels_like {
        Some(feels_like) => println!(
            "Temperature: {:.1}{temp_symbol} (feels like {feels_like:.1}{temp_symbol})",
            current.temperature
        ),
        None => println!("Temperature: {:.1}{temp_symbol}", current.temperature),
    }

    if let Some(humidity) = current.humidity_pct {
        println!("Humidity: {humidity}%");
    }
    if let Some(pressure) = current.pressure_hpa {
        println!("Pressure: {pressure:.0} hPa");
    }
    if let Some(speed) = current.wind_speed {
        match current.wind_direction_deg {
            Some(deg) => println!(
                "Wind: {speed:.1} {} {}",
                units.wind_speed_unit(),
                wxboard_core::units::degrees_to_compass(deg)
            ),
            None => println!("Wind: {speed:.1} {}", units.wind_speed_unit()),
        }
    }
    if let Some(aqi) = current.air_quality_index {
        println!("Air quality index: {aqi} (1 good .. 5 very poor)");
    }

    if !result.forecast.is_empty() {
        println!();
        println!("Forecast ({} of {} entries):", FORECAST_ROWS.min(result.forecast.len()), result.forecast.len());
        for point in result.forecast.iter().take(FORECAST_ROWS) {
            println!(
                "  {}  {:>6.1}{temp_symbol}  pop {:>3.0}%  {}",
                point.timestamp, point.temperature, point.precipitation_probability_pct, point.description
            );
        }

        print_alerts(result, units);
    }
}

fn print_alerts(result: &WeatherResult, units: UnitSystem) {
    let max_pop = result
        .forecast
        .iter()
        .map(|p| p.precipitation_probability_pct)
        .fold(f64::NEG_INFINITY, f64::max);
    if max_pop >= RAIN_ALERT_PCT {
        println!("! High precipitation probability ahead (max {max_pop:.0}%).");
    }

    let hot_threshold = match units {
        UnitSystem::Metric => HOT_ALERT_METRIC,
        UnitSystem::Imperial => HOT_ALERT_IMPERIAL,
    };
    let max_temp = result.forecast.iter().map(|p| p.temperature).fold(f64::NEG_INFINITY, f64::max);
    if max_temp >= hot_threshold {
        println!(
            "! High temperatures ahead (max {max_temp:.1}{}).",
            units.temperature_symbol()
        );
    }
}

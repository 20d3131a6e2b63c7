//! Mapping from the two raw provider shapes into the shared
//! [`WeatherResult`] model.
//!
//! Both entry points are total: a payload that parsed is always normalized,
//! with missing optional fields degrading to `None` (or an empty string /
//! zero probability) instead of failing. Provider payloads are known to vary
//! in completeness and a partially filled snapshot beats no data.

use chrono::{DateTime, Utc};

use crate::{
    model::{CurrentConditions, ForecastPoint, Source, UnitSystem, WeatherResult},
    provider::{
        openmeteo::{OmCurrentWeather, OmHourly},
        openweather::{OwAirQualityResponse, OwCurrentResponse, OwForecastResponse},
    },
    units,
};

const LOCAL_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Format a unix timestamp shifted by the location's UTC offset.
///
/// The offset is applied additively to the timestamp, not through a timezone
/// database: that is exactly how the primary provider defines its `timezone`
/// field.
fn format_local(unix_ts: i64, tz_offset_secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(unix_ts + tz_offset_secs, 0)
        .unwrap_or_else(Utc::now)
        .format(LOCAL_FORMAT)
        .to_string()
}

/// Normalize the primary provider's current + forecast (+ best-effort air
/// quality) payloads.
///
/// Temperatures pass through untouched: the provider already converted them
/// to the requested unit system server-side.
pub fn from_open_weather(
    current: &OwCurrentResponse,
    forecast: &OwForecastResponse,
    air_quality: Option<&OwAirQualityResponse>,
) -> WeatherResult {
    let description = current.weather.first().map(|w| w.description.clone());
    let air_quality_index =
        air_quality.and_then(|aq| aq.list.first()).map(|entry| entry.main.aqi);

    let snapshot = CurrentConditions {
        location_name: current.name.clone(),
        observed_at_local: format_local(current.dt, current.timezone),
        temperature: current.main.temp,
        feels_like: Some(current.main.feels_like),
        humidity_pct: current.main.humidity,
        pressure_hpa: current.main.pressure,
        wind_speed: current.wind.as_ref().map(|w| w.speed),
        wind_direction_deg: current.wind.as_ref().and_then(|w| w.deg),
        description,
        air_quality_index,
    };

    let tz_offset = forecast.city.timezone;
    let points = forecast
        .list
        .iter()
        .map(|entry| ForecastPoint {
            timestamp: format_local(entry.dt, tz_offset),
            temperature: entry.main.temp,
            feels_like: entry.main.feels_like,
            humidity_pct: entry.main.humidity,
            precipitation_probability_pct: entry.pop.unwrap_or(0.0) * 100.0,
            description: entry
                .weather
                .first()
                .map(|w| w.description.clone())
                .unwrap_or_default(),
        })
        .collect();

    WeatherResult { source: Source::Primary, current: snapshot, forecast: points }
}

/// Normalize the fallback provider's current + hourly payload.
///
/// Open-Meteo always answers in metric, so imperial queries convert here; it
/// has no feels-like field, so feels-like mirrors temperature. Humidity,
/// pressure, air quality and descriptions are simply not supplied on this
/// path.
pub fn from_open_meteo(
    current: &OmCurrentWeather,
    hourly: &OmHourly,
    city: &str,
    units: UnitSystem,
) -> WeatherResult {
    let convert = |celsius: f64| match units {
        UnitSystem::Metric => celsius,
        UnitSystem::Imperial => units::celsius_to_fahrenheit(celsius),
    };
    let convert_wind = |kmh: f64| match units {
        UnitSystem::Metric => units::kmh_to_mps(kmh),
        UnitSystem::Imperial => units::kmh_to_mph(kmh),
    };

    let observed_at_local = current
        .time
        .as_ref()
        .map(|t| t.replace('T', " "))
        .unwrap_or_else(|| Utc::now().format(LOCAL_FORMAT).to_string());

    let snapshot = CurrentConditions {
        location_name: city.to_string(),
        observed_at_local,
        temperature: convert(current.temperature),
        feels_like: None,
        humidity_pct: None,
        pressure_hpa: None,
        wind_speed: current.windspeed.map(convert_wind),
        wind_direction_deg: current.winddirection,
        description: None,
        air_quality_index: None,
    };

    let mut points = Vec::with_capacity(hourly.time.len());
    for (i, time) in hourly.time.iter().enumerate() {
        let Some(&temp_c) = hourly.temperature_2m.get(i) else { break };
        let temperature = convert(temp_c);

        points.push(ForecastPoint {
            // Already local; the provider separates date and time with 'T'.
            timestamp: time.replace('T', " "),
            temperature,
            feels_like: temperature,
            humidity_pct: hourly.relative_humidity_2m.get(i).copied(),
            precipitation_probability_pct: hourly
                .precipitation_probability
                .as_ref()
                .and_then(|pops| pops.get(i).copied())
                .unwrap_or(0.0),
            description: String::new(),
        });
    }

    WeatherResult { source: Source::Fallback, current: snapshot, forecast: points }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::openweather::{
        OwAqEntry, OwAqMain, OwCity, OwCoord, OwForecastEntry, OwMain, OwWeather, OwWind,
    };

    fn ow_main(temp: f64) -> OwMain {
        OwMain { temp, feels_like: temp - 1.0, humidity: Some(60), pressure: Some(1012.0) }
    }

    fn ow_current() -> OwCurrentResponse {
        OwCurrentResponse {
            name: "Seoul".to_string(),
            dt: 1_700_000_000,
            timezone: 32_400,
            coord: Some(OwCoord { lat: 37.57, lon: 126.98 }),
            main: ow_main(21.5),
            weather: vec![OwWeather { description: "clear sky".to_string() }],
            wind: Some(OwWind { speed: 3.4, deg: Some(320.0) }),
        }
    }

    fn ow_forecast(entries: Vec<OwForecastEntry>) -> OwForecastResponse {
        OwForecastResponse {
            city: OwCity { name: "Seoul".to_string(), timezone: 32_400 },
            list: entries,
        }
    }

    #[test]
    fn primary_temperature_passes_through() {
        let forecast = ow_forecast(vec![OwForecastEntry {
            dt: 1_700_000_000,
            main: ow_main(21.5),
            weather: vec![OwWeather { description: "few clouds".to_string() }],
            pop: Some(0.4),
        }]);

        let result = from_open_weather(&ow_current(), &forecast, None);

        let point = &result.forecast[0];
        assert!((point.temperature - 21.5).abs() < f64::EPSILON);
        assert!((point.precipitation_probability_pct - 40.0).abs() < 1e-9);
        assert_eq!(point.description, "few clouds");
    }

    #[test]
    fn primary_missing_pop_defaults_to_zero() {
        let forecast = ow_forecast(vec![OwForecastEntry {
            dt: 1_700_000_000,
            main: ow_main(3.0),
            weather: vec![],
            pop: None,
        }]);

        let result = from_open_weather(&ow_current(), &forecast, None);

        let point = &result.forecast[0];
        assert!(point.precipitation_probability_pct.abs() < f64::EPSILON);
        assert_eq!(point.description, "");
    }

    #[test]
    fn primary_applies_timezone_offset_additively() {
        // Unix epoch + 9 hours (Seoul offset) must render as 09:00 on day one.
        let mut current = ow_current();
        current.dt = 0;
        current.timezone = 32_400;

        let result = from_open_weather(&current, &ow_forecast(vec![]), None);
        assert_eq!(result.current.observed_at_local, "1970-01-01 09:00");
    }

    #[test]
    fn primary_air_quality_maps_first_entry() {
        let aq = OwAirQualityResponse { list: vec![OwAqEntry { main: OwAqMain { aqi: 2 } }] };

        let with_aq = from_open_weather(&ow_current(), &ow_forecast(vec![]), Some(&aq));
        assert_eq!(with_aq.current.air_quality_index, Some(2));

        let empty_aq = OwAirQualityResponse { list: vec![] };
        let without = from_open_weather(&ow_current(), &ow_forecast(vec![]), Some(&empty_aq));
        assert_eq!(without.current.air_quality_index, None);
    }

    #[test]
    fn primary_result_is_tagged_and_ordered() {
        let entries: Vec<OwForecastEntry> = (0..4)
            .map(|i| OwForecastEntry {
                dt: 1_700_000_000 + i64::from(i) * 10_800,
                main: ow_main(20.0 + f64::from(i)),
                weather: vec![],
                pop: None,
            })
            .collect();

        let result = from_open_weather(&ow_current(), &ow_forecast(entries), None);

        assert_eq!(result.source, Source::Primary);
        assert_eq!(result.forecast.len(), 4);
        let timestamps: Vec<&str> =
            result.forecast.iter().map(|p| p.timestamp.as_str()).collect();
        let mut sorted = timestamps.clone();
        sorted.sort_unstable();
        assert_eq!(timestamps, sorted);
    }

    fn om_current(temp: f64) -> OmCurrentWeather {
        OmCurrentWeather {
            temperature: temp,
            windspeed: Some(7.2),
            winddirection: Some(220.0),
            time: Some("2024-05-01T12:00".to_string()),
        }
    }

    fn om_hourly() -> OmHourly {
        OmHourly {
            time: vec!["2024-05-01T12:00".to_string(), "2024-05-01T13:00".to_string()],
            temperature_2m: vec![0.0, 10.0],
            relative_humidity_2m: vec![55, 52],
            precipitation_probability: Some(vec![10.0, 80.0]),
        }
    }

    #[test]
    fn fallback_imperial_converts_metric_payload() {
        let result = from_open_meteo(&om_current(0.0), &om_hourly(), "Reykjavik", UnitSystem::Imperial);

        // Raw 0°C must come out as 32°F; feels-like mirrors temperature.
        assert!((result.forecast[0].temperature - 32.0).abs() < f64::EPSILON);
        assert!((result.forecast[0].feels_like - 32.0).abs() < f64::EPSILON);
        assert!((result.forecast[1].temperature - 50.0).abs() < f64::EPSILON);
        assert!((result.current.temperature - 32.0).abs() < f64::EPSILON);
    }

    #[test]
    fn fallback_metric_passes_temperatures_through() {
        let result = from_open_meteo(&om_current(18.4), &om_hourly(), "Oslo", UnitSystem::Metric);

        assert!(result.forecast[0].temperature.abs() < f64::EPSILON);
        assert!((result.current.temperature - 18.4).abs() < f64::EPSILON);
        // km/h from the provider, m/s in the metric model.
        assert!((result.current.wind_speed.unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn fallback_replaces_iso_separator() {
        let result = from_open_meteo(&om_current(5.0), &om_hourly(), "Oslo", UnitSystem::Metric);

        assert_eq!(result.current.observed_at_local, "2024-05-01 12:00");
        assert_eq!(result.forecast[0].timestamp, "2024-05-01 12:00");
        assert_eq!(result.forecast[1].timestamp, "2024-05-01 13:00");
    }

    #[test]
    fn fallback_degrades_missing_fields() {
        let hourly = OmHourly {
            time: vec!["2024-05-01T12:00".to_string()],
            temperature_2m: vec![5.0],
            relative_humidity_2m: vec![],
            precipitation_probability: None,
        };
        let current = OmCurrentWeather {
            temperature: 5.0,
            windspeed: None,
            winddirection: None,
            time: None,
        };

        let result = from_open_meteo(&current, &hourly, "Oslo", UnitSystem::Metric);

        assert_eq!(result.source, Source::Fallback);
        assert_eq!(result.current.humidity_pct, None);
        assert_eq!(result.current.pressure_hpa, None);
        assert_eq!(result.current.air_quality_index, None);
        assert_eq!(result.current.description, None);
        assert_eq!(result.current.wind_speed, None);

        let point = &result.forecast[0];
        assert_eq!(point.humidity_pct, None);
        assert!(point.precipitation_probability_pct.abs() < f64::EPSILON);
        assert_eq!(point.description, "");
    }
}

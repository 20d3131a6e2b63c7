use serde::{Deserialize, Serialize};

/// Unit system requested by the caller.
///
/// The primary provider converts server-side when this is passed through as a
/// query parameter; the fallback provider always answers in metric, so the
/// normalizer converts client-side for imperial queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    /// Symbol used when rendering temperatures.
    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
        }
    }

    /// Unit used when rendering wind speed.
    pub fn wind_speed_unit(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "m/s",
            UnitSystem::Imperial => "mph",
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitSystem {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial."
            )),
        }
    }
}

/// Which provider ultimately produced a [`WeatherResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    Primary,
    Fallback,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Primary => "openweather",
            Source::Fallback => "open-meteo",
        }
    }

    pub const fn all() -> &'static [Source] {
        &[Source::Primary, Source::Fallback]
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geographic coordinates, latitude in [-90, 90] and longitude in [-180, 180].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4},{:.4}", self.lat, self.lon)
    }
}

/// One weather lookup as entered by the user.
///
/// At least one of `city_name` / `coordinates` must be present for the query
/// to be dispatchable; [`WeatherQuery::target`] returns `None` otherwise.
#[derive(Debug, Clone)]
pub struct WeatherQuery {
    pub city_name: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub units: UnitSystem,
}

impl WeatherQuery {
    pub fn for_city(city: impl Into<String>, units: UnitSystem) -> Self {
        Self { city_name: Some(city.into()), coordinates: None, units }
    }

    pub fn for_coordinates(coordinates: Coordinates, units: UnitSystem) -> Self {
        Self { city_name: None, coordinates: Some(coordinates), units }
    }

    /// Resolve the lookup target. Coordinates win over a city name when both
    /// are present (a location override is more specific than typed text).
    pub fn target(&self) -> Option<QueryTarget> {
        if let Some(coords) = self.coordinates {
            return Some(QueryTarget::Coordinates(coords));
        }
        self.city_name.clone().map(QueryTarget::City)
    }

    /// Human-readable target, for error messages and cache keys.
    pub fn describe_target(&self) -> String {
        match self.target() {
            Some(QueryTarget::City(name)) => name,
            Some(QueryTarget::Coordinates(coords)) => coords.to_string(),
            None => "<empty query>".to_string(),
        }
    }
}

/// Resolved lookup target handed to the primary provider.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryTarget {
    City(String),
    Coordinates(Coordinates),
}

/// Normalized snapshot of current conditions.
///
/// Optional fields reflect provider variance: the fallback provider supplies
/// no humidity, pressure, air quality or description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location_name: String,
    /// Local time of the observation, formatted `YYYY-MM-DD HH:MM`.
    pub observed_at_local: String,
    pub temperature: f64,
    pub feels_like: Option<f64>,
    pub humidity_pct: Option<u8>,
    pub pressure_hpa: Option<f64>,
    pub wind_speed: Option<f64>,
    /// Meteorological wind direction in degrees, [0, 360).
    pub wind_direction_deg: Option<f64>,
    pub description: Option<String>,
    /// OpenWeather air quality index, 1 (good) to 5 (very poor).
    pub air_quality_index: Option<u8>,
}

/// One normalized forecast entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Local time, formatted `YYYY-MM-DD HH:MM`.
    pub timestamp: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity_pct: Option<u8>,
    pub precipitation_probability_pct: f64,
    pub description: String,
}

/// The sole output of the core: a complete, source-tagged weather answer.
///
/// The forecast series is chronological in the provider's native interval
/// (3-hourly for the primary, hourly for the fallback) and is never reordered
/// or deduplicated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherResult {
    pub source: Source,
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_system_roundtrip() {
        for units in [UnitSystem::Metric, UnitSystem::Imperial] {
            let parsed = UnitSystem::try_from(units.as_str()).expect("roundtrip should succeed");
            assert_eq!(units, parsed);
        }
    }

    #[test]
    fn unknown_unit_system_errors() {
        let err = UnitSystem::try_from("kelvin").unwrap_err();
        assert!(err.to_string().contains("Unknown unit system"));
    }

    #[test]
    fn coordinates_take_precedence_over_city() {
        let query = WeatherQuery {
            city_name: Some("Seoul".to_string()),
            coordinates: Some(Coordinates { lat: 37.57, lon: 126.98 }),
            units: UnitSystem::Metric,
        };

        match query.target() {
            Some(QueryTarget::Coordinates(coords)) => {
                assert!((coords.lat - 37.57).abs() < f64::EPSILON);
            }
            other => panic!("expected coordinate target, got {other:?}"),
        }
    }

    #[test]
    fn empty_query_has_no_target() {
        let query = WeatherQuery {
            city_name: None,
            coordinates: None,
            units: UnitSystem::Metric,
        };
        assert!(query.target().is_none());
        assert_eq!(query.describe_target(), "<empty query>");
    }

    #[test]
    fn coordinate_range_check() {
        assert!(Coordinates { lat: 37.57, lon: 126.98 }.in_range());
        assert!(!Coordinates { lat: 91.0, lon: 0.0 }.in_range());
        assert!(!Coordinates { lat: 0.0, lon: -181.0 }.in_range());
    }
}

//! Primary provider client: OpenWeather current conditions, 5-day/3-hour
//! forecast and air quality.
//!
//! Temperatures arrive already converted to the requested unit system (the
//! `units` query parameter is applied server-side), so the normalizer passes
//! them through untouched.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    error::FetchError,
    model::{Coordinates, QueryTarget, UnitSystem},
    provider::{PrimaryProvider, client_with_timeout, truncate_body},
};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

const PROVIDER: &str = "openweather";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Override the endpoint, used by tests to point at a mock server.
    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self { api_key, base_url: base_url.into(), http: client_with_timeout() }
    }

    /// Query by coordinates when they are present, by city name otherwise.
    fn target_params(target: &QueryTarget) -> Vec<(&'static str, String)> {
        match target {
            QueryTarget::Coordinates(coords) => {
                vec![("lat", coords.lat.to_string()), ("lon", coords.lon.to_string())]
            }
            QueryTarget::City(name) => vec![("q", name.clone())],
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, FetchError> {
        let url = format!("{}/{path}", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| FetchError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(FetchError::Provider {
                provider: PROVIDER,
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| FetchError::Malformed { provider: PROVIDER, detail: e.to_string() })
    }
}

#[async_trait]
impl PrimaryProvider for OpenWeatherClient {
    async fn fetch_current(
        &self,
        target: &QueryTarget,
        units: UnitSystem,
    ) -> Result<OwCurrentResponse, FetchError> {
        let mut query = Self::target_params(target);
        query.push(("appid", self.api_key.clone()));
        query.push(("units", units.as_str().to_string()));

        self.get_json("weather", &query).await
    }

    async fn fetch_forecast(
        &self,
        target: &QueryTarget,
        units: UnitSystem,
    ) -> Result<OwForecastResponse, FetchError> {
        let mut query = Self::target_params(target);
        query.push(("appid", self.api_key.clone()));
        query.push(("units", units.as_str().to_string()));

        self.get_json("forecast", &query).await
    }

    async fn fetch_air_quality(
        &self,
        coordinates: Coordinates,
    ) -> Result<OwAirQualityResponse, FetchError> {
        let query = vec![
            ("appid", self.api_key.clone()),
            ("lat", coordinates.lat.to_string()),
            ("lon", coordinates.lon.to_string()),
        ];

        self.get_json("air_pollution", &query).await
    }
}

// Raw response shapes. Fields that real-world payloads sometimes omit default
// to `None` so a sparse answer still parses; the normalizer degrades them.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwCoord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwMain {
    pub temp: f64,
    pub feels_like: f64,
    #[serde(default)]
    pub humidity: Option<u8>,
    #[serde(default)]
    pub pressure: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwWeather {
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwWind {
    pub speed: f64,
    #[serde(default)]
    pub deg: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwCurrentResponse {
    pub name: String,
    pub dt: i64,
    /// Shift from UTC in seconds at the observed location.
    #[serde(default)]
    pub timezone: i64,
    #[serde(default)]
    pub coord: Option<OwCoord>,
    pub main: OwMain,
    #[serde(default)]
    pub weather: Vec<OwWeather>,
    #[serde(default)]
    pub wind: Option<OwWind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwForecastEntry {
    pub dt: i64,
    pub main: OwMain,
    #[serde(default)]
    pub weather: Vec<OwWeather>,
    /// Precipitation probability as a fraction in [0, 1]; often absent.
    #[serde(default)]
    pub pop: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwCity {
    pub name: String,
    #[serde(default)]
    pub timezone: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwForecastResponse {
    pub city: OwCity,
    pub list: Vec<OwForecastEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwAqMain {
    pub aqi: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwAqEntry {
    pub main: OwAqMain,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwAirQualityResponse {
    #[serde(default)]
    pub list: Vec<OwAqEntry>,
}

//! Fallback provider client: keyless Open-Meteo current weather + hourly
//! forecast, reached through the geocoder.
//!
//! Open-Meteo answers in metric regardless of the requested unit system; the
//! normalizer converts client-side for imperial queries.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    error::FetchError,
    geocode::Geocoder,
    model::{Coordinates, UnitSystem, WeatherResult},
    normalize,
    provider::{FallbackProvider, client_with_timeout, truncate_body},
};

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1";

const PROVIDER: &str = "open-meteo";
const HOURLY_FIELDS: &str = "temperature_2m,relative_humidity_2m,precipitation_probability";
const FORECAST_DAYS: u8 = 5;

#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: Client,
    base_url: String,
    geocoder: Geocoder,
}

impl Default for OpenMeteoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenMeteoClient {
    pub fn new() -> Self {
        Self {
            http: client_with_timeout(),
            base_url: DEFAULT_BASE_URL.to_string(),
            geocoder: Geocoder::new(),
        }
    }

    /// Override both endpoints, used by tests to point at mock servers.
    pub fn with_base_urls(
        forecast_base_url: impl Into<String>,
        geocoding_base_url: impl Into<String>,
    ) -> Self {
        Self {
            http: client_with_timeout(),
            base_url: forecast_base_url.into(),
            geocoder: Geocoder::with_base_url(geocoding_base_url),
        }
    }

    async fn fetch_raw(&self, coordinates: Coordinates) -> Result<OmForecastResponse, FetchError> {
        let url = format!("{}/forecast", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("latitude", coordinates.lat.to_string()),
                ("longitude", coordinates.lon.to_string()),
                ("hourly", HOURLY_FIELDS.to_string()),
                ("current_weather", "true".to_string()),
                ("forecast_days", FORECAST_DAYS.to_string()),
            ])
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
impl FallbackProvider for OpenMeteoClient {
    async fn fetch(&self, city: &str, units: UnitSystem) -> Result<WeatherResult, FetchError> {
        let coordinates = self.geocoder.geocode(city).await?;
        let raw = self.fetch_raw(coordinates).await?;

        // The request asked for current_weather; a body without it is not a
        // usable answer even though everything else parsed.
        let current = raw.current_weather.as_ref().ok_or_else(|| FetchError::Malformed {
            provider: PROVIDER,
            detail: "response missing current_weather".to_string(),
        })?;

        tracing::debug!(city, %coordinates, hours = raw.hourly.time.len(), "fallback fetch ok");
        Ok(normalize::from_open_meteo(current, &raw.hourly, city, units))
    }
}

// Raw response shapes, column-oriented as the provider sends them.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OmCurrentWeather {
    pub temperature: f64,
    /// Wind speed in km/h.
    #[serde(default)]
    pub windspeed: Option<f64>,
    #[serde(default)]
    pub winddirection: Option<f64>,
    /// Local ISO-8601 time of the observation.
    #[serde(default)]
    pub time: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OmHourly {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m: Vec<f64>,
    #[serde(default)]
    pub relative_humidity_2m: Vec<u8>,
    /// Absent entirely on some deployments; the normalizer defaults to 0.
    #[serde(default)]
    pub precipitation_probability: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OmForecastResponse {
    #[serde(default)]
    pub current_weather: Option<OmCurrentWeather>,
    #[serde(default)]
    pub hourly: OmHourly,
}

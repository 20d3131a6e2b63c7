//! Per-query source selection: try the primary provider, fall back to the
//! keyless provider, or report that every source is exhausted.
//!
//! Each provider is attempted at most once per query; there are no retries
//! anywhere on this path.

use crate::{
    Config,
    error::{ExhaustedSources, FetchError},
    model::{Coordinates, WeatherQuery, WeatherResult},
    normalize,
    provider::{FallbackProvider, PrimaryProvider, openmeteo::OpenMeteoClient, openweather::OpenWeatherClient},
};

#[derive(Debug)]
pub struct SourceSelector {
    /// `None` when no API key is configured; the query then goes straight to
    /// the fallback.
    primary: Option<Box<dyn PrimaryProvider>>,
    fallback: Box<dyn FallbackProvider>,
}

impl SourceSelector {
    pub fn new(
        primary: Option<Box<dyn PrimaryProvider>>,
        fallback: Box<dyn FallbackProvider>,
    ) -> Self {
        Self { primary, fallback }
    }

    /// Build the real provider pair from config. A missing OpenWeather key is
    /// a valid state, not an error.
    pub fn from_config(config: &Config) -> Self {
        let primary = config
            .openweather_api_key()
            .map(|key| Box::new(OpenWeatherClient::new(key.to_owned())) as Box<dyn PrimaryProvider>);

        Self::new(primary, Box::new(OpenMeteoClient::new()))
    }

    /// Run one query to completion.
    ///
    /// The fallback is only attempted after the primary path is conclusively
    /// exhausted; whichever path succeeds yields a complete, source-tagged
    /// result. A query that neither path can answer surfaces as the single
    /// no-data error.
    pub async fn run(&self, query: &WeatherQuery) -> Result<WeatherResult, ExhaustedSources> {
        match self.try_primary(query).await {
            Ok(result) => {
                tracing::debug!(source = %result.source, "query answered by primary");
                return Ok(result);
            }
            Err(err) => tracing::debug!(error = %err, "primary source unavailable"),
        }

        match self.try_fallback(query).await {
            Ok(result) => {
                tracing::debug!(source = %result.source, "query answered by fallback");
                Ok(result)
            }
            Err(err) => {
                let target = query.describe_target();
                tracing::warn!(error = %err, query = %target, "all weather sources exhausted");
                Err(ExhaustedSources { target })
            }
        }
    }

    /// Primary succeeds only when both current conditions and the forecast
    /// arrive; air quality is best-effort and never blocks.
    async fn try_primary(&self, query: &WeatherQuery) -> Result<WeatherResult, FetchError> {
        let primary = self.primary.as_deref().ok_or(FetchError::NoCredential)?;
        let target = query
            .target()
            .ok_or_else(|| FetchError::NotFound(query.describe_target()))?;

        let current = primary.fetch_current(&target, query.units).await?;
        let forecast = primary.fetch_forecast(&target, query.units).await?;

        // The air quality endpoint requires coordinates, which only the
        // current-conditions answer can supply.
        let air_quality = match current.coord {
            Some(ref coord) => {
                let coords = Coordinates { lat: coord.lat, lon: coord.lon };
                match primary.fetch_air_quality(coords).await {
                    Ok(aq) => Some(aq),
                    Err(err) => {
                        tracing::debug!(error = %err, "air quality unavailable");
                        None
                    }
                }
            }
            None => None,
        };

        Ok(normalize::from_open_weather(&current, &forecast, air_quality.as_ref()))
    }

    async fn try_fallback(&self, query: &WeatherQuery) -> Result<WeatherResult, FetchError> {
        // The fallback path goes through the geocoder and therefore needs a
        // city name; a coordinates-only query cannot take it.
        let city = query
            .city_name
            .as_deref()
            .ok_or_else(|| FetchError::NotFound(query.describe_target()))?;

        self.fallback.fetch(city, query.units).await
    }
}

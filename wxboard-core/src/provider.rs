use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::{
    error::FetchError,
    model::{Coordinates, QueryTarget, UnitSystem, WeatherResult},
    provider::openweather::{OwAirQualityResponse, OwCurrentResponse, OwForecastResponse},
};

pub mod openmeteo;
pub mod openweather;

/// Timeout applied to every outbound call so a slow provider cannot block a
/// query indefinitely.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// The keyed provider: current conditions, 5-day/3-hour forecast and air
/// quality. The three calls fail independently.
#[async_trait]
pub trait PrimaryProvider: Send + Sync + Debug {
    async fn fetch_current(
        &self,
        target: &QueryTarget,
        units: UnitSystem,
    ) -> Result<OwCurrentResponse, FetchError>;

    async fn fetch_forecast(
        &self,
        target: &QueryTarget,
        units: UnitSystem,
    ) -> Result<OwForecastResponse, FetchError>;

    async fn fetch_air_quality(
        &self,
        coordinates: Coordinates,
    ) -> Result<OwAirQualityResponse, FetchError>;
}

/// The keyless provider: geocodes the city, fetches current + hourly data and
/// returns an already-normalized result tagged `Source::Fallback`.
#[async_trait]
pub trait FallbackProvider: Send + Sync + Debug {
    async fn fetch(&self, city: &str, units: UnitSystem) -> Result<WeatherResult, FetchError>;
}

/// Shared HTTP client with the standard timeout. The builder only fails when
/// no TLS backend is available; fall back to the default client in that case
/// rather than propagating construction errors through every constructor.
pub(crate) fn client_with_timeout() -> Client {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    // Cut on a char boundary; a fixed byte offset would panic on multi-byte
    // text straddling it.
    let mut cut = MAX;
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &body[..cut])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bodies_pass_through() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(500);
        let truncated = truncate_body(&body);
        assert_eq!(truncated.len(), 203);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // A multi-byte char straddling the cut-off must not panic the error
        // path; the cut backs up to the previous boundary.
        let mut body = "x".repeat(199);
        body.push('날');
        body.push_str(&"y".repeat(100));

        let truncated = truncate_body(&body);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated, format!("{}...", "x".repeat(199)));

        // Cut-off falling exactly on a boundary keeps the full char.
        let mut body = "x".repeat(197);
        body.push('날');
        body.push_str(&"y".repeat(100));
        assert!(truncate_body(&body).starts_with(&format!("{}날", "x".repeat(197))));
    }
}

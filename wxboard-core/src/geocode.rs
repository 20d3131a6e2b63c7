//! Free-text city name to coordinates, via the keyless Open-Meteo geocoding
//! endpoint. One attempt per call, no caching here (the caller may cache).

use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::FetchError,
    model::Coordinates,
    provider::{client_with_timeout, truncate_body},
};

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1";

#[derive(Debug, Clone)]
pub struct Geocoder {
    http: Client,
    base_url: String,
}

impl Default for Geocoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Geocoder {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_GEOCODING_URL)
    }

    /// Override the endpoint, used by tests to point at a mock server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { http: client_with_timeout(), base_url: base_url.into() }
    }

    /// Resolve a city name to coordinates, requesting exactly one match.
    ///
    /// Empty input, a non-success status, an unparseable body, an empty
    /// result list or out-of-range coordinates all resolve to
    /// [`FetchError::NotFound`]; only transport failures surface as
    /// [`FetchError::Network`].
    pub async fn geocode(&self, city: &str) -> Result<Coordinates, FetchError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(FetchError::NotFound(String::new()));
        }

        let url = format!("{}/search", self.base_url);
        let res = self
            .http
            .get(&url)
            .query(&[("name", city), ("count", "1")])
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| FetchError::Network(e.to_string()))?;

        if !status.is_success() {
            tracing::debug!(%status, body = %truncate_body(&body), "geocoding request failed");
            return Err(FetchError::NotFound(city.to_string()));
        }

        let parsed: GeocodingResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!(error = %e, "geocoding response did not parse");
                return Err(FetchError::NotFound(city.to_string()));
            }
        };

        let coords = parsed
            .results
            .first()
            .map(|m| Coordinates { lat: m.latitude, lon: m.longitude })
            .filter(Coordinates::in_range)
            .ok_or_else(|| FetchError::NotFound(city.to_string()))?;

        tracing::debug!(city, %coords, "geocoded");
        Ok(coords)
    }
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Vec<GeocodingMatch>,
}

#[derive(Debug, Deserialize)]
struct GeocodingMatch {
    latitude: f64,
    longitude: f64,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    use super::*;

    async fn mock_search(server: &MockServer, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("count", "1"))
            .respond_with(response)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn empty_input_is_not_found_without_a_network_call() {
        let geocoder = Geocoder::with_base_url("http://127.0.0.1:1/unreachable");

        let err = geocoder.geocode("   ").await.unwrap_err();
        assert!(matches!(err, FetchError::NotFound(_)));
    }

    #[tokio::test]
    async fn single_match_resolves_to_its_coordinates() {
        let server = MockServer::start().await;
        mock_search(
            &server,
            ResponseTemplate::new(200)
                .set_body_json(json!({ "results": [{ "latitude": 37.57, "longitude": 126.98 }] })),
        )
        .await;

        let geocoder = Geocoder::with_base_url(server.uri());
        let coords = geocoder.geocode("Seoul").await.expect("match resolves");

        assert!((coords.lat - 37.57).abs() < f64::EPSILON);
        assert!((coords.lon - 126.98).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn non_success_status_is_not_found() {
        let server = MockServer::start().await;
        mock_search(&server, ResponseTemplate::new(500).set_body_string("upstream down")).await;

        let geocoder = Geocoder::with_base_url(server.uri());
        let err = geocoder.geocode("Seoul").await.unwrap_err();

        assert!(matches!(err, FetchError::NotFound(city) if city == "Seoul"));
    }

    #[tokio::test]
    async fn malformed_body_is_not_found() {
        let server = MockServer::start().await;
        mock_search(&server, ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .await;

        let geocoder = Geocoder::with_base_url(server.uri());
        let err = geocoder.geocode("Seoul").await.unwrap_err();

        assert!(matches!(err, FetchError::NotFound(city) if city == "Seoul"));
    }

    #[tokio::test]
    async fn empty_result_list_is_not_found() {
        let server = MockServer::start().await;
        mock_search(&server, ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
            .await;

        let geocoder = Geocoder::with_base_url(server.uri());
        let err = geocoder.geocode("Nowhereville").await.unwrap_err();

        assert!(matches!(err, FetchError::NotFound(city) if city == "Nowhereville"));
    }

    #[tokio::test]
    async fn out_of_range_coordinates_are_not_found() {
        let server = MockServer::start().await;
        mock_search(
            &server,
            ResponseTemplate::new(200)
                .set_body_json(json!({ "results": [{ "latitude": 91.0, "longitude": 0.0 }] })),
        )
        .await;

        let geocoder = Geocoder::with_base_url(server.uri());
        let err = geocoder.geocode("Seoul").await.unwrap_err();

        assert!(matches!(err, FetchError::NotFound(city) if city == "Seoul"));
    }
}

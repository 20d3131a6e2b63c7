//! Core library for the `wxboard` weather dashboard.
//!
//! This crate defines:
//! - The shared weather data model (queries, normalized results)
//! - Clients for the primary (OpenWeather) and fallback (Open-Meteo) providers
//! - Normalization of both provider shapes into one model
//! - Per-query source selection with fallback and an explicit no-data outcome
//! - Configuration & credentials handling and an injectable result cache
//!
//! It is used by `wxboard-cli`, but can also be reused by other binaries or services.

pub mod cache;
pub mod config;
pub mod error;
pub mod geocode;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod select;
pub mod units;

pub use cache::ResultCache;
pub use config::Config;
pub use error::{ExhaustedSources, FetchError};
pub use geocode::Geocoder;
pub use model::{
    Coordinates, CurrentConditions, ForecastPoint, QueryTarget, Source, UnitSystem, WeatherQuery,
    WeatherResult,
};
pub use provider::{FallbackProvider, PrimaryProvider};
pub use select::SourceSelector;

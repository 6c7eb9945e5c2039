//! `NomadAI` - Intelligent weather companion core
//!
//! This library provides the weather session behind the `NomadAI`
//! dashboard: it geolocates or searches for a place, resolves current
//! conditions and a place name from public APIs, and enriches the
//! result with best-effort AI-generated text and imagery.

pub mod classifier;
pub mod config;
pub mod error;
pub mod gemini;
pub mod models;
pub mod open_meteo;
pub mod providers;
pub mod reverse_geocode;
pub mod session;

// Re-export core types for public API
pub use classifier::{
    ConditionCategory, IconAnimation, WeatherClassification, WeatherIcon, classify,
};
pub use config::NomadAiConfig;
pub use error::{FailedFetch, GeoError, NomadAiError, SessionError};
pub use gemini::GeminiClient;
pub use models::{
    Coordinates, CurrentConditions, LocationInfo, LocationNarrative, PlaceMatch, PoiCategory,
    PointOfInterest, ReverseGeocodeInfo, WeatherAlert, WeatherSnapshot,
};
pub use open_meteo::OpenMeteoClient;
pub use providers::{
    AlertRequest, EnrichmentGenerator, ForecastService, GeocodingService, GeolocationProvider,
    GeolocationRequest, ReverseGeocoder,
};
pub use reverse_geocode::BigDataCloudClient;
pub use session::{SessionProviders, SessionState, SessionStatus, WeatherSession};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}

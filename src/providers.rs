//! Collaborator contracts consumed by the weather session.
//!
//! Each external service is a narrow async trait so that presentation
//! layers and tests can swap in their own implementations. The session
//! itself never owns a wire format; those belong to the concrete
//! clients.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::error::GeoError;
use crate::models::{
    Coordinates, CurrentConditions, LocationNarrative, PlaceMatch, PointOfInterest,
    ReverseGeocodeInfo, WeatherAlert,
};

/// Options for a one-shot position fix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeolocationRequest {
    /// Ask the provider for its best accuracy
    pub high_accuracy: bool,
    /// How long the provider may spend acquiring a fix
    pub timeout: Duration,
    /// Oldest acceptable cached fix; zero forces a fresh one
    pub maximum_age: Duration,
}

impl Default for GeolocationRequest {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::ZERO,
        }
    }
}

/// Device or platform geolocation
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    /// Acquire the device position once
    async fn current_position(
        &self,
        request: &GeolocationRequest,
    ) -> Result<Coordinates, GeoError>;
}

/// Free-text place search
#[async_trait]
pub trait GeocodingService: Send + Sync {
    /// Resolve a place name to candidate coordinates, best match first
    async fn search(&self, query: &str) -> Result<Vec<PlaceMatch>>;
}

/// Coordinates-to-place-name resolution
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Resolve coordinates to the naming tiers of the closest place
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<ReverseGeocodeInfo>;
}

/// Current-conditions forecast source
#[async_trait]
pub trait ForecastService: Send + Sync {
    /// Fetch current conditions for coordinates
    async fn current_conditions(&self, latitude: f64, longitude: f64)
    -> Result<CurrentConditions>;
}

/// Inputs for the unusual-weather alert flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertRequest {
    /// Current conditions description, e.g. "Partly cloudy"
    pub current_weather: String,
    /// Current temperature in Celsius
    pub temperature_c: i32,
    /// Seasonal-average summary sentence
    pub historical_summary: String,
    /// "City, Country" location string
    pub location: String,
}

/// Generative-AI enrichment flows.
///
/// One method per flow, structured input to structured output. The
/// session absorbs every failure from this trait; an enrichment error
/// never downgrades a successful weather resolution.
#[async_trait]
pub trait EnrichmentGenerator: Send + Sync {
    /// Natural-language alert for unusual conditions
    async fn weather_alert(&self, request: &AlertRequest) -> Result<WeatherAlert>;

    /// Short location description plus an optional generated image
    async fn location_narrative(&self, location: &str) -> Result<LocationNarrative>;

    /// Five well-known lodging options for the location
    async fn hotels(&self, location: &str) -> Result<Vec<String>>;

    /// Up to five points of interest for the location
    async fn things_to_do(&self, location: &str) -> Result<Vec<PointOfInterest>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geolocation_request_wants_a_fresh_fix() {
        let request = GeolocationRequest::default();
        assert!(request.high_accuracy);
        assert_eq!(request.timeout, Duration::from_secs(10));
        assert_eq!(request.maximum_age, Duration::ZERO);
    }
}

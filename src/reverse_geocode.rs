//! BigDataCloud reverse-geocoding client.
//!
//! The `reverse-geocode-client` endpoint is keyless. BigDataCloud has
//! no village tier; its `locality` plays the town role and
//! `principalSubdivision` the county role.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::config::NomadAiConfig;
use crate::models::ReverseGeocodeInfo;
use crate::providers::ReverseGeocoder;

/// HTTP client for the BigDataCloud reverse-geocoding API
pub struct BigDataCloudClient {
    http: Client,
    base_url: String,
}

impl BigDataCloudClient {
    /// Create a new reverse-geocoding client
    pub fn new(config: &NomadAiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.weather.timeout_seconds.into()))
            .user_agent(concat!("nomadai/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: config.geocoding.reverse_url.clone(),
        })
    }

    fn reverse_url(&self, latitude: f64, longitude: f64) -> String {
        format!(
            "{}/reverse-geocode-client?latitude={latitude}&longitude={longitude}&localityLanguage=en",
            self.base_url
        )
    }
}

#[async_trait]
impl ReverseGeocoder for BigDataCloudClient {
    #[instrument(skip(self))]
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<ReverseGeocodeInfo> {
        let url = self.reverse_url(latitude, longitude);
        debug!("BigDataCloud reverse-geocode request: {}", url);

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!(
                "BigDataCloud request failed with status {}",
                response.status()
            ));
        }

        let place: wire::ReverseGeocodeResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse BigDataCloud response")?;

        Ok(place.into())
    }
}

/// `BigDataCloud` API response structure and conversion
mod wire {
    use serde::Deserialize;

    use crate::models::ReverseGeocodeInfo;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ReverseGeocodeResponse {
        #[serde(default)]
        pub city: Option<String>,
        #[serde(default)]
        pub locality: Option<String>,
        #[serde(default)]
        pub principal_subdivision: Option<String>,
        #[serde(default)]
        pub country_name: Option<String>,
    }

    impl From<ReverseGeocodeResponse> for ReverseGeocodeInfo {
        fn from(response: ReverseGeocodeResponse) -> Self {
            Self {
                city: non_empty(response.city),
                town: non_empty(response.locality),
                village: None,
                county: non_empty(response.principal_subdivision),
                country: non_empty(response.country_name),
            }
        }
    }

    // BigDataCloud reports missing tiers as empty strings
    fn non_empty(value: Option<String>) -> Option<String> {
        value.filter(|name| !name.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_url() {
        let client = BigDataCloudClient::new(&NomadAiConfig::default()).unwrap();
        let url = client.reverse_url(48.8566, 2.3522);
        assert!(url.contains("latitude=48.8566"));
        assert!(url.contains("longitude=2.3522"));
        assert!(url.contains("localityLanguage=en"));
    }

    #[test]
    fn test_parse_city_response() {
        let body = r#"{
            "latitude": 48.8566,
            "longitude": 2.3522,
            "city": "Paris",
            "locality": "Paris",
            "principalSubdivision": "Ile-de-France",
            "countryName": "France"
        }"#;

        let parsed: wire::ReverseGeocodeResponse = serde_json::from_str(body).unwrap();
        let info: ReverseGeocodeInfo = parsed.into();
        assert_eq!(info.city.as_deref(), Some("Paris"));
        assert_eq!(info.county.as_deref(), Some("Ile-de-France"));
        assert_eq!(info.country.as_deref(), Some("France"));
        assert!(info.village.is_none());
    }

    #[test]
    fn test_empty_strings_normalize_to_none() {
        let body = r#"{
            "city": "",
            "locality": "Saint-Julien",
            "principalSubdivision": "",
            "countryName": "France"
        }"#;

        let parsed: wire::ReverseGeocodeResponse = serde_json::from_str(body).unwrap();
        let info: ReverseGeocodeInfo = parsed.into();
        assert!(info.city.is_none());
        assert_eq!(info.town.as_deref(), Some("Saint-Julien"));
        assert!(info.county.is_none());
    }
}

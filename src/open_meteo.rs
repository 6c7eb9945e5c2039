//! Open-Meteo clients for current conditions and place search.
//!
//! Both endpoints are keyless; the forecast query asks for exactly the
//! fields the dashboard renders, in Celsius and km/h.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, instrument};

use crate::config::NomadAiConfig;
use crate::models::{CurrentConditions, PlaceMatch};
use crate::providers::{ForecastService, GeocodingService};

/// HTTP client for the Open-Meteo forecast and geocoding APIs
pub struct OpenMeteoClient {
    http: Client,
    forecast_url: String,
    search_url: String,
}

impl OpenMeteoClient {
    /// Create a new Open-Meteo client
    pub fn new(config: &NomadAiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.weather.timeout_seconds.into()))
            .user_agent(concat!("nomadai/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            http,
            forecast_url: config.weather.forecast_url.clone(),
            search_url: config.geocoding.search_url.clone(),
        })
    }

    fn current_url(&self, latitude: f64, longitude: f64) -> String {
        format!(
            "{}/forecast?latitude={latitude}&longitude={longitude}&current=temperature_2m,relative_humidity_2m,is_day,weather_code,wind_speed_10m&temperature_unit=celsius&wind_speed_unit=kmh&timezone=auto",
            self.forecast_url
        )
    }

    fn geocode_url(&self, query: &str) -> String {
        format!(
            "{}/search?name={}&count=1&language=en&format=json",
            self.search_url,
            urlencoding::encode(query)
        )
    }
}

#[async_trait]
impl ForecastService for OpenMeteoClient {
    #[instrument(skip(self))]
    async fn current_conditions(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentConditions> {
        let url = self.current_url(latitude, longitude);
        debug!("Open-Meteo current conditions request: {}", url);

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!(
                "Open-Meteo forecast request failed with status {}",
                response.status()
            ));
        }

        let forecast: wire::ForecastResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse Open-Meteo forecast response")?;

        let current = forecast
            .current
            .ok_or_else(|| anyhow!("No current weather data in Open-Meteo response"))?;

        info!(
            temperature = current.temperature,
            code = current.weather_code,
            "current conditions fetched"
        );

        Ok(current.into())
    }
}

#[async_trait]
impl GeocodingService for OpenMeteoClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<PlaceMatch>> {
        let url = self.geocode_url(query);
        debug!("Open-Meteo geocoding request: {}", url);

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!(
                "Open-Meteo geocoding request failed with status {}",
                response.status()
            ));
        }

        let geocoding: wire::GeocodingResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse Open-Meteo geocoding response")?;

        let matches: Vec<PlaceMatch> = geocoding
            .results
            .unwrap_or_default()
            .into_iter()
            .map(Into::into)
            .collect();

        if matches.is_empty() {
            debug!("no geocoding results for '{}'", query);
        }

        Ok(matches)
    }
}

/// `Open-Meteo` API response structures and conversions
mod wire {
    use serde::Deserialize;

    use crate::models::{CurrentConditions, PlaceMatch};

    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub current: Option<CurrentData>,
    }

    #[derive(Debug, Deserialize)]
    pub struct CurrentData {
        #[serde(rename = "temperature_2m")]
        pub temperature: f64,
        #[serde(rename = "relative_humidity_2m")]
        pub relative_humidity: i32,
        #[serde(rename = "wind_speed_10m")]
        pub wind_speed: f64,
        pub weather_code: i32,
        pub is_day: i32,
    }

    impl From<CurrentData> for CurrentConditions {
        fn from(current: CurrentData) -> Self {
            Self {
                temperature_c: current.temperature,
                relative_humidity_pct: current.relative_humidity,
                wind_speed_kmh: current.wind_speed,
                weather_code: current.weather_code,
                is_day: current.is_day != 0,
            }
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodingResponse {
        pub results: Option<Vec<GeocodingResult>>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodingResult {
        pub name: String,
        pub latitude: f64,
        pub longitude: f64,
        pub country: Option<String>,
    }

    impl From<GeocodingResult> for PlaceMatch {
        fn from(result: GeocodingResult) -> Self {
            Self {
                name: result.name,
                latitude: result.latitude,
                longitude: result.longitude,
                country: result.country,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NomadAiConfig;

    fn client() -> OpenMeteoClient {
        OpenMeteoClient::new(&NomadAiConfig::default()).unwrap()
    }

    #[test]
    fn test_current_url_requests_dashboard_fields() {
        let url = client().current_url(48.8566, 2.3522);
        assert!(url.contains("latitude=48.8566"));
        assert!(url.contains("longitude=2.3522"));
        assert!(url.contains("temperature_2m"));
        assert!(url.contains("relative_humidity_2m"));
        assert!(url.contains("is_day"));
        assert!(url.contains("weather_code"));
        assert!(url.contains("wind_speed_10m"));
        assert!(url.contains("temperature_unit=celsius"));
        assert!(url.contains("wind_speed_unit=kmh"));
    }

    #[test]
    fn test_search_url_encodes_query() {
        let url = client().geocode_url("New York");
        assert!(url.contains("name=New%20York"));
        assert!(url.contains("count=1"));
    }

    #[test]
    fn test_parse_current_conditions() {
        let body = r#"{
            "latitude": 48.86,
            "longitude": 2.35,
            "current": {
                "time": "2024-05-04T10:00",
                "temperature_2m": 18.4,
                "relative_humidity_2m": 60,
                "is_day": 1,
                "weather_code": 2,
                "wind_speed_10m": 11.7
            }
        }"#;

        let parsed: super::wire::ForecastResponse = serde_json::from_str(body).unwrap();
        let current: CurrentConditions = parsed.current.unwrap().into();
        assert_eq!(current.temperature_c, 18.4);
        assert_eq!(current.relative_humidity_pct, 60);
        assert_eq!(current.wind_speed_kmh, 11.7);
        assert_eq!(current.weather_code, 2);
        assert!(current.is_day);
    }

    #[test]
    fn test_parse_night_flag() {
        let body = r#"{
            "current": {
                "temperature_2m": 9.0,
                "relative_humidity_2m": 80,
                "is_day": 0,
                "weather_code": 0,
                "wind_speed_10m": 3.0
            }
        }"#;

        let parsed: super::wire::ForecastResponse = serde_json::from_str(body).unwrap();
        let current: CurrentConditions = parsed.current.unwrap().into();
        assert!(!current.is_day);
    }

    #[test]
    fn test_parse_geocoding_results() {
        let body = r#"{
            "results": [
                {"name": "Paris", "latitude": 48.85341, "longitude": 2.3488, "country": "France"}
            ]
        }"#;

        let parsed: super::wire::GeocodingResponse = serde_json::from_str(body).unwrap();
        let matches: Vec<PlaceMatch> = parsed
            .results
            .unwrap_or_default()
            .into_iter()
            .map(Into::into)
            .collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Paris");
        assert_eq!(matches[0].coordinates().latitude, 48.85341);
    }

    #[test]
    fn test_parse_empty_geocoding_response() {
        let parsed: super::wire::GeocodingResponse =
            serde_json::from_str(r#"{"generationtime_ms": 0.5}"#).unwrap();
        assert!(parsed.results.is_none());
    }
}

//! Google generative-language implementation of the enrichment flows.
//!
//! Each flow is a single prompt bound to a JSON response schema; the
//! narrative flow additionally generates an image through the Imagen
//! predict endpoint and returns it as a data URI.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, instrument, warn};

use crate::config::NomadAiConfig;
use crate::models::{LocationNarrative, PointOfInterest, WeatherAlert};
use crate::providers::{AlertRequest, EnrichmentGenerator};

/// Client for the Google generative-language API
pub struct GeminiClient {
    http: Client,
    api_key: String,
    base_url: String,
    text_model: String,
    image_model: String,
}

impl GeminiClient {
    /// Create a new enrichment client; requires an API key in config
    pub fn new(config: &NomadAiConfig) -> Result<Self> {
        let api_key = config
            .ai
            .api_key
            .clone()
            .ok_or_else(|| anyhow!("AI API key is not configured"))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.ai.timeout_seconds.into()))
            .user_agent(concat!("nomadai/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            http,
            api_key,
            base_url: config.ai.base_url.clone(),
            text_model: config.ai.text_model.clone(),
            image_model: config.ai.image_model.clone(),
        })
    }

    /// Send one prompt and parse the schema-constrained JSON reply
    async fn generate<T: JsonSchema + DeserializeOwned>(&self, prompt: String) -> Result<T> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.text_model
        );

        let schema = serde_json::to_value(
            schemars::r#gen::SchemaGenerator::default().into_root_schema_for::<T>(),
        )?;

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema,
            }
        });

        debug!(model = %self.text_model, "Gemini structured output request");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Gemini API error ({status}): {error_text}"));
        }

        let reply: wire::GenerateContentResponse = response.json().await?;
        let text = reply
            .first_text()
            .ok_or_else(|| anyhow!("No candidates in Gemini response"))?;

        serde_json::from_str(&text).with_context(|| "Failed to parse structured Gemini output")
    }

    /// Generate an image and return it as a data URI
    async fn generate_image(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/models/{}:predict", self.base_url, self.image_model);

        let body = json!({
            "instances": [{ "prompt": prompt }],
            "parameters": { "sampleCount": 1 }
        });

        debug!(model = %self.image_model, "Imagen predict request");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Imagen API error ({status}): {error_text}"));
        }

        let reply: wire::PredictResponse = response.json().await?;
        let prediction = reply
            .predictions
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No image prediction in Imagen response"))?;

        let mime_type = prediction
            .mime_type
            .unwrap_or_else(|| "image/png".to_string());
        Ok(format!(
            "data:{mime_type};base64,{}",
            prediction.bytes_base64_encoded
        ))
    }
}

#[async_trait]
impl EnrichmentGenerator for GeminiClient {
    #[instrument(skip(self, request), fields(location = %request.location))]
    async fn weather_alert(&self, request: &AlertRequest) -> Result<WeatherAlert> {
        let output: wire::AlertOutput = self.generate(prompts::weather_alert(request)).await?;
        Ok(WeatherAlert {
            message: output.alert_message,
        })
    }

    #[instrument(skip(self))]
    async fn location_narrative(&self, location: &str) -> Result<LocationNarrative> {
        let description = self.generate::<wire::DescriptionOutput>(prompts::location_description(location));
        let image_prompt = prompts::location_image(location);
        let image = self.generate_image(&image_prompt);
        let (description, image) = tokio::join!(description, image);

        let image_url = match image {
            Ok(url) => Some(url),
            Err(error) => {
                warn!(%error, "location image generation failed");
                None
            }
        };

        Ok(LocationNarrative {
            description: description?.description,
            image_url,
        })
    }

    #[instrument(skip(self))]
    async fn hotels(&self, location: &str) -> Result<Vec<String>> {
        let output: wire::HotelsOutput = self.generate(prompts::hotels(location)).await?;
        if output.hotels.len() != 5 {
            warn!(
                count = output.hotels.len(),
                "hotel list does not have the expected five entries"
            );
        }
        Ok(output.hotels)
    }

    #[instrument(skip(self))]
    async fn things_to_do(&self, location: &str) -> Result<Vec<PointOfInterest>> {
        let output: wire::PoisOutput = self.generate(prompts::things_to_do(location)).await?;
        let mut pois = output.points_of_interest;
        pois.truncate(5);
        Ok(pois)
    }
}

/// Prompt templates, one per flow
mod prompts {
    use crate::providers::AlertRequest;

    pub fn weather_alert(request: &AlertRequest) -> String {
        format!(
            "You are an intelligent weather alert system.\n\n\
             You will analyze the current weather conditions, temperature, and historical weather data to determine if there are any unusual weather conditions.\n\n\
             Current Weather: {current}\n\
             Temperature: {temperature}°C\n\
             Historical Weather Data: {historical}\n\
             Location: {location}\n\n\
             Based on this information, generate an alert message if there are any unexpected cold snaps, chances of rain when it would normally be dry, or other unusual conditions. If the weather is normal, inform the user that the current conditions are normal for this time of year.",
            current = request.current_weather,
            temperature = request.temperature_c,
            historical = request.historical_summary,
            location = request.location,
        )
    }

    pub fn location_description(location: &str) -> String {
        format!(
            "Generate a brief, engaging, one-paragraph description for the following location: {location}. Focus on what makes it unique, like a famous landmark, its culture, or natural beauty."
        )
    }

    pub fn location_image(location: &str) -> String {
        format!(
            "A beautiful, vibrant, high-quality photograph of {location}. Cinematic, professional photography."
        )
    }

    pub fn hotels(location: &str) -> String {
        format!(
            "List exactly 5 well-known hotels or lodging options available in {location}. Just provide the names."
        )
    }

    pub fn things_to_do(location: &str) -> String {
        format!(
            "You are a travel assistant. List up to 5 essential points of interest for a traveler in {location}. Include a mix of types like airports, parks, and markets. For each, provide its name, type, and a brief, one-sentence description."
        )
    }
}

/// Generative-language API wire structures
mod wire {
    use schemars::JsonSchema;
    use serde::Deserialize;

    use crate::models::PointOfInterest;

    #[derive(Debug, Deserialize)]
    pub struct GenerateContentResponse {
        #[serde(default)]
        pub candidates: Vec<Candidate>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Candidate {
        pub content: Content,
    }

    #[derive(Debug, Deserialize)]
    pub struct Content {
        #[serde(default)]
        pub parts: Vec<Part>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Part {
        #[serde(default)]
        pub text: Option<String>,
    }

    impl GenerateContentResponse {
        pub fn first_text(self) -> Option<String> {
            self.candidates
                .into_iter()
                .next()?
                .content
                .parts
                .into_iter()
                .find_map(|part| part.text)
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct PredictResponse {
        #[serde(default)]
        pub predictions: Vec<Prediction>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Prediction {
        pub bytes_base64_encoded: String,
        pub mime_type: Option<String>,
    }

    /// Structured output of the alert flow
    #[derive(Debug, Deserialize, JsonSchema)]
    #[serde(rename_all = "camelCase")]
    pub struct AlertOutput {
        /// Message alerting the user to unusual conditions
        pub alert_message: String,
    }

    /// Structured output of the location-description prompt
    #[derive(Debug, Deserialize, JsonSchema)]
    pub struct DescriptionOutput {
        pub description: String,
    }

    /// Structured output of the hotels flow
    #[derive(Debug, Deserialize, JsonSchema)]
    pub struct HotelsOutput {
        /// Names of five well-known hotels
        pub hotels: Vec<String>,
    }

    /// Structured output of the points-of-interest flow
    #[derive(Debug, Deserialize, JsonSchema)]
    #[serde(rename_all = "camelCase")]
    pub struct PoisOutput {
        pub points_of_interest: Vec<PointOfInterest>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_prompt_includes_all_inputs() {
        let request = AlertRequest {
            current_weather: "Partly cloudy".to_string(),
            temperature_c: 18,
            historical_summary: "around 19°C with variable cloudiness".to_string(),
            location: "Paris, France".to_string(),
        };

        let prompt = prompts::weather_alert(&request);
        assert!(prompt.contains("Current Weather: Partly cloudy"));
        assert!(prompt.contains("Temperature: 18°C"));
        assert!(prompt.contains("around 19°C"));
        assert!(prompt.contains("Location: Paris, France"));
    }

    #[test]
    fn test_flow_prompts_name_the_location() {
        for prompt in [
            prompts::location_description("Kyoto, Japan"),
            prompts::location_image("Kyoto, Japan"),
            prompts::hotels("Kyoto, Japan"),
            prompts::things_to_do("Kyoto, Japan"),
        ] {
            assert!(prompt.contains("Kyoto, Japan"));
        }
    }

    #[test]
    fn test_first_text_takes_first_candidate() {
        let body = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "{\"description\": \"A city.\"}"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }"#;

        let reply: wire::GenerateContentResponse = serde_json::from_str(body).unwrap();
        let text = reply.first_text().unwrap();
        let output: wire::DescriptionOutput = serde_json::from_str(&text).unwrap();
        assert_eq!(output.description, "A city.");
    }

    #[test]
    fn test_empty_candidates_yield_none() {
        let reply: wire::GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(reply.first_text().is_none());
    }

    #[test]
    fn test_alert_output_uses_camel_case() {
        let output: wire::AlertOutput =
            serde_json::from_str(r#"{"alertMessage": "Colder than usual."}"#).unwrap();
        assert_eq!(output.alert_message, "Colder than usual.");
    }

    #[test]
    fn test_prediction_parses_to_data_uri_parts() {
        let body = r#"{
            "predictions": [
                {"bytesBase64Encoded": "aGVsbG8=", "mimeType": "image/png"}
            ]
        }"#;

        let reply: wire::PredictResponse = serde_json::from_str(body).unwrap();
        let prediction = reply.predictions.into_iter().next().unwrap();
        assert_eq!(prediction.bytes_base64_encoded, "aGVsbG8=");
        assert_eq!(prediction.mime_type.as_deref(), Some("image/png"));
    }
}

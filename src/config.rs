//! Configuration management for the `NomadAI` weather core.
//!
//! Handles loading configuration from files and environment variables,
//! and provides validation for all configuration settings.

use anyhow::{Context, Result, anyhow};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use crate::NomadAiError;
use crate::providers::GeolocationRequest;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NomadAiConfig {
    /// Forecast API configuration
    pub weather: WeatherConfig,
    /// Geocoding endpoints configuration
    pub geocoding: GeocodingConfig,
    /// Geolocation acquisition settings
    pub geolocation: GeolocationConfig,
    /// Generative-AI enrichment configuration
    pub ai: AiConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Forecast API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL of the Open-Meteo forecast API
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub timeout_seconds: u32,
}

/// Geocoding endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Base URL of the Open-Meteo geocoding search API
    #[serde(default = "default_search_url")]
    pub search_url: String,
    /// Base URL of the BigDataCloud reverse-geocoding API
    #[serde(default = "default_reverse_url")]
    pub reverse_url: String,
}

/// Geolocation acquisition settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeolocationConfig {
    /// Ask the provider for its best accuracy
    #[serde(default = "default_high_accuracy")]
    pub high_accuracy: bool,
    /// How long the provider may spend acquiring a fix
    #[serde(default = "default_geolocation_timeout")]
    pub timeout_seconds: u32,
    /// Oldest acceptable cached fix in seconds; zero forces a fresh one
    #[serde(default)]
    pub maximum_age_seconds: u32,
}

impl GeolocationConfig {
    /// Build the provider request these settings describe
    #[must_use]
    pub fn request(&self) -> GeolocationRequest {
        GeolocationRequest {
            high_accuracy: self.high_accuracy,
            timeout: Duration::from_secs(self.timeout_seconds.into()),
            maximum_age: Duration::from_secs(self.maximum_age_seconds.into()),
        }
    }
}

/// Generative-AI enrichment settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// API key for the generative-language API
    pub api_key: Option<String>,
    /// Base URL of the generative-language API
    #[serde(default = "default_ai_base_url")]
    pub base_url: String,
    /// Text generation model id
    #[serde(default = "default_text_model")]
    pub text_model: String,
    /// Image generation model id
    #[serde(default = "default_image_model")]
    pub image_model: String,
    /// Request timeout in seconds
    #[serde(default = "default_ai_timeout")]
    pub timeout_seconds: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl LoggingConfig {
    /// Install the global tracing subscriber described by this config
    pub fn init(&self) -> Result<()> {
        let filter = EnvFilter::try_new(&self.level)
            .with_context(|| format!("Invalid log level '{}'", self.level))?;

        let result = if self.format == "json" {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .try_init()
        } else {
            tracing_subscriber::fmt().with_env_filter(filter).try_init()
        };

        result.map_err(|error| anyhow!("Failed to install tracing subscriber: {error}"))
    }
}

// Default value functions
fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_search_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

fn default_reverse_url() -> String {
    "https://api.bigdatacloud.net/data".to_string()
}

fn default_http_timeout() -> u32 {
    30
}

fn default_ai_timeout() -> u32 {
    60
}

fn default_high_accuracy() -> bool {
    true
}

fn default_geolocation_timeout() -> u32 {
    10
}

fn default_ai_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_text_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_image_model() -> String {
    "imagen-4.0-fast-generate-001".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for NomadAiConfig {
    fn default() -> Self {
        Self {
            weather: WeatherConfig {
                forecast_url: default_forecast_url(),
                timeout_seconds: default_http_timeout(),
            },
            geocoding: GeocodingConfig {
                search_url: default_search_url(),
                reverse_url: default_reverse_url(),
            },
            geolocation: GeolocationConfig {
                high_accuracy: default_high_accuracy(),
                timeout_seconds: default_geolocation_timeout(),
                maximum_age_seconds: 0,
            },
            ai: AiConfig {
                api_key: None,
                base_url: default_ai_base_url(),
                text_model: default_text_model(),
                image_model: default_image_model(),
                timeout_seconds: default_ai_timeout(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
            },
        }
    }
}

impl NomadAiConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment variable overrides with NOMADAI_ prefix
        builder = builder.add_source(
            Environment::with_prefix("NOMADAI")
                .separator("_")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: NomadAiConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("nomadai").join("config.toml"))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        // AI key is optional; enrichment is disabled without one
        if let Some(api_key) = &self.ai.api_key {
            if api_key.is_empty() {
                return Err(NomadAiError::config(
                    "AI API key cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }

            if api_key.len() < 8 {
                return Err(NomadAiError::config(
                    "AI API key appears to be invalid (too short). Please check your API key.",
                )
                .into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds == 0 || self.weather.timeout_seconds > 300 {
            return Err(NomadAiError::config(
                "Weather API timeout must be between 1 and 300 seconds",
            )
            .into());
        }

        if self.ai.timeout_seconds == 0 || self.ai.timeout_seconds > 300 {
            return Err(
                NomadAiError::config("AI API timeout must be between 1 and 300 seconds").into(),
            );
        }

        if self.geolocation.timeout_seconds == 0 || self.geolocation.timeout_seconds > 120 {
            return Err(NomadAiError::config(
                "Geolocation timeout must be between 1 and 120 seconds",
            )
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(NomadAiError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(NomadAiError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Forecast", &self.weather.forecast_url),
            ("Geocoding search", &self.geocoding.search_url),
            ("Reverse geocoding", &self.geocoding.reverse_url),
            ("AI", &self.ai.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(NomadAiError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}

//! Best-effort AI enrichment payloads.
//!
//! None of these are required for a successful weather resolution; an
//! absent field means "no enrichment available", never an error.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Natural-language alert for unusual weather conditions
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct WeatherAlert {
    pub message: String,
}

/// Short location description with an optional generated image
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LocationNarrative {
    pub description: String,
    /// Data URI of a generated image, when image generation succeeded
    pub image_url: Option<String>,
}

/// Category of a point of interest
#[derive(Debug, Serialize, Deserialize, JsonSchema, Clone, Copy, PartialEq, Eq)]
pub enum PoiCategory {
    Park,
    Airport,
    Market,
    Landmark,
    Attraction,
}

/// Single point of interest suggested to a traveler
#[derive(Debug, Serialize, Deserialize, JsonSchema, Clone, PartialEq, Eq)]
pub struct PointOfInterest {
    /// Name of the point of interest
    pub name: String,
    #[serde(rename = "type")]
    pub category: PoiCategory,
    /// Brief, one-sentence description
    pub description: String,
}

//! Location models: coordinates, search matches and reverse-geocode data

use serde::{Deserialize, Serialize};

/// Geographic coordinates in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinates {
    /// Create new coordinates
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Format coordinates as a display string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Single match returned by the place-search service
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlaceMatch {
    /// Place name as reported by the search service
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Country name, when the service reports one
    pub country: Option<String>,
}

impl PlaceMatch {
    /// Coordinates of this match
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Raw reverse-geocoding result before the naming tiers are collapsed.
///
/// Providers fill whichever tiers they know about; absent or empty
/// tiers are `None`.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ReverseGeocodeInfo {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub county: Option<String>,
    pub country: Option<String>,
}

/// Resolved place displayed alongside the weather
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LocationInfo {
    pub city: String,
    pub country: String,
}

impl LocationInfo {
    /// Collapse the reverse-geocode naming tiers into a display name.
    ///
    /// Falls back through city, town, village and county, taking the
    /// first non-empty tier; the raw coordinates are the name of last
    /// resort.
    #[must_use]
    pub fn from_reverse(info: &ReverseGeocodeInfo, coordinates: Coordinates) -> Self {
        let city = [&info.city, &info.town, &info.village, &info.county]
            .into_iter()
            .flatten()
            .find(|name| !name.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| coordinates.format_coordinates());

        let country = info
            .country
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| "Unknown".to_string());

        Self { city, country }
    }

    /// "City, Country" string handed to the enrichment prompts
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }
}

//! Error types surfaced by the weather session

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error code reported by a geolocation provider for a failed fix
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeoError {
    /// The user denied the location permission
    #[error("location permission denied")]
    PermissionDenied,

    /// The provider could not determine a position
    #[error("position unavailable")]
    PositionUnavailable,

    /// No fix arrived within the requested timeout
    #[error("position request timed out")]
    Timeout,

    /// No geolocation capability exists on this device
    #[error("geolocation not supported")]
    Unsupported,
}

/// Which side of the resolution join failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailedFetch {
    Weather,
    Location,
    Both,
}

impl std::fmt::Display for FailedFetch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailedFetch::Weather => write!(f, "weather"),
            FailedFetch::Location => write!(f, "location"),
            FailedFetch::Both => write!(f, "weather and location"),
        }
    }
}

/// Resolution-critical failures surfaced to session observers.
///
/// Enrichment failures never appear here; they are absorbed and the
/// corresponding fields simply stay unset.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionError {
    #[error("geolocation permission denied")]
    GeolocationDenied,

    #[error("geolocation position unavailable")]
    GeolocationUnavailable,

    #[error("geolocation request timed out")]
    GeolocationTimeout,

    #[error("geolocation not supported")]
    GeolocationUnsupported,

    #[error("no results for search query \"{query}\"")]
    SearchNotFound { query: String },

    #[error("network failure fetching {which}")]
    NetworkFailure { which: FailedFetch },
}

impl From<GeoError> for SessionError {
    fn from(code: GeoError) -> Self {
        match code {
            GeoError::PermissionDenied => SessionError::GeolocationDenied,
            GeoError::PositionUnavailable => SessionError::GeolocationUnavailable,
            GeoError::Timeout => SessionError::GeolocationTimeout,
            GeoError::Unsupported => SessionError::GeolocationUnsupported,
        }
    }
}

impl SessionError {
    /// User-facing message for the dashboard error banner
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SessionError::GeolocationDenied => {
                "Location access was denied. Please enable it in your settings or use the search bar."
                    .to_string()
            }
            SessionError::GeolocationUnavailable => {
                "Your location information is currently unavailable.".to_string()
            }
            SessionError::GeolocationTimeout => {
                "The request to get your location timed out.".to_string()
            }
            SessionError::GeolocationUnsupported => {
                "Geolocation is not supported on this device. Please use the search bar.".to_string()
            }
            SessionError::SearchNotFound { query } => {
                format!("Could not find a location named \"{query}\". Please try another search.")
            }
            SessionError::NetworkFailure { which } => match which {
                FailedFetch::Weather => {
                    "Could not fetch weather data. Please check your connection and try again."
                        .to_string()
                }
                FailedFetch::Location => {
                    "Could not fetch location data. Please check your connection and try again."
                        .to_string()
                }
                FailedFetch::Both => {
                    "Could not fetch weather or location data. Please check your connection and try again."
                        .to_string()
                }
            },
        }
    }
}

/// General crate error for configuration and setup paths
#[derive(Error, Debug)]
pub enum NomadAiError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl NomadAiError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_error_mapping() {
        assert_eq!(
            SessionError::from(GeoError::PermissionDenied),
            SessionError::GeolocationDenied
        );
        assert_eq!(
            SessionError::from(GeoError::PositionUnavailable),
            SessionError::GeolocationUnavailable
        );
        assert_eq!(
            SessionError::from(GeoError::Timeout),
            SessionError::GeolocationTimeout
        );
        assert_eq!(
            SessionError::from(GeoError::Unsupported),
            SessionError::GeolocationUnsupported
        );
    }

    #[test]
    fn test_user_messages_are_distinct() {
        let errors = [
            SessionError::GeolocationDenied,
            SessionError::GeolocationUnavailable,
            SessionError::GeolocationTimeout,
            SessionError::GeolocationUnsupported,
            SessionError::SearchNotFound {
                query: "Atlantis".to_string(),
            },
            SessionError::NetworkFailure {
                which: FailedFetch::Weather,
            },
            SessionError::NetworkFailure {
                which: FailedFetch::Location,
            },
            SessionError::NetworkFailure {
                which: FailedFetch::Both,
            },
        ];

        for (i, a) in errors.iter().enumerate() {
            for b in errors.iter().skip(i + 1) {
                assert_ne!(a.user_message(), b.user_message());
            }
        }
    }

    #[test]
    fn test_search_not_found_names_the_query() {
        let err = SessionError::SearchNotFound {
            query: "Springfield".to_string(),
        };
        assert!(err.user_message().contains("Springfield"));
    }
}

//! Core data models shared across the session and its collaborators

pub mod enrichment;
pub mod location;
pub mod weather;

pub use enrichment::{LocationNarrative, PoiCategory, PointOfInterest, WeatherAlert};
pub use location::{Coordinates, LocationInfo, PlaceMatch, ReverseGeocodeInfo};
pub use weather::{CurrentConditions, WeatherSnapshot};

//! The weather session state machine.
//!
//! A [`WeatherSession`] owns the current location, derived weather and
//! enrichment data, and a status; it orchestrates the fetch sequence
//! and publishes every transition to observers through a watch channel.
//! Only the orchestration routines mutate the state — observers read
//! snapshots.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use rand::RngExt;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use crate::classifier::{WeatherClassification, classify};
use crate::error::{FailedFetch, SessionError};
use crate::models::{
    Coordinates, LocationInfo, LocationNarrative, PointOfInterest, WeatherAlert, WeatherSnapshot,
};
use crate::providers::{
    AlertRequest, EnrichmentGenerator, ForecastService, GeocodingService, GeolocationProvider,
    GeolocationRequest, ReverseGeocoder,
};

/// Lifecycle status of the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// No resolution has been attempted yet
    #[default]
    Idle,
    /// A resolution attempt is in flight
    Loading,
    /// Location and weather are both resolved
    Success,
    /// The last resolution attempt failed
    Error,
}

/// Aggregate state owned by the session. Observers receive clones.
///
/// Invariants: `Success` implies `location` and `weather` are present;
/// `Error` implies `error` is present, while weather and location may
/// survive from a prior success.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub status: SessionStatus,
    /// Resolution attempt this state belongs to
    pub generation: u64,
    pub coordinates: Option<Coordinates>,
    pub location: Option<LocationInfo>,
    pub weather: Option<WeatherSnapshot>,
    pub alert: Option<WeatherAlert>,
    pub narrative: Option<LocationNarrative>,
    pub hotels: Option<Vec<String>>,
    pub points_of_interest: Option<Vec<PointOfInterest>>,
    pub error: Option<SessionError>,
    /// When the current weather was resolved
    pub resolved_at: Option<DateTime<Utc>>,
}

impl SessionState {
    /// Classification of the resolved weather, when present
    #[must_use]
    pub fn classification(&self) -> Option<WeatherClassification> {
        self.weather
            .as_ref()
            .map(|weather| classify(weather.weather_code, weather.is_day))
    }

    /// User-facing error message, when in the error state
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(SessionError::user_message)
    }

    fn clear_results(&mut self) {
        self.coordinates = None;
        self.location = None;
        self.weather = None;
        self.alert = None;
        self.narrative = None;
        self.hotels = None;
        self.points_of_interest = None;
        self.resolved_at = None;
    }
}

/// Collaborators the session orchestrates
pub struct SessionProviders {
    pub geolocator: Arc<dyn GeolocationProvider>,
    pub geocoder: Arc<dyn GeocodingService>,
    pub reverse_geocoder: Arc<dyn ReverseGeocoder>,
    pub forecast: Arc<dyn ForecastService>,
    pub enrichment: Arc<dyn EnrichmentGenerator>,
}

/// Long-lived weather session for one dashboard.
///
/// Every resolution attempt is tagged with a generation number; late
/// responses from a superseded attempt are discarded instead of
/// overwriting newer state.
pub struct WeatherSession {
    providers: SessionProviders,
    geolocation_request: GeolocationRequest,
    state: watch::Sender<SessionState>,
    next_generation: AtomicU64,
}

impl WeatherSession {
    /// Create a session in the loading state
    #[must_use]
    pub fn new(providers: SessionProviders, geolocation_request: GeolocationRequest) -> Self {
        let initial = SessionState {
            status: SessionStatus::Loading,
            ..SessionState::default()
        };
        let (state, _) = watch::channel(initial);

        Self {
            providers,
            geolocation_request,
            state,
            next_generation: AtomicU64::new(0),
        }
    }

    /// Current state snapshot
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Subscribe to state transitions
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Resolve weather for the device position.
    ///
    /// On a provider error the session enters the error state with a
    /// message specific to the provider's error code.
    #[instrument(skip(self))]
    pub async fn request_current_location(&self) {
        let generation = self.begin_attempt();
        if !self.commit(generation, |state| {
            state.status = SessionStatus::Loading;
            state.error = None;
        }) {
            return;
        }

        match self
            .providers
            .geolocator
            .current_position(&self.geolocation_request)
            .await
        {
            Ok(coordinates) => self.resolve_at(generation, coordinates).await,
            Err(code) => {
                warn!(%code, "geolocation failed");
                self.fail(generation, code.into());
            }
        }
    }

    /// Resolve weather for a searched place name.
    ///
    /// An empty query is a no-op: no network call, no state change.
    #[instrument(skip(self))]
    pub async fn search_location(&self, query: &str) {
        if query.is_empty() {
            return;
        }

        let generation = self.begin_attempt();
        if !self.commit(generation, |state| {
            state.status = SessionStatus::Loading;
            state.error = None;
            state.clear_results();
        }) {
            return;
        }

        match self.providers.geocoder.search(query).await {
            Ok(results) => {
                if let Some(place) = results.into_iter().next() {
                    self.resolve_at(generation, place.coordinates()).await;
                } else {
                    self.fail(
                        generation,
                        SessionError::SearchNotFound {
                            query: query.to_string(),
                        },
                    );
                }
            }
            Err(error) => {
                warn!(%error, query, "place search failed");
                self.fail(
                    generation,
                    SessionError::SearchNotFound {
                        query: query.to_string(),
                    },
                );
            }
        }
    }

    /// Resolve weather and location for known coordinates
    pub async fn resolve(&self, coordinates: Coordinates) {
        let generation = self.begin_attempt();
        self.resolve_at(generation, coordinates).await;
    }

    /// Recover from an error state by re-requesting the device position
    pub async fn retry(&self) {
        self.request_current_location().await;
    }

    /// Core orchestration: reverse-geocode and forecast join, success
    /// commit, then best-effort enrichment.
    async fn resolve_at(&self, generation: u64, coordinates: Coordinates) {
        if !self.commit(generation, |state| {
            state.status = SessionStatus::Loading;
            state.error = None;
            state.clear_results();
            state.coordinates = Some(coordinates);
        }) {
            return;
        }

        let (place, conditions) = tokio::join!(
            self.providers
                .reverse_geocoder
                .reverse(coordinates.latitude, coordinates.longitude),
            self.providers
                .forecast
                .current_conditions(coordinates.latitude, coordinates.longitude),
        );

        let (place, conditions) = match (place, conditions) {
            (Ok(place), Ok(conditions)) => (place, conditions),
            (Err(error), Ok(_)) => {
                warn!(%error, "reverse geocoding failed");
                self.fail(
                    generation,
                    SessionError::NetworkFailure {
                        which: FailedFetch::Location,
                    },
                );
                return;
            }
            (Ok(_), Err(error)) => {
                warn!(%error, "forecast fetch failed");
                self.fail(
                    generation,
                    SessionError::NetworkFailure {
                        which: FailedFetch::Weather,
                    },
                );
                return;
            }
            (Err(location_error), Err(weather_error)) => {
                warn!(%location_error, %weather_error, "reverse geocoding and forecast both failed");
                self.fail(
                    generation,
                    SessionError::NetworkFailure {
                        which: FailedFetch::Both,
                    },
                );
                return;
            }
        };

        let location = LocationInfo::from_reverse(&place, coordinates);
        let weather = WeatherSnapshot::from_conditions(&conditions);

        // Independent commit point: the weather is visible to observers
        // before any enrichment completes.
        if !self.commit(generation, |state| {
            state.status = SessionStatus::Success;
            state.location = Some(location.clone());
            state.weather = Some(weather.clone());
            state.resolved_at = Some(Utc::now());
        }) {
            return;
        }

        self.enrich(generation, &location, &weather).await;
    }

    /// Run all enrichment flows concurrently and merge each result as
    /// it lands. Failures are absorbed: the fields stay unset and the
    /// published success is never downgraded.
    async fn enrich(&self, generation: u64, location: &LocationInfo, weather: &WeatherSnapshot) {
        let place = location.display();
        let classification = classify(weather.weather_code, weather.is_day);

        let alert_request = AlertRequest {
            current_weather: classification.description.to_string(),
            temperature_c: weather.temperature_c,
            historical_summary: historical_summary(&place, weather.temperature_c),
            location: place.clone(),
        };

        let (alert, narrative, hotels, pois) = tokio::join!(
            self.providers.enrichment.weather_alert(&alert_request),
            self.providers.enrichment.location_narrative(&place),
            self.providers.enrichment.hotels(&place),
            self.providers.enrichment.things_to_do(&place),
        );

        match alert {
            Ok(alert) => {
                self.commit(generation, |state| state.alert = Some(alert));
            }
            Err(error) => warn!(%error, "weather alert enrichment failed"),
        }

        match narrative {
            Ok(narrative) => {
                self.commit(generation, |state| state.narrative = Some(narrative));
            }
            Err(error) => warn!(%error, "location narrative enrichment failed"),
        }

        match hotels {
            Ok(hotels) => {
                self.commit(generation, |state| state.hotels = Some(hotels));
            }
            Err(error) => warn!(%error, "hotel enrichment failed"),
        }

        match pois {
            Ok(pois) => {
                self.commit(generation, |state| state.points_of_interest = Some(pois));
            }
            Err(error) => warn!(%error, "points-of-interest enrichment failed"),
        }
    }

    fn begin_attempt(&self) -> u64 {
        self.next_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn fail(&self, generation: u64, error: SessionError) {
        self.commit(generation, |state| {
            state.status = SessionStatus::Error;
            state.error = Some(error);
        });
    }

    /// Apply a state change if `generation` is still current.
    ///
    /// Returns false when a newer resolution attempt has started in the
    /// meantime; the change is discarded in that case.
    fn commit(&self, generation: u64, apply: impl FnOnce(&mut SessionState)) -> bool {
        self.state.send_if_modified(|state| {
            if generation < state.generation {
                debug!(
                    stale = generation,
                    current = state.generation,
                    "discarding stale session update"
                );
                return false;
            }
            state.generation = generation;
            apply(state);
            true
        })
    }
}

/// Synthesize the seasonal-average sentence handed to the alert flow.
///
/// No historical climate source is wired up; the current reading is
/// jittered by up to 2.5°C instead.
// TODO: feed this from a climate-normals provider once one is integrated.
fn historical_summary(location: &str, temperature_c: i32) -> String {
    let jitter: f64 = rand::rng().random_range(-2.5..=2.5);
    let seasonal = (f64::from(temperature_c) + jitter).round();
    format!(
        "The historical average temperature for {location} this time of year is around {seasonal}°C with variable cloudiness."
    )
}

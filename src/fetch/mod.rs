//! Collaborator contracts and request assembly
//!
//! Geocoding and map-data acquisition happen outside the renderer. This module
//! defines their contracts, a pair of in-process implementations, and the code that
//! turns a [`GenerationConfig`] into a [`RenderRequest`]: resolve the place, derive
//! the bounding box, fetch the enabled layers concurrently (each with its own
//! retries), then format the poster text.

pub mod geocode;
pub mod source;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    core::{
        bounds::bbox_from_center,
        config::ThemeConfig,
        constants::{
            DEFAULT_MAP_RADIUS, MAX_CUSTOM_RESOLUTION, MAX_MAP_RADIUS, MIN_CUSTOM_RESOLUTION,
            MIN_MAP_RADIUS,
        },
        geo::{BoundingBox, GeoPoint, Resolution},
    },
    data::{
        display::{DisplayConfig, Location, TextOverrides},
        osm::GeometryElement,
    },
    layers::classify::FeatureFamily,
    rendering::composer::RenderRequest,
    PosterError, Result,
};

pub use geocode::StaticGeocoder;
pub use source::OverpassFileFetcher;

/// What the caller asked to geocode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LocationQuery {
    City { city: String, country: String },
    Coordinates { latitude: f64, longitude: f64 },
}

impl LocationQuery {
    pub fn coordinates(point: GeoPoint) -> Self {
        Self::Coordinates {
            latitude: point.latitude,
            longitude: point.longitude,
        }
    }
}

/// Resolves a place name or coordinate into a [`Location`]
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, query: &LocationQuery) -> Result<Location>;
}

/// Fetches the tagged geometry of one feature family inside a bounding box
#[async_trait]
pub trait MapDataFetcher: Send + Sync {
    async fn fetch(&self, bbox: &BoundingBox, family: FeatureFamily)
        -> Result<Vec<GeometryElement>>;
}

/// Per-layer retry behaviour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub exponential_backoff: bool,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            retry_delay: Duration::ZERO,
            exponential_backoff: false,
        }
    }

    /// Delay before the given (1-based) retry attempt
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if self.exponential_backoff {
            self.retry_delay * 2u32.saturating_pow(attempt.saturating_sub(2))
        } else {
            self.retry_delay
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_millis(500),
            exponential_backoff: true,
        }
    }
}

/// Which optional layers to fetch. Roads are always fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerToggles {
    pub water: bool,
    pub parks: bool,
}

impl Default for LayerToggles {
    fn default() -> Self {
        Self {
            water: true,
            parks: true,
        }
    }
}

/// Elements of every layer, empty for disabled ones
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchedLayers {
    pub roads: Vec<GeometryElement>,
    pub water: Vec<GeometryElement>,
    pub parks: Vec<GeometryElement>,
}

/// Fetches one layer, retrying according to `policy`
pub async fn fetch_with_retry<F: MapDataFetcher + ?Sized>(
    fetcher: &F,
    bbox: &BoundingBox,
    family: FeatureFamily,
    policy: &RetryPolicy,
) -> Result<Vec<GeometryElement>> {
    let max_attempts = policy.max_attempts.max(1);
    let mut last_error = String::new();

    for attempt in 1..=max_attempts {
        if attempt > 1 {
            tokio::time::sleep(policy.delay_before(attempt)).await;
        }
        log::debug!("fetch {} layer attempt {}", family, attempt);
        match fetcher.fetch(bbox, family).await {
            Ok(elements) => {
                log::info!("{} layer ready ({} elements)", family, elements.len());
                return Ok(elements);
            }
            Err(e) => {
                log::warn!("{} layer fetch failed on attempt {}: {}", family, attempt, e);
                last_error = e.to_string();
            }
        }
    }

    log::error!("giving up on {} layer", family);
    Err(PosterError::LayerFetch {
        family,
        attempts: max_attempts,
        message: last_error,
    })
}

/// Fetches roads plus the enabled optional layers concurrently and waits for
/// all of them
pub async fn fetch_layers<F: MapDataFetcher + ?Sized>(
    fetcher: &F,
    bbox: &BoundingBox,
    toggles: LayerToggles,
    policy: &RetryPolicy,
) -> Result<FetchedLayers> {
    let optional = |enabled: bool, family: FeatureFamily| async move {
        if enabled {
            fetch_with_retry(fetcher, bbox, family, policy).await
        } else {
            Ok(Vec::new())
        }
    };

    let (roads, water, parks) = futures::join!(
        fetch_with_retry(fetcher, bbox, FeatureFamily::Road, policy),
        optional(toggles.water, FeatureFamily::Water),
        optional(toggles.parks, FeatureFamily::Park),
    );

    Ok(FetchedLayers {
        roads: roads?,
        water: water?,
        parks: parks?,
    })
}

fn default_radius() -> f64 {
    DEFAULT_MAP_RADIUS
}

/// A complete poster order, as filled in by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub query: LocationQuery,
    pub resolution: Resolution,
    #[serde(default = "default_radius")]
    pub radius_meters: f64,
    #[serde(default)]
    pub layers: LayerToggles,
    #[serde(default)]
    pub text: TextOverrides,
    pub theme: ThemeConfig,
}

impl GenerationConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Copy with the radius and both resolution axes clamped to their supported
    /// ranges. Non-finite radii pass through and fail later as degenerate bounds.
    pub fn clamped(&self) -> Self {
        let radius_meters = self.radius_meters.clamp(MIN_MAP_RADIUS, MAX_MAP_RADIUS);
        let resolution = Resolution::new(
            self.resolution.width.clamp(MIN_CUSTOM_RESOLUTION, MAX_CUSTOM_RESOLUTION),
            self.resolution.height.clamp(MIN_CUSTOM_RESOLUTION, MAX_CUSTOM_RESOLUTION),
        );
        if radius_meters != self.radius_meters && self.radius_meters.is_finite() {
            log::warn!("radius {} clamped to {}", self.radius_meters, radius_meters);
        }
        if resolution != self.resolution {
            log::warn!(
                "resolution {}x{} clamped to {}x{}",
                self.resolution.width,
                self.resolution.height,
                resolution.width,
                resolution.height
            );
        }
        Self {
            radius_meters,
            resolution,
            ..self.clone()
        }
    }
}

/// Resolves, fetches and formats everything a [`RenderRequest`] needs
pub async fn assemble_request<G, F>(
    geocoder: &G,
    fetcher: &F,
    config: &GenerationConfig,
    policy: &RetryPolicy,
) -> Result<RenderRequest>
where
    G: Geocoder + ?Sized,
    F: MapDataFetcher + ?Sized,
{
    let config = config.clamped();
    let location = geocoder.resolve(&config.query).await?;
    log::info!(
        "resolved {:?} to {}, {} ({:.4}, {:.4})",
        config.query,
        location.city,
        location.country,
        location.point.latitude,
        location.point.longitude
    );

    let bbox = bbox_from_center(location.point, config.radius_meters, config.resolution)?;
    let layers = fetch_layers(fetcher, &bbox, config.layers, policy).await?;

    Ok(RenderRequest {
        road_elements: layers.roads,
        water_elements: layers.water,
        park_elements: layers.parks,
        bbox,
        resolution: config.resolution,
        theme: config.theme.clone(),
        display: DisplayConfig::from_location(&location, &config.text),
    })
}

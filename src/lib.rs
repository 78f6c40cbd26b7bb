//! # mapposter
//!
//! Renders print-resolution map posters from tagged OpenStreetMap geometry.
//!
//! The crate is organised leaf-first: geographic primitives and the bounding box
//! calculation live in [`core`], tag classification and per-layer drawing in
//! [`layers`], the drawing surfaces, composer and PNG exporter in [`rendering`].
//! Geocoding and map-data acquisition are external collaborators; their contracts
//! live in [`fetch`].

pub mod core;
pub mod data;
#[cfg(feature = "tokio-runtime")]
pub mod fetch;
pub mod layers;
pub mod prelude;
pub mod rendering;
pub mod traits;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    bounds::bbox_from_center,
    config::{Color, ResolutionCatalog, ResolutionPreset, RoadPalette, ThemeCatalog, ThemeConfig},
    geo::{BoundingBox, GeoPoint, Point, Resolution},
    projection::{project, CoordinateProjector},
};

pub use data::{
    display::{DisplayConfig, Location, TextOverrides},
    osm::GeometryElement,
};

pub use layers::{
    classify::{classify, FeatureCategory, FeatureFamily, RoadClass},
    vector::{LayerRenderer, LayerStats},
};

pub use rendering::{
    composer::{PosterComposer, RenderRequest},
    context::{DrawCommand, RecordingSurface},
    surface::Surface,
};

#[cfg(feature = "raster")]
pub use rendering::{
    export::{export_png, ExportedPoster},
    raster::{PosterFonts, RasterSurface},
};

#[cfg(feature = "tokio-runtime")]
pub use fetch::{
    assemble_request, GenerationConfig, Geocoder, LocationQuery, MapDataFetcher, RetryPolicy,
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, PosterError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum PosterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Degenerate bounds: {0}")]
    DegenerateBounds(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Font error: {0}")]
    Font(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    #[error("Unknown resolution: {0}")]
    UnknownResolution(String),

    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Failed to fetch {family} layer after {attempts} attempt(s): {message}")]
    LayerFetch {
        family: FeatureFamily,
        attempts: u32,
        message: String,
    },
}

/// Error type alias for convenience
pub type Error = PosterError;

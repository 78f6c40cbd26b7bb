//! Prelude module for common mapposter types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use mapposter::prelude::*;`

pub use crate::core::{
    bounds::bbox_from_center,
    config::{Color, ResolutionCatalog, ResolutionPreset, RoadPalette, ThemeCatalog, ThemeConfig},
    geo::{BoundingBox, GeoPoint, Point, Resolution},
    projection::CoordinateProjector,
};

pub use crate::data::{
    display::{DisplayConfig, Location, TextOverrides},
    osm::{parse_overpass_json, GeometryElement},
};

pub use crate::layers::{
    classify::{classify, FeatureCategory, FeatureFamily, RoadClass},
    vector::{LayerRenderer, LineStyle, PolygonStyle},
};

pub use crate::rendering::{
    composer::{PosterComposer, RenderRequest},
    context::RecordingSurface,
    surface::{GradientBand, Surface, TextStyle},
};

#[cfg(feature = "raster")]
pub use crate::rendering::{
    export::{export_png, ExportedPoster},
    raster::{PosterFonts, RasterSurface},
};

#[cfg(feature = "tokio-runtime")]
pub use crate::fetch::{
    assemble_request, GenerationConfig, Geocoder, LayerToggles, LocationQuery, MapDataFetcher,
    OverpassFileFetcher, RetryPolicy, StaticGeocoder,
};

pub use crate::traits::{Catalog, CoordinateTransform};

pub use crate::{PosterError, Result};

pub use std::sync::Arc;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};

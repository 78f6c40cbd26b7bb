//! Shared trait abstractions for common patterns
//!
//! The drawing seam lives in [`crate::rendering::surface`]; the collaborator seams
//! (geocoding, map data) live in `crate::fetch`.

use crate::core::geo::{GeoPoint, Point};

/// Trait for coordinate transformation operations
pub trait CoordinateTransform {
    /// Transform geographic coordinates to pixel coordinates
    fn to_pixel(&self, point: &GeoPoint) -> Point;

    /// Transform pixel coordinates back to geographic coordinates
    fn to_geo(&self, pixel: &Point) -> GeoPoint;
}

/// Trait for immutable named registries (themes, resolutions)
pub trait Catalog {
    type Entry;

    /// Looks an entry up by its identifier
    fn get(&self, key: &str) -> crate::Result<Self::Entry>;

    /// All identifiers, in a stable order
    fn keys(&self) -> Vec<String>;
}

use crate::{PosterError, Result};
use serde::{Deserialize, Serialize};

use super::constants::EARTH_RADIUS_METERS;

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lon")]
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a new GeoPoint coordinate
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Calculates the distance in meters to another point using the Haversine formula
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        let lat1_rad = self.latitude.to_radians();
        let lat2_rad = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lng = (other.longitude - self.longitude).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_METERS * c
    }
}

impl Default for GeoPoint {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a point in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Output size of a poster in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both dimensions are non-zero
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Width divided by height
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// Represents a bounding box of geographical coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Creates a bounding box, rejecting zero-area or inverted extents
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Result<Self> {
        let bbox = Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        };
        bbox.validate()?;
        Ok(bbox)
    }

    /// Checks the `min < max` invariant on both axes
    pub fn validate(&self) -> Result<()> {
        if !(self.min_lat < self.max_lat) {
            return Err(PosterError::DegenerateBounds(format!(
                "latitude span [{}, {}] is empty",
                self.min_lat, self.max_lat
            )));
        }
        if !(self.min_lon < self.max_lon) {
            return Err(PosterError::DegenerateBounds(format!(
                "longitude span [{}, {}] is empty",
                self.min_lon, self.max_lon
            )));
        }
        Ok(())
    }

    /// Checks if the bounds contain a point
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.latitude >= self.min_lat
            && point.latitude <= self.max_lat
            && point.longitude >= self.min_lon
            && point.longitude <= self.max_lon
    }

    /// Checks if the bounds intersect with another bounds
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        !(other.max_lat < self.min_lat
            || other.min_lat > self.max_lat
            || other.max_lon < self.min_lon
            || other.min_lon > self.max_lon)
    }

    /// Smallest box covering all points, `None` for an empty slice
    pub fn from_points(points: &[GeoPoint]) -> Option<Self> {
        let first = points.first()?;
        let mut bbox = Self {
            min_lat: first.latitude,
            max_lat: first.latitude,
            min_lon: first.longitude,
            max_lon: first.longitude,
        };
        for point in &points[1..] {
            bbox.min_lat = bbox.min_lat.min(point.latitude);
            bbox.max_lat = bbox.max_lat.max(point.latitude);
            bbox.min_lon = bbox.min_lon.min(point.longitude);
            bbox.max_lon = bbox.max_lon.max(point.longitude);
        }
        Some(bbox)
    }

    /// Gets the center point of the bounds
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }

    /// Latitude extent in degrees
    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Longitude extent in degrees
    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }
}

//! Equirectangular projection of geographic points into poster pixel space.

use crate::core::geo::{BoundingBox, GeoPoint, Point, Resolution};
use crate::traits::CoordinateTransform;
use crate::{PosterError, Result};

/// Maps geographic coordinates inside a bounding box onto a pixel grid.
///
/// Pixel rows grow downward while latitude grows northward, so the y axis is
/// inverted: `max_lat` maps to row 0 and `min_lat` to `height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateProjector {
    bbox: BoundingBox,
    width: f64,
    height: f64,
}

impl CoordinateProjector {
    /// Creates a projector, rejecting boxes that would divide by zero
    pub fn new(bbox: BoundingBox, resolution: Resolution) -> Result<Self> {
        if bbox.max_lon == bbox.min_lon || bbox.max_lat == bbox.min_lat {
            return Err(PosterError::DegenerateBounds(format!(
                "zero-area box lat [{}, {}] lon [{}, {}]",
                bbox.min_lat, bbox.max_lat, bbox.min_lon, bbox.max_lon
            )));
        }
        bbox.validate()?;
        if !resolution.is_valid() {
            return Err(PosterError::DegenerateBounds(format!(
                "resolution {}x{} has a zero dimension",
                resolution.width, resolution.height
            )));
        }

        Ok(Self {
            bbox,
            width: resolution.width as f64,
            height: resolution.height as f64,
        })
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Projects a geographic point to pixel coordinates
    pub fn project(&self, point: &GeoPoint) -> Point {
        let x = (point.longitude - self.bbox.min_lon) / self.bbox.lon_span() * self.width;
        let y = self.height
            - (point.latitude - self.bbox.min_lat) / self.bbox.lat_span() * self.height;
        Point::new(x, y)
    }

    /// Projects every point of a geometry, preserving order
    pub fn project_all(&self, points: &[GeoPoint]) -> Vec<Point> {
        points.iter().map(|p| self.project(p)).collect()
    }
}

impl CoordinateTransform for CoordinateProjector {
    fn to_pixel(&self, point: &GeoPoint) -> Point {
        self.project(point)
    }

    fn to_geo(&self, pixel: &Point) -> GeoPoint {
        let lon = self.bbox.min_lon + pixel.x / self.width * self.bbox.lon_span();
        let lat = self.bbox.min_lat + (self.height - pixel.y) / self.height * self.bbox.lat_span();
        GeoPoint::new(lat, lon)
    }
}

/// One-shot projection of a single point
pub fn project(point: &GeoPoint, bbox: &BoundingBox, resolution: Resolution) -> Result<Point> {
    CoordinateProjector::new(*bbox, resolution).map(|projector| projector.project(point))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn sample_bbox() -> BoundingBox {
        BoundingBox::new(40.6948, 40.7308, -74.0297, -73.9823).unwrap()
    }

    fn assert_point(actual: Point, x: f64, y: f64) {
        assert!((actual.x - x).abs() < EPS, "x: {} != {}", actual.x, x);
        assert!((actual.y - y).abs() < EPS, "y: {} != {}", actual.y, y);
    }

    #[test]
    fn test_corners_map_to_canvas_edges() {
        let bbox = sample_bbox();
        let res = Resolution::new(1080, 1920);
        let projector = CoordinateProjector::new(bbox, res).unwrap();

        assert_point(projector.project(&GeoPoint::new(bbox.min_lat, bbox.min_lon)), 0.0, 1920.0);
        assert_point(projector.project(&GeoPoint::new(bbox.min_lat, bbox.max_lon)), 1080.0, 1920.0);
        assert_point(projector.project(&GeoPoint::new(bbox.max_lat, bbox.min_lon)), 0.0, 0.0);
        assert_point(projector.project(&GeoPoint::new(bbox.max_lat, bbox.max_lon)), 1080.0, 0.0);
    }

    #[test]
    fn test_center_maps_to_middle() {
        let bbox = sample_bbox();
        let point = project(&bbox.center(), &bbox, Resolution::new(1000, 500)).unwrap();
        assert!((point.x - 500.0).abs() < 1e-6);
        assert!((point.y - 250.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_longitude_is_rejected() {
        let bbox = BoundingBox {
            min_lat: 10.0,
            max_lat: 11.0,
            min_lon: 5.0,
            max_lon: 5.0,
        };
        let result = project(&GeoPoint::new(10.5, 5.0), &bbox, Resolution::new(100, 100));
        assert!(matches!(result, Err(PosterError::DegenerateBounds(_))));
    }

    #[test]
    fn test_degenerate_latitude_is_rejected() {
        let bbox = BoundingBox {
            min_lat: 10.0,
            max_lat: 10.0,
            min_lon: 5.0,
            max_lon: 6.0,
        };
        assert!(matches!(
            CoordinateProjector::new(bbox, Resolution::new(100, 100)),
            Err(PosterError::DegenerateBounds(_))
        ));
    }

    #[test]
    fn test_inverse_round_trip() {
        let projector =
            CoordinateProjector::new(sample_bbox(), Resolution::new(1080, 1080)).unwrap();
        let geo = GeoPoint::new(40.71, -74.0);
        let back = projector.to_geo(&projector.to_pixel(&geo));
        assert!((back.latitude - geo.latitude).abs() < 1e-9);
        assert!((back.longitude - geo.longitude).abs() < 1e-9);
    }
}

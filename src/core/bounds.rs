//! Geographic bounding box derivation from a center point and a radius.

use crate::core::constants::EARTH_RADIUS_METERS;
use crate::core::geo::{BoundingBox, GeoPoint, Resolution};
use crate::{PosterError, Result};

/// Converts a metric distance on the sphere to an angular extent in degrees.
fn meters_to_degrees(meters: f64) -> f64 {
    (meters / EARTH_RADIUS_METERS).to_degrees()
}

/// Derives the bounding box framing `radius_meters` around `center`.
///
/// The shorter output dimension receives the full radius and the longer one is
/// stretched by the aspect ratio, so the box covers the same ground aspect as the
/// poster. The longitudinal extent is widened by `1 / cos(latitude)` to compensate
/// for meridian convergence.
pub fn bbox_from_center(
    center: GeoPoint,
    radius_meters: f64,
    resolution: Resolution,
) -> Result<BoundingBox> {
    if !radius_meters.is_finite() || radius_meters <= 0.0 {
        return Err(PosterError::DegenerateBounds(format!(
            "radius must be positive, got {radius_meters}"
        )));
    }
    if !resolution.is_valid() {
        return Err(PosterError::DegenerateBounds(format!(
            "resolution {}x{} has a zero dimension",
            resolution.width, resolution.height
        )));
    }
    if !center.is_valid() {
        return Err(PosterError::InvalidCoordinates(format!(
            "center ({}, {}) is out of range",
            center.latitude, center.longitude
        )));
    }

    let width = resolution.width as f64;
    let height = resolution.height as f64;
    let (lon_meters, lat_meters) = if width >= height {
        (radius_meters * (width / height), radius_meters)
    } else {
        (radius_meters, radius_meters * (height / width))
    };

    let delta_lat = meters_to_degrees(lat_meters);
    let delta_lon = meters_to_degrees(lon_meters) / center.latitude.to_radians().cos();

    log::debug!(
        "bbox for ({:.6}, {:.6}) r={}m: dlat={:.6} dlon={:.6}",
        center.latitude,
        center.longitude,
        radius_meters,
        delta_lat,
        delta_lon
    );

    BoundingBox::new(
        center.latitude - delta_lat,
        center.latitude + delta_lat,
        center.longitude - delta_lon,
        center.longitude + delta_lon,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-6;

    fn ground_aspect(bbox: &BoundingBox) -> f64 {
        let lat = bbox.center().latitude.to_radians();
        bbox.lon_span() * lat.cos() / bbox.lat_span()
    }

    #[test]
    fn test_new_york_square() {
        let bbox = bbox_from_center(
            GeoPoint::new(40.7128, -74.0060),
            2000.0,
            Resolution::new(1080, 1080),
        )
        .unwrap();

        let delta_lat = bbox.lat_span() / 2.0;
        let delta_lon = bbox.lon_span() / 2.0;
        assert!((delta_lat - 0.018_00).abs() < 1e-4);
        assert!((delta_lon - 0.023_71).abs() < 1e-4);

        assert!((bbox.min_lat - 40.6948).abs() < 1e-4);
        assert!((bbox.max_lat - 40.7308).abs() < 1e-4);
        assert!((bbox.min_lon - -74.0297).abs() < 1e-4);
        assert!((bbox.max_lon - -73.9823).abs() < 1e-4);
    }

    #[test]
    fn test_box_is_centered() {
        let center = GeoPoint::new(-33.8688, 151.2093);
        let bbox = bbox_from_center(center, 5000.0, Resolution::new(1920, 1080)).unwrap();
        let c = bbox.center();
        assert!((c.latitude - center.latitude).abs() < 1e-9);
        assert!((c.longitude - center.longitude).abs() < 1e-9);
    }

    #[test]
    fn test_aspect_matches_resolution() {
        let centers = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(40.7128, -74.0060),
            GeoPoint::new(-54.8, -68.3),
            GeoPoint::new(64.1466, -21.9426),
        ];
        let resolutions = [
            Resolution::new(1080, 1080),
            Resolution::new(1080, 1920),
            Resolution::new(3840, 2160),
            Resolution::new(300, 10_000),
        ];
        for center in centers {
            for resolution in resolutions {
                for radius in [1000.0, 2000.0, 20_000.0] {
                    let bbox = bbox_from_center(center, radius, resolution).unwrap();
                    assert!(bbox.min_lat < bbox.max_lat);
                    assert!(bbox.min_lon < bbox.max_lon);
                    assert!(
                        (ground_aspect(&bbox) - resolution.aspect_ratio()).abs() < TOLERANCE,
                        "aspect mismatch at {:?} {:?}",
                        center,
                        resolution
                    );
                }
            }
        }
    }

    #[test]
    fn test_equator_degree_ratio() {
        let bbox =
            bbox_from_center(GeoPoint::new(0.0, 10.0), 2000.0, Resolution::new(1920, 1080))
                .unwrap();
        assert!((bbox.lon_span() / bbox.lat_span() - 1920.0 / 1080.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_shorter_axis_gets_full_radius() {
        let portrait =
            bbox_from_center(GeoPoint::new(0.0, 0.0), 2000.0, Resolution::new(1080, 1920))
                .unwrap();
        let expected = meters_to_degrees(2000.0);
        assert!((portrait.lon_span() / 2.0 - expected).abs() < 1e-12);
        assert!((portrait.lat_span() / 2.0 - expected * 1920.0 / 1080.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_degenerate_input() {
        let center = GeoPoint::new(10.0, 10.0);
        let res = Resolution::new(1080, 1080);
        assert!(matches!(
            bbox_from_center(center, 0.0, res),
            Err(PosterError::DegenerateBounds(_))
        ));
        assert!(matches!(
            bbox_from_center(center, -5.0, res),
            Err(PosterError::DegenerateBounds(_))
        ));
        assert!(matches!(
            bbox_from_center(center, 1000.0, Resolution::new(0, 1080)),
            Err(PosterError::DegenerateBounds(_))
        ));
        assert!(matches!(
            bbox_from_center(GeoPoint::new(95.0, 0.0), 1000.0, res),
            Err(PosterError::InvalidCoordinates(_))
        ));
    }
}

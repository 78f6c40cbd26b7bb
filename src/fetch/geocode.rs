use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::{Geocoder, LocationQuery};
use crate::{core::geo::GeoPoint, data::display::Location, PosterError, Result};

/// Coordinate lookups farther than this from every known place fail
pub const NEAREST_PLACE_LIMIT_METERS: f64 = 50_000.0;

const BUILTIN_PLACES: &[(&str, &str, f64, f64)] = &[
    ("New York", "United States", 40.7128, -74.0060),
    ("San Francisco", "United States", 37.7749, -122.4194),
    ("London", "United Kingdom", 51.5074, -0.1278),
    ("Paris", "France", 48.8566, 2.3522),
    ("Berlin", "Germany", 52.5200, 13.4050),
    ("Rome", "Italy", 41.9028, 12.4964),
    ("Barcelona", "Spain", 41.3874, 2.1686),
    ("Amsterdam", "Netherlands", 52.3676, 4.9041),
    ("Venice", "Italy", 45.4408, 12.3155),
    ("Tokyo", "Japan", 35.6762, 139.6503),
    ("Singapore", "Singapore", 1.3521, 103.8198),
    ("Sydney", "Australia", -33.8688, 151.2093),
    ("Rio de Janeiro", "Brazil", -22.9068, -43.1729),
    ("Cairo", "Egypt", 30.0444, 31.2357),
    ("Dubai", "United Arab Emirates", 25.2048, 55.2708),
];

static BUILTIN_GEOCODER: Lazy<StaticGeocoder> = Lazy::new(|| StaticGeocoder {
    places: BUILTIN_PLACES
        .iter()
        .map(|&(city, country, lat, lon)| Location::new(GeoPoint::new(lat, lon), city, country))
        .collect(),
});

#[derive(Debug, Deserialize, Serialize)]
struct PlaceFile {
    places: Vec<Location>,
}

/// Geocoder over a fixed table of places
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    places: Vec<Location>,
}

impl StaticGeocoder {
    pub fn new(places: Vec<Location>) -> Self {
        Self { places }
    }

    /// A small table of well-known cities
    pub fn builtin() -> &'static StaticGeocoder {
        &BUILTIN_GEOCODER
    }

    /// Parses `{"places": [{"point": {...}, "city": ..., "country": ...}]}`
    pub fn from_json(json: &str) -> Result<Self> {
        let file: PlaceFile = serde_json::from_str(json)?;
        Ok(Self::new(file.places))
    }

    pub fn with_place(mut self, location: Location) -> Self {
        self.places.push(location);
        self
    }

    pub fn places(&self) -> &[Location] {
        &self.places
    }

    fn lookup_city(&self, city: &str, country: &str) -> Result<Location> {
        let city = city.trim();
        let country = country.trim();
        self.places
            .iter()
            .find(|place| {
                place.city.eq_ignore_ascii_case(city)
                    && (country.is_empty() || place.country.eq_ignore_ascii_case(country))
            })
            .cloned()
            .ok_or_else(|| PosterError::LocationNotFound(format!("{}, {}", city, country)))
    }

    fn lookup_point(&self, point: GeoPoint) -> Result<Location> {
        if !point.is_valid() {
            return Err(PosterError::InvalidCoordinates(format!(
                "({}, {})",
                point.latitude, point.longitude
            )));
        }

        let nearest = self
            .places
            .iter()
            .map(|place| (place, place.point.distance_to(&point)))
            .filter(|(_, distance)| *distance <= NEAREST_PLACE_LIMIT_METERS)
            .min_by(|a, b| a.1.total_cmp(&b.1));

        match nearest {
            Some((place, distance)) => {
                log::debug!("nearest place to {:?} is {} at {:.0} m", point, place.city, distance);
                Ok(Location::new(point, place.city.clone(), place.country.clone()))
            }
            None => Err(PosterError::LocationNotFound(format!(
                "no known place near ({:.4}, {:.4})",
                point.latitude, point.longitude
            ))),
        }
    }
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn resolve(&self, query: &LocationQuery) -> Result<Location> {
        match query {
            LocationQuery::City { city, country } => self.lookup_city(city, country),
            LocationQuery::Coordinates {
                latitude,
                longitude,
            } => self.lookup_point(GeoPoint::new(*latitude, *longitude)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_city_lookup_ignores_case() {
        let query = LocationQuery::City {
            city: "new york".to_string(),
            country: "UNITED STATES".to_string(),
        };
        let location = StaticGeocoder::builtin().resolve(&query).await.unwrap();
        assert_eq!(location.city, "New York");
        assert_eq!(location.point, GeoPoint::new(40.7128, -74.0060));
    }

    #[tokio::test]
    async fn test_unknown_city() {
        let query = LocationQuery::City {
            city: "Atlantis".to_string(),
            country: "Ocean".to_string(),
        };
        let result = StaticGeocoder::builtin().resolve(&query).await;
        assert!(matches!(result, Err(PosterError::LocationNotFound(_))));
    }

    #[tokio::test]
    async fn test_coordinates_keep_queried_point() {
        let query = LocationQuery::coordinates(GeoPoint::new(48.8606, 2.3376));
        let location = StaticGeocoder::builtin().resolve(&query).await.unwrap();
        assert_eq!(location.city, "Paris");
        assert_eq!(location.point, GeoPoint::new(48.8606, 2.3376));
    }

    #[tokio::test]
    async fn test_coordinates_far_from_everything() {
        let query = LocationQuery::coordinates(GeoPoint::new(-60.0, -140.0));
        let result = StaticGeocoder::builtin().resolve(&query).await;
        assert!(matches!(result, Err(PosterError::LocationNotFound(_))));
    }

    #[tokio::test]
    async fn test_added_place_resolves_nearby_coordinates() {
        let geocoder = StaticGeocoder::new(Vec::new()).with_place(Location::new(
            GeoPoint::new(-77.8463, 166.6683),
            "McMurdo",
            "Antarctica",
        ));
        assert_eq!(geocoder.places().len(), 1);

        let query = LocationQuery::coordinates(GeoPoint::new(-77.85, 166.7));
        let location = geocoder.resolve(&query).await.unwrap();
        assert_eq!(location.city, "McMurdo");
        assert!(StaticGeocoder::builtin().resolve(&query).await.is_err());
    }

    #[tokio::test]
    async fn test_from_json() {
        let json = r#"{"places": [
            {"point": {"lat": 59.9139, "lon": 10.7522}, "city": "Oslo", "country": "Norway"}
        ]}"#;
        let geocoder = StaticGeocoder::from_json(json).unwrap();
        let query = LocationQuery::City {
            city: "oslo".to_string(),
            country: String::new(),
        };
        let location = geocoder.resolve(&query).await.unwrap();
        assert_eq!(location.country, "Norway");
    }
}

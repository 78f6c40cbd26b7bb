//! OpenStreetMap geometry as returned by an Overpass `out geom;` query.

use crate::core::geo::{BoundingBox, GeoPoint};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A tagged way or relation with its resolved geometry
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeometryElement {
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub geometry: Vec<GeoPoint>,
}

impl GeometryElement {
    pub fn new(geometry: Vec<GeoPoint>) -> Self {
        Self {
            tags: BTreeMap::new(),
            geometry,
        }
    }

    /// Adds a tag, builder style
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Whether any vertex of the geometry lies inside `bbox`, or the geometry's
    /// extent overlaps it
    pub fn touches(&self, bbox: &BoundingBox) -> bool {
        BoundingBox::from_points(&self.geometry).is_some_and(|extent| extent.intersects(bbox))
    }
}

#[derive(Debug, Deserialize)]
struct OverpassPoint {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    tags: BTreeMap<String, String>,
    #[serde(default)]
    geometry: Option<Vec<Option<OverpassPoint>>>,
    #[serde(default)]
    members: Vec<OverpassMember>,
}

#[derive(Debug, Deserialize)]
struct OverpassMember {
    #[serde(default)]
    geometry: Option<Vec<Option<OverpassPoint>>>,
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

fn collect_points(raw: Vec<Option<OverpassPoint>>) -> Vec<GeoPoint> {
    raw.into_iter()
        .flatten()
        .map(|p| GeoPoint::new(p.lat, p.lon))
        .collect()
}

/// Decodes an Overpass JSON document into geometry elements.
///
/// Ways carry their own `geometry`. Relations are flattened into one element per
/// member that has geometry, each inheriting the relation's tags. Elements without
/// any geometry (nodes, bare relations) are dropped; `null` vertices are skipped.
pub fn parse_overpass_json(json: &str) -> Result<Vec<GeometryElement>> {
    let response: OverpassResponse = serde_json::from_str(json)?;
    let total = response.elements.len();
    let mut elements = Vec::with_capacity(total);

    for element in response.elements {
        if let Some(geometry) = element.geometry {
            elements.push(GeometryElement {
                tags: element.tags,
                geometry: collect_points(geometry),
            });
            continue;
        }
        if element.kind == "relation" {
            for member in element.members {
                if let Some(geometry) = member.geometry {
                    elements.push(GeometryElement {
                        tags: element.tags.clone(),
                        geometry: collect_points(geometry),
                    });
                }
            }
        }
    }

    log::debug!(
        "decoded {} geometry elements from {} overpass elements",
        elements.len(),
        total
    );
    Ok(elements)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "version": 0.6,
        "elements": [
            {"type": "node", "id": 1, "lat": 1.0, "lon": 2.0},
            {"type": "way", "id": 2, "tags": {"highway": "residential", "name": "Elm St"},
             "geometry": [{"lat": 40.70, "lon": -74.00}, null, {"lat": 40.71, "lon": -74.01}]},
            {"type": "relation", "id": 3, "tags": {"natural": "water"},
             "members": [
                {"type": "way", "ref": 10, "role": "outer",
                 "geometry": [{"lat": 1.0, "lon": 1.0}, {"lat": 1.0, "lon": 2.0}, {"lat": 2.0, "lon": 2.0}]},
                {"type": "node", "ref": 11, "role": "label"}
             ]}
        ]
    }"#;

    #[test]
    fn test_parse_overpass_json() {
        let elements = parse_overpass_json(SAMPLE).unwrap();
        assert_eq!(elements.len(), 2);

        let road = &elements[0];
        assert_eq!(road.tag("highway"), Some("residential"));
        assert_eq!(road.geometry.len(), 2);
        assert_eq!(road.geometry[1], GeoPoint::new(40.71, -74.01));

        let lake = &elements[1];
        assert_eq!(lake.tag("natural"), Some("water"));
        assert_eq!(lake.geometry.len(), 3);
    }

    #[test]
    fn test_parse_rejects_malformed_document() {
        assert!(parse_overpass_json("{\"elements\": 5}").is_err());
        assert!(parse_overpass_json("{}").unwrap().is_empty());
    }

    #[test]
    fn test_touches_bbox() {
        let bbox = BoundingBox::new(0.0, 1.0, 0.0, 1.0).unwrap();
        let inside =
            GeometryElement::new(vec![GeoPoint::new(0.5, 0.5), GeoPoint::new(0.6, 0.6)]);
        let crossing =
            GeometryElement::new(vec![GeoPoint::new(-1.0, 0.5), GeoPoint::new(2.0, 0.5)]);
        let outside =
            GeometryElement::new(vec![GeoPoint::new(5.0, 5.0), GeoPoint::new(6.0, 6.0)]);
        assert!(inside.touches(&bbox));
        assert!(crossing.touches(&bbox));
        assert!(!outside.touches(&bbox));
        assert!(!GeometryElement::default().touches(&bbox));
    }
}

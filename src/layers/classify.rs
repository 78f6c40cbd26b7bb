//! Classification of raw OSM tags into the poster's closed visual vocabulary.

use crate::core::constants::{
    ROAD_WIDTH_DEFAULT, ROAD_WIDTH_MOTORWAY, ROAD_WIDTH_PRIMARY, ROAD_WIDTH_RESIDENTIAL,
    ROAD_WIDTH_SECONDARY, ROAD_WIDTH_TERTIARY,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The feature family a data fetch was made for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureFamily {
    Road,
    Water,
    Park,
}

impl FeatureFamily {
    pub const ALL: [FeatureFamily; 3] = [Self::Road, Self::Water, Self::Park];
}

impl fmt::Display for FeatureFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Road => "road",
            Self::Water => "water",
            Self::Park => "park",
        };
        f.write_str(name)
    }
}

/// Road importance buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoadClass {
    Motorway,
    Primary,
    Secondary,
    Tertiary,
    Residential,
    Default,
}

impl RoadClass {
    /// Buckets an OSM `highway` value
    pub fn from_highway(value: Option<&str>) -> Self {
        match value {
            Some("motorway" | "motorway_link") => Self::Motorway,
            Some("primary" | "primary_link" | "trunk" | "trunk_link") => Self::Primary,
            Some("secondary" | "secondary_link") => Self::Secondary,
            Some("tertiary" | "tertiary_link") => Self::Tertiary,
            Some("residential" | "living_street") => Self::Residential,
            _ => Self::Default,
        }
    }

    /// Stroke width in pixels
    pub fn stroke_width(&self) -> f32 {
        match self {
            Self::Motorway => ROAD_WIDTH_MOTORWAY,
            Self::Primary => ROAD_WIDTH_PRIMARY,
            Self::Secondary => ROAD_WIDTH_SECONDARY,
            Self::Tertiary => ROAD_WIDTH_TERTIARY,
            Self::Residential => ROAD_WIDTH_RESIDENTIAL,
            Self::Default => ROAD_WIDTH_DEFAULT,
        }
    }
}

/// Outcome of classifying one element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureCategory {
    Road(RoadClass),
    Water,
    Park,
    Skip,
}

const WATER_NATURAL_VALUES: [&str; 4] = ["water", "bay", "strait", "coastline"];

/// Classifies an element's tags for the family it was fetched for. Never fails.
pub fn classify(family: FeatureFamily, tags: &BTreeMap<String, String>) -> FeatureCategory {
    match family {
        FeatureFamily::Road => {
            FeatureCategory::Road(RoadClass::from_highway(tags.get("highway").map(String::as_str)))
        }
        FeatureFamily::Water => {
            let natural_water = tags
                .get("natural")
                .is_some_and(|v| WATER_NATURAL_VALUES.contains(&v.as_str()));
            if natural_water || tags.contains_key("waterway") {
                FeatureCategory::Water
            } else {
                FeatureCategory::Skip
            }
        }
        FeatureFamily::Park => {
            if tags.contains_key("leisure") || tags.contains_key("landuse") {
                FeatureCategory::Park
            } else {
                FeatureCategory::Skip
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_road_equivalence_table() {
        let cases = [
            ("motorway", RoadClass::Motorway),
            ("motorway_link", RoadClass::Motorway),
            ("trunk", RoadClass::Primary),
            ("trunk_link", RoadClass::Primary),
            ("primary_link", RoadClass::Primary),
            ("secondary_link", RoadClass::Secondary),
            ("tertiary", RoadClass::Tertiary),
            ("living_street", RoadClass::Residential),
            ("residential", RoadClass::Residential),
            ("unclassified", RoadClass::Default),
            ("footway", RoadClass::Default),
        ];
        for (value, expected) in cases {
            assert_eq!(
                classify(FeatureFamily::Road, &tags(&[("highway", value)])),
                FeatureCategory::Road(expected),
                "highway={value}"
            );
        }
    }

    #[test]
    fn test_road_without_highway_tag_is_default() {
        assert_eq!(
            classify(FeatureFamily::Road, &tags(&[("name", "Main St")])),
            FeatureCategory::Road(RoadClass::Default)
        );
    }

    #[test]
    fn test_water_classification() {
        assert_eq!(
            classify(FeatureFamily::Water, &tags(&[("natural", "bay")])),
            FeatureCategory::Water
        );
        assert_eq!(
            classify(FeatureFamily::Water, &tags(&[("waterway", "riverbank")])),
            FeatureCategory::Water
        );
        assert_eq!(
            classify(FeatureFamily::Water, &tags(&[("natural", "wood")])),
            FeatureCategory::Skip
        );
        assert_eq!(
            classify(FeatureFamily::Water, &tags(&[("highway", "primary")])),
            FeatureCategory::Skip
        );
    }

    #[test]
    fn test_park_classification() {
        assert_eq!(
            classify(FeatureFamily::Park, &tags(&[("leisure", "park")])),
            FeatureCategory::Park
        );
        assert_eq!(
            classify(FeatureFamily::Park, &tags(&[("landuse", "grass")])),
            FeatureCategory::Park
        );
        assert_eq!(classify(FeatureFamily::Park, &tags(&[])), FeatureCategory::Skip);
    }

    #[test]
    fn test_stroke_widths_decrease_with_importance() {
        let order = [
            RoadClass::Motorway,
            RoadClass::Primary,
            RoadClass::Secondary,
            RoadClass::Tertiary,
            RoadClass::Residential,
            RoadClass::Default,
        ];
        for pair in order.windows(2) {
            assert!(pair[0].stroke_width() > pair[1].stroke_width());
        }
    }
}

//! Poster text derived from a resolved place.

use crate::core::geo::GeoPoint;
use serde::{Deserialize, Serialize};

/// A geocoded place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub point: GeoPoint,
    pub city: String,
    pub country: String,
}

impl Location {
    pub fn new(point: GeoPoint, city: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            point,
            city: city.into(),
            country: country.into(),
        }
    }
}

/// Optional caller-supplied replacements for the geocoded names. Empty strings
/// count as "not set".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextOverrides {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// The three text lines printed on a poster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub main_heading: String,
    pub sub_heading: String,
    pub coordinate_label: String,
}

impl DisplayConfig {
    pub fn new(
        main_heading: impl Into<String>,
        sub_heading: impl Into<String>,
        coordinate_label: impl Into<String>,
    ) -> Self {
        Self {
            main_heading: main_heading.into(),
            sub_heading: sub_heading.into(),
            coordinate_label: coordinate_label.into(),
        }
    }

    /// Formats the poster text for a location.
    ///
    /// The heading is upper-cased and letter-spaced, the sub heading upper-cased,
    /// and the coordinates printed with four decimals and hemisphere letters.
    pub fn from_location(location: &Location, overrides: &TextOverrides) -> Self {
        let city = pick(overrides.city.as_deref(), &location.city);
        let country = pick(overrides.country.as_deref(), &location.country);

        Self {
            main_heading: letter_spaced(&city.to_uppercase()),
            sub_heading: country.to_uppercase(),
            coordinate_label: coordinate_label(&location.point),
        }
    }
}

fn pick<'a>(custom: Option<&'a str>, fallback: &'a str) -> &'a str {
    match custom {
        Some(text) if !text.is_empty() => text,
        _ => fallback,
    }
}

/// Inserts a single space between every character
pub fn letter_spaced(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    for (i, c) in text.chars().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

/// `40.7128° N / 74.0060° W`. Zero latitude/longitude print as S/W.
pub fn coordinate_label(point: &GeoPoint) -> String {
    let ns = if point.latitude > 0.0 { 'N' } else { 'S' };
    let ew = if point.longitude > 0.0 { 'E' } else { 'W' };
    format!(
        "{:.4}° {} / {:.4}° {}",
        point.latitude.abs(),
        ns,
        point.longitude.abs(),
        ew
    )
}

//! Core constants for bounds derivation, road styling and poster typography.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Mean Earth radius of the spherical approximation, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Radius presets offered to callers, in meters.
pub const MIN_MAP_RADIUS: f64 = 1_000.0;
pub const MAX_MAP_RADIUS: f64 = 20_000.0;
pub const DEFAULT_MAP_RADIUS: f64 = 2_000.0;

/// Custom resolutions are clamped to this range on both axes.
pub const MIN_CUSTOM_RESOLUTION: u32 = 300;
pub const MAX_CUSTOM_RESOLUTION: u32 = 10_000;
pub const DEFAULT_CUSTOM_RESOLUTION: u32 = 1080;

/// Road stroke widths in pixels, widest first.
pub const ROAD_WIDTH_MOTORWAY: f32 = 2.4;
pub const ROAD_WIDTH_PRIMARY: f32 = 1.6;
pub const ROAD_WIDTH_SECONDARY: f32 = 1.2;
pub const ROAD_WIDTH_TERTIARY: f32 = 1.0;
pub const ROAD_WIDTH_RESIDENTIAL: f32 = 0.8;
pub const ROAD_WIDTH_DEFAULT: f32 = 0.6;

/// Fixed text metrics (pixels). These do not scale with the output resolution.
pub const MAIN_HEADING_SIZE: f32 = 80.0;
pub const SUB_HEADING_SIZE: f32 = 36.0;
pub const COORDINATE_LABEL_SIZE: f32 = 20.0;
pub const ATTRIBUTION_SIZE: f32 = 10.0;
pub const TEXT_GAP: f64 = 20.0;

/// Divider under the main heading.
pub const DIVIDER_WIDTH: f32 = 2.0;
pub const DIVIDER_LENGTH_FACTOR: f64 = 1.15;

/// Fraction of the canvas height covered by each gradient band.
pub const GRADIENT_BAND_DIVISOR: u32 = 4;

pub const ATTRIBUTION_TEXT: &str = "Map data from OpenStreetMap";

//! Theme and resolution catalogs
//!
//! Both catalogs are immutable registries keyed by identifier. The built-in themes
//! are materialised once per process and handed out by reference; callers can derive
//! extended catalogs (for example from a JSON theme file) without touching the
//! built-in one.

use crate::core::constants::{
    DEFAULT_CUSTOM_RESOLUTION, MAX_CUSTOM_RESOLUTION, MIN_CUSTOM_RESOLUTION,
};
use crate::core::geo::Resolution;
use crate::layers::classify::RoadClass;
use crate::prelude::HashMap;
use crate::traits::Catalog;
use crate::{PosterError, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// RGBA color, serialized as a `#RRGGBB` or `#RRGGBBAA` hex string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Builds an opaque color from a `0xRRGGBB` literal
    pub const fn from_u32(rgb: u32) -> Self {
        Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Same color with a different alpha
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Parses `#RGB`, `#RRGGBB` or `#RRGGBBAA`; the leading `#` is optional
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let invalid = || PosterError::InvalidColor(hex.to_string());
        if !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());

        match digits.len() {
            3 => {
                let mut out = [0u8; 3];
                for (slot, c) in out.iter_mut().zip(digits.chars()) {
                    let v = c.to_digit(16).ok_or_else(invalid)? as u8;
                    *slot = v * 17;
                }
                Ok(Self::rgb(out[0], out[1], out[2]))
            }
            6 => Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for Color {
    type Error = PosterError;

    fn try_from(value: String) -> Result<Self> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Per-class road colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadPalette {
    pub motorway: Color,
    pub primary: Color,
    pub secondary: Color,
    pub tertiary: Color,
    pub residential: Color,
    pub default: Color,
}

impl RoadPalette {
    pub fn color_for(&self, class: RoadClass) -> Color {
        match class {
            RoadClass::Motorway => self.motorway,
            RoadClass::Primary => self.primary,
            RoadClass::Secondary => self.secondary,
            RoadClass::Tertiary => self.tertiary,
            RoadClass::Residential => self.residential,
            RoadClass::Default => self.default,
        }
    }
}

/// Complete color scheme of a poster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
    pub background: Color,
    pub text: Color,
    pub gradient: Color,
    pub water: Color,
    pub parks: Color,
    pub roads: RoadPalette,
}

type ThemeRow = (&'static str, &'static str, [u32; 5], [u32; 6]);

// key, display name, [background, text, gradient, water, parks],
// [motorway, primary, secondary, tertiary, residential, default]
const BUILTIN_THEMES: &[ThemeRow] = &[
    ("autumn", "Autumn",
        [0xFBF7F0, 0x8B4513, 0xFBF7F0, 0xD8CFC0, 0xE8E0D0],
        [0x8B2500, 0xB8450A, 0xCC7A30, 0xD9A050, 0xE8C888, 0xCC7A30]),
    ("blueprint", "Blueprint",
        [0x1A3A5C, 0xE8F4FF, 0x1A3A5C, 0x0F2840, 0x1E4570],
        [0xE8F4FF, 0xC5DCF0, 0x9FC5E8, 0x7BAED4, 0x5A96C0, 0x7BAED4]),
    ("contrastZones", "Contrast Zones",
        [0xFFFFFF, 0x000000, 0xFFFFFF, 0xB0B0B0, 0xECECEC],
        [0x000000, 0x0F0F0F, 0x252525, 0x404040, 0x5A5A5A, 0x404040]),
    ("copperPatina", "Copper Patina",
        [0xE8F0F0, 0x2A5A5A, 0xE8F0F0, 0xC0D8D8, 0xD8E8E0],
        [0xB87333, 0x5A8A8A, 0x6B9E9E, 0x88B4B4, 0xA8CCCC, 0x88B4B4]),
    ("emerald", "Emerald City",
        [0x062C22, 0xE3F9F1, 0x062C22, 0x0D4536, 0x0F523E],
        [0x4ADEB0, 0x2DB88F, 0x249673, 0x1B7559, 0x155C46, 0x155C46]),
    ("forest", "Forest",
        [0xF0F4F0, 0x2D4A3E, 0xF0F4F0, 0xB8D4D4, 0xD4E8D4],
        [0x2D4A3E, 0x3D6B55, 0x5A8A70, 0x7AAA90, 0xA0C8B0, 0x7AAA90]),
    ("gradientRoads", "Gradient Roads",
        [0xFFFFFF, 0x000000, 0xFFFFFF, 0xD5D5D5, 0xEFEFEF],
        [0x050505, 0x151515, 0x2A2A2A, 0x404040, 0x555555, 0x404040]),
    ("japaneseInk", "Japanese Ink",
        [0xFAF8F5, 0x2C2C2C, 0xFAF8F5, 0xE8E4E0, 0xF0EDE8],
        [0x8B2500, 0x4A4A4A, 0x6A6A6A, 0x909090, 0xB8B8B8, 0x909090]),
    ("midnightBlue", "Midnight Blue",
        [0x0A1628, 0xD4AF37, 0x0A1628, 0x061020, 0x0F2235],
        [0xD4AF37, 0xC9A227, 0xA8893A, 0x8B7355, 0x6B5B4F, 0x8B7355]),
    ("monochromeBlue", "Monochrome Blue",
        [0xF5F8FA, 0x1A3A5C, 0xF5F8FA, 0xD0E0F0, 0xE0EAF2],
        [0x1A3A5C, 0x2A5580, 0x4A7AA8, 0x7AA0C8, 0xA8C4E0, 0x4A7AA8]),
    ("neonCyberpunk", "Neon Cyberpunk",
        [0x0D0D1A, 0x00FFFF, 0x0D0D1A, 0x0A0A15, 0x151525],
        [0xFF00FF, 0x00FFFF, 0x00C8C8, 0x0098A0, 0x006870, 0x0098A0]),
    ("noir", "Noir",
        [0x000000, 0xFFFFFF, 0x000000, 0x0A0A0A, 0x111111],
        [0xFFFFFF, 0xE0E0E0, 0xB0B0B0, 0x808080, 0x505050, 0x808080]),
    ("ocean", "Ocean",
        [0xF0F8FA, 0x1A5F7A, 0xF0F8FA, 0xB8D8E8, 0xD8EAE8],
        [0x1A5F7A, 0x2A7A9A, 0x4A9AB8, 0x70B8D0, 0xA0D0E0, 0x4A9AB8]),
    ("pastelDream", "Pastel Dream",
        [0xFAF7F2, 0x5D5A6D, 0xFAF7F2, 0xD4E4ED, 0xE8EDE4],
        [0x7B8794, 0x9BA4B0, 0xB5AEBB, 0xC9C0C9, 0xD8D2D8, 0xC9C0C9]),
    ("sunset", "Sunset",
        [0xFDF5F0, 0xC45C3E, 0xFDF5F0, 0xF0D8D0, 0xF8E8E0],
        [0xC45C3E, 0xD87A5A, 0xE8A088, 0xF0B8A8, 0xF5D0C8, 0xE8A088]),
    ("terracotta", "Terracotta",
        [0xF5EDE4, 0x8B4513, 0xF5EDE4, 0xA8C4C4, 0xE8E0D0],
        [0xA0522D, 0xB8653A, 0xC9846A, 0xD9A08A, 0xE5C4B0, 0xD9A08A]),
    ("warmBeige", "Warm Beige",
        [0xF5F0E8, 0x6B5B4F, 0xF5F0E8, 0xDDD5C8, 0xE8E4D8],
        [0x8B7355, 0xA08B70, 0xB5A48E, 0xC9BBAA, 0xD9CFC2, 0xC9BBAA]),
    ("debug", "Debug",
        [0x151515, 0xFFFFFF, 0xFFFFFF, 0x1F4E79, 0x1F6F54],
        [0xFF0000, 0x00FF00, 0x0000FF, 0x00FFFF, 0xFF00FF, 0xFFFF00]),
];

fn theme_from_row((_, name, base, roads): &ThemeRow) -> ThemeConfig {
    ThemeConfig {
        name: name.to_string(),
        background: Color::from_u32(base[0]),
        text: Color::from_u32(base[1]),
        gradient: Color::from_u32(base[2]),
        water: Color::from_u32(base[3]),
        parks: Color::from_u32(base[4]),
        roads: RoadPalette {
            motorway: Color::from_u32(roads[0]),
            primary: Color::from_u32(roads[1]),
            secondary: Color::from_u32(roads[2]),
            tertiary: Color::from_u32(roads[3]),
            residential: Color::from_u32(roads[4]),
            default: Color::from_u32(roads[5]),
        },
    }
}

static BUILTIN_CATALOG: Lazy<ThemeCatalog> = Lazy::new(|| {
    let themes = BUILTIN_THEMES
        .iter()
        .map(|row| (row.0.to_string(), theme_from_row(row)))
        .collect();
    ThemeCatalog { themes }
});

/// Immutable registry of themes keyed by identifier
#[derive(Debug, Clone, Default)]
pub struct ThemeCatalog {
    themes: HashMap<String, ThemeConfig>,
}

impl ThemeCatalog {
    pub const DEFAULT_THEME: &'static str = "noir";

    /// The themes shipped with the crate, built once per process
    pub fn builtin() -> &'static ThemeCatalog {
        &BUILTIN_CATALOG
    }

    /// Parses a JSON object of `{ "key": ThemeConfig, ... }`
    pub fn from_json(json: &str) -> Result<Self> {
        let themes: HashMap<String, ThemeConfig> = serde_json::from_str(json)?;
        Ok(Self { themes })
    }

    /// Returns a new catalog containing this one's themes plus `other`'s;
    /// entries in `other` win on key collisions
    pub fn merged_with(&self, other: &ThemeCatalog) -> ThemeCatalog {
        let mut themes = self.themes.clone();
        themes.extend(other.themes.iter().map(|(k, v)| (k.clone(), v.clone())));
        ThemeCatalog { themes }
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

impl Catalog for ThemeCatalog {
    type Entry = ThemeConfig;

    fn get(&self, key: &str) -> Result<ThemeConfig> {
        self.themes
            .get(key)
            .cloned()
            .ok_or_else(|| PosterError::UnknownTheme(key.to_string()))
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.themes.keys().cloned().collect();
        keys.sort();
        keys
    }
}

/// Named output sizes, plus a clamped custom size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionPreset {
    Square,
    FhdPortrait,
    FhdLandscape,
    QhdPortrait,
    QhdLandscape,
    UhdPortrait,
    UhdLandscape,
    Custom { width: u32, height: u32 },
}

impl ResolutionPreset {
    pub const NAMED: [ResolutionPreset; 7] = [
        Self::Square,
        Self::FhdPortrait,
        Self::FhdLandscape,
        Self::QhdPortrait,
        Self::QhdLandscape,
        Self::UhdPortrait,
        Self::UhdLandscape,
    ];

    /// Custom preset with both axes clamped to the supported range
    pub fn custom(width: u32, height: u32) -> Self {
        Self::Custom {
            width: width.clamp(MIN_CUSTOM_RESOLUTION, MAX_CUSTOM_RESOLUTION),
            height: height.clamp(MIN_CUSTOM_RESOLUTION, MAX_CUSTOM_RESOLUTION),
        }
    }

    pub fn resolve(&self) -> Resolution {
        match *self {
            Self::Square => Resolution::new(1080, 1080),
            Self::FhdPortrait => Resolution::new(1080, 1920),
            Self::FhdLandscape => Resolution::new(1920, 1080),
            Self::QhdPortrait => Resolution::new(1440, 2560),
            Self::QhdLandscape => Resolution::new(2560, 1440),
            Self::UhdPortrait => Resolution::new(2160, 3840),
            Self::UhdLandscape => Resolution::new(3840, 2160),
            Self::Custom { width, height } => Resolution::new(
                width.clamp(MIN_CUSTOM_RESOLUTION, MAX_CUSTOM_RESOLUTION),
                height.clamp(MIN_CUSTOM_RESOLUTION, MAX_CUSTOM_RESOLUTION),
            ),
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::FhdPortrait => "fhdPortrait",
            Self::FhdLandscape => "fhdLandscape",
            Self::QhdPortrait => "qhdPortrait",
            Self::QhdLandscape => "qhdLandscape",
            Self::UhdPortrait => "4kPortrait",
            Self::UhdLandscape => "4kLandscape",
            Self::Custom { .. } => "custom",
        }
    }

    pub fn label(&self) -> String {
        let res = self.resolve();
        match self {
            Self::Square => format!("HD Square ({}x{})", res.width, res.height),
            Self::FhdPortrait => format!("HD Portrait ({}x{})", res.width, res.height),
            Self::FhdLandscape => format!("HD Landscape ({}x{})", res.width, res.height),
            Self::QhdPortrait => format!("QHD Portrait ({}x{})", res.width, res.height),
            Self::QhdLandscape => format!("QHD Landscape ({}x{})", res.width, res.height),
            Self::UhdPortrait => format!("4K Portrait ({}x{})", res.width, res.height),
            Self::UhdLandscape => format!("4K Landscape ({}x{})", res.width, res.height),
            Self::Custom { .. } => "Custom".to_string(),
        }
    }
}

impl Default for ResolutionPreset {
    fn default() -> Self {
        Self::Square
    }
}

/// Lookup of resolution presets by key
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolutionCatalog;

impl ResolutionCatalog {
    /// Resolves `custom` to the default custom size; use
    /// [`ResolutionPreset::custom`] for explicit dimensions
    pub fn preset(&self, key: &str) -> Result<ResolutionPreset> {
        if key == "custom" {
            return Ok(ResolutionPreset::custom(
                DEFAULT_CUSTOM_RESOLUTION,
                DEFAULT_CUSTOM_RESOLUTION,
            ));
        }
        ResolutionPreset::NAMED
            .iter()
            .find(|preset| preset.key() == key)
            .copied()
            .ok_or_else(|| PosterError::UnknownResolution(key.to_string()))
    }
}

impl Catalog for ResolutionCatalog {
    type Entry = Resolution;

    fn get(&self, key: &str) -> Result<Resolution> {
        self.preset(key).map(|preset| preset.resolve())
    }

    fn keys(&self) -> Vec<String> {
        ResolutionPreset::NAMED
            .iter()
            .map(|preset| preset.key().to_string())
            .chain(std::iter::once("custom".to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_parsing() {
        assert_eq!(Color::from_hex("#FBF7F0").unwrap(), Color::rgb(0xFB, 0xF7, 0xF0));
        assert_eq!(Color::from_hex("1f4e79").unwrap(), Color::rgb(0x1F, 0x4E, 0x79));
        assert_eq!(Color::from_hex("#fff").unwrap(), Color::rgb(255, 255, 255));
        assert_eq!(Color::from_hex("#00000080").unwrap(), Color::new(0, 0, 0, 0x80));
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#GGGGGG").is_err());
    }

    #[test]
    fn test_color_display() {
        assert_eq!(Color::from_u32(0x1A3A5C).to_string(), "#1A3A5C");
        assert_eq!(Color::rgb(1, 2, 3).with_alpha(0).to_string(), "#01020300");
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = ThemeCatalog::builtin();
        assert_eq!(catalog.len(), BUILTIN_THEMES.len());

        let noir = catalog.get("noir").unwrap();
        assert_eq!(noir.name, "Noir");
        assert_eq!(noir.background, Color::rgb(0, 0, 0));
        assert_eq!(noir.roads.color_for(RoadClass::Motorway), Color::rgb(255, 255, 255));

        assert!(matches!(catalog.get("missing"), Err(PosterError::UnknownTheme(_))));
        assert!(catalog.keys().contains(&ThemeCatalog::DEFAULT_THEME.to_string()));
    }

    #[test]
    fn test_theme_json_round_trip() {
        let json = r##"{
            "harbor": {
                "name": "Harbor",
                "background": "#0A1628",
                "text": "#FFFFFF",
                "gradient": "#0A1628",
                "water": "#061020",
                "parks": "#0F2235",
                "roads": {
                    "motorway": "#D4AF37",
                    "primary": "#C9A227",
                    "secondary": "#A8893A",
                    "tertiary": "#8B7355",
                    "residential": "#6B5B4F",
                    "default": "#8B7355"
                }
            }
        }"##;
        let custom = ThemeCatalog::from_json(json).unwrap();
        let merged = ThemeCatalog::builtin().merged_with(&custom);
        assert_eq!(merged.len(), BUILTIN_THEMES.len() + 1);
        let harbor = merged.get("harbor").unwrap();
        assert_eq!(harbor.water, Color::from_u32(0x061020));

        let encoded = serde_json::to_string(&harbor).unwrap();
        assert!(encoded.contains("\"#D4AF37\""));
    }

    #[test]
    fn test_invalid_theme_color_is_rejected() {
        let json = r##"{"bad": {"name": "Bad", "background": "nope", "text": "#fff",
            "gradient": "#fff", "water": "#fff", "parks": "#fff",
            "roads": {"motorway": "#fff", "primary": "#fff", "secondary": "#fff",
            "tertiary": "#fff", "residential": "#fff", "default": "#fff"}}}"##;
        assert!(ThemeCatalog::from_json(json).is_err());
    }

    #[test]
    fn test_resolution_presets() {
        let catalog = ResolutionCatalog;
        assert_eq!(catalog.get("square").unwrap(), Resolution::new(1080, 1080));
        assert_eq!(catalog.get("4kLandscape").unwrap(), Resolution::new(3840, 2160));
        assert_eq!(catalog.get("custom").unwrap(), Resolution::new(1080, 1080));
        assert!(matches!(catalog.get("8k"), Err(PosterError::UnknownResolution(_))));
        assert_eq!(catalog.keys().len(), 8);
        assert_eq!(ResolutionPreset::FhdPortrait.label(), "HD Portrait (1080x1920)");
    }

    #[test]
    fn test_custom_resolution_is_clamped() {
        assert_eq!(
            ResolutionPreset::custom(100, 20_000).resolve(),
            Resolution::new(MIN_CUSTOM_RESOLUTION, MAX_CUSTOM_RESOLUTION)
        );
        let raw = ResolutionPreset::Custom { width: 5, height: 5000 };
        assert_eq!(raw.resolve(), Resolution::new(300, 5000));
    }
}

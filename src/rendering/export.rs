//! PNG export of a finished poster.

use image::{codecs::png::PngEncoder, ColorType, ImageEncoder};

use crate::{data::display::DisplayConfig, rendering::raster::RasterSurface, PosterError, Result};

/// Encoded poster plus the suggested download name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedPoster {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// `poster_{main}_{sub}.png`, with path separators replaced so the name stays a
/// single path component
pub fn poster_filename(display: &DisplayConfig) -> String {
    let name = format!("poster_{}_{}.png", display.main_heading, display.sub_heading);
    name.replace(['/', '\\'], "_")
}

/// Encodes the surface as PNG. The surface is only read, so a failed export
/// leaves the render intact.
pub fn export_png(surface: &RasterSurface, display: &DisplayConfig) -> Result<ExportedPoster> {
    let rgba = surface.to_rgba_bytes();
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(&rgba, surface.width(), surface.height(), ColorType::Rgba8)
        .map_err(|e| PosterError::Export(e.to_string()))?;

    let filename = poster_filename(display);
    log::info!("exported {} ({} bytes)", filename, bytes.len());
    Ok(ExportedPoster { filename, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Color;
    use crate::core::geo::Resolution;
    use crate::rendering::surface::Surface;

    fn display() -> DisplayConfig {
        DisplayConfig::new("R O M E", "ITALY", "41.9028° N / 12.4964° E")
    }

    #[test]
    fn test_filename() {
        assert_eq!(poster_filename(&display()), "poster_R O M E_ITALY.png");
        let slashed = DisplayConfig::new("A/B", "C\\D", "");
        assert_eq!(poster_filename(&slashed), "poster_A_B_C_D.png");
    }

    #[test]
    fn test_png_round_trip() {
        let mut surface = RasterSurface::new(Resolution::new(12, 7), None).unwrap();
        surface.fill_background(Color::from_u32(0x062C22)).unwrap();

        let exported = export_png(&surface, &display()).unwrap();
        assert_eq!(&exported.bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&exported.bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (12, 7));
        assert_eq!(decoded.get_pixel(3, 3).0, [0x06, 0x2C, 0x22, 255]);
        // surface untouched
        assert_eq!(surface.pixel(3, 3), Some(Color::from_u32(0x062C22)));
    }
}

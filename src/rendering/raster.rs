//! Software raster surface backed by tiny-skia, with rusttype glyph rendering.

use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use rusttype::{point, Font, Scale};
use tiny_skia as sk;

use crate::{
    core::{
        config::Color,
        geo::{Point, Resolution},
    },
    layers::vector::{LineStyle, PolygonStyle},
    rendering::{
        context::AVERAGE_ADVANCE_EM,
        surface::{GradientBand, Surface, TextStyle},
    },
    PosterError, Result,
};

static BUNDLED_REGULAR: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
static BUNDLED_BOLD: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

static BUNDLED_FONTS: Lazy<Option<Arc<PosterFonts>>> = Lazy::new(|| {
    let regular = Font::try_from_bytes(BUNDLED_REGULAR)?;
    let bold = Font::try_from_bytes(BUNDLED_BOLD);
    Some(Arc::new(PosterFonts { regular, bold }))
});

/// Regular and optional bold faces used for poster text
pub struct PosterFonts {
    regular: Font<'static>,
    bold: Option<Font<'static>>,
}

impl PosterFonts {
    /// Builds fonts from TrueType/OpenType bytes
    pub fn from_bytes(regular: Vec<u8>, bold: Option<Vec<u8>>) -> Result<Self> {
        let regular = Font::try_from_vec(regular)
            .ok_or_else(|| PosterError::Font("regular face could not be parsed".to_string()))?;
        let bold = match bold {
            Some(bytes) => Some(
                Font::try_from_vec(bytes)
                    .ok_or_else(|| PosterError::Font("bold face could not be parsed".to_string()))?,
            ),
            None => None,
        };
        Ok(Self { regular, bold })
    }

    /// DejaVu Sans and DejaVu Sans Bold, compiled into the crate
    pub fn bundled() -> Result<Arc<PosterFonts>> {
        BUNDLED_FONTS
            .clone()
            .ok_or_else(|| PosterError::Font("bundled face could not be parsed".to_string()))
    }

    /// Reads font files from disk
    pub fn load(regular: &Path, bold: Option<&Path>) -> Result<Self> {
        let regular_bytes = std::fs::read(regular)?;
        let bold_bytes = bold.map(std::fs::read).transpose()?;
        log::info!(
            "loaded poster fonts from {} (bold: {})",
            regular.display(),
            bold.map(|p| p.display().to_string())
                .unwrap_or_else(|| "none".to_string())
        );
        Self::from_bytes(regular_bytes, bold_bytes)
    }

    /// Face for a style; bold falls back to the regular face
    fn face(&self, style: &TextStyle) -> &Font<'static> {
        match (&self.bold, style.bold) {
            (Some(bold), true) => bold,
            _ => &self.regular,
        }
    }
}

impl std::fmt::Debug for PosterFonts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PosterFonts")
            .field("bold", &self.bold.is_some())
            .finish()
    }
}

fn to_sk_color(color: Color) -> sk::Color {
    sk::Color::from_rgba8(color.r, color.g, color.b, color.a)
}

fn solid_paint(color: Color) -> sk::Paint<'static> {
    let mut paint = sk::Paint::default();
    paint.set_color(to_sk_color(color));
    paint.anti_alias = true;
    paint
}

fn build_path(points: &[Point], close: bool) -> Option<sk::Path> {
    let (first, rest) = points.split_first()?;
    let mut builder = sk::PathBuilder::new();
    builder.move_to(first.x as f32, first.y as f32);
    for p in rest {
        builder.line_to(p.x as f32, p.y as f32);
    }
    if close {
        builder.close();
    }
    builder.finish()
}

/// Advance width of a laid out run, kerning included
fn advance_width(font: &Font<'static>, text: &str, size: f32) -> f32 {
    font.layout(text, Scale::uniform(size), point(0.0, 0.0))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

/// In-memory RGBA pixel grid the composer draws into
pub struct RasterSurface {
    pixmap: sk::Pixmap,
    fonts: Option<Arc<PosterFonts>>,
}

impl RasterSurface {
    /// Allocates a transparent surface. Fails when the size is zero or too
    /// large to allocate.
    pub fn new(size: Resolution, fonts: Option<Arc<PosterFonts>>) -> Result<Self> {
        let pixmap = sk::Pixmap::new(size.width, size.height).ok_or_else(|| {
            PosterError::SurfaceUnavailable(format!(
                "cannot allocate a {}x{} pixmap",
                size.width, size.height
            ))
        })?;
        Ok(Self { pixmap, fonts })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Premultiplied RGBA bytes, row-major
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Straight (non-premultiplied) RGBA bytes, row-major
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixmap.data().len());
        for pixel in self.pixmap.pixels() {
            let c = pixel.demultiply();
            out.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        out
    }

    /// Straight RGBA copy as an `image` buffer, e.g. for on-screen preview
    pub fn to_rgba_image(&self) -> Result<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width(), self.height(), self.to_rgba_bytes()).ok_or_else(
            || PosterError::Export("pixel buffer does not match surface size".to_string()),
        )
    }

    /// Straight RGBA value of one pixel, `None` outside the surface
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            Color::new(c.red(), c.green(), c.blue(), c.alpha())
        })
    }
}

impl Surface for RasterSurface {
    fn size(&self) -> Resolution {
        Resolution::new(self.pixmap.width(), self.pixmap.height())
    }

    fn fill_background(&mut self, color: Color) -> Result<()> {
        self.pixmap.fill(to_sk_color(color));
        Ok(())
    }

    fn stroke_path(&mut self, points: &[Point], style: &LineStyle) -> Result<()> {
        if let Some(path) = build_path(points, false) {
            let stroke = sk::Stroke {
                width: style.width,
                ..Default::default()
            };
            self.pixmap.stroke_path(
                &path,
                &solid_paint(style.color),
                &stroke,
                sk::Transform::identity(),
                None,
            );
        }
        Ok(())
    }

    fn fill_polygon(&mut self, points: &[Point], style: &PolygonStyle) -> Result<()> {
        if let Some(path) = build_path(points, true) {
            self.pixmap.fill_path(
                &path,
                &solid_paint(style.fill_color),
                sk::FillRule::Winding,
                sk::Transform::identity(),
                None,
            );
        }
        Ok(())
    }

    fn fill_gradient(&mut self, band: &GradientBand) -> Result<()> {
        if band.height() <= 0.0 {
            return Ok(());
        }
        let shader = sk::LinearGradient::new(
            sk::Point::from_xy(0.0, band.start_y as f32),
            sk::Point::from_xy(0.0, band.end_y as f32),
            vec![
                sk::GradientStop::new(0.0, to_sk_color(band.from)),
                sk::GradientStop::new(1.0, to_sk_color(band.to)),
            ],
            sk::SpreadMode::Pad,
            sk::Transform::identity(),
        )
        .ok_or_else(|| PosterError::SurfaceUnavailable("invalid gradient band".to_string()))?;

        let rect = sk::Rect::from_xywh(
            0.0,
            band.top() as f32,
            self.pixmap.width() as f32,
            band.height() as f32,
        )
        .ok_or_else(|| PosterError::SurfaceUnavailable("invalid gradient rect".to_string()))?;

        let paint = sk::Paint {
            shader,
            anti_alias: true,
            ..Default::default()
        };
        self.pixmap
            .fill_rect(rect, &paint, sk::Transform::identity(), None);
        Ok(())
    }

    fn measure_text_width(&self, text: &str, style: &TextStyle) -> f64 {
        match &self.fonts {
            Some(fonts) => advance_width(fonts.face(style), text, style.size) as f64,
            None => text.chars().count() as f64 * style.size as f64 * AVERAGE_ADVANCE_EM,
        }
    }

    fn draw_text(&mut self, text: &str, anchor: Point, style: &TextStyle) -> Result<()> {
        let Some(fonts) = self.fonts.clone() else {
            return Err(PosterError::Font(format!("no font loaded to draw {:?}", text)));
        };
        let font = fonts.face(style);
        let width = advance_width(font, text, style.size);
        let origin = point(anchor.x as f32 - width / 2.0, anchor.y as f32);
        let glyphs: Vec<_> = font
            .layout(text, Scale::uniform(style.size), origin)
            .filter_map(|g| g.pixel_bounding_box().map(|bb| (g, bb)))
            .collect();

        let Some((min_x, min_y, max_x, max_y)) = glyphs.iter().map(|(_, bb)| bb).fold(
            None,
            |acc: Option<(i32, i32, i32, i32)>, bb| {
                Some(match acc {
                    None => (bb.min.x, bb.min.y, bb.max.x, bb.max.y),
                    Some((a, b, c, d)) => {
                        (a.min(bb.min.x), b.min(bb.min.y), c.max(bb.max.x), d.max(bb.max.y))
                    }
                })
            },
        ) else {
            return Ok(());
        };

        let box_w = (max_x - min_x) as u32;
        let box_h = (max_y - min_y) as u32;
        let mut mask = sk::Mask::new(box_w, box_h).ok_or_else(|| {
            PosterError::SurfaceUnavailable(format!("cannot allocate a {box_w}x{box_h} glyph mask"))
        })?;
        let mut layer = sk::Pixmap::new(box_w, box_h).ok_or_else(|| {
            PosterError::SurfaceUnavailable(format!("cannot allocate a {box_w}x{box_h} text layer"))
        })?;

        {
            let coverage = mask.data_mut();
            for (glyph, bb) in &glyphs {
                glyph.draw(|gx, gy, v| {
                    let x = (bb.min.x - min_x) as u32 + gx;
                    let y = (bb.min.y - min_y) as u32 + gy;
                    if x < box_w && y < box_h {
                        let idx = (y * box_w + x) as usize;
                        let value = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
                        coverage[idx] = coverage[idx].max(value);
                    }
                });
            }
        }

        let full = sk::Rect::from_xywh(0.0, 0.0, box_w as f32, box_h as f32)
            .ok_or_else(|| PosterError::SurfaceUnavailable("invalid text rect".to_string()))?;
        layer.fill_rect(full, &solid_paint(style.color), sk::Transform::identity(), Some(&mask));
        self.pixmap.draw_pixmap(
            min_x,
            min_y,
            layer.as_ref(),
            &sk::PixmapPaint::default(),
            sk::Transform::identity(),
            None,
        );
        Ok(())
    }
}

//! The drawing capability every poster backend implements.

use crate::core::config::Color;
use crate::core::geo::{Point, Resolution};
use crate::layers::vector::{LineStyle, PolygonStyle};
use crate::Result;

/// Font style for a text run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels
    pub size: f32,
    pub bold: bool,
    pub color: Color,
}

impl TextStyle {
    pub fn new(size: f32, color: Color) -> Self {
        Self {
            size,
            bold: false,
            color,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// A full-width band filled with a vertical linear gradient.
///
/// `from` is painted at `start_y`, `to` at `end_y`; `end_y` may be above
/// `start_y` for a gradient that fades upward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientBand {
    pub start_y: f64,
    pub end_y: f64,
    pub from: Color,
    pub to: Color,
}

impl GradientBand {
    pub fn top(&self) -> f64 {
        self.start_y.min(self.end_y)
    }

    pub fn height(&self) -> f64 {
        (self.end_y - self.start_y).abs()
    }
}

/// Drawing operations the poster pipeline needs from a backend
pub trait Surface {
    /// Pixel size of the surface
    fn size(&self) -> Resolution;

    /// Fills the whole surface with one color
    fn fill_background(&mut self, color: Color) -> Result<()>;

    /// Strokes an open polyline through `points` in order
    fn stroke_path(&mut self, points: &[Point], style: &LineStyle) -> Result<()>;

    /// Fills the polygon through `points`, closed back to the first point
    fn fill_polygon(&mut self, points: &[Point], style: &PolygonStyle) -> Result<()>;

    /// Paints a full-width vertical gradient band
    fn fill_gradient(&mut self, band: &GradientBand) -> Result<()>;

    /// Advance width of `text` in pixels
    fn measure_text_width(&self, text: &str, style: &TextStyle) -> f64;

    /// Draws `text` horizontally centered on `anchor.x` with its baseline at `anchor.y`
    fn draw_text(&mut self, text: &str, anchor: Point, style: &TextStyle) -> Result<()>;
}

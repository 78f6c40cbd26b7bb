use crate::{
    core::{
        config::Color,
        geo::{Point, Resolution},
    },
    layers::vector::{LineStyle, PolygonStyle},
    rendering::surface::{GradientBand, Surface, TextStyle},
    PosterError, Result,
};

/// Average glyph advance as a fraction of the font size, used when no font
/// metrics are available
pub const AVERAGE_ADVANCE_EM: f64 = 0.6;

/// Commands that can be issued to a recording surface
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Background {
        color: Color,
    },
    Path {
        points: Vec<Point>,
        style: LineStyle,
    },
    Polygon {
        points: Vec<Point>,
        style: PolygonStyle,
    },
    Gradient {
        band: GradientBand,
    },
    Text {
        text: String,
        anchor: Point,
        style: TextStyle,
    },
}

/// Surface that records draw calls instead of rasterizing them.
///
/// Useful for previews that re-render elsewhere and for inspecting exactly what
/// the composer asked for.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    size: Resolution,
    /// Drawing primitives queue, in submission order
    drawing_queue: Vec<DrawCommand>,
}

impl RecordingSurface {
    /// Create a new recording surface
    pub fn new(size: Resolution) -> Result<Self> {
        if !size.is_valid() {
            return Err(PosterError::SurfaceUnavailable(format!(
                "cannot record onto a {}x{} surface",
                size.width, size.height
            )));
        }
        Ok(Self {
            size,
            drawing_queue: Vec::new(),
        })
    }

    /// Get the current drawing queue
    pub fn get_drawing_queue(&self) -> &[DrawCommand] {
        &self.drawing_queue
    }

    /// Takes the recorded commands, leaving the queue empty
    pub fn take_queue(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.drawing_queue)
    }

    /// Clear the drawing queue
    pub fn clear_queue(&mut self) {
        self.drawing_queue.clear();
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Resolution {
        self.size
    }

    fn fill_background(&mut self, color: Color) -> Result<()> {
        self.drawing_queue.push(DrawCommand::Background { color });
        Ok(())
    }

    fn stroke_path(&mut self, points: &[Point], style: &LineStyle) -> Result<()> {
        self.drawing_queue.push(DrawCommand::Path {
            points: points.to_vec(),
            style: *style,
        });
        Ok(())
    }

    fn fill_polygon(&mut self, points: &[Point], style: &PolygonStyle) -> Result<()> {
        self.drawing_queue.push(DrawCommand::Polygon {
            points: points.to_vec(),
            style: *style,
        });
        Ok(())
    }

    fn fill_gradient(&mut self, band: &GradientBand) -> Result<()> {
        self.drawing_queue.push(DrawCommand::Gradient { band: *band });
        Ok(())
    }

    fn measure_text_width(&self, text: &str, style: &TextStyle) -> f64 {
        text.chars().count() as f64 * style.size as f64 * AVERAGE_ADVANCE_EM
    }

    fn draw_text(&mut self, text: &str, anchor: Point, style: &TextStyle) -> Result<()> {
        self.drawing_queue.push(DrawCommand::Text {
            text: text.to_string(),
            anchor,
            style: *style,
        });
        Ok(())
    }
}

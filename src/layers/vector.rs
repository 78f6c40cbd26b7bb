use crate::{
    core::{
        config::{Color, ThemeConfig},
        projection::CoordinateProjector,
    },
    data::osm::GeometryElement,
    layers::classify::{classify, FeatureCategory, FeatureFamily, RoadClass},
    rendering::surface::Surface,
    Result,
};

use serde::{Deserialize, Serialize};

/// Minimum vertex counts for a drawable geometry
const MIN_PATH_POINTS: usize = 2;
const MIN_POLYGON_POINTS: usize = 3;

/// Style for line features
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    /// Line color
    pub color: Color,
    /// Line width in pixels
    pub width: f32,
}

impl LineStyle {
    pub fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }
}

/// Style for polygon features. Polygons are filled only, never stroked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolygonStyle {
    /// Fill color
    pub fill_color: Color,
}

impl PolygonStyle {
    pub fn new(fill_color: Color) -> Self {
        Self { fill_color }
    }
}

/// Per-layer drawing counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerStats {
    /// Elements that produced a draw call
    pub drawn: usize,
    /// Elements whose tags classified as skip
    pub skipped: usize,
    /// Elements with too few vertices for their primitive
    pub too_short: usize,
}

/// Draws one feature family onto a surface.
///
/// Roads become open stroked paths in the theme's per-class color and width;
/// water and parks become filled polygons without a stroke.
pub struct LayerRenderer<'a> {
    projector: &'a CoordinateProjector,
    theme: &'a ThemeConfig,
}

impl<'a> LayerRenderer<'a> {
    pub fn new(projector: &'a CoordinateProjector, theme: &'a ThemeConfig) -> Self {
        Self { projector, theme }
    }

    /// Style used for a road class
    pub fn road_style(&self, class: RoadClass) -> LineStyle {
        LineStyle::new(self.theme.roads.color_for(class), class.stroke_width())
    }

    /// Renders every element of a layer, in input order
    pub fn render_layer<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        family: FeatureFamily,
        elements: &[GeometryElement],
    ) -> Result<LayerStats> {
        let mut stats = LayerStats::default();

        for element in elements {
            match classify(family, &element.tags) {
                FeatureCategory::Road(class) => {
                    if element.geometry.len() < MIN_PATH_POINTS {
                        stats.too_short += 1;
                        continue;
                    }
                    let points = self.projector.project_all(&element.geometry);
                    surface.stroke_path(&points, &self.road_style(class))?;
                }
                FeatureCategory::Water => {
                    if !self.fill(surface, element, self.theme.water)? {
                        stats.too_short += 1;
                        continue;
                    }
                }
                FeatureCategory::Park => {
                    if !self.fill(surface, element, self.theme.parks)? {
                        stats.too_short += 1;
                        continue;
                    }
                }
                FeatureCategory::Skip => {
                    stats.skipped += 1;
                    continue;
                }
            }
            stats.drawn += 1;
        }

        log::debug!(
            "{} layer: {} drawn, {} skipped, {} too short",
            family,
            stats.drawn,
            stats.skipped,
            stats.too_short
        );
        Ok(stats)
    }

    /// Fills the element as a polygon; returns false when it has too few vertices
    fn fill<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        element: &GeometryElement,
        color: Color,
    ) -> Result<bool> {
        if element.geometry.len() < MIN_POLYGON_POINTS {
            return Ok(false);
        }
        let points = self.projector.project_all(&element.geometry);
        surface.fill_polygon(&points, &PolygonStyle::new(color))?;
        Ok(true)
    }
}

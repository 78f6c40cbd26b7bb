//! Poster composition: background, feature layers, gradients and text.

#[cfg(feature = "raster")]
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    core::{
        config::ThemeConfig,
        constants::{
            ATTRIBUTION_SIZE, ATTRIBUTION_TEXT, COORDINATE_LABEL_SIZE, DIVIDER_LENGTH_FACTOR,
            DIVIDER_WIDTH, GRADIENT_BAND_DIVISOR, MAIN_HEADING_SIZE, SUB_HEADING_SIZE, TEXT_GAP,
        },
        geo::{BoundingBox, Point, Resolution},
        projection::CoordinateProjector,
    },
    data::{display::DisplayConfig, osm::GeometryElement},
    layers::{
        classify::FeatureFamily,
        vector::{LayerRenderer, LineStyle},
    },
    rendering::surface::{GradientBand, Surface, TextStyle},
    PosterError, Result,
};

#[cfg(feature = "raster")]
use crate::rendering::raster::{PosterFonts, RasterSurface};

/// Everything needed to render one poster. Built once per generation and
/// consumed by [`PosterComposer::compose`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    #[serde(default)]
    pub road_elements: Vec<GeometryElement>,
    #[serde(default)]
    pub water_elements: Vec<GeometryElement>,
    #[serde(default)]
    pub park_elements: Vec<GeometryElement>,
    pub bbox: BoundingBox,
    pub resolution: Resolution,
    pub theme: ThemeConfig,
    pub display: DisplayConfig,
}

/// Sequences layer rendering and the text overlay onto a surface.
///
/// Holds nothing but immutable fonts, so one composer can serve any number of
/// requests. Without explicit fonts the bundled DejaVu faces are used.
#[derive(Debug, Default)]
pub struct PosterComposer {
    #[cfg(feature = "raster")]
    fonts: Option<Arc<PosterFonts>>,
}

impl PosterComposer {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(feature = "raster")]
    pub fn with_fonts(fonts: PosterFonts) -> Self {
        Self {
            fonts: Some(Arc::new(fonts)),
        }
    }

    /// Renders the request onto a freshly allocated raster surface
    #[cfg(feature = "raster")]
    pub fn compose(&self, request: RenderRequest) -> Result<RasterSurface> {
        let fonts = match &self.fonts {
            Some(fonts) => fonts.clone(),
            None => PosterFonts::bundled()?,
        };
        let mut surface = RasterSurface::new(request.resolution, Some(fonts))?;
        self.compose_onto(&request, &mut surface)?;
        Ok(surface)
    }

    /// Renders the request onto any surface of matching size.
    ///
    /// Order is fixed: background, water, parks, roads, gradients, text.
    pub fn compose_onto<S: Surface + ?Sized>(
        &self,
        request: &RenderRequest,
        surface: &mut S,
    ) -> Result<()> {
        if surface.size() != request.resolution {
            let size = surface.size();
            return Err(PosterError::SurfaceUnavailable(format!(
                "surface is {}x{} but the request is {}x{}",
                size.width, size.height, request.resolution.width, request.resolution.height
            )));
        }
        let projector = CoordinateProjector::new(request.bbox, request.resolution)?;
        let theme = &request.theme;

        log::info!(
            "composing {}x{} poster '{}' ({} roads, {} water, {} parks)",
            request.resolution.width,
            request.resolution.height,
            theme.name,
            request.road_elements.len(),
            request.water_elements.len(),
            request.park_elements.len()
        );

        surface.fill_background(theme.background)?;

        let renderer = LayerRenderer::new(&projector, theme);
        renderer.render_layer(surface, FeatureFamily::Water, &request.water_elements)?;
        renderer.render_layer(surface, FeatureFamily::Park, &request.park_elements)?;
        renderer.render_layer(surface, FeatureFamily::Road, &request.road_elements)?;

        self.draw_gradients(surface, theme, request.resolution)?;
        self.draw_text_block(surface, theme, &request.display, request.resolution)?;
        Ok(())
    }

    fn draw_gradients<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        theme: &ThemeConfig,
        resolution: Resolution,
    ) -> Result<()> {
        let band = (resolution.height / GRADIENT_BAND_DIVISOR) as f64;
        let height = resolution.height as f64;
        let transparent = theme.gradient.with_alpha(0);

        surface.fill_gradient(&GradientBand {
            start_y: 0.0,
            end_y: band,
            from: theme.gradient,
            to: transparent,
        })?;
        surface.fill_gradient(&GradientBand {
            start_y: height,
            end_y: height - band,
            from: theme.gradient,
            to: transparent,
        })
    }

    fn draw_text_block<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        theme: &ThemeConfig,
        display: &DisplayConfig,
        resolution: Resolution,
    ) -> Result<()> {
        let width = resolution.width as f64;
        let height = resolution.height as f64;
        let center_x = width / 2.0;
        let start_y = height * 5.0 / 6.0;

        let heading = TextStyle::new(MAIN_HEADING_SIZE, theme.text).bold();
        let sub = TextStyle::new(SUB_HEADING_SIZE, theme.text);
        let coords = TextStyle::new(COORDINATE_LABEL_SIZE, theme.text);

        let mut y = start_y;
        surface.draw_text(&display.main_heading, Point::new(center_x, y), &heading)?;

        // divider sits one gap below the heading, sub heading half a gap below it
        y += TEXT_GAP + TEXT_GAP / 2.0 + SUB_HEADING_SIZE as f64;
        surface.draw_text(&display.sub_heading, Point::new(center_x, y), &sub)?;

        y += TEXT_GAP + COORDINATE_LABEL_SIZE as f64;
        let label_width = surface.measure_text_width(&display.coordinate_label, &coords);
        surface.draw_text(&display.coordinate_label, Point::new(center_x, y), &coords)?;

        let divider = label_width * DIVIDER_LENGTH_FACTOR;
        let divider_y = start_y + TEXT_GAP;
        surface.stroke_path(
            &[
                Point::new((width - divider) / 2.0, divider_y),
                Point::new((width + divider) / 2.0, divider_y),
            ],
            &LineStyle::new(theme.text, DIVIDER_WIDTH),
        )?;

        let attribution = TextStyle::new(ATTRIBUTION_SIZE, theme.text);
        let attribution_width = surface.measure_text_width(ATTRIBUTION_TEXT, &attribution);
        let margin = ATTRIBUTION_SIZE as f64;
        surface.draw_text(
            ATTRIBUTION_TEXT,
            Point::new(width - margin - attribution_width / 2.0, height - margin),
            &attribution,
        )
    }
}

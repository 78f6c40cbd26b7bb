pub mod composer;
pub mod context;
#[cfg(feature = "raster")]
pub mod export;
#[cfg(feature = "raster")]
pub mod raster;
pub mod surface;

// Re-export main types
pub use composer::{PosterComposer, RenderRequest};
pub use context::{DrawCommand, RecordingSurface};
pub use surface::{GradientBand, Surface, TextStyle};

#[cfg(feature = "raster")]
pub use export::{export_png, poster_filename, ExportedPoster};
#[cfg(feature = "raster")]
pub use raster::{PosterFonts, RasterSurface};

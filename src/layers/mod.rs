pub mod classify;
pub mod vector;

pub use classify::{classify, FeatureCategory, FeatureFamily, RoadClass};
pub use vector::{LayerRenderer, LayerStats, LineStyle, PolygonStyle};

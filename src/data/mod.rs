pub mod display;
pub mod osm;

pub use display::{DisplayConfig, Location, TextOverrides};
pub use osm::{parse_overpass_json, GeometryElement};

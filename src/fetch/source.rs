use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::MapDataFetcher;
use crate::{
    core::geo::BoundingBox, data::osm::parse_overpass_json, data::osm::GeometryElement,
    layers::classify::FeatureFamily, Result,
};

/// Serves Overpass JSON exports from a directory, one file per family
#[derive(Debug, Clone)]
pub struct OverpassFileFetcher {
    root: PathBuf,
}

impl OverpassFileFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn file_name(family: FeatureFamily) -> &'static str {
        match family {
            FeatureFamily::Road => "roads.json",
            FeatureFamily::Water => "water.json",
            FeatureFamily::Park => "parks.json",
        }
    }

    pub fn path_for(&self, family: FeatureFamily) -> PathBuf {
        self.root.join(Self::file_name(family))
    }
}

#[async_trait]
impl MapDataFetcher for OverpassFileFetcher {
    async fn fetch(
        &self,
        bbox: &BoundingBox,
        family: FeatureFamily,
    ) -> Result<Vec<GeometryElement>> {
        let path = self.path_for(family);
        let json = match tokio::fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::warn!("{} not found, {} layer will be empty", path.display(), family);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let elements = parse_overpass_json(&json)?;
        let total = elements.len();
        let inside: Vec<_> = elements.into_iter().filter(|e| e.touches(bbox)).collect();
        log::debug!(
            "{}: kept {} of {} elements inside bbox",
            path.display(),
            inside.len(),
            total
        );
        Ok(inside)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PosterError;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mapposter-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    const ROADS: &str = r#"{"elements": [
        {"type": "way", "tags": {"highway": "primary"},
         "geometry": [{"lat": 0.5, "lon": 0.5}, {"lat": 0.6, "lon": 0.6}]},
        {"type": "way", "tags": {"highway": "residential"},
         "geometry": [{"lat": 5.0, "lon": 5.0}, {"lat": 5.1, "lon": 5.1}]}
    ]}"#;

    #[tokio::test]
    async fn test_filters_by_bbox() {
        let dir = scratch_dir("filter");
        std::fs::write(dir.join("roads.json"), ROADS).unwrap();

        let fetcher = OverpassFileFetcher::new(&dir);
        let bbox = BoundingBox::new(0.0, 1.0, 0.0, 1.0).unwrap();
        let roads = fetcher.fetch(&bbox, FeatureFamily::Road).await.unwrap();
        assert_eq!(roads.len(), 1);
        assert_eq!(roads[0].tag("highway"), Some("primary"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_layer() {
        let dir = scratch_dir("missing");
        let fetcher = OverpassFileFetcher::new(&dir);
        assert_eq!(fetcher.root(), dir.as_path());
        assert_eq!(fetcher.path_for(FeatureFamily::Park), dir.join("parks.json"));
        let bbox = BoundingBox::new(0.0, 1.0, 0.0, 1.0).unwrap();
        let parks = fetcher.fetch(&bbox, FeatureFamily::Park).await.unwrap();
        assert!(parks.is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let dir = scratch_dir("malformed");
        std::fs::write(dir.join("water.json"), "{not json").unwrap();

        let fetcher = OverpassFileFetcher::new(&dir);
        let bbox = BoundingBox::new(0.0, 1.0, 0.0, 1.0).unwrap();
        let result = fetcher.fetch(&bbox, FeatureFamily::Water).await;
        assert!(matches!(result, Err(PosterError::Serialization(_))));

        std::fs::remove_dir_all(&dir).ok();
    }
}

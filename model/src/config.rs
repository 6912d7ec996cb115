use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;

use crate::{ChunkSource, SegmentedLoader};

/// Where each split dataset lives, relative to a data root, and how the animation runs.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatasetConfig {
    pub stops: SegmentedFile,
    pub shapes: SegmentedFile,
    pub stop_times: SegmentedFile,
    /// How often the vehicle position is recomputed
    pub frame_interval_ms: u64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SegmentedFile {
    pub manifest: String,
    pub base_path: String,
    /// Only load the first few chunks
    #[serde(default)]
    pub max_segments: Option<usize>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            stops: SegmentedFile::new("gtfs_vt/stops_segments", None),
            shapes: SegmentedFile::new("gtfs_vt/segments", None),
            // stop_times is huge; the first chunk is plenty to find some trips
            stop_times: SegmentedFile::new("gtfs_vt/stop_times_segments", Some(1)),
            frame_interval_ms: 16,
        }
    }
}

impl DatasetConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        if config.frame_interval_ms == 0 {
            bail!("frame_interval_ms must be positive");
        }
        Ok(config)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

impl SegmentedFile {
    /// The manifest is assumed to sit next to the chunks, as `segments_info.json`.
    pub fn new(base_path: &str, max_segments: Option<usize>) -> Self {
        Self {
            manifest: format!("{base_path}/segments_info.json"),
            base_path: base_path.to_string(),
            max_segments,
        }
    }

    pub fn loader<'a, S: ChunkSource>(&self, source: &'a S) -> SegmentedLoader<'a, S> {
        SegmentedLoader::new(source, &self.manifest, &self.base_path)
            .max_segments(self.max_segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DatasetConfig::from_toml("").unwrap();
        assert_eq!(config, DatasetConfig::default());
        assert_eq!(
            config.stops.manifest,
            "gtfs_vt/stops_segments/segments_info.json"
        );
        assert_eq!(config.stop_times.max_segments, Some(1));
        assert_eq!(config.frame_interval(), Duration::from_millis(16));
    }

    #[test]
    fn test_override() {
        let config = DatasetConfig::from_toml(
            r#"
frame_interval_ms = 100

[stop_times]
manifest = "st/info.json"
base_path = "st"
"#,
        )
        .unwrap();
        assert_eq!(config.frame_interval_ms, 100);
        assert_eq!(config.stop_times.base_path, "st");
        assert_eq!(config.stop_times.max_segments, None);
        assert_eq!(config.shapes, DatasetConfig::default().shapes);
    }

    #[test]
    fn test_bad_config() {
        assert!(DatasetConfig::from_toml("frame_interval_ms = 0").is_err());
        assert!(DatasetConfig::from_toml("colour = \"red\"").is_err());
    }
}

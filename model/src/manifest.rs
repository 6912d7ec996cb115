use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Describes how one large delimited file was split into chunk files. The order of `segments`
/// is the load order; `index` is informational.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentInfo {
    pub total_segments: usize,
    pub total_lines: usize,
    pub data_lines: usize,
    pub lines_per_segment: usize,
    pub segments: Vec<SegmentEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentEntry {
    pub filename: String,
    pub index: usize,
}

impl SegmentInfo {
    pub fn from_json(json: &str) -> Result<Self> {
        let info: SegmentInfo = serde_json::from_str(json)?;
        if info.total_segments != info.segments.len() {
            warn!(
                "Manifest claims {} segments, but lists {}",
                info.total_segments,
                info.segments.len()
            );
        }
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest() {
        let json = r#"{
  "totalSegments": 2,
  "totalLines": 10,
  "dataLines": 9,
  "linesPerSegment": 5,
  "segments": [
    { "filename": "stops_part1.txt", "index": 1 },
    { "filename": "stops_part2.txt", "index": 2 }
  ]
}"#;
        let info = SegmentInfo::from_json(json).unwrap();
        assert_eq!(info.data_lines, 9);
        assert_eq!(info.lines_per_segment, 5);
        assert_eq!(info.segments[1].filename, "stops_part2.txt");
    }

    #[test]
    fn test_bad_manifest() {
        assert!(SegmentInfo::from_json("<html>Not found</html>").is_err());
        assert!(SegmentInfo::from_json(r#"{"totalSegments": 1}"#).is_err());
    }
}

/// JSON point list format for precomputed target layouts.
///
/// Accepted shapes:
/// - `[[x, y, z], ...]` or `[[x, y, z, r, g, b], ...]`
/// - `[{"x": .., "y": .., "z": .., "r": .., "g": .., "b": ..}, ...]`
/// - either of the above wrapped as `{"points": [...]}`
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MorphError, Result};
use crate::image_sampler::PointCloud;

/// One point as written in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointRecord {
    Array(Vec<f32>),
    Object {
        x: f32,
        y: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        z: Option<f32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        r: Option<f32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        g: Option<f32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        b: Option<f32>,
    },
}

impl PointRecord {
    fn position(&self, index: usize) -> Result<[f32; 3]> {
        match self {
            Self::Array(values) if values.len() >= 2 => {
                Ok([values[0], values[1], values.get(2).copied().unwrap_or(0.0)])
            }
            Self::Array(values) => Err(MorphError::InvalidPoint {
                index,
                reason: format!("expected at least 2 coordinates, found {}", values.len()),
            }),
            Self::Object { x, y, z, .. } => Ok([*x, *y, z.unwrap_or(0.0)]),
        }
    }

    /// Whether this record carries colour channels.
    fn has_color(&self) -> bool {
        match self {
            Self::Array(values) => values.len() >= 6,
            Self::Object { r, .. } => r.is_some(),
        }
    }

    /// Colour with missing channels defaulting to 1.
    fn color(&self) -> [f32; 3] {
        match self {
            Self::Array(values) => [
                values.get(3).copied().unwrap_or(1.0),
                values.get(4).copied().unwrap_or(1.0),
                values.get(5).copied().unwrap_or(1.0),
            ],
            Self::Object { r, g, b, .. } => {
                [r.unwrap_or(1.0), g.unwrap_or(1.0), b.unwrap_or(1.0)]
            }
        }
    }
}

/// Top level of a point list file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointListFile {
    Bare(Vec<PointRecord>),
    Wrapped { points: Vec<PointRecord> },
}

impl PointListFile {
    pub fn records(&self) -> &[PointRecord] {
        match self {
            Self::Bare(records) => records,
            Self::Wrapped { points } => points,
        }
    }

    /// Build a cloud of exactly `count` points from the records.
    ///
    /// Colour presence is decided by the first record. Records past `count`
    /// are ignored and short lists repeat from the start.
    pub fn to_point_cloud(&self, count: usize) -> Result<PointCloud> {
        let records = self.records();
        let Some(first) = records.first() else {
            return Err(MorphError::EmptyPointList);
        };
        let has_color = first.has_color();

        let used = &records[..records.len().min(count)];
        let mut positions = Vec::with_capacity(count);
        let mut colors = Vec::with_capacity(count);

        for (index, record) in used.iter().enumerate() {
            positions.push(record.position(index)?);
            colors.push(if has_color { record.color() } else { [1.0; 3] });
        }

        Ok(PointCloud { positions, colors }.fit_to(count))
    }
}

/// Parse a point list from a JSON string.
pub fn parse_point_list(json: &str, count: usize) -> Result<PointCloud> {
    let file: PointListFile = serde_json::from_str(json)?;
    file.to_point_cloud(count)
}

/// Read and parse a point list file.
pub fn load_point_list(path: &Path, count: usize) -> Result<PointCloud> {
    let json = fs::read_to_string(path)?;
    parse_point_list(&json, count)
}

/// Convert a cloud into array records, with or without colour.
pub fn to_records(cloud: &PointCloud, include_color: bool) -> Vec<PointRecord> {
    cloud
        .positions
        .iter()
        .zip(&cloud.colors)
        .map(|(p, c)| {
            if include_color {
                PointRecord::Array(vec![p[0], p[1], p[2], c[0], c[1], c[2]])
            } else {
                PointRecord::Array(vec![p[0], p[1], p[2]])
            }
        })
        .collect()
}

/// Write a cloud as a compact JSON array of arrays.
pub fn write_point_list(path: &Path, cloud: &PointCloud, include_color: bool) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = PointListFile::Bare(to_records(cloud, include_color));
    fs::write(path, serde_json::to_string(&file)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrays_with_color() {
        let cloud = parse_point_list("[[0.1, 0.2, 0.3, 1, 0, 0.5]]", 2).unwrap();
        assert_eq!(cloud.positions, vec![[0.1, 0.2, 0.3]; 2]);
        assert_eq!(cloud.colors, vec![[1.0, 0.0, 0.5]; 2]);
    }

    #[test]
    fn wrapped_objects_without_color_are_white() {
        let json = r#"{"points": [{"x": 1, "y": 2}, {"x": 3, "y": 4, "z": 5}]}"#;
        let cloud = parse_point_list(json, 2).unwrap();
        assert_eq!(cloud.positions, vec![[1.0, 2.0, 0.0], [3.0, 4.0, 5.0]]);
        assert_eq!(cloud.colors, vec![[1.0; 3]; 2]);
    }

    #[test]
    fn short_lists_repeat_cyclically() {
        let cloud = parse_point_list("[[0, 0, 0], [1, 1, 1]]", 5).unwrap();
        let xs: Vec<f32> = cloud.positions.iter().map(|p| p[0]).collect();
        assert_eq!(xs, vec![0.0, 1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn long_lists_are_truncated() {
        let cloud = parse_point_list("[[0, 0], [1, 1], [2, 2]]", 2).unwrap();
        assert_eq!(cloud.positions, vec![[0.0, 0.0, 0.0], [1.0, 1.0, 0.0]]);
    }

    #[test]
    fn color_detection_follows_first_record() {
        let json = r#"[{"x": 0, "y": 0, "r": 0.5}, {"x": 1, "y": 1}]"#;
        let cloud = parse_point_list(json, 2).unwrap();
        assert_eq!(cloud.colors, vec![[0.5, 1.0, 1.0], [1.0, 1.0, 1.0]]);

        // First record without colour: later colours are ignored.
        let cloud = parse_point_list("[[0, 0, 0], [1, 1, 1, 0, 0, 0]]", 2).unwrap();
        assert_eq!(cloud.colors, vec![[1.0; 3]; 2]);
    }

    #[test]
    fn empty_list_is_an_error() {
        assert!(matches!(
            parse_point_list("[]", 4),
            Err(MorphError::EmptyPointList)
        ));
    }

    #[test]
    fn single_coordinate_is_invalid() {
        assert!(matches!(
            parse_point_list("[[0, 0], [1]]", 4),
            Err(MorphError::InvalidPoint { index: 1, .. })
        ));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            parse_point_list("{\"points\": 3}", 4),
            Err(MorphError::Json(_))
        ));
    }

    #[test]
    fn written_file_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("face-points.json");
        let cloud = PointCloud {
            positions: vec![[0.25, -0.5, -0.1], [0.0, 0.5, 0.0]],
            colors: vec![[1.0, 0.5, 0.0], [0.0, 0.0, 1.0]],
        };

        write_point_list(&path, &cloud, true).unwrap();
        assert_eq!(load_point_list(&path, 2).unwrap(), cloud);

        write_point_list(&path, &cloud, false).unwrap();
        let plain = load_point_list(&path, 2).unwrap();
        assert_eq!(plain.positions, cloud.positions);
        assert_eq!(plain.colors, vec![[1.0; 3]; 2]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_point_list(&dir.path().join("absent.json"), 3);
        assert!(matches!(result, Err(MorphError::Io(_))));
    }
}

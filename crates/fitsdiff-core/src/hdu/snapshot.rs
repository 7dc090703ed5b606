use super::HduSource;
use super::model::{HduList, Payload};
use crate::domain::{DiffResult, FitsDiffError};
use std::fs;
use std::path::Path;

/// Reads HDU snapshot files: JSON documents holding the already-parsed units
/// of one FITS file.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotReader;

impl HduSource for SnapshotReader {
    fn open(&self, path: &Path) -> DiffResult<HduList> {
        let source = fs::read_to_string(path).map_err(|source| FitsDiffError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let list: HduList = serde_json::from_str(&source).map_err(|source| FitsDiffError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        validate(&list).map_err(|reason| FitsDiffError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(list)
    }
}

/// Element counts must agree with the declared shapes before any comparison
/// walks the payloads.
fn validate(list: &HduList) -> Result<(), String> {
    for (index, unit) in list.hdus.iter().enumerate() {
        match &unit.payload {
            Payload::Absent => {}
            Payload::Array { data } => {
                if unit.shape.is_empty() {
                    if !data.is_empty() {
                        return Err(format!(
                            "unit {index} has naught dimensions but {} payload elements",
                            data.len()
                        ));
                    }
                } else {
                    let expected: usize = unit.shape.iter().product();
                    if data.len() != expected {
                        return Err(format!(
                            "unit {index} payload has {} elements but shape {:?} implies {expected}",
                            data.len(),
                            unit.shape
                        ));
                    }
                }
            }
            Payload::Table { columns } => {
                for column in columns {
                    let shape = column.storage_shape();
                    let expected: usize = shape.iter().product();
                    if column.values.len() != expected {
                        return Err(format!(
                            "unit {index} column '{}' has {} elements but shape {:?} implies {expected}",
                            column.name,
                            column.values.len(),
                            shape
                        ));
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::SnapshotReader;
    use crate::domain::FitsDiffError;
    use crate::hdu::{CardValue, ElementArray, HduSource, Payload};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_snapshot(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).expect("snapshot fixture should be writable");
        path
    }

    #[test]
    fn reads_units_cards_and_payload() {
        let dir = TempDir::new().expect("temp dir");
        let path = write_snapshot(
            &dir,
            "a.json",
            r#"{
                "hdus": [
                    {
                        "cards": [
                            {"keyword": "SIMPLE", "value": true},
                            {"keyword": "NAXIS", "value": 2}
                        ],
                        "shape": [2, 3],
                        "payload": {
                            "kind": "array",
                            "data": {"kind": "int32", "values": [1, 2, 3, 4, 5, 6]}
                        }
                    }
                ]
            }"#,
        );

        let list = SnapshotReader.open(&path).expect("snapshot should load");
        assert_eq!(list.len(), 1);
        let unit = &list.hdus[0];
        assert_eq!(unit.cards[0].value, Some(CardValue::Logical(true)));
        assert_eq!(unit.shape, vec![2, 3]);
        match &unit.payload {
            Payload::Array { data } => {
                assert_eq!(data, &ElementArray::Int32(vec![1, 2, 3, 4, 5, 6]));
            }
            other => panic!("expected array payload, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = TempDir::new().expect("temp dir");
        let error = SnapshotReader
            .open(&dir.path().join("absent.json"))
            .expect_err("missing file should fail");
        assert!(matches!(error, FitsDiffError::Read { .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let dir = TempDir::new().expect("temp dir");
        let path = write_snapshot(&dir, "broken.json", "{\"hdus\": [");
        let error = SnapshotReader
            .open(&path)
            .expect_err("malformed snapshot should fail");
        assert!(matches!(error, FitsDiffError::Parse { .. }));
    }

    #[test]
    fn shape_and_element_count_must_agree() {
        let dir = TempDir::new().expect("temp dir");
        let path = write_snapshot(
            &dir,
            "short.json",
            r#"{
                "hdus": [
                    {
                        "shape": [2, 3],
                        "payload": {
                            "kind": "array",
                            "data": {"kind": "int32", "values": [1, 2, 3]}
                        }
                    }
                ]
            }"#,
        );

        let error = SnapshotReader
            .open(&path)
            .expect_err("undersized payload should fail");
        match error {
            FitsDiffError::Invalid { reason, .. } => {
                assert!(reason.contains("implies 6"), "unexpected reason: {reason}");
            }
            other => panic!("expected invalid-snapshot error, got {other:?}"),
        }
    }

    #[test]
    fn column_shapes_are_validated_too() {
        let dir = TempDir::new().expect("temp dir");
        let path = write_snapshot(
            &dir,
            "table.json",
            r#"{
                "hdus": [
                    {
                        "shape": [2],
                        "payload": {
                            "kind": "table",
                            "columns": [
                                {
                                    "name": "FLUX",
                                    "format": "2E",
                                    "shape": [2, 2],
                                    "values": {"kind": "float32", "values": [1.0, 2.0, 3.0]}
                                }
                            ]
                        }
                    }
                ]
            }"#,
        );

        let error = SnapshotReader
            .open(&path)
            .expect_err("undersized column should fail");
        match error {
            FitsDiffError::Invalid { reason, .. } => {
                assert!(reason.contains("FLUX"), "unexpected reason: {reason}");
            }
            other => panic!("expected invalid-snapshot error, got {other:?}"),
        }
    }
}

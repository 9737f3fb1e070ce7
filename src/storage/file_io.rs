//! File I/O utilities with atomic writes
//!
//! Data files are written to a sibling temp file, synced, then renamed over
//! the original so readers never observe a half-written file.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::TallyError;

/// Read JSON from a file, returning a default value if the file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, TallyError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path).map_err(|e| {
        TallyError::store_with_source(format!("Failed to open {}", path.display()), e)
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        TallyError::store_with_source(format!("Failed to parse {}", path.display()), e)
    })
}

/// Write JSON to a file atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), TallyError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            TallyError::store_with_source(
                format!("Failed to create directory {}", parent.display()),
                e,
            )
        })?;
    }

    let temp_path = path.with_extension("json.tmp");
    let result = write_to(&temp_path, data).and_then(|()| {
        fs::rename(&temp_path, path).map_err(|e| {
            TallyError::store_with_source(format!("Failed to replace {}", path.display()), e)
        })
    });

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_to<T: Serialize>(path: &Path, data: &T) -> Result<(), TallyError> {
    let file = File::create(path)
        .map_err(|e| TallyError::store_with_source("Failed to create temp file", e))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| TallyError::store_with_source("Failed to serialize data", e))?;
    writer
        .flush()
        .map_err(|e| TallyError::store_with_source("Failed to flush data", e))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| TallyError::store_with_source("Failed to sync data", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct Sample {
        label: String,
        count: u32,
    }

    #[test]
    fn test_missing_file_reads_as_default() {
        let temp_dir = TempDir::new().unwrap();
        let data: Sample = read_json(temp_dir.path().join("absent.json")).unwrap();
        assert_eq!(data, Sample::default());
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("sample.json");
        let data = Sample {
            label: "food".into(),
            count: 3,
        };

        write_json_atomic(&path, &data).unwrap();

        assert!(!path.with_extension("json.tmp").exists());
        let loaded: Sample = read_json(&path).unwrap();
        assert_eq!(loaded, data);
    }

    #[test]
    fn test_corrupt_file_is_store_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = read_json::<Sample, _>(&path).unwrap_err();
        assert!(matches!(err, TallyError::Store { source: Some(_), .. }));
    }
}

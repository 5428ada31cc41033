//! # JSON File Record Store
//!
//! The whole collection lives in one pretty-printed JSON array. Every save
//! rewrites the array: serialize, write a sibling temp file, fsync, rename.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use super::errors::{StoreError, StoreResult};
use super::record::OutpassRequest;

const INDENT: &[u8] = b"    ";

/// Load-all / save-all persistence for outpass requests
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
    temp_path: PathBuf,
}

impl RecordStore {
    /// Bind a store to a data file. No I/O happens until the first load or save.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut temp_name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        temp_name.push(".tmp");
        let temp_path = path.with_file_name(temp_name);

        Self { path, temp_path }
    }

    /// Path of the data file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the entire collection.
    ///
    /// A missing or blank file is an empty collection, not an error.
    pub fn load_all(&self) -> StoreResult<Vec<OutpassRequest>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Overwrite the entire collection.
    pub fn save_all(&self, records: &[OutpassRequest]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            }
        }

        let content = encode(records)?;

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.temp_path)
            .map_err(|e| StoreError::io(&self.temp_path, e))?;

        file.write_all(&content)
            .map_err(|e| StoreError::io(&self.temp_path, e))?;
        file.sync_all()
            .map_err(|e| StoreError::io(&self.temp_path, e))?;
        drop(file);

        fs::rename(&self.temp_path, &self.path).map_err(|e| StoreError::io(&self.path, e))?;

        // Best effort: make the rename itself durable
        if let Some(parent) = self.path.parent() {
            if let Ok(dir) = File::open(parent) {
                let _ = dir.sync_all();
            }
        }

        Ok(())
    }
}

fn encode(records: &[OutpassRequest]) -> StoreResult<Vec<u8>> {
    let mut buffer = Vec::with_capacity(256 * records.len().max(1));
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(INDENT));
    records
        .serialize(&mut serializer)
        .map_err(StoreError::Serialize)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RequestStatus;
    use tempfile::TempDir;

    fn sample(name: &str) -> OutpassRequest {
        OutpassRequest {
            student_name: name.to_string(),
            roll_number: "21CS042".to_string(),
            student_mobile: "9000000001".to_string(),
            parent_mobile: "9000000002".to_string(),
            reason: "medical appointment".to_string(),
            status: RequestStatus::Pending,
            student_email: format!("{}@example.com", name.to_lowercase()),
        }
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let temp = TempDir::new().unwrap();
        let store = RecordStore::open(temp.path().join("outpass_requests.json"));

        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_blank_file_loads_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("outpass_requests.json");
        fs::write(&path, "  \n").unwrap();

        let store = RecordStore::open(&path);
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_preserves_records() {
        let temp = TempDir::new().unwrap();
        let store = RecordStore::open(temp.path().join("outpass_requests.json"));

        let mut second = sample("Ravi");
        second.status = RequestStatus::Rejected;
        let records = vec![sample("Asha"), second, OutpassRequest::default()];

        store.save_all(&records).unwrap();
        assert_eq!(store.load_all().unwrap(), records);
    }

    #[test]
    fn test_save_overwrites_previous_contents() {
        let temp = TempDir::new().unwrap();
        let store = RecordStore::open(temp.path().join("outpass_requests.json"));

        store.save_all(&[sample("Asha"), sample("Ravi")]).unwrap();
        store.save_all(&[sample("Meera")]).unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].student_name, "Meera");
    }

    #[test]
    fn test_file_is_indented_with_four_spaces() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("outpass_requests.json");
        let store = RecordStore::open(&path);

        store.save_all(&[sample("Asha")]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("[\n    {\n        \"student_name\": \"Asha\""));
        assert!(!temp.path().join("outpass_requests.json.tmp").exists());
    }

    #[test]
    fn test_creates_parent_directory() {
        let temp = TempDir::new().unwrap();
        let store = RecordStore::open(temp.path().join("data/nested/requests.json"));

        store.save_all(&[sample("Asha")]).unwrap();
        assert_eq!(store.load_all().unwrap().len(), 1);
    }

    #[test]
    fn test_malformed_file_is_corrupt() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("outpass_requests.json");
        fs::write(&path, "{not json").unwrap();

        let result = RecordStore::open(&path).load_all();
        assert!(matches!(result, Err(StoreError::Corrupt { .. })));
    }
}

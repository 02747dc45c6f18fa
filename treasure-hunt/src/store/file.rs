//! JSON file-backed treasure store.
//!
//! The file is a small key-value document. The treasure list lives under a
//! single fixed key; any other keys are preserved untouched:
//!
//! ```text
//! {
//!   "treasures": [
//!     { "id": "Golden Chest", "latitude": 37.7749, "longitude": -122.4194, "found": false }
//!   ]
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde_json::{Map, Value};

use super::model::Treasure;
use super::traits::{append_to, mark_found_in, StoreResult, TreasureStore};

/// Key under which the treasure list is stored.
pub const TREASURES_KEY: &str = "treasures";

/// Treasure store persisted as a JSON document on disk.
///
/// Every operation is a full read-modify-write of the document; writes go to
/// a sibling temp file that is then renamed over the original.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open a store at the given path. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> StoreResult<Map<String, Value>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        Ok(serde_json::from_str(&content)?)
    }

    fn read_treasures(&self) -> StoreResult<Vec<Treasure>> {
        let mut document = self.read_document()?;
        match document.remove(TREASURES_KEY) {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(Vec::new()),
        }
    }

    fn write_document(&self, document: &Map<String, Value>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(document)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Read the list, apply `f`, write it back.
    fn update<F>(&self, f: F) -> StoreResult<()>
    where
        F: FnOnce(&mut Vec<Treasure>) -> StoreResult<()>,
    {
        let _guard = self.write_lock.lock();

        let mut document = self.read_document()?;
        let mut treasures: Vec<Treasure> = match document.remove(TREASURES_KEY) {
            Some(value) => serde_json::from_value(value)?,
            None => Vec::new(),
        };

        f(&mut treasures)?;

        document.insert(TREASURES_KEY.to_string(), serde_json::to_value(&treasures)?);
        self.write_document(&document)
    }
}

impl TreasureStore for JsonFileStore {
    fn load_unfound(&self) -> StoreResult<Vec<Treasure>> {
        let mut treasures = self.read_treasures()?;
        treasures.retain(|t| !t.found);
        Ok(treasures)
    }

    fn mark_found(&self, id: &str) -> StoreResult<()> {
        self.update(|treasures| mark_found_in(treasures, id))?;
        tracing::info!(treasure = %id, "Marked treasure as found");
        Ok(())
    }

    fn load_all(&self) -> StoreResult<Vec<Treasure>> {
        self.read_treasures()
    }

    fn append(&self, treasure: Treasure) -> StoreResult<()> {
        self.update(|treasures| append_to(treasures, treasure))
    }

    fn clear(&self) -> StoreResult<()> {
        let _guard = self.write_lock.lock();

        let mut document = self.read_document()?;
        if document.remove(TREASURES_KEY).is_some() {
            self.write_document(&document)?;
        }
        tracing::info!(path = %self.path.display(), "Cleared all treasures");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> JsonFileStore {
        JsonFileStore::new(dir.path().join("treasures.json"))
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert!(store.load_all().unwrap().is_empty());
        assert!(store.load_unfound().unwrap().is_empty());
    }

    #[test]
    fn test_append_persists_in_order() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.append(Treasure::new("Golden Chest", 37.7749, -122.4194)).unwrap();
        store.append(Treasure::new("Magic Stone", 37.775, -122.4195)).unwrap();

        // A fresh handle sees the same data
        let reopened = store_in(&dir);
        let ids: Vec<_> = reopened
            .load_all()
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["Golden Chest", "Magic Stone"]);
    }

    #[test]
    fn test_mark_found_updates_record() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.append(Treasure::new("A", 0.0, 0.0)).unwrap();
        store.append(Treasure::new("B", 1.0, 1.0)).unwrap();

        store.mark_found("A").unwrap();

        let unfound = store.load_unfound().unwrap();
        assert_eq!(unfound.len(), 1);
        assert_eq!(unfound[0].id, "B");
        assert!(store.load_all().unwrap()[0].found);
    }

    #[test]
    fn test_mark_found_unknown_id() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.append(Treasure::new("A", 0.0, 0.0)).unwrap();

        assert!(matches!(
            store.mark_found("nope"),
            Err(StoreError::UnknownId(_))
        ));
    }

    #[test]
    fn test_duplicate_append_rejected() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.append(Treasure::new("A", 0.0, 0.0)).unwrap();

        assert!(matches!(
            store.append(Treasure::new("A", 1.0, 1.0)),
            Err(StoreError::DuplicateId(_))
        ));
        assert_eq!(store.load_all().unwrap().len(), 1);
    }

    #[test]
    fn test_clear_removes_key_but_keeps_others() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("treasures.json");
        fs::write(
            &path,
            r#"{"settings": {"sound": true}, "treasures": [{"id":"A","latitude":0.0,"longitude":0.0,"found":false}]}"#,
        )
        .unwrap();
        let store = JsonFileStore::new(&path);

        store.clear().unwrap();

        assert!(store.load_all().unwrap().is_empty());
        let document: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(document["settings"]["sound"], Value::Bool(true));
        assert!(document.get(TREASURES_KEY).is_none());
    }

    #[test]
    fn test_corrupt_file_is_serialization_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("treasures.json");
        fs::write(&path, "{ not json").unwrap();
        let store = JsonFileStore::new(&path);

        assert!(matches!(
            store.load_unfound(),
            Err(StoreError::Serialization(_))
        ));
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/deeper/treasures.json"));

        store.append(Treasure::new("A", 0.0, 0.0)).unwrap();
        assert!(store.path().exists());
    }
}

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// File-backed collection of records, stored as one pretty-printed JSON
/// array per file.
///
/// Every load reads the whole collection into memory and every save rewrites
/// it; there is no record-level access. Exactly one process may touch the
/// backing file at a time — nothing here locks it.
pub struct JsonStore<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T> JsonStore<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full collection. A missing file is an empty collection,
    /// not an error.
    pub fn load(&self) -> Result<Vec<T>, StoreError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "store file absent, starting empty");
            return Ok(Vec::new());
        }

        let raw = fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.display().to_string(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| StoreError::Malformed {
            path: self.path.display().to_string(),
            source,
        })
    }

    /// Rewrite the full collection, pretty-printed.
    ///
    /// The write goes to a sibling temp file first and is renamed into
    /// place, so a crash mid-write cannot truncate the collection.
    pub fn save(&self, records: &[T]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(records).map_err(|source| StoreError::Malformed {
            path: self.path.display().to_string(),
            source,
        })?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                    path: parent.display().to_string(),
                    source,
                })?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|source| StoreError::Io {
            path: tmp.display().to_string(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StoreError::Io {
            path: self.path.display().to_string(),
            source,
        })?;

        tracing::debug!(path = %self.path.display(), records = records.len(), "collection persisted");
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Record {
        id: u32,
        label: String,
    }

    #[test]
    fn test_missing_file_is_empty_collection() {
        let dir = tempfile::tempdir().unwrap();
        let store: JsonStore<Record> = JsonStore::new(dir.path().join("absent.json"));

        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store: JsonStore<Record> = JsonStore::new(dir.path().join("records.json"));

        let records = vec![
            Record { id: 1, label: "one".to_string() },
            Record { id: 2, label: "two".to_string() },
        ];
        store.save(&records).unwrap();

        assert_eq!(store.load().unwrap(), records);
    }

    #[test]
    fn test_unknown_fields_are_ignored_on_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(&path, r#"[{"id": 7, "label": "seven", "extra": true}]"#).unwrap();

        let store: JsonStore<Record> = JsonStore::new(&path);
        let records = store.load().unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, 7);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(&path, "{not json").unwrap();

        let store: JsonStore<Record> = JsonStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Malformed { .. })));
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store: JsonStore<Record> = JsonStore::new(dir.path().join("nested/records.json"));

        store.save(&[Record { id: 1, label: "one".to_string() }]).unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn test_output_is_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        let store: JsonStore<Record> = JsonStore::new(&path);

        store.save(&[Record { id: 1, label: "one".to_string() }]).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains('\n'));
    }
}

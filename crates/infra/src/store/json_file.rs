use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::Value;
use tracing::debug;

use super::{KeyValueStore, StoreError, validate_key};

const EXTENSION: &str = "json";

/// One pretty-printed JSON file per key under a data directory.
///
/// Writes go to a temporary sibling and are renamed into place, so a reader
/// never sees a half-written document.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    lock: RwLock<()>,
}

impl JsonFileStore {
    /// Open (creating if needed) a data directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self {
            dir,
            lock: RwLock::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.{EXTENSION}")))
    }
}

fn io_err(key: &str) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        key: key.to_string(),
        source,
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let path = self.path_for(key)?;
        let _guard = self.lock.read().map_err(|_| StoreError::Poisoned)?;

        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_err(key)(e)),
        };
        serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            })
    }

    fn put(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension(format!("{EXTENSION}.tmp"));
        let bytes = serde_json::to_vec_pretty(&value).map_err(|source| StoreError::Corrupt {
            key: key.to_string(),
            source,
        })?;

        let _guard = self.lock.write().map_err(|_| StoreError::Poisoned)?;
        fs::write(&tmp, bytes).map_err(io_err(key))?;
        fs::rename(&tmp, &path).map_err(io_err(key))?;
        debug!(key, path = %path.display(), "stored document");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let path = self.path_for(key)?;
        let _guard = self.lock.write().map_err(|_| StoreError::Poisoned)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(io_err(key)(e)),
        }
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let _guard = self.lock.read().map_err(|_| StoreError::Poisoned)?;
        let entries = fs::read_dir(&self.dir).map_err(io_err("<dir>"))?;

        let mut keys = Vec::new();
        for entry in entries {
            let path = entry.map_err(io_err("<dir>"))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "nearbykaam-store-{name}-{}-{}",
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = temp_dir("roundtrip");
        let s = JsonFileStore::open(&dir).unwrap();

        s.put("nearbykaam_lang", json!("hi")).unwrap();
        s.put("nearbykaam_mute", json!(true)).unwrap();

        let reopened = JsonFileStore::open(&dir).unwrap();
        assert_eq!(reopened.get("nearbykaam_lang").unwrap(), Some(json!("hi")));
        assert_eq!(
            reopened.keys().unwrap(),
            vec!["nearbykaam_lang".to_string(), "nearbykaam_mute".to_string()]
        );

        assert!(reopened.delete("nearbykaam_lang").unwrap());
        assert_eq!(reopened.get("nearbykaam_lang").unwrap(), None);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = temp_dir("corrupt");
        let s = JsonFileStore::open(&dir).unwrap();
        fs::write(dir.join("broken.json"), b"{not json").unwrap();

        assert!(matches!(s.get("broken"), Err(StoreError::Corrupt { .. })));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn traversal_keys_are_refused() {
        let dir = temp_dir("keys");
        let s = JsonFileStore::open(&dir).unwrap();
        assert!(matches!(s.put("../x", json!(1)), Err(StoreError::InvalidKey(_))));
        fs::remove_dir_all(&dir).unwrap();
    }
}

//! File-backed key-value store
//!
//! One JSON file per key inside a data directory. Writes go to a temporary
//! file in the same directory which is then renamed over the target, so a
//! reader sees either the old or the new value, never a partial one.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use application::{ApplicationError, KeyValueStore};
use parking_lot::Mutex;
use tempfile::NamedTempFile;
use tracing::{debug, instrument};

use super::error::map_io_error;

/// Key-value store writing one file per key
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Storage` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, ApplicationError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            ApplicationError::Storage(format!("cannot create {}: {e}", dir.display()))
        })?;
        debug!(dir = %dir.display(), "Opened key-value store");
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    /// Data directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that holds `key`
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }
}

/// Keys map to file names; anything outside `[A-Za-z0-9._-]` becomes `_`
fn file_stem(key: &str) -> String {
    let stem: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() || stem.chars().all(|c| c == '.') {
        format!("_{stem}")
    } else {
        stem
    }
}

impl KeyValueStore for JsonFileStore {
    #[instrument(skip(self))]
    fn get(&self, key: &str) -> Result<Option<String>, ApplicationError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(map_io_error(key, &e)),
        }
    }

    #[instrument(skip(self, value), fields(bytes = value.len()))]
    fn set(&self, key: &str, value: &str) -> Result<(), ApplicationError> {
        let target = self.path_for(key);
        let _guard = self.write_lock.lock();

        let mut file = NamedTempFile::new_in(&self.dir).map_err(|e| map_io_error(key, &e))?;
        file.write_all(value.as_bytes())
            .map_err(|e| map_io_error(key, &e))?;
        file.as_file()
            .sync_all()
            .map_err(|e| map_io_error(key, &e))?;
        file.persist(&target)
            .map_err(|e| map_io_error(key, &e.error))?;

        debug!(path = %target.display(), "Value written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn file_stem_is_one_safe_path_component(key in ".*") {
            let stem = file_stem(&key);
            prop_assert!(!stem.is_empty());
            prop_assert!(stem != "." && stem != "..");
            prop_assert!(stem
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')));
        }
    }

    #[test]
    fn file_stem_keeps_safe_characters() {
        assert_eq!(file_stem("skydeck.locations"), "skydeck.locations");
        assert_eq!(file_stem("a-b_c.1"), "a-b_c.1");
    }

    #[test]
    fn file_stem_replaces_path_separators() {
        assert_eq!(file_stem("../etc/passwd"), ".._etc_passwd");
        assert_eq!(file_stem("a b\\c"), "a_b_c");
    }

    #[test]
    fn file_stem_never_names_a_directory_entry() {
        assert_eq!(file_stem(""), "_");
        assert_eq!(file_stem(".."), "_..");
    }

    #[test]
    fn missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        assert!(store.get("skydeck.locations").unwrap().is_none());
    }

    #[test]
    fn set_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();

        store.set("skydeck.locations", "[]").unwrap();
        assert_eq!(store.get("skydeck.locations").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("skydeck.locations.json").exists());
    }

    #[test]
    fn set_replaces_whole_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();

        store.set("k", r#"[{"a":1},{"b":2}]"#).unwrap();
        store.set("k", "[]").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn no_temporary_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();

        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        store.set("b", "3").unwrap();

        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 2);
    }

    #[test]
    fn open_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("one").join("two");
        let store = JsonFileStore::open(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(store.dir(), nested.as_path());
    }

    #[test]
    fn unreadable_entry_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        std::fs::create_dir(store.path_for("k")).unwrap();

        assert!(matches!(store.get("k"), Err(ApplicationError::Storage(_))));
    }
}

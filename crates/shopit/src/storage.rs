//! Storage backed by a directory of JSON files.

use std::fmt::Write as _;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use shopit_core::state::{Storage, StorageError};

/// A [`Storage`] keeping one file per key under a directory.
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Opens the storage, creating `dir` if needed.
    pub fn open<P: Into<PathBuf>>(dir: P) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(StorageError::backend)?;
        debug!("storage opened at {}", dir.display());
        Ok(Self { dir })
    }

    /// Returns the storage directory.
    #[inline]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }
}

/// Maps a key to a file stem, one to one. ASCII alphanumerics and `-` are
/// kept, every other byte becomes `_XX` in uppercase hex.
fn file_stem(key: &str) -> String {
    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            stem.push(char::from(byte));
        } else {
            let _ = write!(stem, "_{byte:02X}");
        }
    }
    stem
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::backend(err)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(StorageError::backend)?;
        fs::rename(&tmp, &path).map_err(StorageError::backend)
    }

    fn clear(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::backend(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shopit_core::payload::Ingredient;
    use shopit_core::state::CartStore;

    use super::*;

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("data")).unwrap();

        assert_eq!(storage.get("theme-u1").unwrap(), None);
        storage.set("theme-u1", "\"dark\"").unwrap();
        assert_eq!(
            storage.get("theme-u1").unwrap().as_deref(),
            Some("\"dark\"")
        );
        assert!(storage.dir().join("theme-u1.json").exists());

        storage.clear("theme-u1").unwrap();
        storage.clear("theme-u1").unwrap();
        assert_eq!(storage.get("theme-u1").unwrap(), None);
    }

    #[test]
    fn test_keys_stay_inside_dir() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        storage.set("favorites-../../etc", "[]").unwrap();
        let file = dir.path().join("favorites-_2E_2E_2F_2E_2E_2Fetc.json");
        assert!(file.exists());
    }

    #[test]
    fn test_distinct_keys_use_distinct_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        storage.set("favorites-a.b@x.com", "[\"1\"]").unwrap();
        assert_eq!(storage.get("favorites-a_b_x_com").unwrap(), None);

        storage.set("favorites-a_b_x_com", "[\"2\"]").unwrap();
        assert_eq!(
            storage.get("favorites-a.b@x.com").unwrap().as_deref(),
            Some("[\"1\"]")
        );
        assert_eq!(file_stem("a_b"), "a_5Fb");
        assert_eq!(file_stem("é"), "_C3_A9");
    }

    #[test]
    fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let cart = CartStore::new(Arc::new(FileStorage::open(dir.path()).unwrap()));
        cart.add_item(Ingredient::new("Eggs", 6.0, "pcs")).unwrap();

        let reopened = CartStore::new(Arc::new(FileStorage::open(dir.path()).unwrap()));
        assert_eq!(
            reopened.items().unwrap(),
            [Ingredient::new("Eggs", 6.0, "pcs")]
        );
    }
}

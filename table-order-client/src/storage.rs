//! File-backed cart storage

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use shared::cart::CartStorage;

/// One file per key under a directory
///
/// Writes go to a temp file in the same directory and are renamed into
/// place, so a crash never leaves a half-written snapshot.
#[derive(Debug, Clone)]
pub struct FileCartStorage {
    dir: PathBuf,
}

impl FileCartStorage {
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> io::Result<PathBuf> {
        let valid = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\', '\0']);
        if !valid {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid cart storage key: {key:?}"),
            ));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl CartStorage for FileCartStorage {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, key: &str, value: &str) -> io::Result<()> {
        let path = self.path_for(key)?;
        let mut file = tempfile::NamedTempFile::new_in(&self.dir)?;
        file.write_all(value.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&path).map_err(|e| e.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::cart::Cart;
    use shared::models::MenuItem;

    fn item(id: i64, price: i64) -> MenuItem {
        MenuItem {
            id,
            category_id: 1,
            name: format!("item-{id}"),
            description: None,
            price,
            image_url: None,
            is_available: true,
            allergens: vec![],
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_read_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileCartStorage::new(dir.path()).unwrap();
        assert_eq!(storage.read("cart").unwrap(), None);
    }

    #[test]
    fn test_write_replaces_value() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileCartStorage::new(dir.path().join("nested")).unwrap();
        storage.write("cart", "one").unwrap();
        storage.write("cart", "two").unwrap();
        assert_eq!(storage.read("cart").unwrap().as_deref(), Some("two"));
        // 临时文件已被重命名, 目录里只剩目标文件
        assert_eq!(fs::read_dir(storage.dir()).unwrap().count(), 1);
    }

    #[test]
    fn test_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileCartStorage::new(dir.path()).unwrap();
        for key in ["", "..", "../cart", "a/b", "a\\b"] {
            let err = storage.write(key, "x").unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::InvalidInput, "{key}");
        }
    }

    #[test]
    fn test_cart_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut cart = Cart::load(FileCartStorage::new(dir.path()).unwrap());
            cart.add_item(&item(1, 1680));
            cart.add_item(&item(2, 1580));
            cart.add_item(&item(2, 1580));
        }
        let cart = Cart::load(FileCartStorage::new(dir.path()).unwrap());
        assert_eq!(cart.total_amount(), 4840);
        assert_eq!(cart.total_item_count(), 3);
    }
}

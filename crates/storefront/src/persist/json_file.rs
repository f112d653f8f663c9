//! JSON file implementation of the cart repository.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use tiffin_core::CartItem;

use super::{CartDocument, CartRepository, StorageError};

/// Fixed namespace key the cart document is stored under.
pub const CART_STORAGE_KEY: &str = "cart-storage";

/// Persists the cart as a JSON document at `<data_dir>/cart-storage.json`.
///
/// Saves write to a temporary file in the same directory and rename it over
/// the target, so a crash mid-write never leaves a torn document behind.
#[derive(Debug, Clone)]
pub struct JsonFileCartRepository {
    path: PathBuf,
}

impl JsonFileCartRepository {
    /// Create a repository rooted at `data_dir`.
    #[must_use]
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{CART_STORAGE_KEY}.json")),
        }
    }

    /// Path of the persisted document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartRepository for JsonFileCartRepository {
    fn load(&self) -> Result<Option<Vec<CartItem>>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.path)?;
        let document: CartDocument = serde_json::from_str(&raw)?;
        Ok(Some(document.cart))
    }

    fn save(&self, items: &[CartItem]) -> Result<(), StorageError> {
        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)?;

        let document = CartDocument {
            cart: items.to_vec(),
        };
        let json = serde_json::to_string(&document)?;

        // Temp file must live on the same filesystem as the target for the
        // rename to be atomic
        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        debug!(path = %self.path.display(), items = items.len(), "Cart document saved");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;

    use tiffin_core::{CategoryId, ProductId};

    use super::*;

    fn sample_item(id: &str) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            name: "Veg Thali".to_owned(),
            image: "https://cdn.example.com/p/thali.jpg".to_owned(),
            category: CategoryId::new("lunchbox"),
            variants: Vec::new(),
            quantity: 2,
        }
    }

    #[test]
    fn test_load_returns_none_before_first_save() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileCartRepository::new(dir.path());
        assert!(repo.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileCartRepository::new(dir.path());

        repo.save(&[sample_item("prod-1"), sample_item("prod-2")])
            .unwrap();

        let loaded = repo.load().unwrap().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.first().unwrap().id.as_str(), "prod-1");
        assert_eq!(loaded.first().unwrap().quantity, 2);
    }

    #[test]
    fn test_save_writes_namespaced_document() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileCartRepository::new(dir.path());

        repo.save(&[sample_item("prod-1")]).unwrap();

        let path = dir.path().join("cart-storage.json");
        assert_eq!(repo.path(), path);
        let raw = fs::read_to_string(path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value.get("cart").unwrap().is_array());
    }

    #[test]
    fn test_save_creates_missing_data_dir() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileCartRepository::new(dir.path().join("nested").join("state"));

        repo.save(&[sample_item("prod-1")]).unwrap();
        assert_eq!(repo.load().unwrap().unwrap().len(), 1);
    }

    #[test]
    fn test_load_rejects_corrupt_document() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileCartRepository::new(dir.path());

        fs::write(repo.path(), "not json").unwrap();
        assert!(matches!(repo.load(), Err(StorageError::Serde(_))));
    }
}

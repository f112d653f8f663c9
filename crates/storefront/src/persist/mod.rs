//! Cart persistence.
//!
//! The cart survives restarts as a single JSON document with the wire shape
//! `{ "cart": [CartItem, ...] }`. The [`CartRepository`] trait keeps the
//! storage backend swappable: production uses [`JsonFileCartRepository`],
//! tests and ephemeral sessions use [`MemoryCartRepository`].

mod json_file;
mod memory;

pub use json_file::{CART_STORAGE_KEY, JsonFileCartRepository};
pub use memory::MemoryCartRepository;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tiffin_core::CartItem;

/// Errors that can occur while loading or saving the cart document.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The cart document could not be (de)serialized.
    #[error("JSON error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Wire shape of the persisted cart document.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CartDocument {
    pub cart: Vec<CartItem>,
}

/// Durable storage for the cart items.
///
/// Implementations must tolerate concurrent callers; the cart store
/// serializes saves itself, but `load` may race a save from another handle.
pub trait CartRepository: Send + Sync {
    /// Load the persisted items, or `None` when nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store is unreadable or the document
    /// is corrupt.
    fn load(&self) -> Result<Option<Vec<CartItem>>, StorageError>;

    /// Replace the persisted document with `items`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    fn save(&self, items: &[CartItem]) -> Result<(), StorageError>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_document_wire_shape() {
        let document = CartDocument { cart: Vec::new() };
        let json = serde_json::to_string(&document).unwrap();
        assert_eq!(json, r#"{"cart":[]}"#);
    }

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::Io(std::io::Error::other("disk full"));
        assert_eq!(err.to_string(), "I/O error: disk full");
    }
}

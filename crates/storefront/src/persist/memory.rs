//! In-memory implementation of the cart repository.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tiffin_core::CartItem;

use super::{CartRepository, StorageError};

/// Holds the cart document in memory. Nothing survives the process; used by
/// tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryCartRepository {
    document: Mutex<Option<Vec<CartItem>>>,
    saves: AtomicUsize,
}

impl MemoryCartRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-seeded with a persisted document, as a
    /// previous session would have left it.
    #[must_use]
    pub fn with_items(items: Vec<CartItem>) -> Self {
        Self {
            document: Mutex::new(Some(items)),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of times `save` has been called.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl CartRepository for MemoryCartRepository {
    fn load(&self) -> Result<Option<Vec<CartItem>>, StorageError> {
        let guard = self
            .document
            .lock()
            .map_err(|_| StorageError::Io(std::io::Error::other("lock poisoned")))?;
        Ok(guard.clone())
    }

    fn save(&self, items: &[CartItem]) -> Result<(), StorageError> {
        let mut guard = self
            .document
            .lock()
            .map_err(|_| StorageError::Io(std::io::Error::other("lock poisoned")))?;
        *guard = Some(items.to_vec());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

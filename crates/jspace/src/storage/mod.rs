//! Key/value persistence for session resumption.
//!
//! The session stores its player record as one opaque value under a fixed
//! key. Stores are injected into the session; there is no global instance.

mod error;
mod file;
mod memory;

pub use error::StorageError;
pub use file::FileStore;
pub use memory::MemoryStore;

/// Opaque key/value store.
pub trait PersistenceGateway: Send {
    /// Reads the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes every stored value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store cannot be cleared.
    fn reset(&self) -> Result<(), StorageError>;
}

//! Local durable cache abstraction.
//!
//! Modeled on a browser's localStorage: flat string entries under string
//! keys. The sync layer keeps exactly two entries here: the session
//! identity token and the serialized source-shape array (derived
//! intersections are never cached locally).

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryCache;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileCache;

use thiserror::Error;

/// Cache entry key for the session identity token.
pub const IDENTITY_KEY: &str = "quadsync_user_id";

/// Cache entry key for the serialized source-shape array.
pub const SHAPES_KEY: &str = "quadsync_shapes_data";

/// Local cache errors.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Cache error: {0}")]
    Other(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Trait for local durable key/value caches.
///
/// Implementations are synchronous; the entries are small and the cache is
/// expected to be local (memory, a file per key).
pub trait LocalCache: Send + Sync {
    /// Read an entry. `Ok(None)` when the key has never been written.
    fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Write an entry, overwriting any previous value.
    fn set(&self, key: &str, value: &str) -> CacheResult<()>;

    /// Remove an entry. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> CacheResult<()>;
}

impl<T: LocalCache> LocalCache for &T {
    fn get(&self, key: &str) -> CacheResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> CacheResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> CacheResult<()> {
        (**self).remove(key)
    }
}

impl<T: LocalCache> LocalCache for std::sync::Arc<T> {
    fn get(&self, key: &str) -> CacheResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> CacheResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> CacheResult<()> {
        (**self).remove(key)
    }
}

//! In-memory cache implementation.

use super::{CacheError, CacheResult, LocalCache};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory cache for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCache {
    /// Create a new empty memory cache.
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalCache for MemoryCache {
    fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| CacheError::Other(format!("Lock error: {}", e)))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CacheResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| CacheError::Other(format!("Lock error: {}", e)))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> CacheResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| CacheError::Other(format!("Lock error: {}", e)))?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let cache = MemoryCache::new();
        cache.set("key", "value").unwrap();
        assert_eq!(cache.get("key").unwrap().as_deref(), Some("value"));
    }

    #[test]
    fn test_missing_key() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("nope").unwrap(), None);
    }

    #[test]
    fn test_overwrite() {
        let cache = MemoryCache::new();
        cache.set("key", "one").unwrap();
        cache.set("key", "two").unwrap();
        assert_eq!(cache.get("key").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn test_remove() {
        let cache = MemoryCache::new();
        cache.set("key", "value").unwrap();
        cache.remove("key").unwrap();
        assert_eq!(cache.get("key").unwrap(), None);
        // Removing again is fine.
        cache.remove("key").unwrap();
    }
}

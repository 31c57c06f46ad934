//! Remote canvas store client.
//!
//! The remote speaks the §external contract: `GET /canvas/{identity}`
//! returns a JSON array of records, `POST /canvas/{identity}` replaces it.
//! Failures here are expected operating conditions; the sync layer logs
//! them and degrades to local-only operation.

use crate::shape::SyncRecord;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Boxed future for async remote operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Remote store errors.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Remote returned status {0}")]
    Status(u16),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Trait for remote canvas stores keyed by session identity.
///
/// Implementations must bound the time a fetch can take; the initial load
/// blocks on it and falls back to the local cache on failure.
pub trait RemoteStore {
    /// Fetch the record array for an identity. An unknown identity yields
    /// an empty array, not an error.
    fn fetch(&self, identity: &str) -> BoxFuture<'_, RemoteResult<Vec<SyncRecord>>>;

    /// Replace the record array for an identity.
    fn push(&self, identity: &str, records: &[SyncRecord]) -> BoxFuture<'_, RemoteResult<()>>;
}

impl<T: RemoteStore> RemoteStore for &T {
    fn fetch(&self, identity: &str) -> BoxFuture<'_, RemoteResult<Vec<SyncRecord>>> {
        (**self).fetch(identity)
    }

    fn push(&self, identity: &str, records: &[SyncRecord]) -> BoxFuture<'_, RemoteResult<()>> {
        (**self).push(identity, records)
    }
}

impl<T: RemoteStore> RemoteStore for std::sync::Arc<T> {
    fn fetch(&self, identity: &str) -> BoxFuture<'_, RemoteResult<Vec<SyncRecord>>> {
        (**self).fetch(identity)
    }

    fn push(&self, identity: &str, records: &[SyncRecord]) -> BoxFuture<'_, RemoteResult<()>> {
        (**self).push(identity, records)
    }
}

/// In-memory remote store for tests, with failure injection.
#[derive(Default)]
pub struct MemoryRemote {
    canvases: std::sync::RwLock<std::collections::HashMap<String, Vec<SyncRecord>>>,
    failing: std::sync::atomic::AtomicBool,
    push_count: std::sync::atomic::AtomicUsize,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with a network error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, std::sync::atomic::Ordering::Relaxed);
    }

    /// Number of successful pushes so far.
    pub fn push_count(&self) -> usize {
        self.push_count.load(std::sync::atomic::Ordering::Relaxed)
    }

    /// The stored records for an identity (empty when absent).
    pub fn records(&self, identity: &str) -> Vec<SyncRecord> {
        self.canvases
            .read()
            .expect("remote lock poisoned")
            .get(identity)
            .cloned()
            .unwrap_or_default()
    }

    /// Seed the store for an identity.
    pub fn seed(&self, identity: &str, records: Vec<SyncRecord>) {
        self.canvases
            .write()
            .expect("remote lock poisoned")
            .insert(identity.to_string(), records);
    }

    fn is_failing(&self) -> bool {
        self.failing.load(std::sync::atomic::Ordering::Relaxed)
    }
}

impl RemoteStore for MemoryRemote {
    fn fetch(&self, identity: &str) -> BoxFuture<'_, RemoteResult<Vec<SyncRecord>>> {
        let identity = identity.to_string();
        Box::pin(async move {
            if self.is_failing() {
                return Err(RemoteError::Network("injected failure".to_string()));
            }
            Ok(self.records(&identity))
        })
    }

    fn push(&self, identity: &str, records: &[SyncRecord]) -> BoxFuture<'_, RemoteResult<()>> {
        let identity = identity.to_string();
        let records = records.to_vec();
        Box::pin(async move {
            if self.is_failing() {
                return Err(RemoteError::Network("injected failure".to_string()));
            }
            self.seed(&identity, records);
            self.push_count
                .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            Ok(())
        })
    }
}

/// HTTP client for the remote canvas contract.
#[cfg(not(target_arch = "wasm32"))]
pub struct HttpRemote {
    client: reqwest::Client,
    base_url: String,
}

#[cfg(not(target_arch = "wasm32"))]
impl HttpRemote {
    /// Bound on each request; a slow remote degrades to local-only
    /// operation instead of stalling the initial load.
    pub const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

    /// Create a client against an API base URL, e.g.
    /// `http://localhost:3000/api`.
    pub fn new(base_url: impl Into<String>) -> RemoteResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RemoteError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn canvas_url(&self, identity: &str) -> String {
        format!("{}/canvas/{}", self.base_url, identity)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl RemoteStore for HttpRemote {
    fn fetch(&self, identity: &str) -> BoxFuture<'_, RemoteResult<Vec<SyncRecord>>> {
        let url = self.canvas_url(identity);
        Box::pin(async move {
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| RemoteError::Network(e.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                return Err(RemoteError::Status(status.as_u16()));
            }
            response
                .json::<Vec<SyncRecord>>()
                .await
                .map_err(|e| RemoteError::Serialization(e.to_string()))
        })
    }

    fn push(&self, identity: &str, records: &[SyncRecord]) -> BoxFuture<'_, RemoteResult<()>> {
        let url = self.canvas_url(identity);
        let records = records.to_vec();
        Box::pin(async move {
            let response = self
                .client
                .post(&url)
                .json(&records)
                .send()
                .await
                .map_err(|e| RemoteError::Network(e.to_string()))?;
            let status = response.status();
            if !status.is_success() {
                return Err(RemoteError::Status(status.as_u16()));
            }
            Ok(())
        })
    }
}

//! Persistence orchestration: local cache, remote mirror, debounced saves.
//!
//! The local cache holds only the source shapes; the remote mirror receives
//! source shapes plus their derived intersections so other consumers of the
//! canvas API see the overlap entities without recomputing them. On initial
//! load a non-empty local cache wins over the remote copy.

use crate::canvas::ShapeStore;
use crate::remote::RemoteStore;
use crate::shape::{Shape, SyncRecord};
use crate::storage::{LocalCache, IDENTITY_KEY, SHAPES_KEY};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Debounce window between an edit and the save it schedules. Another edit
/// inside the window restarts it.
pub const SAVE_DEBOUNCE: Duration = Duration::from_millis(800);

/// Drives load and save between a [`ShapeStore`], a local cache and a
/// remote store, under a stable per-session identity.
pub struct SyncController<C: LocalCache, R: RemoteStore> {
    cache: C,
    remote: R,
    identity: String,
    loaded: bool,
    save_deadline: Option<Instant>,
    debounce: Duration,
}

impl<C: LocalCache, R: RemoteStore> SyncController<C, R> {
    /// Create a controller, reusing the identity stored in the cache or
    /// minting and persisting a fresh one. A cache write failure leaves the
    /// identity session-scoped rather than failing construction.
    pub fn new(cache: C, remote: R) -> Self {
        let identity = match cache.get(IDENTITY_KEY) {
            Ok(Some(id)) if !id.is_empty() => id,
            _ => {
                let id = Uuid::new_v4().to_string();
                if let Err(e) = cache.set(IDENTITY_KEY, &id) {
                    log::warn!("failed to persist identity: {}", e);
                }
                id
            }
        };
        Self {
            cache,
            remote,
            identity,
            loaded: false,
            save_deadline: None,
            debounce: SAVE_DEBOUNCE,
        }
    }

    /// The stable session identity used as the remote canvas key.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Whether the one-time initial load has already run.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Override the debounce window (tests).
    pub fn set_debounce(&mut self, debounce: Duration) {
        self.debounce = debounce;
    }

    fn read_local(&self) -> Vec<Shape> {
        let raw = match self.cache.get(SHAPES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::warn!("failed to read local cache: {}", e);
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(shapes) => shapes,
            Err(e) => {
                log::warn!("malformed local cache, starting empty: {}", e);
                Vec::new()
            }
        }
    }

    fn write_local(&self, shapes: &[Shape]) {
        match serde_json::to_string(shapes) {
            Ok(json) => {
                if let Err(e) = self.cache.set(SHAPES_KEY, &json) {
                    log::warn!("failed to write local cache: {}", e);
                }
            }
            Err(e) => log::warn!("failed to serialize shapes: {}", e),
        }
    }

    /// Full sync payload for the current store: source shapes followed by
    /// their derived intersections.
    fn sync_records(store: &ShapeStore) -> Vec<SyncRecord> {
        let mut records: Vec<SyncRecord> = store
            .shapes()
            .iter()
            .cloned()
            .map(SyncRecord::Shape)
            .collect();
        records.extend(store.intersections().into_iter().map(SyncRecord::Intersection));
        records
    }

    /// One-time initial load. Reconciles local cache and remote copy into
    /// the store:
    ///
    /// * non-empty local wins; the remote is seeded from it only when the
    ///   remote holds no shapes yet
    /// * empty local adopts the remote's source shapes (derived
    ///   intersection records are dropped) and mirrors them locally
    /// * a remote failure degrades to the local copy
    ///
    /// Subsequent calls are no-ops.
    pub async fn load(&mut self, store: &mut ShapeStore) {
        if self.loaded {
            return;
        }
        self.loaded = true;

        let local = self.read_local();
        match self.remote.fetch(&self.identity).await {
            Ok(records) => {
                let remote_shapes: Vec<Shape> = records
                    .iter()
                    .filter_map(|r| r.as_shape().cloned())
                    .collect();
                if !local.is_empty() {
                    store.set_shapes(local);
                    if remote_shapes.is_empty() {
                        let payload: Vec<SyncRecord> = store
                            .shapes()
                            .iter()
                            .cloned()
                            .map(SyncRecord::Shape)
                            .collect();
                        if let Err(e) = self.remote.push(&self.identity, &payload).await {
                            log::warn!("failed to seed remote canvas: {}", e);
                        }
                    }
                } else if !remote_shapes.is_empty() {
                    self.write_local(&remote_shapes);
                    store.set_shapes(remote_shapes);
                }
            }
            Err(e) => {
                log::warn!("remote load failed, using local copy: {}", e);
                if !local.is_empty() {
                    store.set_shapes(local);
                }
            }
        }
    }

    /// Note an edit: (re)start the debounce window. Calling again before the
    /// window elapses pushes the save out.
    pub fn schedule_save(&mut self) {
        self.save_deadline = Some(Instant::now() + self.debounce);
    }

    /// Whether a scheduled save's debounce window has elapsed as of `now`.
    pub fn should_flush(&self, now: Instant) -> bool {
        self.save_deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Flush if a scheduled save is due. Returns whether a flush ran.
    pub async fn maybe_flush(&mut self, store: &ShapeStore) -> bool {
        if !self.should_flush(Instant::now()) {
            return false;
        }
        self.flush(store).await;
        true
    }

    /// Persist the store now: source shapes to the local cache, source
    /// shapes plus derived intersections to the remote. A remote failure is
    /// logged and the save is otherwise complete; the local copy is the
    /// durable one.
    pub async fn flush(&mut self, store: &ShapeStore) {
        self.save_deadline = None;
        self.write_local(store.shapes());
        let records = Self::sync_records(store);
        if let Err(e) = self.remote.push(&self.identity, &records).await {
            log::warn!("remote save failed: {}", e);
        }
    }
}

//! QuadSync core: a canvas engine for quadrilateral shapes.
//!
//! Shapes are drawn by drag gestures, carry derived geometry (side lengths,
//! interior angles, area), and overlap pairwise into derived intersection
//! entities. The engine is renderer-agnostic: it owns the shape list, the
//! drawing state machine and the persistence pipeline, and leaves pixels to
//! whatever front end drives it.
//!
//! Module map:
//! - [`geometry`]: pure point/polygon math and radian formatting
//! - [`shape`]: the shape and intersection records and their wire format
//! - [`intersection`]: pairwise polygon clipping
//! - [`drawing`]: the pointer-gesture state machine
//! - [`canvas`]: the authoritative shape store and its edit operations
//! - [`storage`] / [`remote`]: local cache and remote mirror backends
//! - [`sync`]: load/save orchestration with debounced persistence

pub mod canvas;
pub mod drawing;
pub mod geometry;
pub mod intersection;
pub mod remote;
pub mod shape;
pub mod storage;
pub mod sync;

pub use canvas::{SelectionTarget, ShapeStore, DEFAULT_CANVAS_SIZE};
pub use drawing::{DrawEvent, DrawOutcome, DrawState, DrawTool, MIN_SHAPE_SIZE};
pub use intersection::{all_intersections, intersect_pair};
pub use remote::{MemoryRemote, RemoteError, RemoteResult, RemoteStore};
pub use shape::{Intersection, Shape, ShapeId, SyncRecord};
pub use storage::{CacheError, CacheResult, LocalCache, MemoryCache};
pub use sync::{SyncController, SAVE_DEBOUNCE};

#[cfg(not(target_arch = "wasm32"))]
pub use remote::HttpRemote;

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileCache;

//! QuadSync Canvas Persistence Server
//!
//! Stores one canvas (a JSON array of shape records) per identity key.
//!
//! ## API
//!
//! ```text
//! GET  /api/canvas/{identity}   -> the stored record array ([] when unknown)
//! POST /api/canvas/{identity}   -> replace the stored record array
//! GET  /health                  -> "ok"
//! ```
//!
//! The payload is opaque to the server; clients own the record semantics.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use dashmap::DashMap;
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::CorsLayer;
use tracing::info;

/// Shared application state
struct AppState {
    /// Canvases keyed by client identity
    canvases: DashMap<String, Vec<serde_json::Value>>,
}

impl AppState {
    fn new() -> Self {
        Self {
            canvases: DashMap::new(),
        }
    }

    /// The stored records for an identity, empty for unknown identities.
    fn get_canvas(&self, identity: &str) -> Vec<serde_json::Value> {
        self.canvases
            .get(identity)
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    /// Replace the records for an identity.
    fn put_canvas(&self, identity: String, records: Vec<serde_json::Value>) {
        self.canvases.insert(identity, records);
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quadsync_server=info,tower_http=info".into()),
        )
        .init();

    let state = Arc::new(AppState::new());

    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    info!("QuadSync canvas server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/canvas/{identity}", get(get_canvas).post(put_canvas))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Index page
async fn index() -> &'static str {
    "QuadSync Canvas Server - canvases at /api/canvas/{identity}"
}

/// Health check
async fn health() -> &'static str {
    "ok"
}

/// Fetch a canvas. Unknown identities get an empty array, not a 404, so
/// fresh clients can load without special-casing.
async fn get_canvas(
    Path(identity): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Json<Vec<serde_json::Value>> {
    Json(state.get_canvas(&identity))
}

/// Replace a canvas with the posted record array.
async fn put_canvas(
    Path(identity): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(records): Json<Vec<serde_json::Value>>,
) -> StatusCode {
    info!("canvas {} updated ({} records)", identity, records.len());
    state.put_canvas(identity, records);
    StatusCode::NO_CONTENT
}

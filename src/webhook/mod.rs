//! Mutating admission webhook routes
//!
//! The API server delivers pod AdmissionReview requests to `POST /pods`; the
//! handler answers with a JSON-patch admission response. A plain `/healthz`
//! is exposed for probes.

pub mod pod;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

/// Shared state for webhook handlers
#[derive(Clone)]
pub struct AppState {
    /// Image the provisioning init container copies the berglas binary from
    pub berglas_image: String,
}

impl AppState {
    /// Create a new webhook state with the given berglas image reference
    pub fn new(berglas_image: impl Into<String>) -> Self {
        Self {
            berglas_image: berglas_image.into(),
        }
    }
}

/// Create the webhook router with all mutation endpoints
pub fn webhook_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/pods", post(pod::mutate_handler))
        .route("/healthz", get(|| async { "ok" }))
        .with_state(state)
}

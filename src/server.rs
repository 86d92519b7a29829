//! JSON HTTP server.
//!
//! Exposes the recommendation engine over a small JSON API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/recommend` | Rank files against the caller's saved files |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! All error responses share one schema:
//!
//! ```json
//! { "error": { "code": "invalid_query", "message": "saved file at index 0 has an empty _id" } }
//! ```
//!
//! Error codes: `invalid_query` (400), `metadata_unavailable` (503),
//! `computation_failed` (500), `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the browser frontend
//! can call the API directly.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::engine::Engine;
use crate::error::RecError;
use crate::models::{FileMeta, RecommendRequest};

/// Shared application state passed to all route handlers via Axum's `State`
/// extractor.
#[derive(Clone)]
struct AppState {
    engine: Arc<Engine>,
}

/// Build the router with all routes and the CORS layer attached.
///
/// Exposed separately from [`run_server`] so tests can serve the app on an
/// ephemeral port.
pub fn app(engine: Arc<Engine>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/recommend", post(handle_recommend))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(AppState { engine })
}

/// Starts the HTTP server on the configured bind address.
///
/// Runs until the process is terminated.
pub async fn run_server(config: &Config, engine: Arc<Engine>) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();

    println!("filerec listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app(engine)).await?;

    Ok(())
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (e.g., `"invalid_query"`).
    code: String,
    /// Human-readable error message.
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<RecError> for AppError {
    fn from(err: RecError) -> Self {
        let (status, code) = match &err {
            RecError::InvalidQuery(_) => (StatusCode::BAD_REQUEST, "invalid_query"),
            RecError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "metadata_unavailable"),
            RecError::Computation(_) => (StatusCode::INTERNAL_SERVER_ERROR, "computation_failed"),
            // Swallowed inside the engine; mapped here only so the
            // conversion is total.
            RecError::CacheUnavailable(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };
        AppError {
            status,
            code: code.to_string(),
            message: err.to_string(),
        }
    }
}

// ============ GET /health ============

/// JSON response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Handler for `GET /health`.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ POST /recommend ============

/// Handler for `POST /recommend`.
///
/// Accepts `{ "saved_files": [{ "_id", "course", "school" }, ...] }` and
/// returns a JSON array of up to top-K recommended files. An empty
/// `saved_files` list yields `[]`.
///
/// The extractor result is taken as a `Result` so a body that fails to
/// deserialize (missing fields, malformed JSON) is rejected as an
/// `invalid_query` error in the standard schema rather than axum's
/// plain-text rejection.
async fn handle_recommend(
    State(state): State<AppState>,
    body: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<Vec<FileMeta>>, AppError> {
    let Json(request) =
        body.map_err(|e| AppError::from(RecError::InvalidQuery(e.body_text())))?;
    let results = state.engine.recommend(&request.saved_files).await?;
    Ok(Json(results))
}

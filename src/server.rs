//! HTTP server.
//!
//! Exposes the index settings, the per-type transforms, and a sync hook the
//! CMS calls on entry lifecycle events. Every route sits behind the CORS
//! layer from [`crate::cors`].
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `/indexes` | Settings of all six indexes |
//! | `GET`  | `/indexes/{content_type}` | Settings of one index |
//! | `POST` | `/transform/{content_type}` | Record → index document |
//! | `POST` | `/sync/{content_type}` | Apply a lifecycle event to the index |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "content record must be a JSON object" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `invalid_id` (422),
//! `search_error` (502), `search_unavailable` (503).

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use content_gate_core::{
    ContentRecord, ContentType, IndexDocument, OriginAllowList, TransformError,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::cors::{cors_layer, strip_unauthorized};
use crate::indexes::{index_entries, IndexEntry};
use crate::search_client::{MeiliClient, SearchIndex};
use crate::sync::{apply_event, SyncError, SyncEvent, SyncOutcome};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// Compiled once at startup; read-only afterwards.
    pub allow: Arc<OriginAllowList>,
    /// `None` when no search host is configured.
    pub search: Option<Arc<dyn SearchIndex>>,
}

impl AppState {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let allow = Arc::new(config.origin_allow_list()?);

        let search: Option<Arc<dyn SearchIndex>> = if config.search.is_configured() {
            Some(Arc::new(MeiliClient::new(&config.search)?))
        } else {
            tracing::warn!("no search host configured; /sync will answer 503");
            None
        };

        Ok(Self { allow, search })
    }
}

/// Build the router with CORS and request tracing applied.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(state.allow.clone());

    Router::new()
        .route("/health", get(handle_health))
        .route("/indexes", get(handle_list_indexes))
        .route("/indexes/{content_type}", get(handle_get_index))
        .route("/transform/{content_type}", post(handle_transform))
        .route("/sync/{content_type}", post(handle_sync))
        .layer(cors)
        .layer(middleware::map_response(strip_unauthorized))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the HTTP server on `[server].bind` and runs until Ctrl-C.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let state = AppState::from_config(config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!(
        bind = %config.server.bind,
        origins = config.cors.origins.len(),
        patterns = config.cors.origin_patterns.len(),
        "content-gate listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await?;

    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl AppError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<TransformError> for AppError {
    fn from(err: TransformError) -> Self {
        match err {
            TransformError::MissingId { .. } | TransformError::InvalidId { .. } => {
                AppError::new(StatusCode::UNPROCESSABLE_ENTITY, "invalid_id", err.to_string())
            }
            _ => AppError::new(StatusCode::BAD_REQUEST, "bad_request", err.to_string()),
        }
    }
}

impl From<SyncError> for AppError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Record(e) => e.into(),
            SyncError::Push(e) => {
                tracing::error!(error = %format!("{:#}", e), "search service push failed");
                AppError::new(StatusCode::BAD_GATEWAY, "search_error", format!("{:#}", e))
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::new(StatusCode::BAD_REQUEST, "bad_request", rejection.body_text())
    }
}

fn parse_content_type(raw: &str) -> Result<ContentType, AppError> {
    raw.parse()
        .map_err(|e: content_gate_core::UnknownContentType| {
            AppError::new(StatusCode::NOT_FOUND, "not_found", e.to_string())
        })
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /indexes ============

#[derive(Serialize)]
struct IndexListResponse {
    indexes: Vec<IndexEntry>,
}

async fn handle_list_indexes() -> Json<IndexListResponse> {
    Json(IndexListResponse {
        indexes: index_entries(None),
    })
}

async fn handle_get_index(Path(content_type): Path<String>) -> Result<Json<IndexEntry>, AppError> {
    let content_type = parse_content_type(&content_type)?;
    Ok(Json(content_type.into()))
}

// ============ POST /transform/{content_type} ============

/// Run the content type's transform on the posted record. Nothing is
/// written to the search service.
async fn handle_transform(
    Path(content_type): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<IndexDocument>, AppError> {
    let content_type = parse_content_type(&content_type)?;
    let Json(entry) = body?;
    let record = ContentRecord::from_value(entry)?;
    Ok(Json(content_type.transform(&record)?))
}

// ============ POST /sync/{content_type} ============

/// Request body for `POST /sync/{content_type}`.
#[derive(Debug, Deserialize)]
pub struct SyncRequest {
    pub event: SyncEvent,
    /// The entry, with the content type's populate directive applied.
    pub entry: Value,
}

async fn handle_sync(
    State(state): State<AppState>,
    Path(content_type): Path<String>,
    body: Result<Json<SyncRequest>, JsonRejection>,
) -> Result<Json<SyncOutcome>, AppError> {
    let content_type = parse_content_type(&content_type)?;
    let Json(req) = body?;
    let record = ContentRecord::from_value(req.entry)?;

    let search = state.search.as_deref().ok_or_else(|| {
        AppError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "search_unavailable",
            "search service is not configured",
        )
    })?;

    let outcome = apply_event(search, content_type, req.event, &record).await?;
    Ok(Json(outcome))
}

//! HTTP surface for the planner
//!
//! Thin glue over [`Planner`]: route parsing, status mapping and permissive
//! CORS. All interesting behavior lives in the service layer.
//!
//! # Routes
//!
//! - `GET /` - Health and cache occupancy
//! - `GET /quests/{map}` - Tasks for a map identifier (synonym or `ALL`)
//! - `GET /map-data/{map}` - Map detail; always 200, possibly empty
//! - `GET /ammo` - Enriched ammunition sheet
//! - `POST /cache/clear` - Reset every cache entry

use crate::service::Planner;
use crate::upstream::Upstream;
use crate::PlannerError;
use axum::{
    extract::{Path, Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// HTTP server wrapping a planner
pub struct ApiServer<U: Upstream + 'static> {
    planner: Arc<Planner<U>>,
}

impl<U: Upstream + 'static> ApiServer<U> {
    pub fn new(planner: Planner<U>) -> Self {
        Self {
            planner: Arc::new(planner),
        }
    }

    /// Build the router with CORS applied to every response
    fn router(planner: Arc<Planner<U>>) -> Router {
        Router::new()
            .route("/", get(health::<U>))
            .route("/quests/{map}", get(list_quests::<U>))
            .route("/map-data/{map}", get(map_data::<U>))
            .route("/ammo", get(list_ammo::<U>))
            .route("/cache/clear", post(clear_cache::<U>))
            .layer(middleware::from_fn(cors_middleware))
            .with_state(planner)
    }

    /// Run the server on the given address
    pub async fn run(self, addr: &str) -> crate::Result<()> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", addr, e))?;

        tracing::info!(addr = addr, "Planner API listening");

        axum::serve(listener, Self::router(self.planner))
            .await
            .map_err(PlannerError::Io)
    }
}

/// Permissive CORS: the API fronts a static browser client on another origin
async fn cors_middleware(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        apply_cors(response.headers_mut());
        return response;
    }

    let mut response = next.run(request).await;
    apply_cors(response.headers_mut());
    response
}

fn apply_cors(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("*"),
    );
}

/// Map an upstream failure to its HTTP status: timeouts surface as gateway
/// timeout, everything else as bad gateway.
fn upstream_status(error: &PlannerError) -> StatusCode {
    match error {
        PlannerError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::BAD_GATEWAY,
    }
}

fn error_response(error: PlannerError) -> (StatusCode, Json<ErrorResponse>) {
    (
        upstream_status(&error),
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

async fn health<U: Upstream>(State(planner): State<Arc<Planner<U>>>) -> impl IntoResponse {
    let stats = planner.cache_stats().await;
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "cache": stats,
    }))
}

async fn list_quests<U: Upstream>(
    State(planner): State<Arc<Planner<U>>>,
    Path(map): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let tasks = planner.list_tasks(&map).await.map_err(|e| {
        tracing::error!(map = %map, error = %e, "Quest listing failed");
        error_response(e)
    })?;

    Ok(Json(tasks))
}

async fn map_data<U: Upstream>(
    State(planner): State<Arc<Planner<U>>>,
    Path(map): Path<String>,
) -> impl IntoResponse {
    // Never fails: resolution failures degrade to the empty detail
    let detail = planner.map_detail(&map).await;
    Json(detail.as_ref().clone())
}

async fn list_ammo<U: Upstream>(
    State(planner): State<Arc<Planner<U>>>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let sheet = planner.list_ammo().await.map_err(|e| {
        tracing::error!(error = %e, "Ammo listing failed");
        error_response(e)
    })?;

    Ok(Json(sheet.as_ref().clone()))
}

async fn clear_cache<U: Upstream>(
    State(planner): State<Arc<Planner<U>>>,
) -> impl IntoResponse {
    planner.clear_cache().await;
    Json(serde_json::json!({ "cleared": true }))
}

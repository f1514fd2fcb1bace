//! Viewer page, metadata lookup and refresh routes.

use crate::catalog::RefreshOutcome;
use crate::server::AppContext;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};

const INDEX_HTML: &str = include_str!("../../templates/index.html");

pub fn media_routes() -> Router<AppContext> {
    Router::new()
        .route("/", get(index))
        .route("/media/:content_id", get(get_media))
        .route("/refresh_data", post(refresh_data))
        .route("/api/status", get(status))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn get_media(
    State(ctx): State<AppContext>,
    Path(content_id): Path<String>,
) -> impl IntoResponse {
    match ctx.catalog.lookup(&content_id) {
        Some(record) => (StatusCode::OK, Json(serde_json::json!(record))),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Media not found"})),
        ),
    }
}

/// Run a refresh now and report how it went. A failed refresh leaves the
/// catalog empty, same as at startup.
async fn refresh_data(State(ctx): State<AppContext>) -> impl IntoResponse {
    match ctx.catalog.refresh(ctx.source.as_ref()).await {
        RefreshOutcome::Success { entries } => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "success",
                "message": "Media data refreshed.",
                "entries": entries
            })),
        ),
        RefreshOutcome::Failed { message } => (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({
                "status": "error",
                "message": message
            })),
        ),
    }
}

async fn status(State(ctx): State<AppContext>) -> impl IntoResponse {
    let (entries, last_refresh) = ctx.catalog.snapshot_with_status();
    Json(serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "source": ctx.source.name(),
        "entries": entries.len(),
        "last_refresh": last_refresh,
    }))
}

//! Media file routes.
//!
//! `/local_media/*` serves from `media.root` (a mounted drive) and
//! `/static/*` from `media.static_dir`. Paths are resolved with
//! [`resolve_within`] before anything touches the filesystem; the response
//! itself comes from `ServeFile`, which handles range requests for video
//! seeking and picks the content type.

use crate::server::AppContext;
use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use media_viewer_common::paths::resolve_within;
use media_viewer_common::Error;
use std::path::PathBuf;
use tower::ServiceExt;
use tower_http::services::ServeFile;

pub fn file_routes() -> Router<AppContext> {
    Router::new()
        .route("/local_media/*path", get(serve_local_media))
        .route("/static/*path", get(serve_static))
}

async fn serve_local_media(
    State(ctx): State<AppContext>,
    Path(path): Path<String>,
    request: Request,
) -> Response {
    serve_from_root(ctx.config.media.root.clone(), path, request).await
}

async fn serve_static(
    State(ctx): State<AppContext>,
    Path(path): Path<String>,
    request: Request,
) -> Response {
    serve_from_root(ctx.config.media.static_dir.clone(), path, request).await
}

async fn serve_from_root(root: PathBuf, requested: String, request: Request<Body>) -> Response {
    let resolved =
        tokio::task::spawn_blocking(move || resolve_within(&root, &requested)).await;

    let file = match resolved {
        Ok(Ok(file)) => file,
        Ok(Err(Error::PathEscape(path))) => {
            tracing::warn!("Refused request outside media root: {}", path);
            return not_found();
        }
        Ok(Err(e)) => {
            tracing::debug!("File lookup failed: {}", e);
            return not_found();
        }
        Err(e) => {
            tracing::error!("File lookup task failed: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match ServeFile::new(file).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": "File not found"})),
    )
        .into_response()
}

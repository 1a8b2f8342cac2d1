//! Page routes — load a page, inspect it, message its responder.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chatsnap_core::Snapshot;
use chatsnap_page::{PageInfo, PageRequest};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/pages", post(load_page))
        .route("/pages/active", get(active_page).delete(unload_page))
        .route("/pages/active/document", put(update_document))
        .route("/pages/{id}/messages", post(send_message))
}

#[derive(Deserialize)]
struct LoadPageRequest {
    url: String,
    html: String,
}

async fn load_page(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoadPageRequest>,
) -> Json<PageInfo> {
    let session = state.host.load(req.url, req.html);
    Json(session.info())
}

async fn active_page(State(state): State<Arc<AppState>>) -> Result<Json<PageInfo>, ApiError> {
    state
        .host
        .active()
        .map(|session| Json(session.info()))
        .ok_or_else(|| ApiError::NotFound("no page loaded".into()))
}

#[derive(Deserialize)]
struct UpdateDocumentRequest {
    html: String,
}

async fn update_document(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateDocumentRequest>,
) -> Result<Json<PageInfo>, ApiError> {
    if !state.host.update_document(req.html) {
        return Err(ApiError::NotFound("no page loaded".into()));
    }
    debug!("Active document replaced");
    active_page(State(state)).await
}

async fn unload_page(State(state): State<Arc<AppState>>) -> Json<Value> {
    state.host.unload();
    Json(serde_json::json!({ "ok": true }))
}

/// Deliver a message to the page's responder.
///
/// Replies `null` while the page has no snapshot. A page id other than the
/// active one has no listener and gets 404.
async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Option<Snapshot>>, ApiError> {
    let request: PageRequest = serde_json::from_value(body)
        .map_err(|e| ApiError::BadRequest(format!("unknown request: {}", e)))?;

    let reply = state
        .host
        .handle(&id, request)
        .map_err(|_| ApiError::NotFound(format!("no listener on page {}", id)))?;
    Ok(Json(reply.map(|s| s.as_ref().clone())))
}

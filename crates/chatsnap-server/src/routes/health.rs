use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health_check))
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let page = state.host.active().map(|session| session.info());
    Json(json!({
        "status": "ok",
        "source": state.config.source,
        "page": page,
    }))
}

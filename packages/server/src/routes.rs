use crate::state::AppState;
use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

mod game;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .nest("/api/game", game::routes(state))
        .route("/health", get(health))
}

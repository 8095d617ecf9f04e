use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

use crate::models::game::GameResult;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/state", get(get_game_state))
        .route("/winner", get(get_winner))
        .with_state(state)
}

pub async fn get_game_state(State(state): State<AppState>) -> impl IntoResponse {
    match state.current() {
        Some(snapshot) => (StatusCode::OK, Json(json!(snapshot))),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "game has not started" })),
        ),
    }
}

pub async fn get_winner(State(state): State<AppState>) -> impl IntoResponse {
    let result = state
        .current()
        .map(|snapshot| snapshot.result)
        .unwrap_or(GameResult::InProgress);
    (StatusCode::OK, Json(json!({ "result": result })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::game::GameState;
    use crate::models::player::Participant;
    use crate::models::role::RoleCapability;
    use crate::models::snapshot::PublicSnapshot;
    use crate::utils::test_setup::setup_test_env;
    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_state_before_start() {
        setup_test_env();
        let (state, _tx) = AppState::new();
        let app = routes(state);

        let request = Request::builder().uri("/state").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_state_hides_roles() {
        setup_test_env();
        let (state, tx) = AppState::new();
        let game = GameState::with_participants(vec![
            Participant::human("ann", RoleCapability::Wolf),
            Participant::automated("bob", RoleCapability::Seer),
        ])
        .unwrap();
        tx.send_replace(Some(PublicSnapshot::from_game(&game)));

        let request = Request::builder().uri("/state").body(Body::empty()).unwrap();
        let response = routes(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["players"].as_array().unwrap().len(), 2);
        assert_eq!(body["players"][0]["role"], "unknown");
        assert_eq!(body["result"], "InProgress");
    }

    #[tokio::test]
    async fn test_winner_follows_latest_snapshot() {
        setup_test_env();
        let (state, tx) = AppState::new();
        let mut game = GameState::with_participants(vec![Participant::human(
            "ann",
            RoleCapability::Villager,
        )])
        .unwrap();
        game.finish(GameResult::GoodWin);
        tx.send_replace(Some(PublicSnapshot::from_game(&game)));

        let request = Request::builder().uri("/winner").body(Body::empty()).unwrap();
        let response = routes(state).oneshot(request).await.unwrap();
        assert_eq!(body_json(response).await["result"], "GoodWin");
    }
}

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use shared::models::game::Game;
use shared::models::matches::Match;

use crate::{error::ApiError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/practice/start", post(start_practice))
}

#[derive(Deserialize)]
pub struct StartPracticeRequest {
    pub player_id: String,
    pub category_id: String,
}

#[derive(Serialize)]
pub struct StartPracticeResponse {
    pub game_match: Match,
    pub game: Game,
}

/// Create a solo practice match and start its first (and only) game.
async fn start_practice(
    State(state): State<AppState>,
    Json(payload): Json<StartPracticeRequest>,
) -> Result<(StatusCode, Json<StartPracticeResponse>), ApiError> {
    let game_match = state
        .match_service
        .create_practice_match(&payload.player_id, &payload.category_id)
        .await?;

    let game = state.match_service.start_next_game(&game_match.id).await?;
    state.scheduler.arm(&game).await;

    Ok((
        StatusCode::CREATED,
        Json(StartPracticeResponse { game_match, game }),
    ))
}

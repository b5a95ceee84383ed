use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use shared::models::game::Game;
use shared::models::game_move::{GameMove, MoveResult};
use shared::services::errors::game_service_errors::GameServiceError;

use crate::{error::ApiError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/games/{game_id}", get(get_game))
        .route("/games/{game_id}/moves", get(list_moves))
        .route("/games/{game_id}/submit", post(submit_answer))
}

#[derive(Deserialize)]
pub struct SubmitAnswerRequest {
    pub player_id: String,
    pub answer: String,
}

#[derive(Serialize)]
pub struct SubmitAnswerResponse {
    pub game_move: GameMove,
    pub game: Game,
    pub message: Option<String>,
}

async fn submit_answer(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(payload): Json<SubmitAnswerRequest>,
) -> Result<Json<SubmitAnswerResponse>, ApiError> {
    let outcome = state
        .game_service
        .submit_move(&game_id, &payload.player_id, &payload.answer)
        .await?;

    if outcome.game.is_completed() {
        state.scheduler.disarm(&game_id).await;
        state.match_service.on_game_completed(&outcome.game).await?;
    } else if outcome.game_move.result != MoveResult::Invalid {
        // The turn changed hands; restart the clock. An Invalid move keeps
        // the current turn and its running clock.
        state.scheduler.arm(&outcome.game).await;
    }

    Ok(Json(SubmitAnswerResponse {
        game_move: outcome.game_move,
        game: outcome.game,
        message: outcome.message,
    }))
}

async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<Game>, ApiError> {
    state
        .game_service
        .get_game(&game_id)
        .await?
        .map(Json)
        .ok_or(ApiError::GameService(GameServiceError::GameNotFound))
}

async fn list_moves(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<Vec<GameMove>>, ApiError> {
    let moves = state.game_service.get_moves(&game_id).await?;

    Ok(Json(moves))
}

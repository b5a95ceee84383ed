use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use shared::models::game::Game;
use shared::models::matches::{Match, MatchFormat, MatchType};
use shared::services::errors::match_service_errors::MatchServiceError;

use crate::{error::ApiError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/matches", post(create_match))
        .route("/matches/{match_id}", get(get_match))
        .route("/matches/{match_id}/join", post(join_match))
        .route(
            "/matches/{match_id}/games",
            post(start_next_game).get(list_games),
        )
        .route("/players/{player_id}/matches", get(active_matches))
}

#[derive(Deserialize)]
pub struct CreateMatchRequest {
    pub player1_id: String,
    pub player2_id: Option<String>,
    pub category_id: String,
    pub match_type: MatchType,
    pub format: MatchFormat,
}

#[derive(Deserialize)]
pub struct JoinMatchRequest {
    pub player_id: String,
}

async fn create_match(
    State(state): State<AppState>,
    Json(payload): Json<CreateMatchRequest>,
) -> Result<(StatusCode, Json<Match>), ApiError> {
    let game_match = state
        .match_service
        .create_match(
            &payload.player1_id,
            payload.player2_id.as_deref(),
            &payload.category_id,
            payload.match_type,
            payload.format,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(game_match)))
}

async fn get_match(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<Match>, ApiError> {
    state
        .match_service
        .get_match(&match_id)
        .await?
        .map(Json)
        .ok_or(ApiError::MatchService(MatchServiceError::MatchNotFound))
}

async fn join_match(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
    Json(payload): Json<JoinMatchRequest>,
) -> Result<Json<Match>, ApiError> {
    let game_match = state
        .match_service
        .join_match(&match_id, &payload.player_id)
        .await?;

    Ok(Json(game_match))
}

async fn start_next_game(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<(StatusCode, Json<Game>), ApiError> {
    let game = state.match_service.start_next_game(&match_id).await?;

    // First turn's clock starts with the game
    state.scheduler.arm(&game).await;

    Ok((StatusCode::CREATED, Json(game)))
}

async fn list_games(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<Vec<Game>>, ApiError> {
    let games = state.match_service.games_for_match(&match_id).await?;

    Ok(Json(games))
}

async fn active_matches(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<Vec<Match>>, ApiError> {
    let matches = state
        .match_service
        .active_matches_for_player(&player_id)
        .await?;

    Ok(Json(matches))
}

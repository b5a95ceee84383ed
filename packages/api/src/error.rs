use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::services::errors::{
    game_service_errors::GameServiceError, match_service_errors::MatchServiceError,
};

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub enum ApiError {
    MatchService(MatchServiceError),
    GameService(GameServiceError),
}

impl From<MatchServiceError> for ApiError {
    fn from(error: MatchServiceError) -> Self {
        ApiError::MatchService(error)
    }
}

impl From<GameServiceError> for ApiError {
    fn from(error: GameServiceError) -> Self {
        ApiError::GameService(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::MatchService(MatchServiceError::MatchNotFound) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            ApiError::MatchService(MatchServiceError::InvalidState(_)) => {
                (StatusCode::CONFLICT, self.to_string())
            }
            ApiError::MatchService(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),

            ApiError::GameService(GameServiceError::GameNotFound) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            ApiError::GameService(GameServiceError::InvalidState(_)) => {
                (StatusCode::CONFLICT, self.to_string())
            }
            ApiError::GameService(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::MatchService(err) => write!(f, "{}", err),
            ApiError::GameService(err) => write!(f, "{}", err),
        }
    }
}

use crate::repositories::errors::game_repository_errors::GameRepositoryError;
use crate::repositories::errors::match_repository_errors::MatchRepositoryError;
use crate::services::errors::game_service_errors::GameServiceError;
use crate::services::errors::question_service_errors::QuestionServiceError;

#[derive(Debug)]
pub enum MatchServiceError {
    MatchNotFound,
    InvalidState(String),
    RepositoryError(MatchRepositoryError),
    GameRepositoryError(GameRepositoryError),
    GameServiceError(GameServiceError),
    QuestionServiceError(QuestionServiceError),
}

impl std::fmt::Display for MatchServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchServiceError::MatchNotFound => write!(f, "Match not found"),
            MatchServiceError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            MatchServiceError::RepositoryError(err) => write!(f, "Repository error: {}", err),
            MatchServiceError::GameRepositoryError(err) => {
                write!(f, "Game repository error: {}", err)
            }
            MatchServiceError::GameServiceError(err) => write!(f, "Game service error: {}", err),
            MatchServiceError::QuestionServiceError(err) => {
                write!(f, "Question service error: {}", err)
            }
        }
    }
}

impl std::error::Error for MatchServiceError {}

impl From<MatchRepositoryError> for MatchServiceError {
    fn from(err: MatchRepositoryError) -> Self {
        MatchServiceError::RepositoryError(err)
    }
}

impl From<GameRepositoryError> for MatchServiceError {
    fn from(err: GameRepositoryError) -> Self {
        MatchServiceError::GameRepositoryError(err)
    }
}

impl From<GameServiceError> for MatchServiceError {
    fn from(err: GameServiceError) -> Self {
        MatchServiceError::GameServiceError(err)
    }
}

impl From<QuestionServiceError> for MatchServiceError {
    fn from(err: QuestionServiceError) -> Self {
        MatchServiceError::QuestionServiceError(err)
    }
}

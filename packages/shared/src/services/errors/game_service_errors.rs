use crate::repositories::errors::answer_repository_errors::AnswerRepositoryError;
use crate::repositories::errors::game_repository_errors::GameRepositoryError;

#[derive(Debug)]
pub enum GameServiceError {
    GameNotFound,
    /// Rule violation: wrong turn, or the game is not in a state that
    /// accepts the operation. Distinct from a wrong guess, which is a
    /// normal move outcome.
    InvalidState(String),
    RepositoryError(GameRepositoryError),
    LookupError(AnswerRepositoryError),
}

impl std::fmt::Display for GameServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameServiceError::GameNotFound => write!(f, "Game not found"),
            GameServiceError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            GameServiceError::RepositoryError(err) => write!(f, "Repository error: {}", err),
            GameServiceError::LookupError(err) => write!(f, "Lookup error: {}", err),
        }
    }
}

impl std::error::Error for GameServiceError {}

impl From<GameRepositoryError> for GameServiceError {
    fn from(err: GameRepositoryError) -> Self {
        GameServiceError::RepositoryError(err)
    }
}

impl From<AnswerRepositoryError> for GameServiceError {
    fn from(err: AnswerRepositoryError) -> Self {
        GameServiceError::LookupError(err)
    }
}

use crate::repositories::errors::answer_repository_errors::AnswerRepositoryError;
use crate::repositories::errors::question_repository_errors::QuestionRepositoryError;

#[derive(Debug)]
pub enum QuestionServiceError {
    QuestionRepository(QuestionRepositoryError),
    AnswerRepository(AnswerRepositoryError),
}

impl std::fmt::Display for QuestionServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuestionServiceError::QuestionRepository(err) => {
                write!(f, "Question repository error: {}", err)
            }
            QuestionServiceError::AnswerRepository(err) => {
                write!(f, "Answer repository error: {}", err)
            }
        }
    }
}

impl std::error::Error for QuestionServiceError {}

impl From<QuestionRepositoryError> for QuestionServiceError {
    fn from(err: QuestionRepositoryError) -> Self {
        QuestionServiceError::QuestionRepository(err)
    }
}

impl From<AnswerRepositoryError> for QuestionServiceError {
    fn from(err: AnswerRepositoryError) -> Self {
        QuestionServiceError::AnswerRepository(err)
    }
}

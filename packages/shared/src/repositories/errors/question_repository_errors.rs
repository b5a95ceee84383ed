#[derive(Debug)]
pub enum QuestionRepositoryError {
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for QuestionRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuestionRepositoryError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            QuestionRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for QuestionRepositoryError {}

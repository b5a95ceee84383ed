#[derive(Debug)]
pub enum AnswerRepositoryError {
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for AnswerRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerRepositoryError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            AnswerRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for AnswerRepositoryError {}

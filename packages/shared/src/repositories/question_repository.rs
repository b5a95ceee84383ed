use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;

use crate::models::question::Question;
use crate::repositories::errors::question_repository_errors::QuestionRepositoryError;

#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn find_active_by_category(
        &self,
        category_id: &str,
    ) -> Result<Vec<Question>, QuestionRepositoryError>;

    async fn get_question(
        &self,
        question_id: &str,
    ) -> Result<Option<Question>, QuestionRepositoryError>;
}

pub struct DynamoDbQuestionRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbQuestionRepository {
    pub fn new(client: Client) -> Self {
        let table_name = std::env::var("QUESTIONS_TABLE")
            .expect("QUESTIONS_TABLE environment variable must be set");
        Self { client, table_name }
    }
}

#[async_trait]
impl QuestionRepository for DynamoDbQuestionRepository {
    async fn find_active_by_category(
        &self,
        category_id: &str,
    ) -> Result<Vec<Question>, QuestionRepositoryError> {
        let query_result = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name("category_id-index")
            .key_condition_expression("category_id = :category_id")
            .expression_attribute_values(":category_id", AttributeValue::S(category_id.to_string()))
            .send()
            .await
            .map_err(|e| QuestionRepositoryError::DynamoDb(e.to_string()))?;

        let mut questions = Vec::new();

        if let Some(items) = query_result.items {
            for item in items {
                let question: Question = serde_dynamo::from_item(item)
                    .map_err(|e| QuestionRepositoryError::Serialization(e.to_string()))?;

                if question.is_active {
                    questions.push(question);
                }
            }
        }

        Ok(questions)
    }

    async fn get_question(
        &self,
        question_id: &str,
    ) -> Result<Option<Question>, QuestionRepositoryError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(question_id.to_string()))
            .send()
            .await
            .map_err(|e| QuestionRepositoryError::DynamoDb(e.to_string()))?;

        if let Some(item) = result.item {
            let question: Question = serde_dynamo::from_item(item)
                .map_err(|e| QuestionRepositoryError::Serialization(e.to_string()))?;
            Ok(Some(question))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    pub struct MockQuestionRepository {
        pub questions: Mutex<Vec<Question>>,
    }

    impl MockQuestionRepository {
        pub fn new() -> Self {
            Self {
                questions: Mutex::new(Vec::new()),
            }
        }

        pub fn with_questions(self, questions: Vec<Question>) -> Self {
            *self.questions.lock().unwrap() = questions;
            self
        }
    }

    #[async_trait]
    impl QuestionRepository for MockQuestionRepository {
        async fn find_active_by_category(
            &self,
            category_id: &str,
        ) -> Result<Vec<Question>, QuestionRepositoryError> {
            Ok(self
                .questions
                .lock()
                .unwrap()
                .iter()
                .filter(|q| q.category_id == category_id)
                .filter(|q| q.is_active)
                .cloned()
                .collect())
        }

        async fn get_question(
            &self,
            question_id: &str,
        ) -> Result<Option<Question>, QuestionRepositoryError> {
            Ok(self
                .questions
                .lock()
                .unwrap()
                .iter()
                .find(|q| q.id == question_id)
                .cloned())
        }
    }
}

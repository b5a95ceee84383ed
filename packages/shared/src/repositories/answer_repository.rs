use std::collections::HashSet;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;

use crate::models::answer::Answer;
use crate::repositories::errors::answer_repository_errors::AnswerRepositoryError;

/// Text lookup over the answer corpus of a question. Exclusion of already
/// used answer ids happens inside the lookup, which is what makes "no such
/// answer" and "already used" indistinguishable to callers.
#[async_trait]
pub trait AnswerRepository: Send + Sync {
    async fn find_exact(
        &self,
        question_id: &str,
        normalized_text: &str,
        excluding: &HashSet<String>,
    ) -> Result<Option<Answer>, AnswerRepositoryError>;

    async fn find_fuzzy(
        &self,
        question_id: &str,
        normalized_text: &str,
        excluding: &HashSet<String>,
        min_similarity: f32,
    ) -> Result<Option<Answer>, AnswerRepositoryError>;

    async fn count_available(
        &self,
        question_id: &str,
        excluding: &HashSet<String>,
    ) -> Result<u32, AnswerRepositoryError>;

    async fn count_for_question(&self, question_id: &str) -> Result<u32, AnswerRepositoryError>;

    async fn top_answers(
        &self,
        question_id: &str,
        limit: usize,
        exclude_invalid_darts: bool,
    ) -> Result<Vec<Answer>, AnswerRepositoryError>;
}

/// Trigram similarity with pg_trgm padding semantics: the string is
/// lowercased and padded with two leading and one trailing space before
/// 3-grams are collected, and similarity is shared trigrams over the union.
pub fn trigram_similarity(a: &str, b: &str) -> f32 {
    let trigrams_a = trigrams(a);
    let trigrams_b = trigrams(b);

    if trigrams_a.is_empty() && trigrams_b.is_empty() {
        return 0.0;
    }

    let shared = trigrams_a.intersection(&trigrams_b).count();
    let union = trigrams_a.union(&trigrams_b).count();

    shared as f32 / union as f32
}

fn trigrams(text: &str) -> HashSet<String> {
    let trimmed = text.trim().to_lowercase();
    if trimmed.is_empty() {
        return HashSet::new();
    }

    let padded = format!("  {} ", trimmed);
    let chars: Vec<char> = padded.chars().collect();

    chars
        .windows(3)
        .map(|window| window.iter().collect())
        .collect()
}

pub struct DynamoDbAnswerRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbAnswerRepository {
    pub fn new(client: Client) -> Self {
        let table_name = std::env::var("ANSWERS_TABLE")
            .expect("ANSWERS_TABLE environment variable must be set");
        Self { client, table_name }
    }

    /// Load the full answer corpus for one question (its table partition).
    async fn load_answers(&self, question_id: &str) -> Result<Vec<Answer>, AnswerRepositoryError> {
        let query_result = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("question_id = :question_id")
            .expression_attribute_values(
                ":question_id",
                AttributeValue::S(question_id.to_string()),
            )
            .send()
            .await
            .map_err(|e| AnswerRepositoryError::DynamoDb(e.to_string()))?;

        let mut answers = Vec::new();

        if let Some(items) = query_result.items {
            for item in items {
                let answer: Answer = serde_dynamo::from_item(item)
                    .map_err(|e| AnswerRepositoryError::Serialization(e.to_string()))?;
                answers.push(answer);
            }
        }

        Ok(answers)
    }
}

fn best_fuzzy_match(
    answers: Vec<Answer>,
    normalized_text: &str,
    excluding: &HashSet<String>,
    min_similarity: f32,
) -> Option<Answer> {
    answers
        .into_iter()
        .filter(|a| !excluding.contains(&a.id))
        .map(|a| {
            let similarity = trigram_similarity(&a.answer_key, normalized_text);
            (a, similarity)
        })
        .filter(|(_, similarity)| *similarity >= min_similarity)
        .max_by(|(_, s1), (_, s2)| s1.partial_cmp(s2).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(answer, _)| answer)
}

#[async_trait]
impl AnswerRepository for DynamoDbAnswerRepository {
    async fn find_exact(
        &self,
        question_id: &str,
        normalized_text: &str,
        excluding: &HashSet<String>,
    ) -> Result<Option<Answer>, AnswerRepositoryError> {
        let answers = self.load_answers(question_id).await?;

        Ok(answers
            .into_iter()
            .filter(|a| !excluding.contains(&a.id))
            .find(|a| a.answer_key == normalized_text))
    }

    async fn find_fuzzy(
        &self,
        question_id: &str,
        normalized_text: &str,
        excluding: &HashSet<String>,
        min_similarity: f32,
    ) -> Result<Option<Answer>, AnswerRepositoryError> {
        let answers = self.load_answers(question_id).await?;

        Ok(best_fuzzy_match(
            answers,
            normalized_text,
            excluding,
            min_similarity,
        ))
    }

    async fn count_available(
        &self,
        question_id: &str,
        excluding: &HashSet<String>,
    ) -> Result<u32, AnswerRepositoryError> {
        let answers = self.load_answers(question_id).await?;

        Ok(answers.iter().filter(|a| !excluding.contains(&a.id)).count() as u32)
    }

    async fn count_for_question(&self, question_id: &str) -> Result<u32, AnswerRepositoryError> {
        let answers = self.load_answers(question_id).await?;

        Ok(answers.len() as u32)
    }

    async fn top_answers(
        &self,
        question_id: &str,
        limit: usize,
        exclude_invalid_darts: bool,
    ) -> Result<Vec<Answer>, AnswerRepositoryError> {
        let mut answers = self.load_answers(question_id).await?;

        if exclude_invalid_darts {
            answers.retain(|a| a.is_valid_darts);
        }

        answers.sort_by(|a, b| b.score.cmp(&a.score));
        answers.truncate(limit);

        Ok(answers)
    }
}

use std::sync::Arc;

use tracing::debug;

use crate::models::question::Question;
use crate::repositories::answer_repository::AnswerRepository;
use crate::repositories::question_repository::QuestionRepository;
use crate::services::errors::question_service_errors::QuestionServiceError;

/// A question needs a reasonable corpus before it is playable; thin corpora
/// make the no-reuse rule exhaust the question mid-game.
pub const MIN_ANSWERS: u32 = 10;

#[derive(Clone)]
pub struct QuestionService {
    question_repository: Arc<dyn QuestionRepository + Send + Sync>,
    answer_repository: Arc<dyn AnswerRepository + Send + Sync>,
}

impl QuestionService {
    pub fn new(
        question_repository: Arc<dyn QuestionRepository + Send + Sync>,
        answer_repository: Arc<dyn AnswerRepository + Send + Sync>,
    ) -> Self {
        QuestionService {
            question_repository,
            answer_repository,
        }
    }

    /// Uniform random pick among the category's active questions that carry
    /// at least MIN_ANSWERS answers. None when no question qualifies.
    pub async fn select_random_question(
        &self,
        category_id: &str,
    ) -> Result<Option<Question>, QuestionServiceError> {
        let questions = self
            .question_repository
            .find_active_by_category(category_id)
            .await?;

        let mut eligible = Vec::new();
        for question in questions {
            let answer_count = self.answer_repository.count_for_question(&question.id).await?;
            if answer_count >= MIN_ANSWERS {
                eligible.push(question);
            }
        }

        if eligible.is_empty() {
            debug!(category_id, "No eligible question in category");
            return Ok(None);
        }

        use rand::seq::SliceRandom;
        let mut rng = rand::thread_rng();

        Ok(eligible.choose(&mut rng).cloned())
    }

    pub async fn get_question(
        &self,
        question_id: &str,
    ) -> Result<Option<Question>, QuestionServiceError> {
        self.question_repository
            .get_question(question_id)
            .await
            .map_err(QuestionServiceError::from)
    }

    pub async fn has_minimum_answers(
        &self,
        question_id: &str,
        minimum: u32,
    ) -> Result<bool, QuestionServiceError> {
        let count = self.answer_repository.count_for_question(question_id).await?;
        Ok(count >= minimum)
    }
}

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::models::answer::Answer;
use crate::repositories::answer_repository::AnswerRepository;
use crate::repositories::errors::answer_repository_errors::AnswerRepositoryError;
use crate::services::scoring_service::{ScoreResult, ScoringService, CHECKOUT_FLOOR};

/// Minimum trigram similarity for a fuzzy match to count.
pub const SIMILARITY_THRESHOLD: f32 = 0.5;

/// Rejection message for both "no such answer" and "already used". The
/// exclusion filter runs inside the lookup, so the two cases are genuinely
/// indistinguishable here; keeping one message also avoids leaking whether a
/// guess exists in the corpus.
pub const NOT_FOUND_MESSAGE: &str = "Answer not found or already used";

#[derive(Debug, Clone, PartialEq)]
pub enum AnswerOutcome {
    /// The submission did not match anything; a normal game event, not an
    /// error.
    Invalid { reason: String },
    Matched {
        answer_id: String,
        display_text: String,
        score: i32,
        is_bust: bool,
        is_win: bool,
        new_total: i32,
        reason: Option<String>,
    },
}

/// Resolves free-text submissions against a question's answer corpus
/// (exact match first, then fuzzy) and scores the result.
#[derive(Clone)]
pub struct AnswerEvaluator {
    repository: Arc<dyn AnswerRepository + Send + Sync>,
}

impl AnswerEvaluator {
    pub fn new(repository: Arc<dyn AnswerRepository + Send + Sync>) -> Self {
        AnswerEvaluator { repository }
    }

    pub async fn evaluate(
        &self,
        question_id: &str,
        raw_input: &str,
        current_score: i32,
        used_answer_ids: &HashSet<String>,
    ) -> Result<AnswerOutcome, AnswerRepositoryError> {
        let normalized = raw_input.trim().to_lowercase();

        if normalized.is_empty() {
            return Ok(AnswerOutcome::Invalid {
                reason: "Empty answer".to_string(),
            });
        }

        let matched = match self
            .repository
            .find_exact(question_id, &normalized, used_answer_ids)
            .await?
        {
            Some(answer) => Some(answer),
            None => {
                self.repository
                    .find_fuzzy(question_id, &normalized, used_answer_ids, SIMILARITY_THRESHOLD)
                    .await?
            }
        };

        let Some(answer) = matched else {
            debug!(question_id, input = %normalized, "No answer matched");
            return Ok(AnswerOutcome::Invalid {
                reason: NOT_FOUND_MESSAGE.to_string(),
            });
        };

        Ok(Self::score_match(answer, current_score))
    }

    fn score_match(answer: Answer, current_score: i32) -> AnswerOutcome {
        let already_checked_out = (CHECKOUT_FLOOR..=0).contains(&current_score);

        match ScoringService::calculate(current_score, answer.score) {
            ScoreResult::Valid(new_total) => AnswerOutcome::Matched {
                answer_id: answer.id,
                display_text: answer.display_text,
                score: answer.score,
                is_bust: false,
                is_win: false,
                new_total,
                reason: None,
            },
            ScoreResult::Checkout(new_total) => AnswerOutcome::Matched {
                answer_id: answer.id,
                display_text: answer.display_text,
                score: answer.score,
                is_bust: false,
                is_win: true,
                new_total,
                reason: Some("Win!".to_string()),
            },
            ScoreResult::Bust => {
                let reason = if !already_checked_out
                    && !ScoringService::is_valid_darts_score(answer.score)
                {
                    Some("Invalid darts score".to_string())
                } else {
                    None
                };

                AnswerOutcome::Matched {
                    answer_id: answer.id,
                    display_text: answer.display_text,
                    score: answer.score,
                    is_bust: true,
                    is_win: false,
                    new_total: current_score,
                    reason,
                }
            }
        }
    }

    pub async fn available_answer_count(
        &self,
        question_id: &str,
        used_answer_ids: &HashSet<String>,
    ) -> Result<u32, AnswerRepositoryError> {
        self.repository
            .count_available(question_id, used_answer_ids)
            .await
    }

    pub async fn top_answers(
        &self,
        question_id: &str,
        limit: usize,
        exclude_invalid_darts: bool,
    ) -> Result<Vec<Answer>, AnswerRepositoryError> {
        self.repository
            .top_answers(question_id, limit, exclude_invalid_darts)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::answer_repository::tests::MockAnswerRepository;

    fn evaluator_with(answers: Vec<Answer>) -> AnswerEvaluator {
        AnswerEvaluator::new(Arc::new(MockAnswerRepository::new().with_answers(answers)))
    }

    #[tokio::test]
    async fn test_empty_answer_is_invalid() {
        let evaluator = evaluator_with(vec![]);

        let outcome = evaluator
            .evaluate("q1", "   ", 501, &HashSet::new())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            AnswerOutcome::Invalid {
                reason: "Empty answer".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_exact_match_scores_deduction() {
        let answer = Answer::new("q1", "Helsinki", 35, true);
        let answer_id = answer.id.clone();
        let evaluator = evaluator_with(vec![answer]);

        let outcome = evaluator
            .evaluate("q1", "  HELSINKI ", 501, &HashSet::new())
            .await
            .unwrap();

        match outcome {
            AnswerOutcome::Matched {
                answer_id: id,
                display_text,
                score,
                is_bust,
                is_win,
                new_total,
                reason,
            } => {
                assert_eq!(id, answer_id);
                assert_eq!(display_text, "Helsinki");
                assert_eq!(score, 35);
                assert!(!is_bust);
                assert!(!is_win);
                assert_eq!(new_total, 466);
                assert!(reason.is_none());
            }
            other => panic!("Expected Matched, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fuzzy_match_when_exact_misses() {
        let evaluator = evaluator_with(vec![Answer::new("q1", "Helsinki", 35, true)]);

        let outcome = evaluator
            .evaluate("q1", "helsinky", 501, &HashSet::new())
            .await
            .unwrap();

        match outcome {
            AnswerOutcome::Matched { display_text, .. } => {
                assert_eq!(display_text, "Helsinki");
            }
            other => panic!("Expected Matched, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_answer_gets_ambiguous_rejection() {
        let evaluator = evaluator_with(vec![Answer::new("q1", "Helsinki", 35, true)]);

        let outcome = evaluator
            .evaluate("q1", "canberra", 501, &HashSet::new())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            AnswerOutcome::Invalid {
                reason: NOT_FOUND_MESSAGE.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_used_answer_gets_same_rejection_as_unknown() {
        let answer = Answer::new("q1", "Helsinki", 35, true);
        let used: HashSet<String> = [answer.id.clone()].into_iter().collect();
        let evaluator = evaluator_with(vec![answer]);

        let outcome = evaluator.evaluate("q1", "helsinki", 501, &used).await.unwrap();

        assert_eq!(
            outcome,
            AnswerOutcome::Invalid {
                reason: NOT_FOUND_MESSAGE.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_unreachable_score_busts_with_reason() {
        let evaluator = evaluator_with(vec![Answer::new("q1", "Rare Thing", 179, false)]);

        let outcome = evaluator
            .evaluate("q1", "rare thing", 501, &HashSet::new())
            .await
            .unwrap();

        match outcome {
            AnswerOutcome::Matched {
                is_bust,
                is_win,
                new_total,
                reason,
                ..
            } => {
                assert!(is_bust);
                assert!(!is_win);
                assert_eq!(new_total, 501);
                assert_eq!(reason.as_deref(), Some("Invalid darts score"));
            }
            other => panic!("Expected Matched, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_overshoot_busts_without_reason() {
        let evaluator = evaluator_with(vec![Answer::new("q1", "Helsinki", 35, true)]);

        let outcome = evaluator
            .evaluate("q1", "helsinki", 20, &HashSet::new())
            .await
            .unwrap();

        match outcome {
            AnswerOutcome::Matched {
                is_bust,
                new_total,
                reason,
                ..
            } => {
                assert!(is_bust);
                assert_eq!(new_total, 20);
                assert!(reason.is_none());
            }
            other => panic!("Expected Matched, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_checkout_is_a_win() {
        let evaluator = evaluator_with(vec![Answer::new("q1", "Helsinki", 36, true)]);

        let outcome = evaluator
            .evaluate("q1", "helsinki", 36, &HashSet::new())
            .await
            .unwrap();

        match outcome {
            AnswerOutcome::Matched {
                is_win,
                new_total,
                reason,
                ..
            } => {
                assert!(is_win);
                assert_eq!(new_total, 0);
                assert_eq!(reason.as_deref(), Some("Win!"));
            }
            other => panic!("Expected Matched, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_available_answer_count_excludes_used() {
        let first = Answer::new("q1", "Helsinki", 35, true);
        let second = Answer::new("q1", "Oslo", 40, true);
        let used: HashSet<String> = [first.id.clone()].into_iter().collect();
        let evaluator = evaluator_with(vec![first, second]);

        assert_eq!(evaluator.available_answer_count("q1", &used).await.unwrap(), 1);
        assert_eq!(
            evaluator
                .available_answer_count("q1", &HashSet::new())
                .await
                .unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn test_top_answers_ranked_by_score() {
        let evaluator = evaluator_with(vec![
            Answer::new("q1", "Helsinki", 35, true),
            Answer::new("q1", "Rare Thing", 179, false),
            Answer::new("q1", "Oslo", 120, true),
        ]);

        let top = evaluator.top_answers("q1", 2, true).await.unwrap();

        let texts: Vec<&str> = top.iter().map(|a| a.display_text.as_str()).collect();
        assert_eq!(texts, vec!["Oslo", "Helsinki"]);
    }

    #[tokio::test]
    async fn test_lookup_failure_propagates_as_error() {
        let evaluator = AnswerEvaluator::new(Arc::new(MockAnswerRepository::failing_lookups()));

        let result = evaluator.evaluate("q1", "helsinki", 501, &HashSet::new()).await;

        assert!(result.is_err());
    }
}

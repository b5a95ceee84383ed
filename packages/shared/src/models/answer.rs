use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One scoreable entity in the answer corpus for a question.
/// `answer_key` is the normalized lookup form (trimmed, lowercased);
/// `display_text` is what gets shown back to players.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub id: String,
    pub question_id: String,
    pub answer_key: String,
    pub display_text: String,
    pub score: i32,
    pub is_valid_darts: bool,
    pub created_at: DateTime<Utc>,
}

impl Answer {
    pub fn new(question_id: &str, display_text: &str, score: i32, is_valid_darts: bool) -> Self {
        Answer {
            id: Uuid::new_v4().to_string(),
            question_id: question_id.to_string(),
            answer_key: display_text.trim().to_lowercase(),
            display_text: display_text.to_string(),
            score,
            is_valid_darts,
            created_at: Utc::now(),
        }
    }
}

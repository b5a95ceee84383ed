use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub category_id: String,
    pub question_text: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Question {
    pub fn new(category_id: &str, question_text: &str) -> Self {
        Question {
            id: Uuid::new_v4().to_string(),
            category_id: category_id.to_string(),
            question_text: question_text.to_string(),
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

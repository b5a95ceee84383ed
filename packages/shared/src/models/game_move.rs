use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MoveResult {
    Valid,
    Invalid,
    Bust,
    Checkout,
    Timeout,
}

/// One entry in a game's append-only move log. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMove {
    pub id: String,
    pub game_id: String,
    pub player_id: String,
    pub move_number: u32,
    pub submitted_answer: String,
    pub matched_answer_id: Option<String>,
    pub matched_display_text: Option<String>,
    pub result: MoveResult,
    pub score_value: Option<i32>,
    pub score_before: i32,
    pub score_after: i32,
    pub is_timeout: bool,
    pub created_at: DateTime<Utc>,
}

impl GameMove {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        game_id: &str,
        player_id: &str,
        move_number: u32,
        submitted_answer: &str,
        matched_answer_id: Option<String>,
        matched_display_text: Option<String>,
        result: MoveResult,
        score_value: Option<i32>,
        score_before: i32,
        score_after: i32,
    ) -> Self {
        GameMove {
            id: Uuid::new_v4().to_string(),
            game_id: game_id.to_string(),
            player_id: player_id.to_string(),
            move_number,
            submitted_answer: submitted_answer.to_string(),
            matched_answer_id,
            matched_display_text,
            result,
            score_value,
            score_before,
            score_after,
            is_timeout: result == MoveResult::Timeout,
            created_at: Utc::now(),
        }
    }

    /// A timeout is logged as a move with an empty answer and no score change.
    pub fn timeout(game_id: &str, player_id: &str, move_number: u32, score: i32) -> Self {
        GameMove::new(
            game_id,
            player_id,
            move_number,
            "",
            None,
            None,
            MoveResult::Timeout,
            None,
            score,
            score,
        )
    }

    /// Whether this move consumed an answer (Invalid moves never do).
    pub fn consumed_answer_id(&self) -> Option<&str> {
        match self.result {
            MoveResult::Invalid => None,
            _ => self.matched_answer_id.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_creation() {
        let game_move = GameMove::new(
            "game-1",
            "player1",
            1,
            "helsinki",
            Some("answer-1".to_string()),
            Some("Helsinki".to_string()),
            MoveResult::Valid,
            Some(35),
            501,
            466,
        );

        assert!(!game_move.id.is_empty());
        assert_eq!(game_move.game_id, "game-1");
        assert_eq!(game_move.move_number, 1);
        assert_eq!(game_move.score_before, 501);
        assert_eq!(game_move.score_after, 466);
        assert!(!game_move.is_timeout);
    }

    #[test]
    fn test_timeout_move_has_no_score_change() {
        let game_move = GameMove::timeout("game-1", "player1", 3, 420);

        assert_eq!(game_move.result, MoveResult::Timeout);
        assert!(game_move.is_timeout);
        assert!(game_move.submitted_answer.is_empty());
        assert_eq!(game_move.score_before, 420);
        assert_eq!(game_move.score_after, 420);
        assert!(game_move.matched_answer_id.is_none());
    }

    #[test]
    fn test_invalid_move_consumes_no_answer() {
        let game_move = GameMove::new(
            "game-1",
            "player1",
            1,
            "nonsense",
            None,
            None,
            MoveResult::Invalid,
            None,
            501,
            501,
        );

        assert!(game_move.consumed_answer_id().is_none());
    }

    #[test]
    fn test_bust_move_still_consumes_answer() {
        let game_move = GameMove::new(
            "game-1",
            "player1",
            2,
            "everest",
            Some("answer-7".to_string()),
            Some("Mount Everest".to_string()),
            MoveResult::Bust,
            Some(163),
            30,
            30,
        );

        assert_eq!(game_move.consumed_answer_id(), Some("answer-7"));
        assert_eq!(game_move.score_before, game_move.score_after);
    }

    #[test]
    fn test_move_serialization_round_trip() {
        let game_move = GameMove::new(
            "game-1",
            "player1",
            5,
            "oslo",
            Some("answer-2".to_string()),
            Some("Oslo".to_string()),
            MoveResult::Checkout,
            Some(36),
            36,
            0,
        );

        let serialized = serde_json::to_string(&game_move).unwrap();
        assert!(serialized.contains("Checkout"));

        let deserialized: GameMove = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized.id, game_move.id);
        assert_eq!(deserialized.result, MoveResult::Checkout);
        assert_eq!(deserialized.score_after, 0);
    }
}

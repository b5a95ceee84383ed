use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const STARTING_SCORE: i32 = 501;
pub const DEFAULT_TURN_SECONDS: u32 = 45;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    /// One player has checked out; the opponent gets exactly one more turn.
    AwaitingFinalTurn { tentative_winner: String },
    /// Winner is None only when a practice game is forfeited (no opponent).
    Completed { winner: Option<String> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub match_id: String,
    pub game_number: u32,
    pub question_id: String,
    pub player1_id: String,
    pub player2_id: Option<String>,
    pub status: GameStatus,
    pub player1_score: i32,
    pub player2_score: i32,
    pub current_turn_player_id: String,
    pub turn_count: u32,
    pub turn_timer_seconds: u32,
    pub player1_consecutive_timeouts: u32,
    pub player2_consecutive_timeouts: u32,
    pub created_at: DateTime<Utc>,
}

impl Game {
    pub fn new(
        match_id: &str,
        question_id: &str,
        game_number: u32,
        player1_id: &str,
        player2_id: Option<&str>,
    ) -> Self {
        Game {
            id: Uuid::new_v4().to_string(),
            match_id: match_id.to_string(),
            game_number,
            question_id: question_id.to_string(),
            player1_id: player1_id.to_string(),
            player2_id: player2_id.map(|p| p.to_string()),
            status: GameStatus::InProgress,
            player1_score: STARTING_SCORE,
            player2_score: STARTING_SCORE,
            current_turn_player_id: player1_id.to_string(),
            turn_count: 0,
            turn_timer_seconds: DEFAULT_TURN_SECONDS,
            player1_consecutive_timeouts: 0,
            player2_consecutive_timeouts: 0,
            created_at: Utc::now(),
        }
    }

    /// In progress covers both the normal phase and the close-finish window.
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self.status,
            GameStatus::InProgress | GameStatus::AwaitingFinalTurn { .. }
        )
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.status, GameStatus::Completed { .. })
    }

    /// Final winner for a completed game, tentative winner during the
    /// close-finish window, otherwise None.
    pub fn winner(&self) -> Option<&str> {
        match &self.status {
            GameStatus::InProgress => None,
            GameStatus::AwaitingFinalTurn { tentative_winner } => Some(tentative_winner.as_str()),
            GameStatus::Completed { winner } => winner.as_deref(),
        }
    }

    /// A practice game has a single player and no opponent.
    pub fn is_practice(&self) -> bool {
        self.player2_id.is_none()
    }

    pub fn is_participant(&self, player_id: &str) -> bool {
        self.player1_id == player_id || self.player2_id.as_deref() == Some(player_id)
    }

    pub fn opponent_of(&self, player_id: &str) -> Option<&str> {
        if self.player1_id == player_id {
            self.player2_id.as_deref()
        } else if self.player2_id.as_deref() == Some(player_id) {
            Some(self.player1_id.as_str())
        } else {
            None
        }
    }

    pub fn score_of(&self, player_id: &str) -> i32 {
        if self.player1_id == player_id {
            self.player1_score
        } else {
            self.player2_score
        }
    }

    pub fn set_score(&mut self, player_id: &str, score: i32) {
        if self.player1_id == player_id {
            self.player1_score = score;
        } else {
            self.player2_score = score;
        }
    }

    pub fn consecutive_timeouts_of(&self, player_id: &str) -> u32 {
        if self.player1_id == player_id {
            self.player1_consecutive_timeouts
        } else {
            self.player2_consecutive_timeouts
        }
    }

    pub fn set_consecutive_timeouts(&mut self, player_id: &str, count: u32) {
        if self.player1_id == player_id {
            self.player1_consecutive_timeouts = count;
        } else {
            self.player2_consecutive_timeouts = count;
        }
    }

    /// Hand the turn to the opponent. A practice game keeps the turn with the
    /// solo player.
    pub fn switch_turn(&mut self) {
        let current = self.current_turn_player_id.clone();
        if let Some(opponent) = self.opponent_of(&current).map(|p| p.to_string()) {
            self.current_turn_player_id = opponent;
        }
    }
}

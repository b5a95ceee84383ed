use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchType {
    Casual,
    Ranked,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MatchFormat {
    BestOf1,
    BestOf3,
    BestOf5,
}

impl MatchFormat {
    /// Games a player must win to take the match.
    pub fn games_to_win(&self) -> u32 {
        match self {
            MatchFormat::BestOf1 => 1,
            MatchFormat::BestOf3 => 2,
            MatchFormat::BestOf5 => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchStatus {
    Waiting,
    InProgress,
    Completed { winner: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub player1_id: String,
    pub player2_id: Option<String>,
    pub category_id: String,
    pub match_type: MatchType,
    pub format: MatchFormat,
    pub status: MatchStatus,
    pub player1_games_won: u32,
    pub player2_games_won: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Match {
    pub fn new(
        player1_id: &str,
        player2_id: Option<&str>,
        category_id: &str,
        match_type: MatchType,
        format: MatchFormat,
    ) -> Self {
        let status = if player2_id.is_some() {
            MatchStatus::InProgress
        } else {
            MatchStatus::Waiting
        };
        let now = Utc::now();

        Match {
            id: Uuid::new_v4().to_string(),
            player1_id: player1_id.to_string(),
            player2_id: player2_id.map(|p| p.to_string()),
            category_id: category_id.to_string(),
            match_type,
            format,
            status,
            player1_games_won: 0,
            player2_games_won: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// A practice match has no opponent but starts in progress immediately.
    pub fn new_practice(player1_id: &str, category_id: &str) -> Self {
        let mut practice_match = Match::new(
            player1_id,
            None,
            category_id,
            MatchType::Casual,
            MatchFormat::BestOf1,
        );
        practice_match.status = MatchStatus::InProgress;
        practice_match
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == MatchStatus::InProgress
    }

    pub fn is_participant(&self, player_id: &str) -> bool {
        self.player1_id == player_id || self.player2_id.as_deref() == Some(player_id)
    }

    pub fn winner(&self) -> Option<&str> {
        match &self.status {
            MatchStatus::Completed { winner } => Some(winner.as_str()),
            _ => None,
        }
    }

    pub fn games_won_by(&self, player_id: &str) -> u32 {
        if self.player1_id == player_id {
            self.player1_games_won
        } else if self.player2_id.as_deref() == Some(player_id) {
            self.player2_games_won
        } else {
            0
        }
    }
}

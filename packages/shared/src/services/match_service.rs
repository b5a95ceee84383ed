use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::models::game::Game;
use crate::models::matches::{Match, MatchFormat, MatchStatus, MatchType};
use crate::repositories::game_repository::GameRepository;
use crate::repositories::match_repository::MatchRepository;
use crate::services::errors::match_service_errors::MatchServiceError;
use crate::services::game_service::GameService;
use crate::services::question_service::QuestionService;

/// Sequences games within a match and tallies wins toward the best-of-N
/// threshold. Knows nothing about the internals of a game beyond its
/// completion and winner.
#[derive(Clone)]
pub struct MatchService {
    match_repository: Arc<dyn MatchRepository + Send + Sync>,
    game_repository: Arc<dyn GameRepository + Send + Sync>,
    game_service: GameService,
    question_service: QuestionService,
}

impl MatchService {
    pub fn new(
        match_repository: Arc<dyn MatchRepository + Send + Sync>,
        game_repository: Arc<dyn GameRepository + Send + Sync>,
        game_service: GameService,
        question_service: QuestionService,
    ) -> Self {
        MatchService {
            match_repository,
            game_repository,
            game_service,
            question_service,
        }
    }

    pub async fn create_match(
        &self,
        player1_id: &str,
        player2_id: Option<&str>,
        category_id: &str,
        match_type: MatchType,
        format: MatchFormat,
    ) -> Result<Match, MatchServiceError> {
        let game_match = Match::new(player1_id, player2_id, category_id, match_type, format);

        self.match_repository.create_match(&game_match).await?;
        info!(match_id = %game_match.id, status = ?game_match.status, "Match created");

        Ok(game_match)
    }

    pub async fn create_practice_match(
        &self,
        player1_id: &str,
        category_id: &str,
    ) -> Result<Match, MatchServiceError> {
        let game_match = Match::new_practice(player1_id, category_id);

        self.match_repository.create_match(&game_match).await?;
        info!(match_id = %game_match.id, "Practice match created");

        Ok(game_match)
    }

    pub async fn join_match(
        &self,
        match_id: &str,
        player2_id: &str,
    ) -> Result<Match, MatchServiceError> {
        let mut game_match = self
            .match_repository
            .get_match(match_id)
            .await?
            .ok_or(MatchServiceError::MatchNotFound)?;

        if game_match.status != MatchStatus::Waiting {
            return Err(MatchServiceError::InvalidState(
                "Match is not waiting for an opponent".to_string(),
            ));
        }

        game_match.player2_id = Some(player2_id.to_string());
        game_match.status = MatchStatus::InProgress;
        game_match.updated_at = Utc::now();

        self.match_repository.update_match(&game_match).await?;
        info!(match_id, player2_id, "Opponent joined match");

        Ok(game_match)
    }

    pub async fn start_next_game(&self, match_id: &str) -> Result<Game, MatchServiceError> {
        let game_match = self
            .match_repository
            .get_match(match_id)
            .await?
            .ok_or(MatchServiceError::MatchNotFound)?;

        if !game_match.is_in_progress() {
            return Err(MatchServiceError::InvalidState(
                "Match is not in progress".to_string(),
            ));
        }

        if self
            .game_repository
            .find_in_progress_by_match(match_id)
            .await?
            .is_some()
        {
            return Err(MatchServiceError::InvalidState(
                "A game is already in progress".to_string(),
            ));
        }

        let question = self
            .question_service
            .select_random_question(&game_match.category_id)
            .await?
            .ok_or_else(|| {
                MatchServiceError::InvalidState("No question available".to_string())
            })?;

        let game_number = self.game_repository.count_completed(match_id).await? + 1;

        let game = self
            .game_service
            .create_game(&game_match, &question.id, game_number)
            .await?;

        Ok(game)
    }

    /// Tally a finished game. A winnerless game (forfeited practice game)
    /// moves no counter.
    pub async fn on_game_completed(&self, game: &Game) -> Result<Match, MatchServiceError> {
        let mut game_match = self
            .match_repository
            .get_match(&game.match_id)
            .await?
            .ok_or(MatchServiceError::MatchNotFound)?;

        if let Some(winner) = game.winner() {
            if game_match.player1_id == winner {
                game_match.player1_games_won += 1;
            } else if game_match.player2_id.as_deref() == Some(winner) {
                game_match.player2_games_won += 1;
            }

            let games_to_win = game_match.format.games_to_win();

            if game_match.player1_games_won >= games_to_win {
                game_match.status = MatchStatus::Completed {
                    winner: game_match.player1_id.clone(),
                };
            } else if game_match.player2_games_won >= games_to_win {
                if let Some(player2_id) = game_match.player2_id.clone() {
                    game_match.status = MatchStatus::Completed { winner: player2_id };
                }
            }

            if let Some(match_winner) = game_match.winner() {
                info!(match_id = %game_match.id, winner = match_winner, "Match completed");
            }
        }

        game_match.updated_at = Utc::now();
        self.match_repository.update_match(&game_match).await?;

        Ok(game_match)
    }

    pub async fn get_match(&self, match_id: &str) -> Result<Option<Match>, MatchServiceError> {
        self.match_repository
            .get_match(match_id)
            .await
            .map_err(MatchServiceError::from)
    }

    pub async fn games_for_match(&self, match_id: &str) -> Result<Vec<Game>, MatchServiceError> {
        self.game_repository
            .find_by_match(match_id)
            .await
            .map_err(MatchServiceError::from)
    }

    pub async fn current_game(&self, match_id: &str) -> Result<Option<Game>, MatchServiceError> {
        self.game_repository
            .find_in_progress_by_match(match_id)
            .await
            .map_err(MatchServiceError::from)
    }

    pub async fn active_matches_for_player(
        &self,
        player_id: &str,
    ) -> Result<Vec<Match>, MatchServiceError> {
        self.match_repository
            .find_active_for_player(player_id)
            .await
            .map_err(MatchServiceError::from)
    }
}

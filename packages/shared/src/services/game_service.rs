use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::models::game::{Game, GameStatus, DEFAULT_TURN_SECONDS};
use crate::models::game_move::{GameMove, MoveResult};
use crate::models::matches::Match;
use crate::repositories::game_repository::GameRepository;
use crate::services::answer_evaluator::{AnswerEvaluator, AnswerOutcome};
use crate::services::errors::game_service_errors::GameServiceError;

/// The nth consecutive timeout by one player that forfeits the game.
pub const FORFEIT_TIMEOUT_COUNT: u32 = 4;

/// Result of a turn operation: the logged move, the game state it produced,
/// and an optional player-facing message ("Win!", rejection reason, ...).
#[derive(Debug, Clone)]
pub struct MoveOutcome {
    pub game_move: GameMove,
    pub game: Game,
    pub message: Option<String>,
}

/// Owns the lifecycle of individual games: move evaluation, turn switching,
/// the close-finish rule, and timeout escalation.
///
/// All transitions for one game are serialized behind a per-game async mutex,
/// so a timeout firing and a late-arriving move resolve by application order:
/// whichever is applied second fails the turn-ownership check.
#[derive(Clone)]
pub struct GameService {
    repository: Arc<dyn GameRepository + Send + Sync>,
    evaluator: AnswerEvaluator,
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl GameService {
    pub fn new(
        repository: Arc<dyn GameRepository + Send + Sync>,
        evaluator: AnswerEvaluator,
    ) -> Self {
        GameService {
            repository,
            evaluator,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    async fn lock_for(&self, game_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(game_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn release_lock(&self, game_id: &str) {
        self.locks.lock().await.remove(game_id);
    }

    pub async fn create_game(
        &self,
        game_match: &Match,
        question_id: &str,
        game_number: u32,
    ) -> Result<Game, GameServiceError> {
        let game = Game::new(
            &game_match.id,
            question_id,
            game_number,
            &game_match.player1_id,
            game_match.player2_id.as_deref(),
        );

        self.repository.create_game(&game).await?;
        info!(
            game_id = %game.id,
            match_id = %game.match_id,
            game_number,
            "Game created"
        );

        Ok(game)
    }

    pub async fn submit_move(
        &self,
        game_id: &str,
        player_id: &str,
        submitted_answer: &str,
    ) -> Result<MoveOutcome, GameServiceError> {
        let lock = self.lock_for(game_id).await;
        let _guard = lock.lock().await;

        let mut game = self
            .repository
            .get_game(game_id)
            .await?
            .ok_or(GameServiceError::GameNotFound)?;

        if !game.is_in_progress() {
            return Err(GameServiceError::InvalidState(
                "Game is not in progress".to_string(),
            ));
        }
        if game.current_turn_player_id != player_id {
            return Err(GameServiceError::InvalidState(
                "Not player's turn".to_string(),
            ));
        }

        let moves = self.repository.find_moves(game_id).await?;
        let used_answer_ids: HashSet<String> = moves
            .iter()
            .filter_map(|m| m.consumed_answer_id())
            .map(|id| id.to_string())
            .collect();
        let move_number = moves.len() as u32 + 1;
        let score_before = game.score_of(player_id);

        let outcome = self
            .evaluator
            .evaluate(&game.question_id, submitted_answer, score_before, &used_answer_ids)
            .await?;

        let (game_move, message) = match outcome {
            AnswerOutcome::Invalid { reason } => {
                // Wrong guess: log it and leave score, turn, and timers
                // untouched so the player can retry immediately.
                let game_move = GameMove::new(
                    game_id,
                    player_id,
                    move_number,
                    submitted_answer,
                    None,
                    None,
                    MoveResult::Invalid,
                    None,
                    score_before,
                    score_before,
                );
                (game_move, Some(reason))
            }
            AnswerOutcome::Matched {
                answer_id,
                display_text,
                score,
                is_bust: true,
                reason,
                ..
            } => {
                // Bust consumes the turn but not the score. Timeout counters
                // and the timer are untouched: a bust is a content failure,
                // not a time failure.
                self.complete_or_switch_turn(&mut game);
                game.turn_count += 1;

                let game_move = GameMove::new(
                    game_id,
                    player_id,
                    move_number,
                    submitted_answer,
                    Some(answer_id),
                    Some(display_text),
                    MoveResult::Bust,
                    Some(score),
                    score_before,
                    score_before,
                );
                (game_move, reason)
            }
            AnswerOutcome::Matched {
                answer_id,
                display_text,
                score,
                is_win: false,
                new_total,
                ..
            } => {
                game.set_score(player_id, new_total);
                game.set_consecutive_timeouts(player_id, 0);
                game.turn_timer_seconds = DEFAULT_TURN_SECONDS;
                self.complete_or_switch_turn(&mut game);
                game.turn_count += 1;

                let game_move = GameMove::new(
                    game_id,
                    player_id,
                    move_number,
                    submitted_answer,
                    Some(answer_id),
                    Some(display_text),
                    MoveResult::Valid,
                    Some(score),
                    score_before,
                    new_total,
                );
                (game_move, None)
            }
            AnswerOutcome::Matched {
                answer_id,
                display_text,
                score,
                new_total,
                reason,
                ..
            } => {
                game.set_score(player_id, new_total);
                game.set_consecutive_timeouts(player_id, 0);
                game.turn_timer_seconds = DEFAULT_TURN_SECONDS;
                game.turn_count += 1;
                self.resolve_checkout(&mut game, player_id, new_total);

                let game_move = GameMove::new(
                    game_id,
                    player_id,
                    move_number,
                    submitted_answer,
                    Some(answer_id),
                    Some(display_text),
                    MoveResult::Checkout,
                    Some(score),
                    score_before,
                    new_total,
                );
                (game_move, reason)
            }
        };

        self.repository.apply_move(&game, &game_move).await?;

        if game.is_completed() {
            info!(game_id, winner = ?game.winner(), "Game completed");
            self.release_lock(game_id).await;
        } else {
            debug!(game_id, player_id, result = ?game_move.result, "Move applied");
        }

        Ok(MoveOutcome {
            game_move,
            game,
            message,
        })
    }

    pub async fn handle_timeout(
        &self,
        game_id: &str,
        player_id: &str,
    ) -> Result<MoveOutcome, GameServiceError> {
        let lock = self.lock_for(game_id).await;
        let _guard = lock.lock().await;

        let mut game = self
            .repository
            .get_game(game_id)
            .await?
            .ok_or(GameServiceError::GameNotFound)?;

        if !game.is_in_progress() {
            return Err(GameServiceError::InvalidState(
                "Game is not in progress".to_string(),
            ));
        }
        // A timer firing twice for the same expired turn lands here: the
        // first firing switched the turn, so the second is rejected.
        if game.current_turn_player_id != player_id {
            return Err(GameServiceError::InvalidState(
                "Not player's turn".to_string(),
            ));
        }

        let move_number = self.repository.find_moves(game_id).await?.len() as u32 + 1;
        let score = game.score_of(player_id);
        let timeouts = game.consecutive_timeouts_of(player_id) + 1;
        game.set_consecutive_timeouts(player_id, timeouts);
        game.turn_count += 1;

        if let GameStatus::AwaitingFinalTurn { tentative_winner } = &game.status {
            // Timing out the final turn is failing to check out: the
            // tentative winner stands.
            let winner = tentative_winner.clone();
            game.status = GameStatus::Completed {
                winner: Some(winner),
            };
        } else if timeouts >= FORFEIT_TIMEOUT_COUNT {
            let winner = game.opponent_of(player_id).map(|p| p.to_string());
            warn!(game_id, player_id, "Game forfeited on consecutive timeouts");
            game.status = GameStatus::Completed { winner };
        } else {
            game.turn_timer_seconds = match timeouts {
                1 => 45,
                2 => 30,
                _ => 15,
            };
            game.switch_turn();
        }

        let game_move = GameMove::timeout(game_id, player_id, move_number, score);

        self.repository.apply_move(&game, &game_move).await?;

        if game.is_completed() {
            info!(game_id, winner = ?game.winner(), "Game completed");
            self.release_lock(game_id).await;
        }

        Ok(MoveOutcome {
            game_move,
            game,
            message: None,
        })
    }

    /// A turn-consuming non-checkout move: during the close-finish window it
    /// ends the game in the tentative winner's favor, otherwise the turn
    /// passes to the opponent.
    fn complete_or_switch_turn(&self, game: &mut Game) {
        if let GameStatus::AwaitingFinalTurn { tentative_winner } = &game.status {
            let winner = tentative_winner.clone();
            game.status = GameStatus::Completed {
                winner: Some(winner),
            };
        } else {
            game.switch_turn();
        }
    }

    /// Close finish rule. The first checkout opens a one-turn window for the
    /// opponent; a checkout inside the window wins only if strictly closer to
    /// zero (a tie keeps the tentative winner). Practice games have no
    /// opponent and complete immediately.
    fn resolve_checkout(&self, game: &mut Game, player_id: &str, new_total: i32) {
        if let GameStatus::AwaitingFinalTurn { tentative_winner } = &game.status {
            let tentative_winner = tentative_winner.clone();
            let tentative_total = game.score_of(&tentative_winner);

            let winner = if new_total.abs() < tentative_total.abs() {
                player_id.to_string()
            } else {
                tentative_winner
            };
            game.status = GameStatus::Completed {
                winner: Some(winner),
            };
        } else if game.is_practice() {
            game.status = GameStatus::Completed {
                winner: Some(player_id.to_string()),
            };
        } else {
            game.status = GameStatus::AwaitingFinalTurn {
                tentative_winner: player_id.to_string(),
            };
            // The opponent gets exactly one more turn.
            game.switch_turn();
        }
    }

    pub async fn get_game(&self, game_id: &str) -> Result<Option<Game>, GameServiceError> {
        self.repository
            .get_game(game_id)
            .await
            .map_err(GameServiceError::from)
    }

    pub async fn get_moves(&self, game_id: &str) -> Result<Vec<GameMove>, GameServiceError> {
        self.repository
            .find_moves(game_id)
            .await
            .map_err(GameServiceError::from)
    }

    pub async fn used_answer_ids(
        &self,
        game_id: &str,
    ) -> Result<HashSet<String>, GameServiceError> {
        self.repository
            .used_answer_ids(game_id)
            .await
            .map_err(GameServiceError::from)
    }
}

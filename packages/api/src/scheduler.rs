use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use shared::models::game::Game;
use shared::services::errors::game_service_errors::GameServiceError;
use shared::services::game_service::GameService;
use shared::services::match_service::MatchService;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Drives the turn clock: one task per armed game that sleeps for the game's
/// current timer and then records a timeout. A firing that lost the race with
/// a real move fails the turn-ownership check inside the game service and is
/// ignored, so double firings are harmless.
pub struct TurnScheduler {
    game_service: Arc<GameService>,
    match_service: Arc<MatchService>,
    timers: Arc<Mutex<HashMap<String, JoinHandle<()>>>>,
}

impl TurnScheduler {
    pub fn new(game_service: Arc<GameService>, match_service: Arc<MatchService>) -> Self {
        TurnScheduler {
            game_service,
            match_service,
            timers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// (Re)arm the clock for the game's current turn. Called after every
    /// turn-completing move; an Invalid move leaves the old clock running.
    pub async fn arm(&self, game: &Game) {
        let mut timers = self.timers.lock().await;

        if let Some(handle) = timers.remove(&game.id) {
            handle.abort();
        }
        if !game.is_in_progress() {
            return;
        }

        let game_service = self.game_service.clone();
        let match_service = self.match_service.clone();
        let registry = self.timers.clone();
        let game_id = game.id.clone();
        let mut player_id = game.current_turn_player_id.clone();
        let mut seconds = game.turn_timer_seconds as u64;

        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(seconds)).await;

                match game_service.handle_timeout(&game_id, &player_id).await {
                    Ok(outcome) => {
                        if outcome.game.is_completed() {
                            info!(%game_id, "Turn clock expired into game completion");

                            if let Err(e) = match_service.on_game_completed(&outcome.game).await {
                                error!(%game_id, error = %e, "Failed to record game completion");
                            }
                            registry.lock().await.remove(&game_id);
                            return;
                        }

                        player_id = outcome.game.current_turn_player_id.clone();
                        seconds = outcome.game.turn_timer_seconds as u64;
                    }
                    Err(GameServiceError::InvalidState(_)) => {
                        // A move was applied before the clock: stale firing
                        debug!(%game_id, "Stale turn clock firing ignored");
                        return;
                    }
                    Err(e) => {
                        error!(%game_id, error = %e, "Turn clock firing failed");
                        return;
                    }
                }
            }
        });

        timers.insert(game.id.clone(), handle);
    }

    pub async fn disarm(&self, game_id: &str) {
        if let Some(handle) = self.timers.lock().await.remove(game_id) {
            handle.abort();
        }
    }
}

use std::sync::Arc;

use shared::services::game_service::GameService;
use shared::services::match_service::MatchService;

use crate::scheduler::TurnScheduler;

#[derive(Clone)]
pub struct AppState {
    pub match_service: Arc<MatchService>,
    pub game_service: Arc<GameService>,
    pub scheduler: Arc<TurnScheduler>,
}

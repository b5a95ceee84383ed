pub mod game_service_errors;
pub mod match_service_errors;
pub mod question_service_errors;

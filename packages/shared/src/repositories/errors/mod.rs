pub mod answer_repository_errors;
pub mod game_repository_errors;
pub mod match_repository_errors;
pub mod question_repository_errors;

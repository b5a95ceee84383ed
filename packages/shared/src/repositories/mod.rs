pub mod answer_repository;
pub mod errors;
pub mod game_repository;
pub mod match_repository;
pub mod question_repository;

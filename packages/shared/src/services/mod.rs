pub mod answer_evaluator;
pub mod errors;
pub mod game_service;
pub mod match_service;
pub mod question_service;
pub mod scoring_service;

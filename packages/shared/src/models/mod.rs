pub mod answer;
pub mod game;
pub mod game_move;
pub mod matches;
pub mod question;

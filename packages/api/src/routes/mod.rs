pub mod games;
pub mod health;
pub mod matches;
pub mod practice;

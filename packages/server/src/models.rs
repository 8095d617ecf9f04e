pub mod action;
pub mod cli;
pub mod config;
pub mod error;
pub mod game;
pub mod player;
pub mod role;
pub mod snapshot;
pub mod tally;

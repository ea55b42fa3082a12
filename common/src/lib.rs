pub mod collectible;
pub mod config;
pub mod constants;
pub mod enemy;
pub mod error;
pub mod input;
pub mod maze;
pub mod persistence;
pub mod placement;
pub mod player;
pub mod progress;
pub mod session;
pub mod time;

//! Terminal chess - play the rules engine at the prompt.
//!
//! # Modules
//!
//! - [`config`] - `chess.toml` loading
//! - [`input`] - parsing of typed moves and commands
//! - [`player`] - human and random players
//! - [`display`] - board rendering
//! - [`save`] - JSON save files, autosave and replay on load
//! - [`session`] - the game loop

pub mod config;
pub mod display;
pub mod input;
pub mod player;
pub mod save;
pub mod session;

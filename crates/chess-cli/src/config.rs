//! Configuration file loading.
//!
//! Settings come from an optional `chess.toml`; a missing file means every
//! setting takes its default. Command line flags are applied on top by the
//! binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Who picks the moves for one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    /// Moves are typed at the prompt.
    #[default]
    Human,
    /// A uniformly random legal move.
    Random,
}

/// The `[players]` table.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PlayersConfig {
    #[serde(default)]
    pub white: PlayerKind,
    #[serde(default)]
    pub black: PlayerKind,
    /// Seed for random players. Unseeded players draw from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ChessConfig {
    /// Directory `:save` writes named games to. Defaults to `saves`.
    #[serde(default = "default_saves_dir")]
    pub saves_dir: PathBuf,
    /// File rewritten after every accepted move.
    #[serde(default = "default_autosave_path")]
    pub autosave_path: PathBuf,
    #[serde(default = "default_autosave")]
    pub autosave: bool,
    #[serde(default)]
    pub players: PlayersConfig,
}

fn default_saves_dir() -> PathBuf {
    PathBuf::from("saves")
}

fn default_autosave_path() -> PathBuf {
    PathBuf::from("autosave.json")
}

fn default_autosave() -> bool {
    true
}

impl Default for ChessConfig {
    fn default() -> Self {
        ChessConfig {
            saves_dir: default_saves_dir(),
            autosave_path: default_autosave_path(),
            autosave: default_autosave(),
            players: PlayersConfig::default(),
        }
    }
}

impl ChessConfig {
    /// Loads the configuration from `path`.
    ///
    /// Returns the defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default configuration file path, `chess.toml` in the
    /// current working directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from("chess.toml")
    }
}

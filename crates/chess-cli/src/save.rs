//! Saved games.
//!
//! A save is a JSON document holding the move history in long notation and
//! the side to move:
//!
//! ```json
//! { "moves": ["e2-e4", "e7-e5"], "side_to_move": "white" }
//! ```
//!
//! Loading replays the moves from the starting position; the stored side to
//! move is only used as a consistency check.

use chess_core::Color;
use chess_rules::{GameState, ReplayError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when saving or loading a game.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid save file: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Replay(#[from] ReplayError),

    #[error("Save says {stored} to move, but the moves leave {replayed} to move")]
    SideMismatch { stored: Color, replayed: Color },

    #[error("Invalid save name: {0:?}")]
    InvalidName(String),
}

/// The on-disk form of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveFile {
    pub moves: Vec<String>,
    pub side_to_move: Color,
}

impl SaveFile {
    /// Captures the history of `game`.
    pub fn from_game(game: &GameState) -> Self {
        SaveFile {
            moves: game.history().iter().map(|n| n.to_string()).collect(),
            side_to_move: game.side_to_move(),
        }
    }

    /// Reads a save file.
    pub fn read(path: &Path) -> Result<Self, SaveError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Writes the save file, creating parent directories as needed.
    pub fn write(&self, path: &Path) -> Result<(), SaveError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        debug!(path = %path.display(), moves = self.moves.len(), "game written");
        Ok(())
    }

    /// Replays the moves into a game.
    ///
    /// Fails without a partial game if any move is malformed or illegal, or
    /// if the replayed side to move disagrees with the stored one.
    pub fn into_game(self) -> Result<GameState, SaveError> {
        let game = GameState::replay(&self.moves)?;
        if game.side_to_move() != self.side_to_move {
            return Err(SaveError::SideMismatch {
                stored: self.side_to_move,
                replayed: game.side_to_move(),
            });
        }
        Ok(game)
    }
}

/// Loads a game from a save file.
pub fn load_game(path: &Path) -> Result<GameState, SaveError> {
    SaveFile::read(path)?.into_game()
}

/// Returns the path of the named save inside `dir`.
///
/// Names must be non-empty and cannot contain path separators.
pub fn save_path(dir: &Path, name: &str) -> Result<PathBuf, SaveError> {
    let name = name.trim();
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.chars().any(char::is_control);
    if !valid {
        return Err(SaveError::InvalidName(name.to_string()));
    }
    Ok(dir.join(format!("{name}.json")))
}

/// Lists the `.json` saves in `dir`, sorted by name. A missing directory
/// has no saves.
pub fn list_saves(dir: &Path) -> Result<Vec<PathBuf>, SaveError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut saves = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            saves.push(path);
        }
    }
    saves.sort();
    Ok(saves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Square;
    use chess_rules::ReplayFault;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn sample_game() -> GameState {
        let mut game = GameState::new();
        game.play(sq("e2"), sq("e4")).unwrap();
        game.play(sq("e7"), sq("e5")).unwrap();
        game.play(sq("g1"), sq("f3")).unwrap();
        game
    }

    #[test]
    fn json_layout() {
        let save = SaveFile::from_game(&sample_game());
        let value: serde_json::Value = serde_json::to_value(&save).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "moves": ["e2-e4", "e7-e5", "Ng1-f3"],
                "side_to_move": "black"
            })
        );
    }

    #[test]
    fn write_then_load_restores_the_game() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("game.json");
        let game = sample_game();

        SaveFile::from_game(&game).write(&path).unwrap();
        let loaded = load_game(&path).unwrap();

        assert_eq!(loaded.board(), game.board());
        assert_eq!(loaded.side_to_move(), Color::Black);
        assert_eq!(loaded.history(), game.history());
    }

    #[test]
    fn empty_history_loads_a_new_game() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        fs::write(&path, r#"{ "moves": [], "side_to_move": "white" }"#).unwrap();

        let loaded = load_game(&path).unwrap();
        assert_eq!(loaded.turn_index(), 0);
        assert_eq!(loaded.side_to_move(), Color::White);
    }

    #[test]
    fn malformed_move_aborts_the_load() {
        let save = SaveFile {
            moves: vec!["e2-e4".into(), "e7-e5".into(), "Qd1-d8".into()],
            side_to_move: Color::Black,
        };
        match save.into_game() {
            Err(SaveError::Replay(ReplayError::MalformedReplay { index, fault, .. })) => {
                assert_eq!(index, 2);
                assert!(matches!(fault, ReplayFault::Move(_)));
            }
            other => panic!("expected a malformed replay, got {other:?}"),
        }
    }

    #[test]
    fn side_to_move_must_agree() {
        let save = SaveFile {
            moves: vec!["e2-e4".into()],
            side_to_move: Color::White,
        };
        assert!(matches!(
            save.into_game(),
            Err(SaveError::SideMismatch {
                stored: Color::White,
                replayed: Color::Black
            })
        ));
    }

    #[test]
    fn invalid_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ moves: oops").unwrap();
        assert!(matches!(load_game(&path), Err(SaveError::Json(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_game(&dir.path().join("nope.json")),
            Err(SaveError::Io(_))
        ));
    }

    #[test]
    fn save_names() {
        let dir = Path::new("saves");
        assert_eq!(
            save_path(dir, " opening ").unwrap(),
            PathBuf::from("saves/opening.json")
        );
        for bad in ["", "   ", "..", "a/b", "a\\b"] {
            assert!(
                matches!(save_path(dir, bad), Err(SaveError::InvalidName(_))),
                "{bad:?} accepted"
            );
        }
    }

    #[test]
    fn listing_saves() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_saves(&dir.path().join("missing")).unwrap().is_empty());

        fs::write(dir.path().join("b.json"), "{}").unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let names: Vec<String> = list_saves(dir.path())
            .unwrap()
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }
}

//! The interactive game loop.
//!
//! A [`Session`] alternates between the two players until the game ends or
//! a human quits. Input and output are generic so the loop can be driven
//! from a script in tests.

use crate::config::ChessConfig;
use crate::display::render;
use crate::input::{check_selection, parse_command, Command};
use crate::player::Player;
use crate::save::{save_path, SaveFile};
use chess_core::{Color, Move, Notation, Promotion};
use chess_rules::{DefaultPromotion, FixedPromotion, GameState, GameStatus, MoveError};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};

pub const HELP: &str = "\
Use long notation like: e2-e4, Nb1-c3, Bf1-c4, Ra1-a3, Qd1-f3, Ke1-e2
Castle with 0-0 or 0-0-0 (or the King move, e.g. Ke1-g1)
Promote by adding the piece letter (e7-e8N), or answer the prompt
Type ':save [name]' to save the game, ':quit' to leave";

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Checkmate { winner: Color },
    Stalemate,
    /// A human quit, or input ran out.
    Quit,
}

/// Where the session writes its files.
#[derive(Debug, Clone)]
pub struct SaveSettings {
    pub saves_dir: PathBuf,
    /// Rewritten after every accepted move when set.
    pub autosave_path: Option<PathBuf>,
}

impl From<&ChessConfig> for SaveSettings {
    fn from(config: &ChessConfig) -> Self {
        SaveSettings {
            saves_dir: config.saves_dir.clone(),
            autosave_path: config.autosave.then(|| config.autosave_path.clone()),
        }
    }
}

/// Line-based console.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Console { input, output }
    }

    pub fn say(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.output, "{}", text.as_ref())
    }

    /// Prints `prompt` and reads one line. Returns `None` at end of input.
    pub fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Asks for a promotion piece. Anything unrecognised means a Queen.
    pub fn ask_promotion(&mut self) -> Promotion {
        let answer = self.ask("Promote pawn to (Q, R, B, N): ").ok().flatten();
        let mut chars = answer.as_deref().unwrap_or("").chars();
        match (chars.next().and_then(Promotion::from_char), chars.next()) {
            (Some(choice), None) => choice,
            _ => {
                if let Err(e) = self.say("Invalid choice. Defaulting to Queen.") {
                    warn!(error = %e, "could not print promotion notice");
                }
                Promotion::Queen
            }
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

/// A game being played at the terminal.
pub struct Session<R, W> {
    game: GameState,
    players: [Player; 2],
    saves: SaveSettings,
    console: Console<R, W>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(
        game: GameState,
        players: [Player; 2],
        saves: SaveSettings,
        console: Console<R, W>,
    ) -> Self {
        Session {
            game,
            players,
            saves,
            console,
        }
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn into_console(self) -> Console<R, W> {
        self.console
    }

    /// Plays until the game ends or a human quits.
    pub fn run(&mut self) -> io::Result<Outcome> {
        self.console.say(HELP)?;
        loop {
            self.console.say(render(self.game.board()))?;

            match self.game.status() {
                GameStatus::Checkmate { winner } => {
                    self.console.say(format!("Checkmate! {winner} wins."))?;
                    info!(%winner, turns = self.game.turn_index(), "checkmate");
                    return Ok(Outcome::Checkmate { winner });
                }
                GameStatus::Stalemate => {
                    self.console.say("Stalemate! It's a draw!")?;
                    info!(turns = self.game.turn_index(), "stalemate");
                    return Ok(Outcome::Stalemate);
                }
                GameStatus::InProgress => {}
            }
            if self.game.is_check() {
                self.console.say("Check!")?;
            }

            let side = self.game.side_to_move();
            let random_choice = match &mut self.players[side.index()] {
                Player::Random(player) => Some(player.pick(self.game.legal_moves())),
                Player::Human => None,
            };
            let played = match random_choice {
                Some(choice) => self.random_turn(side, choice)?,
                None => self.human_turn(side)?,
            };
            if !played {
                info!("session ended by player");
                return Ok(Outcome::Quit);
            }
            self.autosave();
        }
    }

    fn random_turn(&mut self, side: Color, choice: Option<Move>) -> io::Result<bool> {
        let Some(m) = choice else {
            return Ok(false);
        };
        self.game
            .play_with(m.from(), m.to(), &mut DefaultPromotion)
            .map_err(io::Error::other)?;
        if let Some(last) = self.game.history().last() {
            self.console.say(format!("{side} plays {last}"))?;
        }
        Ok(true)
    }

    /// Prompts until the human makes a legal move. Returns false if they quit.
    fn human_turn(&mut self, side: Color) -> io::Result<bool> {
        loop {
            let Some(line) = self.console.ask(&format!("{side}'s move: "))? else {
                return Ok(false);
            };
            let notation = match parse_command(&line) {
                Ok(Command::Play(notation)) => notation,
                Ok(Command::Save(name)) => {
                    self.save(name)?;
                    continue;
                }
                Ok(Command::Help) => {
                    self.console.say(HELP)?;
                    continue;
                }
                Ok(Command::Quit) => return Ok(false),
                Err(e) => {
                    self.console.say(e.to_string())?;
                    continue;
                }
            };

            if let Err(e) = check_selection(self.game.board(), side, &notation) {
                self.console.say(e.to_string())?;
                continue;
            }
            match self.play_notation(notation) {
                Ok(_) => return Ok(true),
                Err(e) => self.console.say(move_error_message(&e))?,
            }
        }
    }

    fn play_notation(&mut self, notation: Notation) -> Result<GameStatus, MoveError> {
        match notation {
            Notation::Castle(side) => self.game.castle(side),
            Notation::Move {
                from,
                to,
                promotion: Some(choice),
                ..
            } => self.game.play_with(from, to, &mut FixedPromotion(choice)),
            Notation::Move { from, to, .. } => {
                let console = &mut self.console;
                self.game
                    .play_with(from, to, &mut |_color: Color| console.ask_promotion())
            }
        }
    }

    fn save(&mut self, name: Option<String>) -> io::Result<()> {
        let name = match name {
            Some(name) => name,
            None => match self.console.ask("Enter save name: ")? {
                Some(name) => name,
                None => return Ok(()),
            },
        };
        let result =
            save_path(&self.saves.saves_dir, &name).and_then(|path| {
                SaveFile::from_game(&self.game).write(&path).map(|()| path)
            });
        match result {
            Ok(path) => {
                info!(path = %path.display(), "game saved");
                self.console.say(format!("Game saved as {}", path.display()))
            }
            Err(e) => {
                warn!(error = %e, "save failed");
                self.console.say(format!("Could not save: {e}"))
            }
        }
    }

    fn autosave(&self) {
        let Some(path) = &self.saves.autosave_path else {
            return;
        };
        if let Err(e) = SaveFile::from_game(&self.game).write(path) {
            warn!(path = %path.display(), error = %e, "autosave failed");
        }
    }
}

fn move_error_message(error: &MoveError) -> &'static str {
    match error {
        MoveError::InvalidSelection { .. } => "Invalid Selection!",
        MoveError::IllegalMove { .. } => "Illegal Move!",
        MoveError::LeavesKingInCheck { .. } => "Move leaves King in Check!",
        MoveError::GameOver => "Game over!",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::RandomPlayer;
    use crate::save::load_game;
    use std::io::Cursor;

    fn no_saves() -> SaveSettings {
        SaveSettings {
            saves_dir: PathBuf::from("unused"),
            autosave_path: None,
        }
    }

    fn run_script(script: &str, saves: SaveSettings) -> (Outcome, GameState, String) {
        let console = Console::new(Cursor::new(script.to_string()), Vec::new());
        let mut session = Session::new(
            GameState::new(),
            [Player::Human, Player::Human],
            saves,
            console,
        );
        let outcome = session.run().unwrap();
        let game = session.game().clone();
        let output = String::from_utf8(session.into_console().into_output()).unwrap();
        (outcome, game, output)
    }

    #[test]
    fn fools_mate_ends_the_session() {
        let (outcome, game, output) =
            run_script("f2-f3\ne7-e5\ng2-g4\nQd8-h4\n", no_saves());
        assert_eq!(outcome, Outcome::Checkmate { winner: Color::Black });
        assert_eq!(game.turn_index(), 4);
        assert!(output.contains("Checkmate! Black wins."));
    }

    #[test]
    fn end_of_input_quits() {
        let (outcome, game, _) = run_script("e2-e4\n", no_saves());
        assert_eq!(outcome, Outcome::Quit);
        assert_eq!(game.turn_index(), 1);
    }

    #[test]
    fn bad_input_is_reported_and_asked_again() {
        let script = "hello\nBe2-e4\ne7-e5\ne2-e5\ne2-e4\n:quit\n";
        let (outcome, game, output) = run_script(script, no_saves());
        assert_eq!(outcome, Outcome::Quit);
        assert!(output.contains("Invalid notation"));
        assert!(output.contains("No/Invalid Bishop selected at e2!"));
        assert!(output.contains("No/Invalid Pawn selected at e7!"));
        assert!(output.contains("Illegal Move!"));
        assert_eq!(game.turn_index(), 1);
        assert_eq!(game.side_to_move(), Color::Black);
    }

    #[test]
    fn check_is_announced() {
        let script = "e2-e4\nf7-f6\nQd1-h5\n";
        let (_, _, output) = run_script(script, no_saves());
        assert!(output.contains("Check!"));
    }

    #[test]
    fn save_command_writes_a_loadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let saves = SaveSettings {
            saves_dir: dir.path().join("saves"),
            autosave_path: Some(dir.path().join("autosave.json")),
        };
        let script = "e2-e4\ne7-e5\n:save\nopening\n:save bad/name\nquit\n";
        let (_, game, output) = run_script(script, saves);

        assert!(output.contains("Game saved as"));
        assert!(output.contains("Could not save"));
        let saved = load_game(&dir.path().join("saves").join("opening.json")).unwrap();
        assert_eq!(saved.board(), game.board());
        let autosaved = load_game(&dir.path().join("autosave.json")).unwrap();
        assert_eq!(autosaved.history(), game.history());
    }

    #[test]
    fn promotion_prompt_and_default() {
        let moves = "b2-b4\na7-a5\nb4-a5\nb7-b6\na5-b6\nc7-c6\nb6-b7\nc6-c5\n";
        let script = format!("{moves}b7-a8\nx\n:quit\n");
        let (_, game, output) = run_script(&script, no_saves());
        assert!(output.contains("Invalid choice. Defaulting to Queen."));
        assert_eq!(game.history().last().map(|n| n.to_string()).as_deref(), Some("b7-a8Q"));

        let script = format!("{moves}b7-a8\nn\n:quit\n");
        let (_, game, _) = run_script(&script, no_saves());
        assert_eq!(game.history().last().map(|n| n.to_string()).as_deref(), Some("b7-a8N"));

        let script = format!("{moves}b7-a8R\n:quit\n");
        let (_, game, output) = run_script(&script, no_saves());
        assert!(!output.contains("Promote pawn"));
        assert_eq!(game.history().last().map(|n| n.to_string()).as_deref(), Some("b7-a8R"));
    }

    #[test]
    fn random_player_moves_then_input_runs_out() {
        let console = Console::new(Cursor::new(String::new()), Vec::new());
        let players = [
            Player::Random(RandomPlayer::seeded(Some(11))),
            Player::Human,
        ];
        let mut session = Session::new(GameState::new(), players, no_saves(), console);
        let outcome = session.run().unwrap();
        assert_eq!(outcome, Outcome::Quit);
        assert_eq!(session.game().turn_index(), 1);
        let output = String::from_utf8(session.into_console().into_output()).unwrap();
        assert!(output.contains("White plays"));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn promotion_defaults_to_queen_when_output_fails() {
        let mut console = Console::new(Cursor::new("n\n".to_string()), BrokenPipe);
        assert_eq!(console.ask_promotion(), Promotion::Queen);
    }
}

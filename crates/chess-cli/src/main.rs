use anyhow::{bail, Context};
use chess_cli::config::{ChessConfig, PlayerKind};
use chess_cli::player::Player;
use chess_cli::save::{list_saves, load_game, SaveFile};
use chess_cli::session::{Console, Outcome, SaveSettings, Session};
use chess_rules::GameState;
use clap::{ArgAction, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "chess")]
#[command(about = "Two-player chess in the terminal")]
struct Cli {
    /// Configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new game
    New {
        /// Who plays White
        #[arg(long, value_enum)]
        white: Option<PlayerKind>,
        /// Who plays Black
        #[arg(long, value_enum)]
        black: Option<PlayerKind>,
        /// Seed for random players
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Continue a saved game
    Load {
        /// Save file; lists the saves directory when omitted
        file: Option<PathBuf>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

/// Lists the saves and reads a choice from stdin.
fn choose_save(config: &ChessConfig) -> anyhow::Result<PathBuf> {
    let saves = list_saves(&config.saves_dir)?;
    if saves.is_empty() {
        bail!("no saved games found in {}", config.saves_dir.display());
    }

    println!("Choose a save file:");
    for (index, path) in saves.iter().enumerate() {
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        println!("{}. {}", index + 1, name);
    }
    print!("> ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let selection: usize = line.trim().parse().context("invalid selection")?;
    selection
        .checked_sub(1)
        .and_then(|index| saves.get(index))
        .cloned()
        .context("invalid selection")
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.unwrap_or_else(ChessConfig::default_path);
    let config = ChessConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let mut players = config.players.clone();
    let game = match cli.command {
        Commands::New { white, black, seed } => {
            players.white = white.unwrap_or(players.white);
            players.black = black.unwrap_or(players.black);
            players.seed = seed.or(players.seed);
            tracing::info!(white = ?players.white, black = ?players.black, "new game");
            GameState::new()
        }
        Commands::Load { file } => {
            let path = match file {
                Some(path) => path,
                None => choose_save(&config)?,
            };
            let game = load_game(&path).with_context(|| format!("loading {}", path.display()))?;
            tracing::info!(path = %path.display(), turns = game.turn_index(), "game loaded");
            if config.autosave {
                SaveFile::from_game(&game).write(&config.autosave_path)?;
            }
            game
        }
    };

    // Each side draws from its own stream when seeded.
    let player_seed = |offset: u64| players.seed.map(|seed| seed.wrapping_add(offset));
    let sides = [
        Player::from_kind(players.white, player_seed(0)),
        Player::from_kind(players.black, player_seed(1)),
    ];

    let console = Console::new(io::stdin().lock(), io::stdout());
    let mut session = Session::new(game, sides, SaveSettings::from(&config), console);
    match session.run()? {
        Outcome::Checkmate { .. } | Outcome::Stalemate => println!("Game over!"),
        Outcome::Quit => {}
    }
    Ok(())
}

use std::path::PathBuf;

use arbiter::{load_setup, Mode, Session, SessionEnd};
use clap::Parser;
use token_chess::{Game, GameSetup};
use tracing::info;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
struct Args {
    /// Path to a JSON file with the starting token pools (and optionally a FEN)
    #[arg(short, long)]
    setup: Option<PathBuf>,

    /// Read JSON commands and write JSON responses, one per line
    #[arg(short, long, default_value_t = false)]
    json: bool,

    /// Do not redraw the board after every move in text mode
    #[arg(long, default_value_t = false)]
    no_board: bool,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "warn")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    let setup = match &args.setup {
        Some(path) => load_setup(path)?,
        None => GameSetup::default(),
    };
    let game = Game::from_setup(&setup)?;

    let mode = if args.json {
        Mode::Json
    } else {
        Mode::Text {
            show_board: !args.no_board,
        }
    };

    let mut session = Session::new(game, mode);
    let end = session.run(std::io::stdin().lock(), std::io::stdout().lock())?;
    match end {
        SessionEnd::Quit => info!("Session ended by request"),
        SessionEnd::EndOfInput => info!("Session ended at end of input"),
    }
    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    // Stdout carries the protocol, so logs go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

pub mod handlers;

use crate::presentation::cli::{Cli, Commands};
use clap::Parser;
use deckwatch_core::error::Result;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::NowPlaying { source, json } => handlers::handle_now_playing(source, json),
        Commands::Decks { source } => handlers::handle_decks(source),
        Commands::Dump { file } => handlers::handle_dump(file),
        Commands::Watch {
            source,
            interval,
            json,
        } => handlers::handle_watch(source, interval, json),
    }
}

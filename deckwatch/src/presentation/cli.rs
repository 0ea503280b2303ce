use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "deckwatch: what is on air right now", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Where to read from and how to pick the live deck.
#[derive(Args, Clone, Debug)]
pub struct SourceArgs {
    /// DJ library root (sessions are read from History/Sessions);
    /// falls back to $DECKWATCH_LIBRARY
    #[arg(long, conflicts_with = "url")]
    pub library: Option<PathBuf>,

    /// Live playlist page to scrape instead of a local library;
    /// falls back to $DECKWATCH_URL
    #[arg(long)]
    pub url: Option<String>,

    /// "newest" or "oldest"; anything else means newest
    #[arg(long, env = "DECKWATCH_MIXMODE")]
    pub mixmode: Option<String>,

    /// Deck index to ignore (repeatable)
    #[arg(long = "skip-deck")]
    pub skip_decks: Vec<u32>,

    /// Remote fetch timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// TOML file with defaults for the options above
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan once and print the live track
    NowPlaying {
        #[command(flatten)]
        source: SourceArgs,

        /// print the metadata map as JSON
        #[arg(long)]
        json: bool,
    },

    /// Scan once and print the current record of every deck
    Decks {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Decode a single session file and print its records
    Dump { file: PathBuf },

    /// Poll and print the live track whenever it changes
    Watch {
        #[command(flatten)]
        source: SourceArgs,

        /// seconds between scans
        #[arg(long, default_value_t = 5)]
        interval: u64,

        /// print the metadata map as JSON
        #[arg(long)]
        json: bool,
    },
}

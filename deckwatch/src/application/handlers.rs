use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use deckwatch_core::error::Result;
use deckwatch_core::{
    CancelToken, MixMode, Overrides, PlayingTrack, SourceConfig, TrackSource, dump_session,
    open_source,
};
use tracing::{debug, info};

use crate::presentation::cli::SourceArgs;

pub const LIBRARY_ENV: &str = "DECKWATCH_LIBRARY";
pub const URL_ENV: &str = "DECKWATCH_URL";

/// Library or URL exported in the environment; layered between the config
/// file and the flags.
pub fn env_overrides() -> Overrides {
    let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
    Overrides {
        library: var(LIBRARY_ENV).map(PathBuf::from),
        url: var(URL_ENV),
        ..Default::default()
    }
}

pub fn config_from_args(args: SourceArgs) -> Result<SourceConfig> {
    resolve_config(args, env_overrides())
}

/// Layer flags over `env` over the `--config` file.
pub fn resolve_config(args: SourceArgs, env: Overrides) -> Result<SourceConfig> {
    let base = match &args.config {
        Some(path) => SourceConfig::load(path)?,
        None => SourceConfig::default(),
    };
    let flags = Overrides {
        library: args.library,
        url: args.url,
        mixmode: args.mixmode.as_deref().map(MixMode::normalize),
        skip_decks: args.skip_decks,
        timeout_secs: args.timeout,
    };
    Ok(base.with_overrides(env).with_overrides(flags))
}

fn open(args: SourceArgs) -> Result<Box<dyn TrackSource>> {
    let cfg = config_from_args(args)?;
    debug!(?cfg, "resolved configuration");
    open_source(&cfg, CancelToken::new())
}

pub fn format_track(t: &PlayingTrack) -> String {
    match (&t.artist, &t.title) {
        (None, None) => "(no track)".to_string(),
        (Some(a), None) => a.clone(),
        (None, Some(t)) => t.clone(),
        (Some(a), Some(t)) => format!("{a} - {t}"),
    }
}

fn print_current(src: &dyn TrackSource, json: bool) -> Result<()> {
    if json {
        let meta = serde_json::Value::Object(src.playing_metadata());
        println!("{meta}");
    } else {
        println!("{}", format_track(&src.playing_track()));
    }
    Ok(())
}

pub fn handle_now_playing(source: SourceArgs, json: bool) -> Result<()> {
    let mut src = open(source)?;
    let stats = src.refresh();
    debug!(?stats, "scan");
    print_current(src.as_ref(), json)
}

pub fn handle_decks(source: SourceArgs) -> Result<()> {
    let mut src = open(source)?;
    let stats = src.refresh();
    let playing = src.playing_record().map(|r| r.deck);
    for r in src.deck_table().iter() {
        let marker = if Some(r.deck) == playing { '*' } else { ' ' };
        println!(
            "{marker} deck {:<2} start={:<12} {}",
            r.deck,
            r.start_time
                .map(|t| t.unix_timestamp().to_string())
                .unwrap_or_else(|| "-".into()),
            format_track(&r.playing_track())
        );
    }
    eprintln!(
        "files: {} seen, {} stale, {} decoded, {} truncated; {} records",
        stats.files_seen, stats.files_stale, stats.files_decoded, stats.files_truncated, stats.records
    );
    Ok(())
}

pub fn handle_dump(file: PathBuf) -> Result<()> {
    dump_session(&file)
}

pub fn handle_watch(source: SourceArgs, interval: u64, json: bool) -> Result<()> {
    let mut src = open(source)?;
    let mut last: Option<PlayingTrack> = None;
    info!(interval, "watching for track changes");
    loop {
        src.refresh();
        let now = src.playing_track();
        if last.as_ref() != Some(&now) {
            print_current(src.as_ref(), json)?;
            last = Some(now);
        }
        thread::sleep(Duration::from_secs(interval.max(1)));
    }
}

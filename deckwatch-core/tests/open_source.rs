mod common;

use common::{Adat, Session, library};
use deckwatch_core::{CancelToken, DeckError, SourceConfig, dump_session, open_source};

#[test]
fn neither_library_nor_url_is_a_config_error() {
    let err = open_source(&SourceConfig::default(), CancelToken::new())
        .err()
        .expect("must fail");
    assert!(matches!(err, DeckError::MissingSource));
}

#[test]
fn library_from_toml_drives_a_session_source() {
    let (tmp, dir) = library();
    Session::new()
        .entry(
            Adat::new()
                .deck(2)
                .artist("Chris McClenney")
                .title("Tuning Up")
                .start(1_700_000_000)
                .updated(1_700_000_000),
        )
        .entry(
            Adat::new()
                .deck(1)
                .artist("Skipped")
                .title("Deck One")
                .start(1_700_000_100)
                .updated(1_700_000_100),
        )
        .write(&dir, "live.session");

    let toml = format!(
        "library = {:?}\nmixmode = \"newest\"\nskip_decks = [1]\n",
        tmp.path().display().to_string()
    );
    let cfg = SourceConfig::from_toml_str(&toml).unwrap();
    let mut src = open_source(&cfg, CancelToken::new()).unwrap();
    src.refresh();
    let t = src.playing_track();
    assert_eq!(t.artist.as_deref(), Some("Chris McClenney"));
    assert_eq!(t.title.as_deref(), Some("Tuning Up"));
}

#[test]
fn cancelled_scan_keeps_previous_table() {
    let (tmp, dir) = library();
    Session::new()
        .entry(Adat::new().deck(1).title("Kept").start(1_700_000_000))
        .write(&dir, "a.session");

    let cancel = CancelToken::new();
    let cfg = SourceConfig {
        library: Some(tmp.path().to_path_buf()),
        ..Default::default()
    };
    let mut src = open_source(&cfg, cancel.clone()).unwrap();
    src.refresh();
    assert_eq!(src.playing_track().title.as_deref(), Some("Kept"));

    cancel.cancel();
    let stats = src.refresh();
    assert!(stats.cancelled);
    assert_eq!(src.playing_track().title.as_deref(), Some("Kept"));
}

#[test]
fn source_scans_again_after_a_cancel() {
    let (tmp, dir) = library();
    let cancel = CancelToken::new();
    let cfg = SourceConfig {
        library: Some(tmp.path().to_path_buf()),
        ..Default::default()
    };
    let mut src = open_source(&cfg, cancel.clone()).unwrap();

    cancel.cancel();
    assert!(src.refresh().cancelled);
    assert!(src.playing_track().is_empty());

    Session::new()
        .entry(
            Adat::new()
                .deck(2)
                .artist("Chris McClenney")
                .title("Tuning Up")
                .start(1_700_000_000),
        )
        .write(&dir, "a.session");
    let stats = src.refresh();
    assert!(!stats.cancelled);
    assert_eq!(stats.decks, 1);
    assert_eq!(src.playing_track().title.as_deref(), Some("Tuning Up"));
}

#[test]
fn dump_reads_a_single_file() {
    let (_tmp, dir) = library();
    let p = Session::new()
        .entry(Adat::new().row(1).deck(1).title("Dumped"))
        .write(&dir, "a.session");
    dump_session(&p).unwrap();

    let missing = dir.join("missing.session");
    assert!(dump_session(&missing).is_err());
}

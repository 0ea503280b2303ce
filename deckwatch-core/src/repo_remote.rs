use std::time::Duration;

use time::OffsetDateTime;

use crate::domain::{DeckRecord, PlayingTrack};
use crate::error::Result;
use crate::index::deck_table::DeckTable;
use crate::policy::MixMode;
use crate::remote::{build_client, fetch_playing};
use crate::repo::TrackSource;
use crate::resolve::now_playing;
use crate::stats::ScanStats;

/// Deck index of the single virtual deck a remote page maps to.
pub const REMOTE_DECK: u32 = 1;

/// Track source backed by a hosted live-playlist page.
pub struct RemoteSource {
    url: String,
    client: reqwest::blocking::Client,
    table: DeckTable,
}

impl RemoteSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            url: url.into(),
            client: build_client(timeout)?,
            table: DeckTable::default(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Install a scraped track as the virtual deck, started at `now`.
    pub fn set_track(&mut self, track: PlayingTrack, now: OffsetDateTime) {
        self.table = DeckTable::default();
        if track.is_empty() {
            return;
        }
        let record = DeckRecord {
            deck: REMOTE_DECK,
            artist: track.artist,
            title: track.title,
            start_time: Some(now),
            updated_at: Some(now),
            ..Default::default()
        };
        self.table.by_deck.insert(REMOTE_DECK, record);
    }
}

impl TrackSource for RemoteSource {
    fn refresh(&mut self) -> ScanStats {
        let track = fetch_playing(&self.client, &self.url);
        self.set_track(track, OffsetDateTime::now_utc());
        ScanStats {
            decks: self.table.len() as u64,
            ..Default::default()
        }
    }

    fn deck_table(&self) -> &DeckTable {
        &self.table
    }

    fn playing_record(&self) -> Option<&DeckRecord> {
        now_playing(&self.table, MixMode::Newest, OffsetDateTime::now_utc())
    }
}

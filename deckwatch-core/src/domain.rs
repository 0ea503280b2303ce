// deckwatch_core/src/domain.rs
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use serde::Serialize;
use serde_json::{Map, Value};
use time::OffsetDateTime;

/// One decoded `adat` snapshot of a deck.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DeckRecord {
    pub row: u32,
    pub deck: u32,
    pub pathstr: Option<String>,
    pub location: Option<String>,
    pub filename: Option<String>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub length: Option<String>,
    pub filesize: Option<String>,
    pub bitrate: Option<String>,
    pub frequency: Option<String>,
    pub bpm: Option<u32>,
    pub comments: Option<String>,
    pub lang: Option<String>,
    pub grouping: Option<String>,
    pub remixer: Option<String>,
    pub label: Option<String>,
    pub composer: Option<String>,
    pub date: Option<String>,
    pub key: Option<String>,
    #[serde(with = "time::serde::timestamp::option")]
    pub start_time: Option<OffsetDateTime>,
    #[serde(with = "time::serde::timestamp::option")]
    pub end_time: Option<OffsetDateTime>,
    #[serde(with = "time::serde::timestamp::option")]
    pub updated_at: Option<OffsetDateTime>,
    pub played: bool,
    pub added: bool,
    pub playtime: Option<Duration>,
    pub session_id: Option<u32>,
    /// Fields the format carries but nobody interprets, hex encoded by id.
    pub opaque: BTreeMap<u32, String>,
}

impl DeckRecord {
    /// A positive playtime marks the snapshot as already aired.
    pub fn has_aired(&self) -> bool {
        self.playtime.is_some_and(|d| !d.is_zero())
    }

    pub fn playing_track(&self) -> PlayingTrack {
        PlayingTrack {
            artist: self.artist.clone(),
            title: self.title.clone(),
        }
    }

    /// Metadata map handed to consumers; absent fields are omitted.
    pub fn metadata(&self) -> Metadata {
        let mut m = Map::new();
        let mut text = |k: &str, v: &Option<String>| {
            if let Some(v) = v {
                m.insert(k.to_string(), Value::String(v.clone()));
            }
        };
        text("album", &self.album);
        text("artist", &self.artist);
        text("bitrate", &self.bitrate);
        text("comments", &self.comments);
        text("composer", &self.composer);
        text("date", &self.date);
        text("filename", &self.filename);
        text("genre", &self.genre);
        text("key", &self.key);
        text("label", &self.label);
        text("lang", &self.lang);
        text("title", &self.title);
        if let Some(bpm) = self.bpm {
            m.insert("bpm".into(), Value::from(bpm));
        }
        m.insert("deck".into(), Value::from(self.deck));
        m
    }
}

pub type Metadata = Map<String, Value>;

/// `(artist, title)` pair; both absent means "no track".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PlayingTrack {
    pub artist: Option<String>,
    pub title: Option<String>,
}

impl PlayingTrack {
    pub fn is_empty(&self) -> bool {
        self.artist.is_none() && self.title.is_none()
    }
}

/// Decoded contents of one `.session` file.
#[derive(Clone, Debug, Default)]
pub struct SessionFile {
    pub path: PathBuf,
    pub mtime: Option<SystemTime>,
    pub version: Option<String>,
    pub records: Vec<DeckRecord>,
    /// Decoding stopped early (unknown tag or short payload).
    pub truncated: bool,
}

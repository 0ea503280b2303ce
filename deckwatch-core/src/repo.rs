// deckwatch_core/src/repo.rs
use crate::domain::{DeckRecord, Metadata, PlayingTrack};
use crate::index::deck_table::DeckTable;
use crate::stats::ScanStats;

/// What an orchestration layer polls.
///
/// `refresh` rebuilds all state from the underlying source and never fails:
/// problems are logged and leave the source with whatever could be read.
/// Taking `&mut self` keeps one instance from running two scans at once.
pub trait TrackSource: Send {
    fn refresh(&mut self) -> ScanStats;

    fn deck_table(&self) -> &DeckTable;

    fn playing_record(&self) -> Option<&DeckRecord>;

    fn playing_track(&self) -> PlayingTrack {
        self.playing_record()
            .map(DeckRecord::playing_track)
            .unwrap_or_default()
    }

    fn playing_metadata(&self) -> Metadata {
        self.playing_record()
            .map(DeckRecord::metadata)
            .unwrap_or_default()
    }
}

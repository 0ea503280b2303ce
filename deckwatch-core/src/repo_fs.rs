use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::domain::DeckRecord;
use crate::error::DeckError;
use crate::index::deck_table::DeckTable;
use crate::policy::MixMode;
use crate::repo::TrackSource;
use crate::resolve::now_playing;
use crate::scan::{ScanOptions, scan_sessions, sessions_dir};
use crate::stats::ScanStats;
use crate::util::retry::CancelToken;

/// Track source backed by the session history directory of a local library.
pub struct SessionDirSource {
    dir: PathBuf,
    mixmode: MixMode,
    skip: BTreeSet<u32>,
    opts: ScanOptions,
    cancel: CancelToken,
    table: DeckTable,
    playing: Option<u32>,
}

impl SessionDirSource {
    pub fn new(library: &Path, mixmode: MixMode, skip: BTreeSet<u32>) -> Self {
        Self::for_sessions_dir(sessions_dir(library), mixmode, skip)
    }

    pub fn for_sessions_dir(dir: PathBuf, mixmode: MixMode, skip: BTreeSet<u32>) -> Self {
        Self {
            dir,
            mixmode,
            skip,
            opts: ScanOptions::default(),
            cancel: CancelToken::new(),
            table: DeckTable::default(),
            playing: None,
        }
    }

    pub fn with_scan_options(mut self, opts: ScanOptions) -> Self {
        self.opts = opts;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn sessions_dir(&self) -> &Path {
        &self.dir
    }

    /// Scan as of `now`. A cancelled scan keeps the previous table and
    /// consumes the cancel.
    pub fn refresh_at(&mut self, now: SystemTime) -> ScanStats {
        let mut stats = ScanStats::default();
        let files = match scan_sessions(&self.dir, now, &self.opts, &self.cancel, &mut stats) {
            Ok(files) => files,
            Err(e) => {
                stats.cancelled = matches!(e, DeckError::Cancelled);
                if stats.cancelled {
                    self.cancel.reset();
                }
                warn!(dir = %self.dir.display(), error = %e, "session scan abandoned");
                return stats;
            }
        };
        self.table = DeckTable::build(&files, &self.skip);
        self.playing =
            now_playing(&self.table, self.mixmode, OffsetDateTime::from(now)).map(|r| r.deck);
        stats.decks = self.table.len() as u64;
        debug!(
            files = stats.files_decoded,
            stale = stats.files_stale,
            decks = stats.decks,
            playing = ?self.playing,
            "session scan complete"
        );
        stats
    }
}

impl TrackSource for SessionDirSource {
    fn refresh(&mut self) -> ScanStats {
        self.refresh_at(SystemTime::now())
    }

    fn deck_table(&self) -> &DeckTable {
        &self.table
    }

    fn playing_record(&self) -> Option<&DeckRecord> {
        self.playing.and_then(|d| self.table.get(d))
    }
}

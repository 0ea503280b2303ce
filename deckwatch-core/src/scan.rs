//! Session directory listing and staleness filtering.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::container::session::read_session;
use crate::domain::SessionFile;
use crate::error::{DeckError, Result};
use crate::stats::ScanStats;
use crate::util::retry::{CancelToken, RetryPolicy};

/// Files older than this (by mtime) are never opened.
pub const STALE_AFTER: Duration = Duration::from_secs(600);

pub const SESSION_EXT: &str = "session";

/// OS droppings that show up next to session files and are safe to delete.
const OS_METADATA: &[&str] = &[".DS_Store", "Thumbs.db", "desktop.ini"];

/// `<library>/History/Sessions`
pub fn sessions_dir(library: &Path) -> PathBuf {
    library.join("History").join("Sessions")
}

#[derive(Clone, Debug)]
pub struct ScanOptions {
    pub stale_after: Duration,
    pub retry: RetryPolicy,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            stale_after: STALE_AFTER,
            retry: RetryPolicy::default(),
        }
    }
}

fn remove_os_metadata(dir: &Path) {
    for name in OS_METADATA {
        let p = dir.join(name);
        if p.is_file() {
            match std::fs::remove_file(&p) {
                Ok(()) => debug!(path = %p.display(), "removed OS metadata file"),
                Err(e) => debug!(path = %p.display(), error = %e, "could not remove OS metadata file"),
            }
        }
    }
}

/// `*.session` files directly under `dir`, oldest mtime first.
pub fn list_sessions(dir: &Path) -> Vec<(PathBuf, SystemTime)> {
    let mut out: Vec<(PathBuf, SystemTime)> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|x| x == SESSION_EXT))
        .filter_map(|e| {
            let mtime = e.metadata().ok()?.modified().ok()?;
            Some((e.into_path(), mtime))
        })
        .collect();
    out.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    out
}

fn is_stale(mtime: SystemTime, now: SystemTime, window: Duration) -> bool {
    // mtimes in the future count as fresh
    now.duration_since(mtime).is_ok_and(|age| age > window)
}

/// Decode every fresh session file in `dir`, oldest first.
///
/// A missing or empty directory yields an empty list. Unreadable files are
/// logged and skipped; only cancellation aborts the scan.
pub fn scan_sessions(
    dir: &Path,
    now: SystemTime,
    opts: &ScanOptions,
    cancel: &CancelToken,
    stats: &mut ScanStats,
) -> Result<Vec<SessionFile>> {
    cancel.check()?;
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "session directory not present yet");
        return Ok(Vec::new());
    }
    remove_os_metadata(dir);

    let mut files = Vec::new();
    for (path, mtime) in list_sessions(dir) {
        cancel.check()?;
        stats.files_seen += 1;
        if is_stale(mtime, now, opts.stale_after) {
            stats.files_stale += 1;
            debug!(path = %path.display(), "skipping stale session file");
            continue;
        }
        match read_session(&path, &opts.retry, cancel) {
            Ok(sf) => {
                stats.files_decoded += 1;
                stats.records += sf.records.len() as u64;
                if sf.truncated {
                    stats.files_truncated += 1;
                }
                files.push(sf);
            }
            Err(DeckError::Cancelled) => return Err(DeckError::Cancelled),
            Err(e) => warn!(path = %path.display(), error = %e, "session file unreadable"),
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staleness_is_a_hard_cutoff() {
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(10_000);
        let w = STALE_AFTER;
        assert!(!is_stale(now - Duration::from_secs(600), now, w));
        assert!(is_stale(now - Duration::from_secs(601), now, w));
        assert!(!is_stale(now + Duration::from_secs(5), now, w));
    }

    #[test]
    fn missing_directory_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let mut stats = ScanStats::default();
        let files = scan_sessions(
            &dir.path().join("History/Sessions"),
            SystemTime::now(),
            &ScanOptions::default(),
            &CancelToken::new(),
            &mut stats,
        )
        .unwrap();
        assert!(files.is_empty());
        assert_eq!(stats.files_seen, 0);
    }

    #[test]
    fn listing_ignores_other_files_and_removes_os_metadata() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("1.session"), b"").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"").unwrap();
        std::fs::write(dir.path().join(".DS_Store"), b"").unwrap();
        let mut stats = ScanStats::default();
        let files = scan_sessions(
            dir.path(),
            SystemTime::now(),
            &ScanOptions::default(),
            &CancelToken::new(),
            &mut stats,
        )
        .unwrap();
        assert_eq!(files.len(), 1);
        assert!(!dir.path().join(".DS_Store").exists());
        assert!(dir.path().join("notes.txt").exists());
    }
}

use std::path::Path;

use tracing::{debug, warn};

use crate::container::fields::decode_record;
use crate::container::tlv::{HEADER_LEN, Tag, TlvCursor, decode_utf16be};
use crate::domain::{DeckRecord, SessionFile};
use crate::error::{DeckError, Result};
use crate::util::retry::{CancelToken, RetryPolicy, read_when_ready};

/// Which wrapper chunk was opened last. Only `oent` admits `adat` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Oent,
    Oren,
}

/// Decoded chunk stream of one file, plus the reason decoding stopped early.
#[derive(Debug, Default)]
pub struct DecodedSession {
    pub version: Option<String>,
    pub records: Vec<DeckRecord>,
    pub truncated_records: usize,
    pub stopped: Option<DeckError>,
}

pub fn decode_session(buf: &[u8]) -> DecodedSession {
    let mut out = DecodedSession::default();
    let mut c = TlvCursor::new(buf);
    let mut open: Option<Container> = None;

    while c.remaining() >= HEADER_LEN {
        match next_chunk(&mut c, open, &mut out) {
            Ok(next) => open = next,
            Err(e) => {
                out.stopped = Some(e);
                break;
            }
        }
    }
    if out.stopped.is_none() && !c.is_empty() {
        debug!(trailing = c.remaining(), "ignoring partial chunk header");
    }
    out
}

fn next_chunk(
    c: &mut TlvCursor<'_>,
    open: Option<Container>,
    out: &mut DecodedSession,
) -> Result<Option<Container>> {
    let offset = c.position();
    let h = c.read_header()?;
    match h.tag {
        Tag::OENT => Ok(Some(Container::Oent)),
        Tag::OREN => Ok(Some(Container::Oren)),
        Tag::ADAT => {
            let payload = c.take(h.len as usize)?;
            if open == Some(Container::Oent) {
                let decoded = decode_record(payload);
                if let Some(e) = decoded.stopped {
                    warn!(offset, error = %e, "adat record truncated");
                    out.truncated_records += 1;
                }
                out.records.push(decoded.record);
            } else {
                debug!(offset, container = ?open, "skipping adat outside oent");
            }
            Ok(open)
        }
        Tag::VRSN => {
            let payload = c.take(h.len as usize)?;
            out.version = Some(decode_utf16be(payload));
            Ok(open)
        }
        tag => Err(DeckError::UnknownChunk { tag, offset }),
    }
}

/// Read `path` once it becomes readable and decode it. Decode problems are
/// reported through `truncated`; only I/O and cancellation are errors.
pub fn read_session(path: &Path, retry: &RetryPolicy, cancel: &CancelToken) -> Result<SessionFile> {
    let buf = read_when_ready(path, retry, cancel)?;
    let mtime = std::fs::metadata(path).and_then(|m| m.modified()).ok();
    let decoded = decode_session(&buf);
    if let Some(e) = &decoded.stopped {
        warn!(path = %path.display(), error = %e, "session decode stopped early");
    }
    debug!(
        path = %path.display(),
        records = decoded.records.len(),
        version = decoded.version.as_deref().unwrap_or("-"),
        "decoded session"
    );
    Ok(SessionFile {
        path: path.to_path_buf(),
        mtime,
        version: decoded.version,
        truncated: decoded.stopped.is_some() || decoded.truncated_records > 0,
        records: decoded.records,
    })
}

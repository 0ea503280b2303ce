//! Field-id dispatch for `adat` payloads.
//!
//! Each field is a 4-byte big-endian id followed by a length-prefixed
//! value. The table below is the complete set of ids the decoder knows; an
//! id outside it ends the record.

use std::time::Duration;

use time::OffsetDateTime;

use crate::container::tlv::TlvCursor;
use crate::domain::DeckRecord;
use crate::error::{DeckError, Result};

#[derive(Clone, Copy)]
pub enum Decode {
    Text(fn(&mut DeckRecord, String)),
    Uint(fn(&mut DeckRecord, u32)),
    Flag(fn(&mut DeckRecord, bool)),
    Stamp(fn(&mut DeckRecord, OffsetDateTime)),
    /// Opaque bytes kept as lowercase hex under their field id.
    Hex,
}

impl Decode {
    pub fn kind(&self) -> &'static str {
        match self {
            Decode::Text(_) => "string",
            Decode::Uint(_) => "uint",
            Decode::Flag(_) => "bool",
            Decode::Stamp(_) => "timestamp",
            Decode::Hex => "hex",
        }
    }
}

pub struct FieldSpec {
    pub id: u32,
    pub name: &'static str,
    pub decode: Decode,
}

const fn field(id: u32, name: &'static str, decode: Decode) -> FieldSpec {
    FieldSpec { id, name, decode }
}

/// Sorted by id.
pub static FIELDS: &[FieldSpec] = &[
    field(0x01, "row", Decode::Uint(|r, v| r.row = v)),
    field(0x02, "pathstr", Decode::Text(|r, v| r.pathstr = Some(v))),
    field(0x03, "location", Decode::Text(|r, v| r.location = Some(v))),
    field(0x04, "filename", Decode::Text(|r, v| r.filename = Some(v))),
    field(0x06, "title", Decode::Text(|r, v| r.title = Some(v))),
    field(0x07, "artist", Decode::Text(|r, v| r.artist = Some(v))),
    field(0x08, "album", Decode::Text(|r, v| r.album = Some(v))),
    field(0x09, "genre", Decode::Text(|r, v| r.genre = Some(v))),
    field(0x0a, "length", Decode::Text(|r, v| r.length = Some(v))),
    field(0x0b, "filesize", Decode::Text(|r, v| r.filesize = Some(v))),
    field(0x0d, "bitrate", Decode::Text(|r, v| r.bitrate = Some(v))),
    field(0x0e, "frequency", Decode::Text(|r, v| r.frequency = Some(v))),
    field(0x0f, "bpm", Decode::Uint(|r, v| r.bpm = Some(v))),
    field(0x10, "field16", Decode::Hex),
    field(0x11, "comments", Decode::Text(|r, v| r.comments = Some(v))),
    field(0x12, "lang", Decode::Text(|r, v| r.lang = Some(v))),
    field(0x13, "grouping", Decode::Text(|r, v| r.grouping = Some(v))),
    field(0x14, "remixer", Decode::Text(|r, v| r.remixer = Some(v))),
    field(0x15, "label", Decode::Text(|r, v| r.label = Some(v))),
    field(0x16, "composer", Decode::Text(|r, v| r.composer = Some(v))),
    field(0x17, "date", Decode::Text(|r, v| r.date = Some(v))),
    field(0x1c, "starttime", Decode::Stamp(|r, v| r.start_time = Some(v))),
    field(0x1d, "endtime", Decode::Stamp(|r, v| r.end_time = Some(v))),
    field(0x1f, "deck", Decode::Uint(|r, v| r.deck = v)),
    field(0x27, "field39", Decode::Hex),
    field(
        0x2d,
        "playtime",
        Decode::Uint(|r, v| r.playtime = Some(Duration::from_secs(v as u64))),
    ),
    field(0x30, "sessionid", Decode::Uint(|r, v| r.session_id = Some(v))),
    field(0x31, "played", Decode::Flag(|r, v| r.played = v)),
    field(0x32, "key", Decode::Text(|r, v| r.key = Some(v))),
    field(0x33, "added", Decode::Flag(|r, v| r.added = v)),
    field(0x34, "updatedat", Decode::Stamp(|r, v| r.updated_at = Some(v))),
    field(0x3f, "field63", Decode::Hex),
    field(0x44, "field68", Decode::Hex),
    field(0x45, "field69", Decode::Hex),
    field(0x48, "field72", Decode::Hex),
];

pub fn lookup(id: u32) -> Option<&'static FieldSpec> {
    FIELDS
        .binary_search_by_key(&id, |f| f.id)
        .ok()
        .map(|i| &FIELDS[i])
}

/// Result of decoding one `adat` payload. `stopped` holds the reason when
/// decoding ended before the payload did; `record` keeps what was read.
#[derive(Debug)]
pub struct DecodedRecord {
    pub record: DeckRecord,
    pub stopped: Option<DeckError>,
}

pub fn decode_record(payload: &[u8]) -> DecodedRecord {
    let mut record = DeckRecord::default();
    let mut c = TlvCursor::new(payload);
    let stopped = decode_fields(&mut c, &mut record).err();
    if record.filename.is_none() {
        record.filename = record.pathstr.clone();
    }
    DecodedRecord { record, stopped }
}

fn decode_fields(c: &mut TlvCursor<'_>, record: &mut DeckRecord) -> Result<()> {
    while !c.is_empty() {
        let offset = c.position();
        let id = c.read_u32()?;
        let spec = lookup(id).ok_or(DeckError::UnknownField { id, offset })?;
        apply(spec, c, record)?;
    }
    Ok(())
}

fn apply(spec: &FieldSpec, c: &mut TlvCursor<'_>, record: &mut DeckRecord) -> Result<()> {
    match spec.decode {
        Decode::Text(set) => {
            let s = c.read_prefixed_string()?;
            if !s.is_empty() {
                set(record, s);
            }
        }
        Decode::Uint(set) => set(record, c.read_prefixed_uint()?),
        Decode::Flag(set) => {
            let offset = c.position();
            let len = c.read_u32()?;
            if len != 1 {
                return Err(DeckError::Format(format!(
                    "{} expects 1 byte, declared {len} at offset {offset}",
                    spec.name
                )));
            }
            set(record, c.read_bool()?);
        }
        Decode::Stamp(set) => set(record, c.read_timestamp()?),
        Decode::Hex => {
            let raw = c.read_prefixed_bytes()?;
            record.opaque.insert(spec.id, hex::encode(raw));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(id: u32, s: &str) -> Vec<u8> {
        let units: Vec<u8> = s.encode_utf16().flat_map(|u| u.to_be_bytes()).collect();
        let mut out = id.to_be_bytes().to_vec();
        out.extend_from_slice(&(units.len() as u32).to_be_bytes());
        out.extend_from_slice(&units);
        out
    }

    fn uint(id: u32, v: u32) -> Vec<u8> {
        let mut out = id.to_be_bytes().to_vec();
        out.extend_from_slice(&1u32.to_be_bytes());
        out.extend_from_slice(&v.to_be_bytes());
        out
    }

    #[test]
    fn table_is_sorted_and_unique() {
        assert!(FIELDS.windows(2).all(|w| w[0].id < w[1].id));
        assert!(FIELDS.len() >= 30);
    }

    #[test]
    fn decodes_known_fields() {
        let mut p = uint(0x01, 3);
        p.extend(uint(0x1f, 2));
        p.extend(text(0x07, "Chris McClenney"));
        p.extend(text(0x06, "Tuning Up"));
        p.extend(uint(0x0f, 124));
        p.extend(uint(0x1c, 1_700_000_000));
        p.extend(0x31u32.to_be_bytes());
        p.extend(1u32.to_be_bytes());
        p.push(1);
        p.extend(0x10u32.to_be_bytes());
        p.extend(2u32.to_be_bytes());
        p.extend([0xab, 0xcd]);

        let out = decode_record(&p);
        assert!(out.stopped.is_none());
        let r = out.record;
        assert_eq!(r.row, 3);
        assert_eq!(r.deck, 2);
        assert_eq!(r.artist.as_deref(), Some("Chris McClenney"));
        assert_eq!(r.title.as_deref(), Some("Tuning Up"));
        assert_eq!(r.bpm, Some(124));
        assert_eq!(r.start_time.map(|t| t.unix_timestamp()), Some(1_700_000_000));
        assert!(r.played);
        assert_eq!(r.opaque.get(&0x10).map(String::as_str), Some("abcd"));
    }

    #[test]
    fn integer_prefix_is_not_a_width() {
        let mut p = uint(0x1f, 2);
        p.extend(uint(0x0f, 124));
        // some writers put 4 in the count slot
        p.extend(0x2du32.to_be_bytes());
        p.extend(4u32.to_be_bytes());
        p.extend(30u32.to_be_bytes());

        let out = decode_record(&p);
        assert!(out.stopped.is_none());
        assert_eq!(out.record.deck, 2);
        assert_eq!(out.record.bpm, Some(124));
        assert_eq!(out.record.playtime, Some(Duration::from_secs(30)));
    }

    #[test]
    fn unknown_field_keeps_partial_record() {
        let mut p = uint(0x1f, 1);
        p.extend(text(0x06, "Kept"));
        p.extend(0x99u32.to_be_bytes());
        p.extend(text(0x07, "Lost"));

        let out = decode_record(&p);
        assert!(matches!(
            out.stopped,
            Some(DeckError::UnknownField { id: 0x99, .. })
        ));
        assert_eq!(out.record.deck, 1);
        assert_eq!(out.record.title.as_deref(), Some("Kept"));
        assert_eq!(out.record.artist, None);
    }

    #[test]
    fn pathstr_fills_missing_filename() {
        let p = text(0x02, "/music/a.mp3");
        let r = decode_record(&p).record;
        assert_eq!(r.filename.as_deref(), Some("/music/a.mp3"));

        let mut p = text(0x02, "/music/a.mp3");
        p.extend(text(0x04, "a.mp3"));
        let r = decode_record(&p).record;
        assert_eq!(r.filename.as_deref(), Some("a.mp3"));
    }

    #[test]
    fn playtime_marks_record_aired() {
        let r = decode_record(&uint(0x2d, 95)).record;
        assert!(r.has_aired());
        let r = decode_record(&uint(0x2d, 0)).record;
        assert!(!r.has_aired());
    }
}

use std::fmt;

use time::OffsetDateTime;

use crate::error::{DeckError, Result};

pub const HEADER_LEN: usize = 8;

/// Four ASCII bytes naming a chunk (`oent`, `adat`, ...).
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Tag(pub [u8; 4]);

impl Tag {
    pub const OENT: Tag = Tag(*b"oent");
    pub const OREN: Tag = Tag(*b"oren");
    pub const ADAT: Tag = Tag(*b"adat");
    pub const VRSN: Tag = Tag(*b"vrsn");
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{b:02x}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({self})")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub tag: Tag,
    pub len: u32,
}

/// Forward-only big-endian reader over a borrowed buffer.
///
/// Every read is bounds checked and fails with [`DeckError::Truncated`]
/// instead of panicking; the cursor does not move on a failed read.
#[derive(Debug, Clone)]
pub struct TlvCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> TlvCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Borrow the next `n` bytes and advance past them.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(DeckError::Truncated {
                offset: self.pos,
                need: n,
                have: self.remaining(),
            });
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_header(&mut self) -> Result<ChunkHeader> {
        let tag = Tag(self.take_array::<4>()?);
        let len = self.read_u32()?;
        Ok(ChunkHeader { tag, len })
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.take_array::<4>()?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.take_array::<8>()?))
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.take(1)?[0] != 0)
    }

    /// Big-endian u32 behind a redundant 4-byte prefix.
    ///
    /// The prefix is a count that the producer always writes as 1; it is
    /// skipped without being checked.
    pub fn read_prefixed_uint(&mut self) -> Result<u32> {
        let start = self.pos;
        self.read_u32()?;
        self.read_u32().inspect_err(|_| self.pos = start)
    }

    pub fn read_prefixed_bytes(&mut self) -> Result<&'a [u8]> {
        let start = self.pos;
        let len = self.read_u32()? as usize;
        self.take(len).inspect_err(|_| self.pos = start)
    }

    pub fn read_prefixed_string(&mut self) -> Result<String> {
        let bytes = self.read_prefixed_bytes()?;
        Ok(decode_utf16be(bytes))
    }

    /// Length-prefixed Unix timestamp (seconds).
    pub fn read_timestamp(&mut self) -> Result<OffsetDateTime> {
        let start = self.pos;
        let secs = self.read_prefixed_uint()?;
        OffsetDateTime::from_unix_timestamp(i64::from(secs)).map_err(|_| {
            self.pos = start;
            DeckError::Format(format!("timestamp {secs} out of range at offset {start}"))
        })
    }
}

/// Decode UTF-16BE text, dropping the trailing NUL terminator.
///
/// Malformed input (odd length, unpaired surrogates) falls back to the raw
/// bytes with every NUL removed, decoded lossily.
pub fn decode_utf16be(bytes: &[u8]) -> String {
    let strict = if bytes.len() % 2 == 0 {
        let units = bytes
            .chunks_exact(2)
            .map(|p| u16::from_be_bytes([p[0], p[1]]));
        char::decode_utf16(units).collect::<std::result::Result<String, _>>().ok()
    } else {
        None
    };
    match strict {
        Some(s) => s.trim_end_matches('\0').to_string(),
        None => {
            let stripped: Vec<u8> = bytes.iter().copied().filter(|&b| b != 0).collect();
            String::from_utf8_lossy(&stripped).into_owned()
        }
    }
}

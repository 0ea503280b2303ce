#![allow(dead_code)]

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Builds `adat` payloads field by field.
#[derive(Default, Clone)]
pub struct Adat(Vec<u8>);

impl Adat {
    pub fn new() -> Self {
        Self::default()
    }

    fn id(mut self, id: u32) -> Self {
        self.0.extend(id.to_be_bytes());
        self
    }

    pub fn text(self, id: u32, s: &str) -> Self {
        let units: Vec<u8> = s.encode_utf16().flat_map(|u| u.to_be_bytes()).collect();
        let mut me = self.id(id);
        me.0.extend((units.len() as u32 + 2).to_be_bytes());
        me.0.extend(units);
        me.0.extend([0, 0]);
        me
    }

    pub fn uint(self, id: u32, v: u32) -> Self {
        let mut me = self.id(id);
        me.0.extend(1u32.to_be_bytes());
        me.0.extend(v.to_be_bytes());
        me
    }

    pub fn flag(self, id: u32, v: bool) -> Self {
        let mut me = self.id(id);
        me.0.extend(1u32.to_be_bytes());
        me.0.push(v as u8);
        me
    }

    pub fn row(self, row: u32) -> Self {
        self.uint(0x01, row)
    }
    pub fn deck(self, deck: u32) -> Self {
        self.uint(0x1f, deck)
    }
    pub fn artist(self, s: &str) -> Self {
        self.text(0x07, s)
    }
    pub fn title(self, s: &str) -> Self {
        self.text(0x06, s)
    }
    pub fn pathstr(self, s: &str) -> Self {
        self.text(0x02, s)
    }
    pub fn start(self, secs: u32) -> Self {
        self.uint(0x1c, secs)
    }
    pub fn updated(self, secs: u32) -> Self {
        self.uint(0x34, secs)
    }
    pub fn playtime(self, secs: u32) -> Self {
        self.uint(0x2d, secs)
    }
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.0.extend_from_slice(bytes);
        self
    }
}

/// Builds a whole session file chunk stream.
#[derive(Default)]
pub struct Session(Vec<u8>);

impl Session {
    pub fn new() -> Self {
        Self::default().chunk(b"vrsn", &utf16("1.0/Serato Scratch LIVE Review"))
    }

    pub fn chunk(mut self, tag: &[u8; 4], payload: &[u8]) -> Self {
        self.0.extend_from_slice(tag);
        self.0.extend((payload.len() as u32).to_be_bytes());
        self.0.extend_from_slice(payload);
        self
    }

    fn wrapped(mut self, container: &[u8; 4], adat: &Adat) -> Self {
        let inner_len = 8 + adat.0.len() as u32;
        self.0.extend_from_slice(container);
        self.0.extend(inner_len.to_be_bytes());
        self.chunk(b"adat", &adat.0)
    }

    pub fn entry(self, adat: Adat) -> Self {
        self.wrapped(b"oent", &adat)
    }

    pub fn removed(self, adat: Adat) -> Self {
        self.wrapped(b"oren", &adat)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn write(&self, dir: &Path, name: &str) -> PathBuf {
        let p = dir.join(name);
        std::fs::write(&p, &self.0).unwrap();
        p
    }
}

pub fn utf16(s: &str) -> Vec<u8> {
    s.encode_utf16().flat_map(|u| u.to_be_bytes()).collect()
}

/// Backdate a file's mtime by `age`.
pub fn age(path: &Path, age: Duration) {
    let f = File::options().write(true).open(path).unwrap();
    f.set_modified(SystemTime::now() - age).unwrap();
}

/// `<tmp>/History/Sessions`, created.
pub fn library() -> (tempfile::TempDir, PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("History").join("Sessions");
    std::fs::create_dir_all(&dir).unwrap();
    (tmp, dir)
}

use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub files_seen: u64,
    pub files_stale: u64,
    pub files_decoded: u64,
    pub files_truncated: u64,
    pub records: u64,
    pub decks: u64,
    pub cancelled: bool,
}

#![forbid(unsafe_code)]

pub mod config;
pub mod domain;
pub mod error;
pub mod policy;
pub mod stats;

pub mod util {
    pub mod retry;
}

pub mod container {
    pub mod fields;
    pub mod session;
    pub mod tlv;
}

pub mod index {
    pub mod deck_table;
}

pub mod list;
pub mod remote;
pub mod repo;
pub mod repo_factory;
pub mod repo_fs;
pub mod repo_remote;
pub mod resolve;
pub mod scan;

// Re-exports: stable API surface
pub use config::{Overrides, Source, SourceConfig};
pub use domain::{DeckRecord, Metadata, PlayingTrack, SessionFile};
pub use error::{DeckError, Result};
pub use index::deck_table::DeckTable;
pub use list::dump_session;
pub use policy::MixMode;
pub use repo::TrackSource;
pub use repo_factory::open_source;
pub use repo_fs::SessionDirSource;
pub use repo_remote::RemoteSource;
pub use resolve::now_playing;
pub use stats::ScanStats;
pub use util::retry::{CancelToken, RetryPolicy};

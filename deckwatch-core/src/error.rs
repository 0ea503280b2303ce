use thiserror::Error;

use crate::container::tlv::Tag;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("truncated input at offset {offset}: need {need} bytes, have {have}")]
    Truncated {
        offset: usize,
        need: usize,
        have: usize,
    },

    #[error("unknown chunk tag {tag} at offset {offset}")]
    UnknownChunk { tag: Tag, offset: usize },

    #[error("unknown field id {id:#06x} at offset {offset}")]
    UnknownField { id: u32, offset: usize },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("no session source configured: set a library path or a remote URL")]
    MissingSource,

    #[error("scan cancelled")]
    Cancelled,
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, DeckError>;

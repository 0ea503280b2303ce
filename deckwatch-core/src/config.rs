//! Source configuration: TOML file values overridden by flags/environment.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{DeckError, Result};
use crate::policy::MixMode;
use crate::remote::DEFAULT_TIMEOUT;
use crate::util::retry::RetryPolicy;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    /// DJ software library root; sessions live under `History/Sessions`.
    pub library: Option<PathBuf>,
    /// Live playlist page, used instead of `library`.
    pub url: Option<String>,
    pub mixmode: MixMode,
    pub skip_decks: BTreeSet<u32>,
    pub timeout_secs: Option<u64>,
    pub retry: RetryPolicy,
}

/// Where tracks come from. Exactly one per source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    Library(PathBuf),
    Remote(String),
}

/// Values given on the command line (or its environment fallbacks).
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub library: Option<PathBuf>,
    pub url: Option<String>,
    pub mixmode: Option<MixMode>,
    pub skip_decks: Vec<u32>,
    pub timeout_secs: Option<u64>,
}

impl SourceConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| DeckError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
            .map_err(|e| DeckError::Config(format!("{}: {e}", path.display())))
    }

    /// A library or URL given as an override replaces both file values,
    /// since the two are mutually exclusive.
    pub fn with_overrides(mut self, o: Overrides) -> Self {
        if o.library.is_some() || o.url.is_some() {
            self.library = o.library;
            self.url = o.url;
        }
        if let Some(m) = o.mixmode {
            self.mixmode = m;
        }
        self.skip_decks.extend(o.skip_decks);
        if o.timeout_secs.is_some() {
            self.timeout_secs = o.timeout_secs;
        }
        self
    }

    pub fn source(&self) -> Result<Source> {
        let url = self.url.as_deref().map(str::trim).filter(|u| !u.is_empty());
        match (&self.library, url) {
            (Some(lib), None) => Ok(Source::Library(lib.clone())),
            (None, Some(url)) => Ok(Source::Remote(url.to_string())),
            (None, None) => Err(DeckError::MissingSource),
            (Some(_), Some(_)) => Err(DeckError::Config(
                "library and url are mutually exclusive".into(),
            )),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }
}

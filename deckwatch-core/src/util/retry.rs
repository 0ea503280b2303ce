use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{DeckError, Result};

/// Bounded exponential backoff for files the DJ software may still be writing.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub attempts: u32,
    #[serde(rename = "initial_delay_ms", with = "millis")]
    pub initial_delay: Duration,
    #[serde(rename = "max_delay_ms", with = "millis")]
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 8,
            initial_delay: Duration::from_millis(25),
            max_delay: Duration::from_millis(400),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `n` (0-based).
    pub fn delay(&self, n: u32) -> Duration {
        let factor = 1u32.checked_shl(n).unwrap_or(u32::MAX);
        self.initial_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

mod millis {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}

/// Shared flag a caller flips to abandon a scan.
///
/// A source that observes the flag clears it again, so a cancel stops one
/// scan and the next refresh runs normally.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(DeckError::Cancelled)
        } else {
            Ok(())
        }
    }
}

fn transient(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::NotFound | ErrorKind::PermissionDenied | ErrorKind::WouldBlock
    )
}

/// Read the whole file, retrying while it is missing or locked.
pub fn read_when_ready(path: &Path, policy: &RetryPolicy, cancel: &CancelToken) -> Result<Vec<u8>> {
    let mut attempt = 0u32;
    loop {
        cancel.check()?;
        match std::fs::read(path) {
            Ok(buf) => return Ok(buf),
            Err(e) if transient(e.kind()) && attempt + 1 < policy.attempts.max(1) => {
                let wait = policy.delay(attempt);
                debug!(path = %path.display(), attempt, ?wait, error = %e, "session file not ready");
                thread::sleep(wait);
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

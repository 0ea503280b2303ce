use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Which loaded deck counts as on air.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MixMode {
    /// Most recently loaded deck.
    #[default]
    Newest,
    /// Least recently loaded deck.
    Oldest,
}

impl MixMode {
    /// Anything other than `"oldest"` (case-insensitive) is `Newest`.
    pub fn normalize(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("oldest") {
            MixMode::Oldest
        } else {
            MixMode::Newest
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MixMode::Newest => "newest",
            MixMode::Oldest => "oldest",
        }
    }
}

impl fmt::Display for MixMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MixMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(MixMode::normalize(s))
    }
}

impl<'de> Deserialize<'de> for MixMode {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(MixMode::normalize(&String::deserialize(d)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_values_normalize_to_newest() {
        assert_eq!(MixMode::normalize("oldest"), MixMode::Oldest);
        assert_eq!(MixMode::normalize(" OLDEST "), MixMode::Oldest);
        assert_eq!(MixMode::normalize("newest"), MixMode::Newest);
        assert_eq!(MixMode::normalize("random"), MixMode::Newest);
        assert_eq!(MixMode::normalize(""), MixMode::Newest);
    }
}

//! Transcript word records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for a transcript word.
///
/// Produced by the transcript provider; clips reference words by ID only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordId(String);

impl WordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for WordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A single transcript word with its spoken interval in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Word {
    /// Opaque word identifier
    pub id: WordId,
    /// Start of the spoken interval, seconds from video start
    pub start: f64,
    /// End of the spoken interval, seconds from video start
    pub end: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_id_serializes_transparently() {
        let word = Word {
            id: WordId::from("w42"),
            start: 1.5,
            end: 2.0,
        };
        let json = serde_json::to_value(&word).unwrap();
        assert_eq!(json["id"], "w42");
        assert_eq!(json["start"], 1.5);
    }

    #[test]
    fn word_deserializes_from_transcript_json() {
        let word: Word =
            serde_json::from_str(r#"{"id":"w1","start":0.12,"end":0.48}"#).unwrap();
        assert_eq!(word.id.as_str(), "w1");
        assert!((word.end - 0.48).abs() < f64::EPSILON);
    }
}

//! Scene-bounded clip records.

use serde::{Deserialize, Serialize};

use crate::word::WordId;

/// A time interval of the video bounded by two consecutive scene boundaries,
/// carrying the transcript words spoken within it.
///
/// `position_x` is the horizontal screen position of the active speaker as
/// an integer percent. It starts at the center default and is assigned once
/// by speaker resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    /// Clip start, seconds
    pub start: f64,
    /// Clip end, seconds
    pub end: f64,
    /// IDs of words whose start timestamp falls inside `[start, end]`
    pub word_ids: Vec<WordId>,
    /// Horizontal speaker position, integer percent in `[0, 100]`
    pub position_x: u8,
}

/// Center-default position used when a clip has no face evidence.
pub const DEFAULT_POSITION_X: u8 = 50;

impl Clip {
    /// Create a clip over `[start, end]` with the default speaker position.
    pub fn new(start: f64, end: f64, word_ids: Vec<WordId>) -> Self {
        Self {
            start,
            end,
            word_ids,
            position_x: DEFAULT_POSITION_X,
        }
    }
}

/// Top-level output envelope: `{"clips": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipList {
    pub clips: Vec<Clip>,
}

impl From<Vec<Clip>> for ClipList {
    fn from(clips: Vec<Clip>) -> Self {
        Self { clips }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_uses_camel_case_wire_names() {
        let clip = Clip::new(0.0, 5.0, vec![WordId::from("w1")]);
        let json = serde_json::to_value(&clip).unwrap();
        assert!(json.get("wordIds").is_some());
        assert_eq!(json["positionX"], 50);
    }

    #[test]
    fn envelope_round_trips_unchanged() {
        let mut clip = Clip::new(0.0, 5.0, vec![WordId::from("a"), WordId::from("b")]);
        clip.position_x = 20;
        let list = ClipList::from(vec![clip, Clip::new(5.0, 12.3, vec![])]);

        let json = serde_json::to_string(&list).unwrap();
        let parsed: ClipList = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.clips.len(), 2);
        assert_eq!(parsed.clips[0].position_x, 20);
        assert_eq!(parsed.clips[0].word_ids, list.clips[0].word_ids);
        assert_eq!(parsed.clips[1].position_x, 50);
        assert!((parsed.clips[1].end - 12.3).abs() < f64::EPSILON);
    }
}

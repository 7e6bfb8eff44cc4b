//! Clip assembly from scene boundaries and transcript words.

use clipcue_models::{Clip, Word};

/// Partition words into clips over consecutive boundary pairs.
///
/// Each adjacent pair `(start, end)` yields one clip carrying every word
/// whose start timestamp satisfies `start <= word.start <= end`. Membership
/// is inclusive on both ends, so a word sitting exactly on a shared
/// boundary lands in both adjacent clips; that duplication is intentional.
/// Words outside every interval are dropped silently.
pub fn assemble_clips(boundaries: &[f64], words: &[Word]) -> Vec<Clip> {
    let mut clips = Vec::with_capacity(boundaries.len().saturating_sub(1));

    for pair in boundaries.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let word_ids = words
            .iter()
            .filter(|w| start <= w.start && w.start <= end)
            .map(|w| w.id.clone())
            .collect();
        clips.push(Clip::new(start, end, word_ids));
    }

    clips
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipcue_models::WordId;

    fn word(id: &str, start: f64) -> Word {
        Word {
            id: WordId::from(id),
            start,
            end: start + 0.3,
        }
    }

    #[test]
    fn produces_one_clip_per_boundary_pair_in_order() {
        let boundaries = [0.0, 5.0, 9.8, 12.3];
        let clips = assemble_clips(&boundaries, &[]);

        assert_eq!(clips.len(), boundaries.len() - 1);
        for (clip, pair) in clips.iter().zip(boundaries.windows(2)) {
            assert_eq!(clip.start, pair[0]);
            assert_eq!(clip.end, pair[1]);
            assert!(clip.word_ids.is_empty());
        }
    }

    #[test]
    fn assigns_words_by_start_timestamp() {
        let boundaries = [0.0, 5.0, 12.3];
        let words = [word("w1", 1.0), word("w2", 4.9), word("w3", 7.2)];
        let clips = assemble_clips(&boundaries, &words);

        assert_eq!(clips[0].word_ids, vec![WordId::from("w1"), WordId::from("w2")]);
        assert_eq!(clips[1].word_ids, vec![WordId::from("w3")]);
    }

    #[test]
    fn boundary_word_appears_in_both_adjacent_clips() {
        let boundaries = [0.0, 5.0, 12.3];
        let words = [word("edge", 5.0)];
        let clips = assemble_clips(&boundaries, &words);

        assert_eq!(clips[0].word_ids, vec![WordId::from("edge")]);
        assert_eq!(clips[1].word_ids, vec![WordId::from("edge")]);
    }

    #[test]
    fn words_outside_all_intervals_are_dropped() {
        let boundaries = [2.0, 5.0];
        let words = [word("early", 1.0), word("late", 6.0), word("in", 3.0)];
        let clips = assemble_clips(&boundaries, &words);

        assert_eq!(clips.len(), 1);
        assert_eq!(clips[0].word_ids, vec![WordId::from("in")]);
    }

    #[test]
    fn empty_clip_is_valid_and_defaults_to_center() {
        let clips = assemble_clips(&[0.0, 4.0], &[]);
        assert_eq!(clips[0].position_x, 50);
    }
}

//! Frame sampling for spoken words.

use clipcue_models::Word;

/// Pick the frame indices to examine for one spoken word.
///
/// The word's interval is mapped to frames via `floor(t * fps)`; the
/// sampling bounds inference cost while still catching mouth-motion
/// variation across the word:
/// - range >= 2: start, midpoint, and the frame before the end
/// - range == 1: both frames
/// - range == 0: the single frame
pub fn sample_frames(word: &Word, fps: f64) -> Vec<i64> {
    let start = (word.start * fps).floor() as i64;
    let end = (word.end * fps).floor() as i64;
    let frame_range = end - start;

    if frame_range >= 2 {
        vec![start, start + frame_range / 2, end - 1]
    } else if frame_range == 1 {
        vec![start, end]
    } else {
        vec![start]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipcue_models::WordId;

    fn word_over_frames(start_frame: i64, end_frame: i64, fps: f64) -> Word {
        Word {
            id: WordId::from("w"),
            start: start_frame as f64 / fps,
            end: end_frame as f64 / fps,
        }
    }

    #[test]
    fn wide_word_samples_start_mid_and_last() {
        // Frames 10..14: range 4, midpoint 12, frame before end 13.
        let word = word_over_frames(10, 14, 10.0);
        assert_eq!(sample_frames(&word, 10.0), vec![10, 12, 13]);
    }

    #[test]
    fn two_frame_word_samples_both() {
        let word = word_over_frames(10, 11, 10.0);
        assert_eq!(sample_frames(&word, 10.0), vec![10, 11]);
    }

    #[test]
    fn single_frame_word_samples_once() {
        let word = word_over_frames(10, 10, 10.0);
        assert_eq!(sample_frames(&word, 10.0), vec![10]);
    }

    #[test]
    fn odd_range_midpoint_rounds_down() {
        // Frames 0..5: range 5, midpoint floor(5/2)=2.
        let word = word_over_frames(0, 5, 25.0);
        assert_eq!(sample_frames(&word, 25.0), vec![0, 2, 4]);
    }
}

//! End-to-end pipeline tests against synthetic collaborators.

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use clipcue_media::{MediaError, MediaResult, ObservationSource, SceneProbe};
use clipcue_models::{ClipList, FaceObservation, Word, WordId};
use clipcue_pipeline::{ClipPipeline, PipelineConfig};

struct FakeSceneProbe {
    cuts: Vec<f64>,
    duration: f64,
    fail: bool,
}

#[async_trait]
impl SceneProbe for FakeSceneProbe {
    async fn detect_cuts(&self, _: &Path, _: f64) -> MediaResult<Vec<f64>> {
        if self.fail {
            return Err(MediaError::scene_detection("ffmpeg exploded", None));
        }
        Ok(self.cuts.clone())
    }

    async fn probe_duration(&self, _: &Path) -> MediaResult<f64> {
        Ok(self.duration)
    }
}

/// Observer that returns canned observations for frames before a cutoff
/// time and nothing after, with optional decode exhaustion.
struct FakeObserver {
    fps: f64,
    /// Frames (inclusive) up to which face evidence exists
    evidence_until_frame: i64,
    /// Observation emitted for frames with evidence
    evidence: Vec<FaceObservation>,
    /// Frames at which decode fails (end of stream)
    exhausted_at: HashSet<i64>,
    /// Every frame index the pipeline asked for, in order
    requested: Vec<i64>,
}

impl FakeObserver {
    fn new(fps: f64, evidence_until_frame: i64, evidence: Vec<FaceObservation>) -> Self {
        Self {
            fps,
            evidence_until_frame,
            evidence,
            exhausted_at: HashSet::new(),
            requested: Vec::new(),
        }
    }
}

impl ObservationSource for FakeObserver {
    fn fps(&self) -> f64 {
        self.fps
    }

    fn observe(&mut self, frame_index: i64) -> MediaResult<Option<Vec<FaceObservation>>> {
        self.requested.push(frame_index);
        if self.exhausted_at.contains(&frame_index) {
            return Ok(None);
        }
        if frame_index <= self.evidence_until_frame {
            Ok(Some(self.evidence.clone()))
        } else {
            Ok(Some(Vec::new()))
        }
    }
}

fn word(id: &str, start: f64, end: f64) -> Word {
    Word {
        id: WordId::from(id),
        start,
        end,
    }
}

#[tokio::test]
async fn two_scene_video_localizes_speaker_then_defaults() {
    // Scenes [0, 5.0] and [5.0, 12.3]; face evidence at ~20% with strong
    // lip motion only in the first scene.
    let probe = FakeSceneProbe {
        cuts: vec![5.0],
        duration: 12.3,
        fail: false,
    };
    let mut observer = FakeObserver::new(
        10.0,
        49, // evidence only before the 5.0s boundary at 10 fps
        vec![FaceObservation::new(20.4, 6.0)],
    );

    let words = vec![
        word("w1", 0.5, 1.0),
        word("w2", 2.0, 2.4),
        word("w3", 6.0, 6.5),
    ];

    let pipeline = ClipPipeline::new(PipelineConfig::default());
    let clips = pipeline
        .run(&probe, &mut observer, Path::new("video.mp4"), &words)
        .await
        .unwrap();

    assert_eq!(clips.len(), 2);
    assert_eq!(clips[0].start, 0.0);
    assert_eq!(clips[0].end, 5.0);
    assert_eq!(clips[0].position_x, 20);
    assert_eq!(clips[1].start, 5.0);
    assert!((clips[1].end - 12.3).abs() < f64::EPSILON);
    assert_eq!(clips[1].position_x, 50);
}

#[tokio::test]
async fn output_envelope_round_trips() {
    let probe = FakeSceneProbe {
        cuts: vec![5.0],
        duration: 12.3,
        fail: false,
    };
    let mut observer = FakeObserver::new(10.0, 49, vec![FaceObservation::new(20.0, 6.0)]);
    let words = vec![word("w1", 0.5, 1.0), word("w2", 6.0, 6.5)];

    let pipeline = ClipPipeline::new(PipelineConfig::default());
    let clips = pipeline
        .run(&probe, &mut observer, Path::new("video.mp4"), &words)
        .await
        .unwrap();

    let envelope = ClipList::from(clips.clone());
    let json = serde_json::to_string(&envelope).unwrap();
    let parsed: ClipList = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.clips.len(), clips.len());
    for (restored, original) in parsed.clips.iter().zip(&clips) {
        assert_eq!(restored.start, original.start);
        assert_eq!(restored.end, original.end);
        assert_eq!(restored.word_ids, original.word_ids);
        assert_eq!(restored.position_x, original.position_x);
    }
}

#[tokio::test]
async fn only_the_first_three_words_are_sampled() {
    let probe = FakeSceneProbe {
        cuts: vec![],
        duration: 20.0,
        fail: false,
    };
    let mut observer = FakeObserver::new(10.0, -1, vec![]);

    // Five words, each covering a single frame; only the first three
    // should generate frame requests.
    let words: Vec<Word> = (0..5)
        .map(|i| word(&format!("w{i}"), i as f64, i as f64))
        .collect();

    let pipeline = ClipPipeline::new(PipelineConfig::default());
    pipeline
        .run(&probe, &mut observer, Path::new("video.mp4"), &words)
        .await
        .unwrap();

    assert_eq!(observer.requested, vec![0, 10, 20]);
}

#[tokio::test]
async fn decode_exhaustion_abandons_only_the_current_word() {
    let probe = FakeSceneProbe {
        cuts: vec![],
        duration: 10.0,
        fail: false,
    };

    // w1 spans frames 10..14 (samples 10, 12, 13); frame 12 fails to
    // decode, so 13 must be skipped but w2's frame 50 is still sampled.
    let mut observer = FakeObserver::new(10.0, 100, vec![FaceObservation::new(30.0, 1.0)]);
    observer.exhausted_at.insert(12);

    let words = vec![word("w1", 1.0, 1.4), word("w2", 5.0, 5.0)];

    let pipeline = ClipPipeline::new(PipelineConfig::default());
    let clips = pipeline
        .run(&probe, &mut observer, Path::new("video.mp4"), &words)
        .await
        .unwrap();

    assert_eq!(observer.requested, vec![10, 12, 50]);
    // Evidence from the surviving frames still resolves the position.
    assert_eq!(clips[0].position_x, 30);
}

#[tokio::test]
async fn scene_detection_failure_propagates() {
    let probe = FakeSceneProbe {
        cuts: vec![],
        duration: 10.0,
        fail: true,
    };
    let mut observer = FakeObserver::new(10.0, -1, vec![]);

    let pipeline = ClipPipeline::new(PipelineConfig::default());
    let err = pipeline
        .run(&probe, &mut observer, Path::new("video.mp4"), &[])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        clipcue_pipeline::PipelineError::Media(MediaError::SceneDetection { .. })
    ));
    // Nothing was sampled before the failure surfaced.
    assert!(observer.requested.is_empty());
}

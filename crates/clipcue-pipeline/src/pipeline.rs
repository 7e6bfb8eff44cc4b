//! Clip pipeline orchestration.

use std::collections::HashMap;
use std::path::Path;

use clipcue_media::{detect_scene_boundaries, ObservationSource, SceneProbe};
use clipcue_models::{Clip, FaceObservation, Word, WordId};
use tracing::{debug, info};

use crate::assembler::assemble_clips;
use crate::config::PipelineConfig;
use crate::error::PipelineResult;
use crate::resolver::resolve_speaker_position;
use crate::sampler::sample_frames;

/// Orchestrates scene detection, clip assembly, and per-clip speaker
/// resolution. Returns either the fully resolved clip list or an error,
/// never a partially resolved one.
pub struct ClipPipeline {
    config: PipelineConfig,
}

impl ClipPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the full pipeline over one video.
    ///
    /// `observer` wraps the shared decode handle and the inference
    /// collaborators; it is reused sequentially across all clips. Any
    /// collaborator failure propagates unchanged, except per-frame decode
    /// exhaustion which only abandons the current word's remaining frames.
    pub async fn run<S, O>(
        &self,
        probe: &S,
        observer: &mut O,
        video_path: &Path,
        words: &[Word],
    ) -> PipelineResult<Vec<Clip>>
    where
        S: SceneProbe + ?Sized,
        O: ObservationSource + ?Sized,
    {
        let boundaries =
            detect_scene_boundaries(probe, video_path, self.config.scene_threshold).await?;

        let mut clips = assemble_clips(&boundaries, words);
        info!(clips = clips.len(), words = words.len(), "Assembled clips");

        let word_map: HashMap<&WordId, &Word> = words.iter().map(|w| (&w.id, w)).collect();

        for clip in &mut clips {
            let observations = self.collect_observations(clip, &word_map, observer)?;
            clip.position_x = resolve_speaker_position(&observations, self.config.cluster_band);
            debug!(
                start = clip.start,
                end = clip.end,
                observations = observations.len(),
                position_x = clip.position_x,
                "Resolved clip"
            );
        }

        Ok(clips)
    }

    /// Collect face observations for one clip by sampling frames of its
    /// leading words.
    fn collect_observations<O>(
        &self,
        clip: &Clip,
        word_map: &HashMap<&WordId, &Word>,
        observer: &mut O,
    ) -> PipelineResult<Vec<FaceObservation>>
    where
        O: ObservationSource + ?Sized,
    {
        let fps = observer.fps();
        let mut observations = Vec::new();

        for word_id in clip.word_ids.iter().take(self.config.max_sampled_words) {
            let Some(word) = word_map.get(word_id) else {
                continue;
            };

            for frame_index in sample_frames(word, fps) {
                match observer.observe(frame_index)? {
                    Some(mut frame_observations) => {
                        observations.append(&mut frame_observations);
                    }
                    // Decode exhausted: abandon this word's remaining
                    // frames, keep going with the rest of the clip.
                    None => break,
                }
            }
        }

        Ok(observations)
    }
}

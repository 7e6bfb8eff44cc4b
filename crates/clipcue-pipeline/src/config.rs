//! Pipeline configuration.

/// Tunables for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Scene-change sensitivity, fraction in (0, 1); lower detects more cuts
    pub scene_threshold: f64,
    /// Minimum face-detector confidence for a box to become a candidate
    pub face_confidence: f32,
    /// Maximum horizontal distance (percent) between an observation and a
    /// cluster's reference for the observation to join that cluster
    pub cluster_band: f64,
    /// Only this many leading words of a clip are ever sampled; caps
    /// per-clip inference cost at the risk of missing later speakers
    pub max_sampled_words: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            scene_threshold: 0.1,
            face_confidence: 0.7,
            cluster_band: 10.0,
            max_sampled_words: 3,
        }
    }
}

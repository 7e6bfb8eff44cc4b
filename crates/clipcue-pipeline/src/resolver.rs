//! Speaker position resolution by positional clustering.
//!
//! Observations are grouped with a greedy single pass: each observation
//! joins the first existing cluster (in insertion order) whose reference
//! observation lies within the cluster band, otherwise it seeds a new
//! cluster. The pass is order-dependent on purpose: near-threshold
//! observations can land in different clusters depending on arrival order,
//! and that behavior is part of the contract.
//!
//! Cluster scores are the *sum* of member lip distances, not the mean:
//! more detections of the same face plausibly correlate with the more
//! visible, wider-mouthed speaker, so cluster size is allowed to inflate
//! the score.

use clipcue_models::{FaceObservation, DEFAULT_POSITION_X};
use tracing::debug;

/// Transient grouping of observations sharing a horizontal-position band.
/// Lives only for the resolution of one clip.
#[derive(Debug)]
struct PositionCluster {
    /// Position of the cluster's first member, the reference all
    /// candidates are compared against
    reference_position: f64,
    /// Summed lip distance across members
    total_lip_distance: f64,
}

impl PositionCluster {
    fn seed(observation: &FaceObservation) -> Self {
        Self {
            reference_position: observation.position_x_percent,
            total_lip_distance: observation.lip_distance,
        }
    }

    fn accepts(&self, observation: &FaceObservation, band: f64) -> bool {
        (self.reference_position - observation.position_x_percent).abs() <= band
    }

    fn absorb(&mut self, observation: &FaceObservation) {
        self.total_lip_distance += observation.lip_distance;
    }
}

/// Resolve the active speaker's horizontal position for one clip.
///
/// Returns the winning cluster's reference position truncated toward zero,
/// as an integer percent in `[0, 100]`. With no observations there is no
/// evidence of any speaker and the center default is returned.
pub fn resolve_speaker_position(observations: &[FaceObservation], cluster_band: f64) -> u8 {
    if observations.is_empty() {
        return DEFAULT_POSITION_X;
    }

    let mut clusters: Vec<PositionCluster> = Vec::new();
    for observation in observations {
        match clusters
            .iter_mut()
            .find(|c| c.accepts(observation, cluster_band))
        {
            Some(cluster) => cluster.absorb(observation),
            None => clusters.push(PositionCluster::seed(observation)),
        }
    }

    // First-encountered maximum wins ties.
    let mut winner = &clusters[0];
    for cluster in &clusters[1..] {
        if cluster.total_lip_distance > winner.total_lip_distance {
            winner = cluster;
        }
    }

    debug!(
        clusters = clusters.len(),
        position = winner.reference_position,
        lip_sum = winner.total_lip_distance,
        "Resolved speaker position"
    );

    winner.reference_position.clamp(0.0, 100.0) as u8
}

//! Per-frame face observations.

use serde::{Deserialize, Serialize};

/// One detected face in one sampled frame.
///
/// Ephemeral: created during extraction for a single clip, consumed by
/// speaker resolution for that clip, then discarded. Observations never
/// cross clip boundaries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FaceObservation {
    /// Horizontal position of the face box center, percent of frame width in `[0, 100]`
    pub position_x_percent: f64,
    /// Vertical separation between upper- and lower-lip landmark means, pixels
    pub lip_distance: f64,
}

impl FaceObservation {
    pub fn new(position_x_percent: f64, lip_distance: f64) -> Self {
        Self {
            position_x_percent,
            lip_distance,
        }
    }
}

//! Per-frame face observation extraction.

use clipcue_models::FaceObservation;

use crate::error::MediaResult;

/// Source of face observations for sampled frames.
///
/// The pipeline core only depends on this seam, so speaker resolution can
/// be tested without a video file or model inference.
pub trait ObservationSource {
    /// Frame rate used to convert word timestamps into frame indices.
    fn fps(&self) -> f64;

    /// Seek to `frame_index`, decode, and extract one observation per
    /// accepted face.
    ///
    /// Returns `Ok(None)` when the frame cannot be decoded (end of stream);
    /// the caller abandons the remaining frames of the current word.
    fn observe(&mut self, frame_index: i64) -> MediaResult<Option<Vec<FaceObservation>>>;
}

#[cfg(feature = "opencv")]
pub use real::VideoObservationSource;

#[cfg(feature = "opencv")]
mod real {
    use super::*;
    use std::path::Path;
    use tracing::debug;

    use crate::face::{FaceDetector, YuNetFaceDetector};
    use crate::landmarks::{lip_distance, LandmarkPredictor, OrtLandmarkPredictor};
    use crate::video::VideoSource;

    /// Observation source backed by the shared decode handle, YuNet face
    /// detection, and ONNX landmark inference.
    pub struct VideoObservationSource {
        video: VideoSource,
        detector: Box<dyn FaceDetector>,
        landmarks: Box<dyn LandmarkPredictor>,
    }

    impl VideoObservationSource {
        /// Open a video and load the default detector and landmark models.
        pub fn open(path: impl AsRef<Path>, confidence_threshold: f32) -> MediaResult<Self> {
            let video = VideoSource::open(path)?;
            let detector = YuNetFaceDetector::new(confidence_threshold)?;
            let landmarks = OrtLandmarkPredictor::new_default()?;
            Ok(Self::new(video, Box::new(detector), Box::new(landmarks)))
        }

        /// Assemble from explicit collaborators.
        pub fn new(
            video: VideoSource,
            detector: Box<dyn FaceDetector>,
            landmarks: Box<dyn LandmarkPredictor>,
        ) -> Self {
            Self {
                video,
                detector,
                landmarks,
            }
        }
    }

    impl ObservationSource for VideoObservationSource {
        fn fps(&self) -> f64 {
            self.video.fps()
        }

        fn observe(&mut self, frame_index: i64) -> MediaResult<Option<Vec<FaceObservation>>> {
            let frame = match self.video.read_frame(frame_index)? {
                Some(frame) => frame,
                None => return Ok(None),
            };

            let frame_width = self.video.frame_width() as f64;
            let faces = self.detector.detect(&frame)?;

            let mut observations = Vec::with_capacity(faces.len());
            for face in &faces {
                let position_x_percent = (face.center_x() as f64 / frame_width) * 100.0;
                let points = self.landmarks.predict(&frame, face)?;
                observations.push(FaceObservation::new(
                    position_x_percent,
                    lip_distance(&points),
                ));
            }

            debug!(
                frame_index,
                observations = observations.len(),
                "Extracted face observations"
            );
            Ok(Some(observations))
        }
    }
}

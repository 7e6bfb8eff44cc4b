//! External-collaborator boundary for the clipcue pipeline.
//!
//! This crate wraps everything that talks to the outside world:
//! - FFprobe duration/metadata probing
//! - FFmpeg scene-cut detection with transient metadata logs
//! - The shared OpenCV video decode handle
//! - YuNet face detection and ONNX 68-point landmark inference
//!
//! The algorithmic core (`clipcue-pipeline`) only depends on the trait
//! seams exported here (`SceneProbe`, `ObservationSource`), so it can be
//! tested with synthetic collaborators. OpenCV-backed implementations are
//! gated behind the `opencv` feature (enabled by default).

pub mod error;
pub mod observe;
pub mod probe;
pub mod scene;

#[cfg(feature = "opencv")]
pub mod face;
#[cfg(feature = "opencv")]
pub mod landmarks;
#[cfg(feature = "opencv")]
pub mod video;

pub use error::{MediaError, MediaResult};
pub use observe::ObservationSource;
pub use probe::{get_duration, probe_video, VideoInfo};
pub use scene::{detect_scene_boundaries, FfmpegSceneProbe, SceneProbe};

#[cfg(feature = "opencv")]
pub use face::{FaceBox, FaceDetector, YuNetFaceDetector};
#[cfg(feature = "opencv")]
pub use landmarks::{lip_distance, LandmarkPoint, LandmarkPredictor, OrtLandmarkPredictor};
#[cfg(feature = "opencv")]
pub use observe::VideoObservationSource;
#[cfg(feature = "opencv")]
pub use video::VideoSource;

//! YuNet face detection.
//!
//! Wraps OpenCV's `FaceDetectorYN`. The detector applies the confidence
//! threshold itself; callers only ever see accepted boxes.

use opencv::core::{Mat, Size};
use opencv::objdetect::FaceDetectorYN;
use opencv::prelude::{FaceDetectorYNTrait, MatTraitConst};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{MediaError, MediaResult};

/// Axis-aligned face bounding box in frame pixel coordinates.
#[derive(Debug, Clone, Copy)]
pub struct FaceBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub confidence: f32,
}

impl FaceBox {
    /// Horizontal center of the box, pixels.
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// Face-detector collaborator: decoded frame in, accepted boxes out.
pub trait FaceDetector {
    fn detect(&mut self, frame: &Mat) -> MediaResult<Vec<FaceBox>>;
}

/// NMS threshold for face detection
const NMS_THRESHOLD: f32 = 0.3;

/// Top K faces to keep
const TOP_K: i32 = 10;

/// YuNet model search paths, container locations first.
const YUNET_MODEL_PATHS: &[&str] = &[
    "/app/models/face_detection_yunet_2023mar.onnx",
    "/usr/share/opencv/models/face_detection_yunet_2023mar.onnx",
    "./models/face_detection_yunet_2023mar.onnx",
];

fn find_model_path() -> Option<&'static str> {
    YUNET_MODEL_PATHS
        .iter()
        .copied()
        .find(|p| Path::new(p).exists())
}

/// YuNet face detector using OpenCV.
pub struct YuNetFaceDetector {
    detector: opencv::core::Ptr<FaceDetectorYN>,
    /// Input size currently configured on the detector
    input_size: (i32, i32),
}

impl YuNetFaceDetector {
    /// Create a detector from the default model search paths.
    pub fn new(confidence_threshold: f32) -> MediaResult<Self> {
        let model_path = find_model_path().ok_or_else(|| {
            MediaError::model_not_found(
                "YuNet model not found; place face_detection_yunet_2023mar.onnx under ./models/",
            )
        })?;
        Self::new_with_model(model_path, confidence_threshold)
    }

    /// Create a detector with a specific model path.
    pub fn new_with_model(model_path: &str, confidence_threshold: f32) -> MediaResult<Self> {
        use opencv::dnn::{DNN_BACKEND_DEFAULT, DNN_TARGET_CPU};

        let detector = FaceDetectorYN::create(
            model_path,
            "",
            Size::new(0, 0),
            confidence_threshold,
            NMS_THRESHOLD,
            TOP_K,
            DNN_BACKEND_DEFAULT,
            DNN_TARGET_CPU,
        )
        .map_err(|e| MediaError::detection_failed(format!("Create YuNet detector: {e}")))?;

        info!(model = model_path, confidence_threshold, "YuNet detector initialized");

        Ok(Self {
            detector,
            input_size: (0, 0),
        })
    }
}

impl FaceDetector for YuNetFaceDetector {
    /// Detect faces in a frame, returning boxes in pixel coordinates.
    fn detect(&mut self, frame: &Mat) -> MediaResult<Vec<FaceBox>> {
        if frame.empty() {
            return Ok(Vec::new());
        }

        let (width, height) = (frame.cols(), frame.rows());
        if (width, height) != self.input_size {
            self.detector
                .set_input_size(Size::new(width, height))
                .map_err(|e| MediaError::detection_failed(format!("Set input size: {e}")))?;
            self.input_size = (width, height);
        }

        let mut faces = Mat::default();
        self.detector
            .detect(frame, &mut faces)
            .map_err(|e| MediaError::detection_failed(format!("YuNet detect: {e}")))?;

        // Each row: x, y, w, h, 10 landmark coords, score.
        let mut boxes = Vec::with_capacity(faces.rows().max(0) as usize);
        for row in 0..faces.rows() {
            let at = |col: i32| -> MediaResult<f32> {
                faces
                    .at_2d::<f32>(row, col)
                    .map(|v| *v)
                    .map_err(|e| MediaError::detection_failed(format!("Read detection: {e}")))
            };
            boxes.push(FaceBox {
                x: at(0)?,
                y: at(1)?,
                width: at(2)?,
                height: at(3)?,
                confidence: at(14)?,
            });
        }

        debug!(faces = boxes.len(), "YuNet frame detection");
        Ok(boxes)
    }
}

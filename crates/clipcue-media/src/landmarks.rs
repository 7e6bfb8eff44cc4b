//! ONNX 68-point facial landmark inference.
//!
//! Runs a 68-point landmark model (classic dlib/iBUG ordering: jaw, brows,
//! nose, eyes, mouth) over a detected face region and derives the
//! lip-distance mouth-aperture proxy from the mouth points.
//!
//! Notes:
//! - The model consumes a grayscale square crop of the face region.
//! - Landmark indices are only meaningful on the 68-point convention, so
//!   any model output with a different point count is rejected outright.

use opencv::core::{Mat, Rect};
use opencv::imgproc;
use opencv::prelude::MatTraitConst;
use std::path::Path;
use std::sync::Mutex;

use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::{Tensor, Value};

use crate::error::{MediaError, MediaResult};
use crate::face::FaceBox;

/// Number of points in the supported landmark layout.
pub const LANDMARK_COUNT: usize = 68;

/// Model input edge length (square grayscale crop).
const INPUT_SIZE: i32 = 112;

/// Upper-lip landmark indices (outer 51-52, inner 62-63).
const TOP_LIP: [usize; 4] = [51, 52, 62, 63];

/// Lower-lip landmark indices (outer 57-58, inner 66-67).
const BOTTOM_LIP: [usize; 4] = [57, 58, 66, 67];

/// Single landmark in frame pixel coordinates.
#[derive(Debug, Clone, Copy)]
pub struct LandmarkPoint {
    pub x: f32,
    pub y: f32,
}

/// Landmark collaborator: grayscale face region in, exactly 68 ordered
/// points out (frame coordinates).
pub trait LandmarkPredictor {
    fn predict(&self, frame: &Mat, face: &FaceBox) -> MediaResult<Vec<LandmarkPoint>>;
}

/// Vertical separation between the upper- and lower-lip landmark means.
///
/// A proxy for mouth-opening magnitude; larger means a wider-open mouth.
pub fn lip_distance(landmarks: &[LandmarkPoint]) -> f64 {
    if landmarks.len() != LANDMARK_COUNT {
        return 0.0;
    }

    let mean_y = |indices: &[usize; 4]| -> f64 {
        indices.iter().map(|&i| landmarks[i].y as f64).sum::<f64>() / indices.len() as f64
    };

    (mean_y(&TOP_LIP) - mean_y(&BOTTOM_LIP)).abs()
}

/// Landmark model search paths, container locations first.
const LANDMARK_MODEL_PATHS: &[&str] = &[
    "/app/models/face_landmarks_68.onnx",
    "./models/face_landmarks_68.onnx",
];

fn find_default_model_path() -> Option<&'static str> {
    LANDMARK_MODEL_PATHS
        .iter()
        .copied()
        .find(|p| Path::new(p).exists())
}

/// ONNX Runtime-backed 68-point landmark predictor.
pub struct OrtLandmarkPredictor {
    session: Mutex<Session>,
}

impl OrtLandmarkPredictor {
    /// Load the predictor from the default model search paths.
    pub fn new_default() -> MediaResult<Self> {
        let model_path = find_default_model_path().ok_or_else(|| {
            MediaError::model_not_found(
                "face_landmarks_68.onnx not found; place it under ./models/",
            )
        })?;
        Self::new_with_model(Path::new(model_path))
    }

    /// Load the predictor from a specific model path.
    pub fn new_with_model(model_path: &Path) -> MediaResult<Self> {
        if !model_path.exists() {
            return Err(MediaError::model_not_found(format!(
                "Landmark model not found at {}",
                model_path.display()
            )));
        }

        let model_bytes = std::fs::read(model_path)
            .map_err(|e| MediaError::detection_failed(format!("ORT read model file: {e}")))?;

        let session = Session::builder()
            .map_err(|e| MediaError::detection_failed(format!("ORT session builder: {e}")))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| MediaError::detection_failed(format!("ORT opt level: {e}")))?
            .commit_from_memory(model_bytes.as_slice())
            .map_err(|e| MediaError::detection_failed(format!("ORT load model: {e}")))?;

        Ok(Self {
            session: Mutex::new(session),
        })
    }
}

impl LandmarkPredictor for OrtLandmarkPredictor {
    fn predict(&self, frame: &Mat, face: &FaceBox) -> MediaResult<Vec<LandmarkPoint>> {
        // 1) Square up the face region and clamp it to the frame.
        let crop_rect = make_square_crop(frame, face)?;

        // 2) Grayscale crop, resized to the model input.
        let gray = extract_gray_crop(frame, &crop_rect)?;

        // 3) Normalized (1,1,S,S) tensor.
        let tensor = mat_to_gray_tensor(&gray)?;

        // 4) Run inference.
        let mut session = self
            .session
            .lock()
            .map_err(|_| MediaError::detection_failed("ORT session poisoned"))?;

        let outputs = session
            .run(ort::inputs![tensor])
            .map_err(|e| MediaError::detection_failed(format!("ORT run failed: {e}")))?;

        let output = outputs
            .get("output")
            .ok_or_else(|| MediaError::detection_failed("ORT returned no outputs"))?;

        extract_landmarks(output, &crop_rect)
    }
}

/// Expand the face box into a clamped square crop.
fn make_square_crop(frame: &Mat, face: &FaceBox) -> MediaResult<Rect> {
    let size = face.width.max(face.height) * 1.1;

    let center_x = face.x + face.width / 2.0;
    let center_y = face.y + face.height / 2.0;

    let mut x = center_x - size / 2.0;
    let mut y = center_y - size / 2.0;
    let mut s = size;

    let frame_w = frame.cols() as f32;
    let frame_h = frame.rows() as f32;

    if x < 0.0 {
        s += x;
        x = 0.0;
    }
    if y < 0.0 {
        s += y;
        y = 0.0;
    }
    if x + s > frame_w {
        s = frame_w - x;
    }
    if y + s > frame_h {
        s = frame_h - y;
    }

    if s < 8.0 {
        return Err(MediaError::detection_failed(
            "Face region too small for landmark inference",
        ));
    }

    Ok(Rect::new(
        x.round() as i32,
        y.round() as i32,
        s.round() as i32,
        s.round() as i32,
    ))
}

/// Extract a grayscale crop resized to the model input size.
fn extract_gray_crop(frame: &Mat, crop: &Rect) -> MediaResult<Mat> {
    let roi = Mat::roi(frame, *crop)
        .map_err(|e| MediaError::detection_failed(format!("ROI failed: {e}")))?;

    let mut gray = Mat::default();
    imgproc::cvt_color_def(&roi, &mut gray, imgproc::COLOR_BGR2GRAY)
        .map_err(|e| MediaError::detection_failed(format!("BGR2GRAY failed: {e}")))?;

    let mut resized = Mat::default();
    imgproc::resize(
        &gray,
        &mut resized,
        opencv::core::Size::new(INPUT_SIZE, INPUT_SIZE),
        0.0,
        0.0,
        imgproc::INTER_LINEAR,
    )
    .map_err(|e| MediaError::detection_failed(format!("Resize failed: {e}")))?;

    Ok(resized)
}

/// Convert a grayscale Mat to an ORT tensor (1,1,S,S) normalized to [0,1].
fn mat_to_gray_tensor(gray: &Mat) -> MediaResult<Value> {
    let size = gray
        .size()
        .map_err(|e| MediaError::detection_failed(format!("Mat size: {e}")))?;
    let (h, w) = (size.height, size.width);
    if gray.channels() != 1 {
        return Err(MediaError::detection_failed("Expected single-channel Mat"));
    }

    let data = gray
        .data_typed::<u8>()
        .map_err(|e| MediaError::detection_failed(format!("Mat data: {e}")))?;

    let pixels: Vec<f32> = data.iter().map(|&v| v as f32 / 255.0).collect();

    let shape = vec![1usize, 1, h as usize, w as usize];
    Tensor::from_array((shape, pixels.into_boxed_slice()))
        .map(Value::from)
        .map_err(|e| MediaError::detection_failed(format!("ORT tensor: {e}")))
}

/// Extract 68 landmarks and map them back to frame coordinates.
///
/// Accepts `(1,68,2)`, `(68,2)`, or flattened `(1,136)`/`(136)` outputs
/// with coordinates normalized to the crop. Anything else is rejected.
fn extract_landmarks(output: &Value, crop: &Rect) -> MediaResult<Vec<LandmarkPoint>> {
    let (shape, data) = output
        .try_extract_tensor::<f32>()
        .map_err(|e| MediaError::detection_failed(format!("ORT extract: {e}")))?;

    let coords: usize = shape.iter().map(|&d| d.max(1) as usize).product();
    if coords != LANDMARK_COUNT * 2 || data.len() < coords {
        return Err(MediaError::detection_failed(format!(
            "Landmark model output shape {:?} does not match the 68-point layout",
            shape
        )));
    }

    let mut landmarks = Vec::with_capacity(LANDMARK_COUNT);
    for i in 0..LANDMARK_COUNT {
        let nx = data[i * 2];
        let ny = data[i * 2 + 1];
        landmarks.push(LandmarkPoint {
            x: crop.x as f32 + nx * crop.width as f32,
            y: crop.y as f32 + ny * crop.height as f32,
        });
    }

    Ok(landmarks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_face() -> Vec<LandmarkPoint> {
        vec![LandmarkPoint { x: 0.0, y: 0.0 }; LANDMARK_COUNT]
    }

    #[test]
    fn test_lip_distance_closed_mouth_is_zero() {
        let mut face = flat_face();
        for &i in TOP_LIP.iter().chain(BOTTOM_LIP.iter()) {
            face[i].y = 120.0;
        }
        assert!(lip_distance(&face) < f64::EPSILON);
    }

    #[test]
    fn test_lip_distance_open_mouth() {
        let mut face = flat_face();
        for &i in &TOP_LIP {
            face[i].y = 100.0;
        }
        for &i in &BOTTOM_LIP {
            face[i].y = 112.0;
        }
        assert!((lip_distance(&face) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_lip_distance_is_symmetric() {
        let mut face = flat_face();
        for &i in &TOP_LIP {
            face[i].y = 130.0;
        }
        for &i in &BOTTOM_LIP {
            face[i].y = 100.0;
        }
        // Upside-down measurement still yields a positive aperture.
        assert!((lip_distance(&face) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_lip_distance_rejects_wrong_point_count() {
        let face = vec![LandmarkPoint { x: 0.0, y: 0.0 }; 5];
        assert_eq!(lip_distance(&face), 0.0);
    }
}

//! Shared video decode handle.
//!
//! One `VideoSource` is opened per pipeline run and reused across all
//! clips. The underlying `VideoCapture` carries positional state between
//! seeks, so the handle must not be shared across threads; parallelizing
//! clips requires a private handle per worker.

use opencv::core::Mat;
use opencv::prelude::{MatTraitConst, VideoCaptureTrait, VideoCaptureTraitConst};
use opencv::videoio::{self, VideoCapture, CAP_ANY};
use std::path::Path;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Stateful, seekable decode handle over one video file.
pub struct VideoSource {
    capture: VideoCapture,
    fps: f64,
    frame_width: u32,
}

impl VideoSource {
    /// Open a video file for frame-accurate seeking.
    pub fn open(path: impl AsRef<Path>) -> MediaResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MediaError::FileNotFound(path.to_path_buf()));
        }

        let capture = VideoCapture::from_file(path.to_str().unwrap_or(""), CAP_ANY)
            .map_err(|e| MediaError::InvalidVideo(format!("Open video: {e}")))?;

        if !capture.is_opened().unwrap_or(false) {
            return Err(MediaError::InvalidVideo(format!(
                "Failed to open video: {}",
                path.display()
            )));
        }

        let fps = capture
            .get(videoio::CAP_PROP_FPS)
            .map_err(|e| MediaError::InvalidVideo(format!("Read fps: {e}")))?;
        let frame_width = capture
            .get(videoio::CAP_PROP_FRAME_WIDTH)
            .map_err(|e| MediaError::InvalidVideo(format!("Read frame width: {e}")))?
            as u32;

        if fps <= 0.0 || frame_width == 0 {
            return Err(MediaError::InvalidVideo(format!(
                "Video reports fps={fps}, width={frame_width}"
            )));
        }

        debug!(fps, frame_width, path = %path.display(), "Opened video source");

        Ok(Self {
            capture,
            fps,
            frame_width,
        })
    }

    /// Frame rate of the opened video.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Frame width in pixels.
    pub fn frame_width(&self) -> u32 {
        self.frame_width
    }

    /// Seek to `frame_index` and decode that frame.
    ///
    /// Returns `Ok(None)` when the frame cannot be read (end of stream or a
    /// corrupt segment); the caller abandons further sampling for the
    /// current word in that case.
    pub fn read_frame(&mut self, frame_index: i64) -> MediaResult<Option<Mat>> {
        self.capture
            .set(videoio::CAP_PROP_POS_FRAMES, frame_index as f64)
            .map_err(|e| MediaError::InvalidVideo(format!("Seek to frame {frame_index}: {e}")))?;

        let mut frame = Mat::default();
        let read_ok = self
            .capture
            .read(&mut frame)
            .map_err(|e| MediaError::InvalidVideo(format!("Read frame {frame_index}: {e}")))?;

        if !read_ok || frame.empty() {
            debug!(frame_index, "Frame decode exhausted");
            return Ok(None);
        }

        Ok(Some(frame))
    }
}

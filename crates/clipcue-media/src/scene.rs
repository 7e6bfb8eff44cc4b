//! FFmpeg scene-cut detection.
//!
//! Runs the `select='gt(scene,T)'` filter over the whole video and collects
//! the presentation timestamp of every frame whose scene-change score
//! exceeds the threshold. The filter writes its metadata to a transient,
//! uniquely named log file which is parsed and removed afterwards.

use async_trait::async_trait;
use regex::Regex;
use std::path::Path;
use std::process::Stdio;
use std::sync::OnceLock;
use tokio::process::Command;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{MediaError, MediaResult};
use crate::probe;

/// Narrow capability interface over the external scene-cut and duration
/// tools, so boundary composition can be tested with synthetic values.
#[async_trait]
pub trait SceneProbe {
    /// Timestamps (seconds, ascending) at which the scene-change score
    /// exceeds `threshold`. May be empty.
    async fn detect_cuts(&self, video_path: &Path, threshold: f64) -> MediaResult<Vec<f64>>;

    /// Total video duration in seconds.
    async fn probe_duration(&self, video_path: &Path) -> MediaResult<f64>;
}

/// Detect the full ordered boundary list for a video: `0`, every cut above
/// `threshold`, and the total duration. Guarantees at least two boundaries
/// even when no cuts are found.
///
/// Cuts are de-duplicated defensively: any timestamp that does not strictly
/// increase the sequence is dropped.
pub async fn detect_scene_boundaries<S: SceneProbe + ?Sized>(
    probe: &S,
    video_path: &Path,
    threshold: f64,
) -> MediaResult<Vec<f64>> {
    if !(threshold > 0.0 && threshold < 1.0) {
        return Err(MediaError::scene_detection(
            format!("Scene threshold must be in (0, 1), got {threshold}"),
            None,
        ));
    }

    let cuts = probe.detect_cuts(video_path, threshold).await?;
    let duration = probe.probe_duration(video_path).await?;

    let boundaries = compose_boundaries(&cuts, duration);
    info!(
        cuts = cuts.len(),
        boundaries = boundaries.len(),
        duration,
        "Scene boundaries detected"
    );
    Ok(boundaries)
}

/// Build `[0, cuts..., duration]`, keeping the sequence strictly increasing.
fn compose_boundaries(cuts: &[f64], duration: f64) -> Vec<f64> {
    let mut boundaries = vec![0.0];
    let mut last = 0.0;
    for &cut in cuts {
        if cut > last && cut < duration {
            boundaries.push(cut);
            last = cut;
        }
    }
    if duration > last {
        boundaries.push(duration);
    }
    boundaries
}

/// FFmpeg-backed scene probe.
#[derive(Debug, Clone, Default)]
pub struct FfmpegSceneProbe;

impl FfmpegSceneProbe {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SceneProbe for FfmpegSceneProbe {
    async fn detect_cuts(&self, video_path: &Path, threshold: f64) -> MediaResult<Vec<f64>> {
        which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

        // The metadata filter can only write to a file, so use a uniquely
        // named transient log. The NamedTempFile guard removes it on every
        // exit path, including ffmpeg or parse failures.
        let log_file = tempfile::Builder::new()
            .prefix(&format!("clipcue-scene-{}-", Uuid::new_v4()))
            .suffix(".log")
            .tempfile()
            .map_err(|e| {
                MediaError::scene_detection(format!("Failed to create scene log: {e}"), None)
            })?;
        let log_path = log_file.path().to_string_lossy().to_string();

        let filter = format!("select='gt(scene,{threshold})',metadata=print:file={log_path}");
        debug!(filter = %filter, "Running ffmpeg scene detection");

        let output = Command::new("ffmpeg")
            .args(["-hide_banner", "-nostdin", "-loglevel", "error", "-i"])
            .arg(video_path)
            .args(["-filter_complex", &filter, "-f", "null", "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                MediaError::scene_detection(format!("Failed to spawn ffmpeg: {e}"), None)
            })?;

        if !output.status.success() {
            return Err(MediaError::scene_detection(
                format!("ffmpeg scene filter exited with {}", output.status),
                Some(String::from_utf8_lossy(&output.stderr).to_string()),
            ));
        }

        let log = tokio::fs::read_to_string(log_file.path()).await.map_err(|e| {
            MediaError::scene_detection(format!("Failed to read scene log: {e}"), None)
        })?;

        Ok(parse_pts_times(&log))
    }

    async fn probe_duration(&self, video_path: &Path) -> MediaResult<f64> {
        // A broken duration probe is fatal to boundary detection, so it
        // surfaces under the same error as the scene-cut tool.
        probe::get_duration(video_path).await.map_err(|e| match e {
            err @ MediaError::FileNotFound(_) => err,
            err => MediaError::scene_detection(
                format!("Duration probe failed: {err}"),
                None,
            ),
        })
    }
}

/// Extract every `pts_time:<float>` occurrence from the metadata log.
/// Zero matches is valid (a video with no detected cuts).
fn parse_pts_times(log: &str) -> Vec<f64> {
    static PTS_RE: OnceLock<Regex> = OnceLock::new();
    let re = PTS_RE.get_or_init(|| Regex::new(r"pts_time:([\d.]+)").expect("valid regex"));

    re.captures_iter(log)
        .filter_map(|cap| cap[1].parse::<f64>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_LOG: &str = "\
frame:123  pts:61550  pts_time:5.24
lavfi.scene_score=0.352170
frame:310  pts:154112 pts_time:9.881
lavfi.scene_score=0.128442
";

    #[test]
    fn test_parse_pts_times() {
        let times = parse_pts_times(SAMPLE_LOG);
        assert_eq!(times, vec![5.24, 9.881]);
    }

    #[test]
    fn test_parse_pts_times_empty_log() {
        assert!(parse_pts_times("").is_empty());
        assert!(parse_pts_times("no markers here\n").is_empty());
    }

    #[test]
    fn test_compose_boundaries_no_cuts() {
        assert_eq!(compose_boundaries(&[], 12.3), vec![0.0, 12.3]);
    }

    #[test]
    fn test_compose_boundaries_prepends_and_appends() {
        assert_eq!(
            compose_boundaries(&[5.0, 9.8], 12.3),
            vec![0.0, 5.0, 9.8, 12.3]
        );
    }

    #[test]
    fn test_compose_boundaries_drops_non_increasing() {
        // Duplicates from the external tool and cuts past the end are dropped.
        assert_eq!(
            compose_boundaries(&[5.0, 5.0, 4.0, 13.0], 12.3),
            vec![0.0, 5.0, 12.3]
        );
    }

    struct FakeProbe {
        cuts: Vec<f64>,
        duration: f64,
    }

    #[async_trait]
    impl SceneProbe for FakeProbe {
        async fn detect_cuts(&self, _: &Path, _: f64) -> MediaResult<Vec<f64>> {
            Ok(self.cuts.clone())
        }

        async fn probe_duration(&self, _: &Path) -> MediaResult<f64> {
            Ok(self.duration)
        }
    }

    #[tokio::test]
    async fn test_detect_scene_boundaries_with_fake_probe() {
        let probe = FakeProbe {
            cuts: vec![5.0],
            duration: 12.3,
        };
        let boundaries = detect_scene_boundaries(&probe, Path::new("video.mp4"), 0.1)
            .await
            .unwrap();
        assert_eq!(boundaries, vec![0.0, 5.0, 12.3]);
    }

    #[tokio::test]
    async fn test_detect_scene_boundaries_rejects_bad_threshold() {
        let probe = FakeProbe {
            cuts: vec![],
            duration: 10.0,
        };
        for threshold in [0.0, 1.0, -0.5, 2.0] {
            let err = detect_scene_boundaries(&probe, Path::new("video.mp4"), threshold)
                .await
                .unwrap_err();
            assert!(matches!(err, MediaError::SceneDetection { .. }));
        }
    }
}

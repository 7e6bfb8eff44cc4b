//! Clip generation binary.
//!
//! Reads a word-timestamped transcript, runs scene detection and speaker
//! localization over the video, and writes the annotated clip list as JSON.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use clipcue_media::{FfmpegSceneProbe, VideoObservationSource};
use clipcue_models::{ClipList, Word};
use clipcue_pipeline::{ClipPipeline, PipelineConfig};

/// Generate video clips using scene and speaker detection.
#[derive(Debug, Parser)]
#[command(name = "clipcue", version, about)]
struct Args {
    /// Path to the local video file
    #[arg(long)]
    video_path: PathBuf,

    /// Path to a JSON file containing the word list
    #[arg(long)]
    words_json: PathBuf,

    /// Path to the output JSON file (default: stdout)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Scene-change sensitivity, fraction in (0, 1)
    #[arg(long, default_value_t = PipelineConfig::default().scene_threshold)]
    scene_threshold: f64,
}

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("clipcue=info".parse().expect("valid directive"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();

    let words_raw = tokio::fs::read_to_string(&args.words_json)
        .await
        .with_context(|| format!("reading words file {}", args.words_json.display()))?;
    let words: Vec<Word> =
        serde_json::from_str(&words_raw).context("parsing words JSON")?;

    info!(
        video = %args.video_path.display(),
        words = words.len(),
        scene_threshold = args.scene_threshold,
        "Generating video clips"
    );

    let config = PipelineConfig {
        scene_threshold: args.scene_threshold,
        ..PipelineConfig::default()
    };

    let probe = FfmpegSceneProbe::new();
    let mut observer = VideoObservationSource::open(&args.video_path, config.face_confidence)
        .context("opening video and inference collaborators")?;

    let pipeline = ClipPipeline::new(config);
    let clips = pipeline
        .run(&probe, &mut observer, &args.video_path, &words)
        .await
        .context("running clip pipeline")?;

    let envelope = ClipList::from(clips);
    let json = serde_json::to_string_pretty(&envelope).context("serializing clips")?;

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, &json)
                .await
                .with_context(|| format!("writing output to {}", path.display()))?;
            info!(output = %path.display(), clips = envelope.clips.len(), "Wrote clip list");
        }
        None => println!("{json}"),
    }

    Ok(())
}

//! Speaker-localization pipeline core.
//!
//! Turns a raw video plus a word-timestamped transcript into scene-bounded
//! clips, each annotated with the horizontal screen position of the most
//! likely active speaker:
//!
//! 1. Scene boundaries from the external cut detector (`clipcue-media`)
//! 2. Clip assembly: words partitioned by boundary intervals
//! 3. Frame sampling: start/mid/end frames of a clip's first words
//! 4. Face observation extraction per sampled frame
//! 5. Speaker resolution: positional clustering scored by mouth aperture
//!
//! The orchestrator is generic over the `SceneProbe` and
//! `ObservationSource` seams so the whole flow runs against synthetic
//! collaborators in tests.

pub mod assembler;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod resolver;
pub mod sampler;

pub use assembler::assemble_clips;
pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use pipeline::ClipPipeline;
pub use resolver::resolve_speaker_position;
pub use sampler::sample_frames;

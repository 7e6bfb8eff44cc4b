//! Shared data models for the clipcue pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Transcript words with start/end timestamps
//! - Scene-bounded clips with resolved speaker positions
//! - Per-frame face observations

pub mod clip;
pub mod observation;
pub mod word;

// Re-export common types
pub use clip::{Clip, ClipList, DEFAULT_POSITION_X};
pub use observation::FaceObservation;
pub use word::{Word, WordId};

//! Incident Classification & Temporal Confirmation Engine
//!
//! Turns a stream of per-frame vehicle detections into a single video-level
//! verdict (none / congestion / accident / road blockage) with a confidence
//! score, suppressing transient false positives with a sliding window over
//! recent frames:
//! - fixed-stride frame sampling with screen-recording mode detection
//! - coarse speed and stationary-vehicle heuristics
//! - priority-ordered classification rules
//! - temporal confirmation against the recent frame history
//! - severity-scored result consolidation
//!
//! The engine owns no I/O; video decoding and the object detector are
//! external collaborators.

pub mod classifier;
pub mod config;
pub mod engine;
pub mod motion;
pub mod result;
pub mod sampler;

pub use classifier::{Classification, IncidentClassifier, IncidentType, SceneStats};
pub use config::EngineConfig;
pub use engine::{ClipVerdict, IncidentEngine, StreamMeta};
pub use result::{ConsolidatedResult, Severity};
pub use sampler::FrameSampler;

use detection::DetectorError;
use thiserror::Error;

/// Engine error types
#[derive(Error, Debug)]
pub enum EngineError {
    /// Malformed stream metadata; analysis aborts before any frame is read
    #[error("Invalid stream metadata: total_frames={total_frames}, fps={fps}")]
    InvalidInput { total_frames: u64, fps: f64 },

    /// The stream yielded zero decodable frames
    #[error("Stream yielded no decodable frames")]
    EmptyStream,

    /// The external detector failed; fatal for the whole video, no retry here
    #[error("Detector unavailable: {0}")]
    Detector(#[from] DetectorError),
}

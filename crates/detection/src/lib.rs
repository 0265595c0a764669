//! Vehicle detection layer
//!
//! Bridges the external object detector and the incident engine:
//! - typed vehicle classes, bounding boxes, and per-frame observations
//! - the `Detector` trait implemented by detector backends (YOLO, remote, mock)
//! - confidence/class filtering of raw detector output

pub mod filter;
pub mod object;

pub use filter::VehicleFilter;
pub use object::{
    AnalysisMode, BoundingBox, FrameObservation, RawDetection, VehicleClass, VehicleDetection,
};

use thiserror::Error;
use video_frame::VideoFrame;

/// Detector error types
#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Invalid frame format")]
    InvalidFrame,
}

/// External object detector invoked once per sampled frame.
///
/// Implementations own their model state; the engine treats a failed call as
/// fatal for the whole video and never retries on its own.
pub trait Detector {
    /// Detect objects in a frame, returning raw class/confidence/box triples
    fn detect(&mut self, frame: &VideoFrame) -> Result<Vec<RawDetection>, DetectorError>;
}

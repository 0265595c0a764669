//! Confidence and class filtering of raw detector output

use tracing::trace;
use video_frame::VideoFrame;

use crate::object::{AnalysisMode, FrameObservation, VehicleClass, VehicleDetection};
use crate::{Detector, DetectorError};

/// Reduces raw per-frame detector output to confidence-filtered vehicle
/// observations.
///
/// Screen-captured frames use a materially lower threshold to compensate for
/// the quality loss of re-encoded footage.
#[derive(Debug, Clone)]
pub struct VehicleFilter {
    standard_confidence: f32,
    screen_confidence: f32,
}

impl VehicleFilter {
    pub fn new(standard_confidence: f32, screen_confidence: f32) -> Self {
        Self {
            standard_confidence,
            screen_confidence,
        }
    }

    /// Confidence threshold active for the given mode
    pub fn active_threshold(&self, mode: AnalysisMode) -> f32 {
        match mode {
            AnalysisMode::Standard => self.standard_confidence,
            AnalysisMode::ScreenCapture => self.screen_confidence,
        }
    }

    /// Run the detector on one frame and filter the result.
    ///
    /// Returns `Ok(None)` when the detector yields zero results for the frame,
    /// which is a normal outcome, not an error. A frame where detections exist
    /// but none survive filtering still produces an observation with
    /// `vehicle_count() == 0`.
    pub fn observe<D: Detector>(
        &self,
        detector: &mut D,
        frame: &VideoFrame,
        frame_index: u64,
        mode: AnalysisMode,
    ) -> Result<Option<FrameObservation>, DetectorError> {
        let raw = detector.detect(frame)?;
        if raw.is_empty() {
            trace!(frame_index, "detector yielded no results");
            return Ok(None);
        }

        let threshold = self.active_threshold(mode);
        let vehicles: Vec<VehicleDetection> = raw
            .iter()
            .filter(|d| d.confidence >= threshold)
            .filter_map(|d| {
                VehicleClass::from_coco_id(d.class_id).map(|class| VehicleDetection::from_raw(d, class))
            })
            .collect();

        trace!(
            frame_index,
            raw = raw.len(),
            kept = vehicles.len(),
            "filtered frame detections"
        );

        Ok(Some(FrameObservation {
            frame_index,
            vehicles,
            mode,
        }))
    }
}

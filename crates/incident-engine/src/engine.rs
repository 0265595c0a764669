//! Engine entry points: full-video analysis and short-clip screening

use detection::{AnalysisMode, Detector, FrameObservation, VehicleFilter};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use video_frame::VideoFrame;

use crate::classifier::{IncidentClassifier, SceneStats};
use crate::config::EngineConfig;
use crate::result::ConsolidatedResult;
use crate::sampler::FrameSampler;
use crate::EngineError;

/// Stream metadata reported by the video-decoding collaborator
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StreamMeta {
    pub fps: f64,
    pub total_frames: u64,
}

/// Verdict of short-clip screening
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipVerdict {
    /// Whether the clip carries enough traffic activity to be worth storing
    pub has_relevant_data: bool,
    pub result: ConsolidatedResult,
}

/// The incident classification engine.
///
/// One `analyze` call processes one video as a single sequential pass. All
/// per-video state (observations, history window) is created inside the call,
/// so one engine instance can serve many videos and independent instances can
/// run concurrently without sharing mutable state.
#[derive(Debug, Clone)]
pub struct IncidentEngine {
    config: EngineConfig,
    filter: VehicleFilter,
    classifier: IncidentClassifier,
}

impl IncidentEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            filter: VehicleFilter::new(
                config.confidence_threshold,
                config.screen_confidence_threshold,
            ),
            classifier: IncidentClassifier::new(&config),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze a traffic video for incidents.
    ///
    /// `frames` is the decoded frame stream in chronological order; the
    /// detector is called once per sampled frame. Fatal conditions (invalid
    /// metadata, empty stream, detector failure) abort the whole analysis
    /// with no partial result.
    pub fn analyze<D, I>(
        &self,
        detector: &mut D,
        frames: I,
        meta: StreamMeta,
    ) -> Result<ConsolidatedResult, EngineError>
    where
        D: Detector,
        I: IntoIterator<Item = VideoFrame>,
    {
        let pass = self.collect_observations(detector, frames, meta, self.config.frame_skip)?;
        Ok(self.consolidate(&pass, meta.total_frames))
    }

    /// Quick screening for short clips (denser sampling stride).
    ///
    /// Applies a relevance gate before full consolidation so that clips with
    /// no meaningful traffic activity are rejected cheaply.
    pub fn analyze_clip<D, I>(
        &self,
        detector: &mut D,
        frames: I,
        meta: StreamMeta,
    ) -> Result<ClipVerdict, EngineError>
    where
        D: Detector,
        I: IntoIterator<Item = VideoFrame>,
    {
        let pass = self.collect_observations(detector, frames, meta, self.config.clip_frame_skip)?;

        if !has_relevant_activity(&pass.observations, pass.mode) {
            debug!("clip carries no relevant traffic activity");
            return Ok(ClipVerdict {
                has_relevant_data: false,
                result: ConsolidatedResult::empty(pass.mode, pass.frames_decoded, meta.total_frames),
            });
        }

        Ok(ClipVerdict {
            has_relevant_data: true,
            result: self.consolidate(&pass, meta.total_frames),
        })
    }

    fn collect_observations<D, I>(
        &self,
        detector: &mut D,
        frames: I,
        meta: StreamMeta,
        stride: u64,
    ) -> Result<AnalysisPass, EngineError>
    where
        D: Detector,
        I: IntoIterator<Item = VideoFrame>,
    {
        if meta.total_frames == 0 || meta.fps <= 0.0 {
            return Err(EngineError::InvalidInput {
                total_frames: meta.total_frames,
                fps: meta.fps,
            });
        }

        info!(
            total_frames = meta.total_frames,
            fps = meta.fps,
            "analyzing video stream"
        );

        let sampler = FrameSampler::with_stride(&self.config, stride);
        let mut mode = AnalysisMode::Standard;
        let mut observations: Vec<FrameObservation> = Vec::new();
        let mut frames_decoded: u64 = 0;

        for frame in frames {
            if frame.is_empty() {
                continue;
            }

            // Mode selection happens exactly once, on the first decoded frame.
            if frames_decoded == 0 {
                mode = sampler.detect_mode(&frame);
                if mode == AnalysisMode::ScreenCapture {
                    info!("detected screen recording, applying relaxed thresholds");
                }
            }

            if sampler.should_sample(frames_decoded) {
                if let Some(obs) = self.filter.observe(detector, &frame, frames_decoded, mode)? {
                    observations.push(obs);
                }
            }

            frames_decoded += 1;
        }

        if frames_decoded == 0 {
            return Err(EngineError::EmptyStream);
        }

        debug!(
            frames_decoded,
            frames_analyzed = observations.len(),
            ?mode,
            "frame pass complete"
        );

        Ok(AnalysisPass {
            observations,
            mode,
            frames_decoded,
        })
    }

    fn consolidate(&self, pass: &AnalysisPass, total_frames: u64) -> ConsolidatedResult {
        if pass.observations.is_empty() {
            // A vehicle-free or detection-free video is a valid outcome.
            return ConsolidatedResult::empty(pass.mode, pass.frames_decoded, total_frames);
        }

        let scene = SceneStats::from_observations(&pass.observations, pass.mode);
        let classification = self.classifier.classify(&pass.observations, &scene);

        ConsolidatedResult::consolidate(
            &scene,
            classification,
            pass.observations.len(),
            pass.frames_decoded,
            total_frames,
        )
    }
}

impl Default for IncidentEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Per-video state of one frame pass
struct AnalysisPass {
    observations: Vec<FrameObservation>,
    mode: AnalysisMode,
    frames_decoded: u64,
}

/// Whether a clip contains traffic activity worth storing.
///
/// Screen-captured clips use relaxed gates to match their weaker detections.
fn has_relevant_activity(observations: &[FrameObservation], mode: AnalysisMode) -> bool {
    if observations.is_empty() {
        return false;
    }

    let counts: Vec<f64> = observations
        .iter()
        .map(|o| o.vehicle_count() as f64)
        .collect();
    let avg = temporal_history::stats::mean(&counts);
    let max = counts.iter().cloned().fold(0.0f64, f64::max);

    match mode {
        AnalysisMode::Standard => avg >= 3.0 || max >= 5.0,
        AnalysisMode::ScreenCapture => avg >= 1.0 || max >= 2.0,
    }
}

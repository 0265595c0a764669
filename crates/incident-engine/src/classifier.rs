//! Priority-ordered incident classification with temporal confirmation

use detection::{AnalysisMode, FrameObservation};
use serde::{Deserialize, Serialize};
use temporal_history::{stats, HistoryEntry, HistoryWindow, VehicleTrend};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::motion;

/// Incident type detected for a video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentType {
    #[default]
    None,
    Congestion,
    Accident,
    RoadBlockage,
}

/// Video-level statistics the classification rules consume
#[derive(Debug, Clone, Copy)]
pub struct SceneStats {
    /// Mean vehicle count across analyzed frames
    pub avg_vehicle_count: f64,
    /// Peak vehicle count in any analyzed frame
    pub max_vehicle_count: u32,
    /// Heuristic traffic speed
    pub avg_speed: f64,
    /// Heuristic stationary vehicle count
    pub stationary_count: u32,
    /// Operating mode for the video
    pub mode: AnalysisMode,
}

impl SceneStats {
    pub fn from_observations(observations: &[FrameObservation], mode: AnalysisMode) -> Self {
        let counts: Vec<f64> = observations
            .iter()
            .map(|o| o.vehicle_count() as f64)
            .collect();

        Self {
            avg_vehicle_count: stats::mean(&counts),
            max_vehicle_count: observations
                .iter()
                .map(|o| o.vehicle_count() as u32)
                .max()
                .unwrap_or(0),
            avg_speed: motion::estimate_speed(observations),
            stationary_count: motion::count_stationary(observations),
            mode,
        }
    }
}

/// Thresholds active for one video, after mode adjustment.
///
/// Screen-captured footage halves the congestion and accident thresholds
/// (floored at 5 and 1) to compensate for degraded detection on re-encoded
/// frames.
#[derive(Debug, Clone, Copy)]
struct ActiveThresholds {
    congestion_vehicles: u32,
    congestion_speed: f64,
    accident_stationary: u32,
}

impl ActiveThresholds {
    fn for_mode(config: &EngineConfig, mode: AnalysisMode) -> Self {
        let mut congestion_vehicles = config.congestion_vehicle_threshold;
        let mut accident_stationary = config.accident_stationary_threshold;

        if mode == AnalysisMode::ScreenCapture {
            congestion_vehicles = (congestion_vehicles / 2).max(5);
            accident_stationary = (accident_stationary / 2).max(1);
        }

        Self {
            congestion_vehicles,
            congestion_speed: config.congestion_speed_threshold,
            accident_stationary,
        }
    }
}

/// A rule's verdict: an incident type with its raw confidence
#[derive(Debug, Clone, Copy)]
struct Candidate {
    incident: IncidentType,
    confidence: f64,
}

/// One named classification rule
struct Rule {
    name: &'static str,
    eval: fn(&SceneStats, &ActiveThresholds) -> Option<Candidate>,
}

/// Rules in ascending priority; the last matching rule wins. The ordering is
/// a deliberate contract: accident overrides congestion, road blockage
/// overrides both.
const RULES: &[Rule] = &[
    Rule {
        name: "congestion",
        eval: |scene, thresholds| {
            if scene.avg_vehicle_count >= thresholds.congestion_vehicles as f64
                && scene.avg_speed < thresholds.congestion_speed
            {
                Some(Candidate {
                    incident: IncidentType::Congestion,
                    confidence: (scene.avg_vehicle_count
                        / (thresholds.congestion_vehicles as f64 * 1.5))
                        .min(0.95),
                })
            } else {
                None
            }
        },
    },
    Rule {
        name: "accident",
        eval: |scene, thresholds| {
            if scene.stationary_count >= thresholds.accident_stationary {
                Some(Candidate {
                    incident: IncidentType::Accident,
                    confidence: (scene.stationary_count as f64
                        / (thresholds.accident_stationary as f64 * 2.0))
                        .min(0.95),
                })
            } else {
                None
            }
        },
    },
    Rule {
        name: "road_blockage",
        // Only fires on direct camera footage. The screen-capture path never
        // ran this check in the field; the asymmetry is preserved on purpose
        // rather than silently unified.
        eval: |scene, _thresholds| {
            if scene.mode == AnalysisMode::Standard
                && scene.avg_vehicle_count > 20.0
                && scene.avg_speed < 2.0
            {
                Some(Candidate {
                    incident: IncidentType::RoadBlockage,
                    confidence: 0.9,
                })
            } else {
                None
            }
        },
    },
];

/// Outcome of classification, after temporal adjustment
#[derive(Debug, Clone)]
pub struct Classification {
    pub incident: IncidentType,
    pub confidence: f64,
    /// Whether the incident was confirmed across recent frames
    pub temporal_confirmed: bool,
    /// Confidence boost applied on confirmation (0.0 or 0.1)
    pub confidence_boost: f64,
    /// Vehicle-count trend, when enough history accrued
    pub vehicle_trend: Option<VehicleTrend>,
}

impl Classification {
    fn none() -> Self {
        Self {
            incident: IncidentType::None,
            confidence: 0.0,
            temporal_confirmed: false,
            confidence_boost: 0.0,
            vehicle_trend: None,
        }
    }
}

/// Applies the threshold rules and adjusts the verdict with temporal
/// confirmation over the frame history.
#[derive(Debug, Clone)]
pub struct IncidentClassifier {
    config: EngineConfig,
}

impl IncidentClassifier {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Classify a video from its observations and scene statistics.
    ///
    /// A fresh history window is created per call, so no state leaks across
    /// videos.
    pub fn classify(&self, observations: &[FrameObservation], scene: &SceneStats) -> Classification {
        if observations.is_empty() {
            return Classification::none();
        }

        let thresholds = ActiveThresholds::for_mode(&self.config, scene.mode);
        let mut verdict = Candidate {
            incident: IncidentType::None,
            confidence: 0.0,
        };

        for rule in RULES {
            if let Some(candidate) = (rule.eval)(scene, &thresholds) {
                debug!(
                    rule = rule.name,
                    confidence = candidate.confidence,
                    "classification rule fired"
                );
                verdict = candidate;
            }
        }

        let mut classification = Classification {
            incident: verdict.incident,
            confidence: verdict.confidence,
            ..Classification::none()
        };

        if verdict.incident != IncidentType::None && observations.len() >= 10 {
            self.apply_temporal_confirmation(observations, &mut classification);
        }

        classification
    }

    /// Replay the frame observations into a history window and confirm or
    /// attenuate the verdict.
    fn apply_temporal_confirmation(
        &self,
        observations: &[FrameObservation],
        classification: &mut Classification,
    ) {
        let mut window = HistoryWindow::with_capacity(self.config.max_history);
        for obs in observations {
            window.push(HistoryEntry {
                confidence: classification.confidence,
                has_incident: classification.incident != IncidentType::None,
                vehicle_count: obs.vehicle_count() as u32,
            });
        }

        classification.temporal_confirmed = window.confirm_incident();

        if classification.temporal_confirmed {
            let sustained = window
                .confidence_trend()
                .map_or(false, |trend| trend.sustained);
            if sustained {
                classification.confidence_boost = 0.1;
                classification.confidence =
                    (classification.confidence + classification.confidence_boost).min(0.99);
                info!(
                    frames = observations.len(),
                    confidence = classification.confidence,
                    "incident sustained across frames, confidence boosted"
                );
            }
        } else {
            classification.confidence = (classification.confidence * 0.7).max(0.1);
            warn!(
                confidence = classification.confidence,
                "incident not consistent across frames, confidence reduced"
            );
        }

        classification.vehicle_trend = window.vehicle_trend();
    }
}

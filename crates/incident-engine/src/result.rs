//! Consolidated video-level result and severity mapping

use detection::AnalysisMode;
use serde::{Deserialize, Serialize};
use temporal_history::VehicleTrend;

use crate::classifier::{Classification, IncidentType, SceneStats};

/// Incident severity, derived from the final (temporally adjusted)
/// confidence and incident type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Map a final confidence to a severity level. Accidents rank one level
    /// above other incident types at the same confidence.
    pub fn from_confidence(confidence: f64, incident: IncidentType) -> Self {
        let accident = incident == IncidentType::Accident;
        if confidence > 0.7 {
            if accident {
                Severity::Critical
            } else {
                Severity::High
            }
        } else if confidence > 0.5 {
            if accident {
                Severity::High
            } else {
                Severity::Medium
            }
        } else if confidence > 0.3 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

/// The engine's single output per video
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidatedResult {
    pub incident_detected: bool,
    pub incident_type: IncidentType,
    pub confidence: f64,
    pub severity: Severity,
    /// Mean vehicle count, truncated
    pub vehicle_count: u32,
    pub max_vehicle_count: u32,
    /// Heuristic units, not calibrated speed
    pub avg_speed: f64,
    pub stationary_count: u32,
    /// Sampled frames that produced an observation
    pub frames_analyzed: usize,
    /// Frames successfully decoded from the stream
    pub frames_decoded: u64,
    /// Frame count reported by the stream metadata
    pub total_frames: u64,
    pub mode: AnalysisMode,
    pub temporal_confirmed: bool,
    pub confidence_boost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_trend: Option<VehicleTrend>,
}

impl ConsolidatedResult {
    /// The valid zero outcome for a video with no analyzable frames
    pub fn empty(mode: AnalysisMode, frames_decoded: u64, total_frames: u64) -> Self {
        Self {
            incident_detected: false,
            incident_type: IncidentType::None,
            confidence: 0.0,
            severity: Severity::Low,
            vehicle_count: 0,
            max_vehicle_count: 0,
            avg_speed: 0.0,
            stationary_count: 0,
            frames_analyzed: 0,
            frames_decoded,
            total_frames,
            mode,
            temporal_confirmed: false,
            confidence_boost: 0.0,
            vehicle_trend: None,
        }
    }

    /// Assemble the final report from scene statistics and the classification
    /// verdict. Pure aggregation, no further decision logic.
    pub fn consolidate(
        scene: &SceneStats,
        classification: Classification,
        frames_analyzed: usize,
        frames_decoded: u64,
        total_frames: u64,
    ) -> Self {
        Self {
            incident_detected: classification.incident != IncidentType::None,
            incident_type: classification.incident,
            confidence: classification.confidence,
            severity: Severity::from_confidence(classification.confidence, classification.incident),
            vehicle_count: scene.avg_vehicle_count as u32,
            max_vehicle_count: scene.max_vehicle_count,
            avg_speed: scene.avg_speed,
            stationary_count: scene.stationary_count,
            frames_analyzed,
            frames_decoded,
            total_frames,
            mode: scene.mode,
            temporal_confirmed: classification.temporal_confirmed,
            confidence_boost: classification.confidence_boost,
            vehicle_trend: classification.vehicle_trend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_mapping() {
        assert_eq!(
            Severity::from_confidence(0.8, IncidentType::Accident),
            Severity::Critical
        );
        assert_eq!(
            Severity::from_confidence(0.8, IncidentType::Congestion),
            Severity::High
        );
        assert_eq!(
            Severity::from_confidence(0.6, IncidentType::Accident),
            Severity::High
        );
        assert_eq!(
            Severity::from_confidence(0.6, IncidentType::RoadBlockage),
            Severity::Medium
        );
        assert_eq!(
            Severity::from_confidence(0.4, IncidentType::Congestion),
            Severity::Medium
        );
        assert_eq!(
            Severity::from_confidence(0.2, IncidentType::Congestion),
            Severity::Low
        );
        assert_eq!(
            Severity::from_confidence(0.0, IncidentType::None),
            Severity::Low
        );
    }

    #[test]
    fn test_severity_boundaries_exclusive() {
        // Mapping uses strict greater-than at each step.
        assert_eq!(
            Severity::from_confidence(0.7, IncidentType::Congestion),
            Severity::Medium
        );
        assert_eq!(
            Severity::from_confidence(0.5, IncidentType::Congestion),
            Severity::Medium
        );
        assert_eq!(
            Severity::from_confidence(0.3, IncidentType::Congestion),
            Severity::Low
        );
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn test_empty_result() {
        let result = ConsolidatedResult::empty(AnalysisMode::Standard, 42, 100);
        assert!(!result.incident_detected);
        assert_eq!(result.incident_type, IncidentType::None);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.severity, Severity::Low);
        assert_eq!(result.frames_decoded, 42);
        assert_eq!(result.total_frames, 100);
        assert!(result.vehicle_trend.is_none());
    }

    #[test]
    fn test_json_omits_missing_trend() {
        let result = ConsolidatedResult::empty(AnalysisMode::ScreenCapture, 0, 10);
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("vehicle_trend").is_none());
        assert_eq!(json["incident_type"], "none");
        assert_eq!(json["severity"], "low");
        assert_eq!(json["mode"], "screen_capture");
    }
}

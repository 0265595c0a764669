//! Coarse motion and stationarity heuristics
//!
//! Both estimates are acknowledged approximations, not measurements. No
//! identity tracking is performed: speed is inferred from detection density
//! and stationarity from count persistence across consecutive samples.
//! Replacing them with tracking-based estimates is a separate future
//! enhancement; behavioral parity matters here.

use detection::FrameObservation;
use temporal_history::stats;

/// Heuristic speed reported when there is too little data to infer anything
pub const DEFAULT_SPEED: f64 = 10.0;

/// Fraction of persistently present vehicles assumed stationary
const STATIONARY_FRACTION: f64 = 0.6;

fn vehicle_counts(observations: &[FrameObservation]) -> Vec<f64> {
    observations
        .iter()
        .map(|o| o.vehicle_count() as f64)
        .collect()
}

/// Estimate average traffic speed in heuristic units.
///
/// Inverse step relation between detection density and movement: the denser
/// the scene, the slower the traffic is assumed to flow.
pub fn estimate_speed(observations: &[FrameObservation]) -> f64 {
    if observations.len() < 2 {
        return DEFAULT_SPEED;
    }

    let avg_count = stats::mean(&vehicle_counts(observations));
    if avg_count > 15.0 {
        3.0
    } else if avg_count > 10.0 {
        5.0
    } else if avg_count > 5.0 {
        8.0
    } else {
        DEFAULT_SPEED
    }
}

/// Count vehicles that appear stationary across recent frames.
///
/// Vehicles persistently present in the last 3 samples are likely parked or
/// stopped; the minimum count over that span, scaled by 0.6, is the proxy.
pub fn count_stationary(observations: &[FrameObservation]) -> u32 {
    if observations.len() < 3 {
        return 0;
    }

    let persistent = observations[observations.len() - 3..]
        .iter()
        .map(|o| o.vehicle_count() as u32)
        .min()
        .unwrap_or(0);

    (persistent as f64 * STATIONARY_FRACTION) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use detection::AnalysisMode;

    fn obs_with_counts(counts: &[usize]) -> Vec<FrameObservation> {
        counts
            .iter()
            .enumerate()
            .map(|(i, &count)| FrameObservation {
                frame_index: i as u64 * 5,
                vehicles: vec![
                    detection::VehicleDetection {
                        class: detection::VehicleClass::Car,
                        confidence: 0.9,
                        bbox: detection::BoundingBox::new(0.0, 0.0, 10.0, 10.0),
                        center: (5.0, 5.0),
                    };
                    count
                ],
                mode: AnalysisMode::Standard,
            })
            .collect()
    }

    #[test]
    fn test_speed_default_with_few_observations() {
        assert_eq!(estimate_speed(&[]), DEFAULT_SPEED);
        assert_eq!(estimate_speed(&obs_with_counts(&[20])), DEFAULT_SPEED);
    }

    #[test]
    fn test_speed_density_steps() {
        assert_eq!(estimate_speed(&obs_with_counts(&[16, 16, 16])), 3.0);
        assert_eq!(estimate_speed(&obs_with_counts(&[12, 12, 12])), 5.0);
        assert_eq!(estimate_speed(&obs_with_counts(&[6, 6, 6])), 8.0);
        assert_eq!(estimate_speed(&obs_with_counts(&[2, 2, 2])), 10.0);
    }

    #[test]
    fn test_speed_step_boundaries() {
        // Steps use strict greater-than.
        assert_eq!(estimate_speed(&obs_with_counts(&[15, 15])), 5.0);
        assert_eq!(estimate_speed(&obs_with_counts(&[10, 10])), 8.0);
        assert_eq!(estimate_speed(&obs_with_counts(&[5, 5])), 10.0);
    }

    #[test]
    fn test_stationary_needs_three_frames() {
        assert_eq!(count_stationary(&obs_with_counts(&[10, 10])), 0);
    }

    #[test]
    fn test_stationary_uses_min_of_last_three() {
        // min(5, 8, 10) = 5, * 0.6 = 3 (truncated)
        assert_eq!(count_stationary(&obs_with_counts(&[20, 20, 5, 8, 10])), 3);
        // min(4, 4, 4) = 4, * 0.6 = 2.4 -> 2
        assert_eq!(count_stationary(&obs_with_counts(&[4, 4, 4])), 2);
        // A single empty frame in the tail zeroes the estimate.
        assert_eq!(count_stationary(&obs_with_counts(&[10, 0, 10])), 0);
    }
}

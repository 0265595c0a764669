//! Bounded FIFO history window and derived statistics

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::stats;

/// Default window capacity (frame summaries per video)
pub const DEFAULT_CAPACITY: usize = 30;

/// Minimum entries before trend statistics are available
const TREND_MIN_ENTRIES: usize = 5;

/// Minimum entries before incident confirmation is attempted
const CONFIRM_MIN_ENTRIES: usize = 10;

/// Trends and confirmation look at the last N entries only
const RECENT_SPAN: usize = 10;

/// Fraction of recent frames that must carry the incident for confirmation
const CONFIRMATION_RATIO: f64 = 0.3;

/// One window slot: the summary of a single sampled frame
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Classification confidence attributed to this frame
    pub confidence: f64,
    /// Whether an incident was flagged for this frame
    pub has_incident: bool,
    /// Vehicles detected in this frame
    pub vehicle_count: u32,
}

/// Direction of the recent confidence trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
}

/// Detection confidence over the recent window
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConfidenceTrend {
    pub average: f64,
    pub max: f64,
    /// Average confidence held above 0.3 across the recent entries
    pub sustained: bool,
    pub direction: TrendDirection,
}

/// Vehicle counts over the recent window
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VehicleTrend {
    pub average: f64,
    pub max: u32,
    pub min: u32,
    /// Low count variance (std dev < 2) indicates stable traffic
    pub stable: bool,
}

/// Sliding window of recent frame summaries with strict FIFO eviction.
///
/// Holds at most `capacity` entries; pushing onto a full window drops the
/// oldest entry. One window serves exactly one video analysis.
#[derive(Debug, Clone)]
pub struct HistoryWindow {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl HistoryWindow {
    /// Create a window holding at most `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a frame summary, evicting the oldest entry when full
    pub fn push(&mut self, entry: HistoryEntry) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Drop all entries (start of a new video)
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The last `RECENT_SPAN` entries in chronological order
    fn recent(&self) -> impl Iterator<Item = &HistoryEntry> {
        let skip = self.entries.len().saturating_sub(RECENT_SPAN);
        self.entries.iter().skip(skip)
    }

    /// Confidence trend over the recent entries.
    ///
    /// Unavailable until at least 5 entries have accumulated.
    pub fn confidence_trend(&self) -> Option<ConfidenceTrend> {
        if self.entries.len() < TREND_MIN_ENTRIES {
            return None;
        }

        let recent: Vec<f64> = self.recent().map(|e| e.confidence).collect();
        let average = stats::mean(&recent);
        let max = recent.iter().cloned().fold(f64::MIN, f64::max);
        let direction = if recent[recent.len() - 1] > recent[0] {
            TrendDirection::Increasing
        } else {
            TrendDirection::Decreasing
        };

        Some(ConfidenceTrend {
            average,
            max,
            sustained: average > 0.3,
            direction,
        })
    }

    /// Vehicle-count trend over the recent entries.
    ///
    /// Unavailable until at least 5 entries have accumulated.
    pub fn vehicle_trend(&self) -> Option<VehicleTrend> {
        if self.entries.len() < TREND_MIN_ENTRIES {
            return None;
        }

        let counts: Vec<u32> = self.recent().map(|e| e.vehicle_count).collect();
        let as_f64: Vec<f64> = counts.iter().map(|&c| c as f64).collect();

        Some(VehicleTrend {
            average: stats::mean(&as_f64),
            max: counts.iter().copied().max().unwrap_or(0),
            min: counts.iter().copied().min().unwrap_or(0),
            stable: stats::std_dev(&as_f64) < 2.0,
        })
    }

    /// Whether the incident is confirmed across recent frames.
    ///
    /// A single noisy frame must not flip the verdict: the incident has to
    /// appear in at least 30% of the last 10 sampled frames. With fewer than
    /// 10 entries there is not enough evidence and the answer is `false`.
    pub fn confirm_incident(&self) -> bool {
        if self.entries.len() < CONFIRM_MIN_ENTRIES {
            return false;
        }

        let recent: Vec<&HistoryEntry> = self.recent().collect();
        let incident_frames = recent.iter().filter(|e| e.has_incident).count();
        let ratio = incident_frames as f64 / recent.len() as f64;

        debug!(
            incident_frames,
            recent = recent.len(),
            ratio,
            "incident confirmation check"
        );
        ratio >= CONFIRMATION_RATIO
    }
}

impl Default for HistoryWindow {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(confidence: f64, has_incident: bool, vehicle_count: u32) -> HistoryEntry {
        HistoryEntry {
            confidence,
            has_incident,
            vehicle_count,
        }
    }

    #[test]
    fn test_fifo_eviction() {
        let mut window = HistoryWindow::with_capacity(3);
        for i in 0..5 {
            window.push(entry(i as f64, false, i));
        }
        assert_eq!(window.len(), 3);
        // Oldest two evicted: counts 2, 3, 4 remain.
        let counts: Vec<u32> = window.entries.iter().map(|e| e.vehicle_count).collect();
        assert_eq!(counts, vec![2, 3, 4]);
    }

    #[test]
    fn test_trend_requires_five_entries() {
        let mut window = HistoryWindow::default();
        for _ in 0..4 {
            window.push(entry(0.5, true, 10));
        }
        assert!(window.confidence_trend().is_none());
        assert!(window.vehicle_trend().is_none());

        window.push(entry(0.5, true, 10));
        assert!(window.confidence_trend().is_some());
        assert!(window.vehicle_trend().is_some());
    }

    #[test]
    fn test_confidence_trend_direction() {
        let mut window = HistoryWindow::default();
        for i in 0..8 {
            window.push(entry(0.1 * i as f64, false, 0));
        }
        let trend = window.confidence_trend().unwrap();
        assert_eq!(trend.direction, TrendDirection::Increasing);
        assert!((trend.max - 0.7).abs() < 1e-9);

        let mut window = HistoryWindow::default();
        for i in (0..8).rev() {
            window.push(entry(0.1 * i as f64, false, 0));
        }
        let trend = window.confidence_trend().unwrap();
        assert_eq!(trend.direction, TrendDirection::Decreasing);
    }

    #[test]
    fn test_trend_uses_last_ten_only() {
        let mut window = HistoryWindow::default();
        // 10 old high-confidence entries followed by 10 low ones.
        for _ in 0..10 {
            window.push(entry(0.9, false, 50));
        }
        for _ in 0..10 {
            window.push(entry(0.1, false, 1));
        }
        let trend = window.confidence_trend().unwrap();
        assert!((trend.average - 0.1).abs() < 1e-9);
        assert!(!trend.sustained);

        let vehicles = window.vehicle_trend().unwrap();
        assert_eq!(vehicles.max, 1);
        assert!(vehicles.stable);
    }

    #[test]
    fn test_sustained_threshold() {
        let mut window = HistoryWindow::default();
        for _ in 0..6 {
            window.push(entry(0.31, false, 0));
        }
        assert!(window.confidence_trend().unwrap().sustained);

        let mut window = HistoryWindow::default();
        for _ in 0..6 {
            window.push(entry(0.3, false, 0));
        }
        assert!(!window.confidence_trend().unwrap().sustained);
    }

    #[test]
    fn test_vehicle_trend_stability() {
        let mut window = HistoryWindow::default();
        for count in [10, 11, 10, 9, 10, 11] {
            window.push(entry(0.0, false, count));
        }
        assert!(window.vehicle_trend().unwrap().stable);

        let mut window = HistoryWindow::default();
        for count in [2, 20, 3, 18, 1, 25] {
            window.push(entry(0.0, false, count));
        }
        assert!(!window.vehicle_trend().unwrap().stable);
    }

    #[test]
    fn test_confirmation_requires_ten_entries() {
        let mut window = HistoryWindow::default();
        for _ in 0..9 {
            window.push(entry(0.9, true, 10));
        }
        assert!(!window.confirm_incident());

        window.push(entry(0.9, true, 10));
        assert!(window.confirm_incident());
    }

    #[test]
    fn test_confirmation_ratio_boundary() {
        // Exactly 3 of the last 10 flagged: ratio 0.3 confirms.
        let mut window = HistoryWindow::default();
        for i in 0..10 {
            window.push(entry(0.5, i < 3, 5));
        }
        assert!(window.confirm_incident());

        // Only 2 of 10: not confirmed.
        let mut window = HistoryWindow::default();
        for i in 0..10 {
            window.push(entry(0.5, i < 2, 5));
        }
        assert!(!window.confirm_incident());
    }

    #[test]
    fn test_clear_resets_window() {
        let mut window = HistoryWindow::default();
        for _ in 0..15 {
            window.push(entry(0.9, true, 10));
        }
        window.clear();
        assert!(window.is_empty());
        assert!(!window.confirm_incident());
        assert!(window.confidence_trend().is_none());
    }

    proptest! {
        #[test]
        fn prop_window_never_exceeds_capacity(
            capacity in 1usize..64,
            pushes in 0usize..256,
        ) {
            let mut window = HistoryWindow::with_capacity(capacity);
            for i in 0..pushes {
                window.push(entry(0.0, false, i as u32));
            }
            prop_assert!(window.len() <= capacity);
            prop_assert_eq!(window.len(), pushes.min(capacity));
        }

        #[test]
        fn prop_fifo_keeps_newest(
            capacity in 1usize..32,
            pushes in 1usize..128,
        ) {
            let mut window = HistoryWindow::with_capacity(capacity);
            for i in 0..pushes {
                window.push(entry(0.0, false, i as u32));
            }
            // Newest entry always present, entries are the trailing run.
            let first = window.entries.front().unwrap().vehicle_count as usize;
            let last = window.entries.back().unwrap().vehicle_count as usize;
            prop_assert_eq!(last, pushes - 1);
            prop_assert_eq!(first, pushes - window.len());
        }
    }
}

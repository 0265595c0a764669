//! Temporal History Tracking
//!
//! Smooths frame-level detection noise into a video-level judgment. A bounded
//! FIFO window of recent frame summaries backs three derived statistics:
//! confidence trend, vehicle-count trend, and incident confirmation (the
//! central false-positive suppression rule).

pub mod stats;
mod window;

pub use window::{
    ConfidenceTrend, HistoryEntry, HistoryWindow, TrendDirection, VehicleTrend, DEFAULT_CAPACITY,
};

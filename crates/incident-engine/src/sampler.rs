//! Frame sampling and operating-mode detection

use detection::AnalysisMode;
use tracing::debug;
use video_frame::VideoFrame;

use crate::config::EngineConfig;

/// Selects which decoded frames are forwarded for detection and classifies
/// the video source as direct camera footage or a screen recording.
///
/// Mode detection runs exactly once per video, on the first successfully
/// decoded frame, and is never re-evaluated.
#[derive(Debug, Clone)]
pub struct FrameSampler {
    frame_skip: u64,
    strip_px: u32,
    dark_brightness: f64,
}

impl FrameSampler {
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_stride(config, config.frame_skip)
    }

    /// Sampler with an explicit stride (short-clip screening uses a denser one)
    pub fn with_stride(config: &EngineConfig, stride: u64) -> Self {
        Self {
            frame_skip: stride.max(1),
            strip_px: config.border_strip_px,
            dark_brightness: config.dark_border_brightness,
        }
    }

    /// Whether the frame at this decode position gets full analysis
    pub fn should_sample(&self, frame_index: u64) -> bool {
        frame_index % self.frame_skip == 0
    }

    /// Classify the video source from its first decoded frame.
    ///
    /// Dark bars on two or more borders are the signature of screen-recorded
    /// footage (letterboxing, player chrome).
    pub fn detect_mode(&self, first_frame: &VideoFrame) -> AnalysisMode {
        let borders = first_frame.border_brightness(self.strip_px);
        let dark = borders.dark_count(self.dark_brightness);
        debug!(?borders, dark, "border brightness sampled");

        if dark >= 2 {
            AnalysisMode::ScreenCapture
        } else {
            AnalysisMode::Standard
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sampler() -> FrameSampler {
        FrameSampler::new(&EngineConfig::default())
    }

    #[test]
    fn test_fixed_stride() {
        let sampler = sampler();
        assert!(sampler.should_sample(0));
        assert!(!sampler.should_sample(1));
        assert!(!sampler.should_sample(4));
        assert!(sampler.should_sample(5));
        assert!(sampler.should_sample(100));
    }

    #[test]
    fn test_zero_stride_clamped() {
        let sampler = FrameSampler::with_stride(&EngineConfig::default(), 0);
        assert!(sampler.should_sample(0));
        assert!(sampler.should_sample(7));
    }

    #[test]
    fn test_bright_frame_is_standard() {
        let frame = VideoFrame::filled(64, 48, [160, 160, 160]);
        assert_eq!(sampler().detect_mode(&frame), AnalysisMode::Standard);
    }

    #[test]
    fn test_dark_borders_are_screen_capture() {
        // Fully dark frame: all four borders below the threshold.
        let frame = VideoFrame::filled(64, 48, [8, 8, 8]);
        assert_eq!(sampler().detect_mode(&frame), AnalysisMode::ScreenCapture);
    }

    #[test]
    fn test_one_dark_border_is_not_enough() {
        let mut frame = VideoFrame::filled(64, 48, [160, 160, 160]);
        // Darken only the top strip.
        for y in 0..10u32 {
            for x in 0..64u32 {
                let idx = ((y * 64 + x) * 3) as usize;
                frame.data[idx..idx + 3].copy_from_slice(&[4, 4, 4]);
            }
        }
        assert_eq!(sampler().detect_mode(&frame), AnalysisMode::Standard);
    }
}

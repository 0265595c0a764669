//! Decoded video frame types
//!
//! Provides the RGB frame representation shared by the sampling and detection
//! layers, plus the brightness helpers used to recognize screen-recorded footage.

mod frame;

pub use frame::{BorderBrightness, VideoFrame};

#[cfg(feature = "jpeg-decode")]
pub use frame::decode_jpeg;

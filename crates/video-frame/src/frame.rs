//! RGB video frame and brightness sampling

use serde::{Deserialize, Serialize};

/// Decoded RGB video frame
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// RGB pixel data (width * height * 3)
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
}

/// Mean brightness of the four outer border strips of a frame
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BorderBrightness {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl BorderBrightness {
    /// Number of borders darker than the given threshold
    pub fn dark_count(&self, threshold: f64) -> usize {
        [self.top, self.bottom, self.left, self.right]
            .iter()
            .filter(|&&b| b < threshold)
            .count()
    }
}

impl VideoFrame {
    /// Create a new video frame from raw RGB data
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(data.len(), (width * height * 3) as usize);
        Self {
            data,
            width,
            height,
        }
    }

    /// Create a frame filled with a single color (used heavily in tests)
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take((width * height * 3) as usize)
            .collect();
        Self {
            data,
            width,
            height,
        }
    }

    /// Whether the frame carries no pixel data
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() || self.width == 0 || self.height == 0
    }

    /// Get pixel at (x, y)
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 3) as usize;
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }

    /// Convert to grayscale
    pub fn to_grayscale(&self) -> Vec<u8> {
        let mut gray = Vec::with_capacity((self.width * self.height) as usize);
        for pixel in self.data.chunks(3) {
            // Luminance formula: 0.299*R + 0.587*G + 0.114*B
            let y = (pixel[0] as f32 * 0.299
                + pixel[1] as f32 * 0.587
                + pixel[2] as f32 * 0.114) as u8;
            gray.push(y);
        }
        gray
    }

    /// Crop a region of the frame
    pub fn crop(&self, x: u32, y: u32, w: u32, h: u32) -> Option<VideoFrame> {
        if x + w > self.width || y + h > self.height {
            return None;
        }

        let mut cropped = Vec::with_capacity((w * h * 3) as usize);
        for row in y..(y + h) {
            let start = ((row * self.width + x) * 3) as usize;
            let end = start + (w * 3) as usize;
            cropped.extend_from_slice(&self.data[start..end]);
        }

        Some(VideoFrame {
            data: cropped,
            width: w,
            height: h,
        })
    }

    /// Mean brightness over the whole frame
    pub fn mean_luma(&self) -> f64 {
        self.region_brightness(0, 0, self.width, self.height)
    }

    /// Mean brightness over a rectangular region, averaged across all channels.
    ///
    /// The region is clamped to the frame; an empty intersection yields 0.0.
    pub fn region_brightness(&self, x: u32, y: u32, w: u32, h: u32) -> f64 {
        let x_end = (x + w).min(self.width);
        let y_end = (y + h).min(self.height);
        if x >= x_end || y >= y_end {
            return 0.0;
        }

        let mut sum: u64 = 0;
        let mut count: u64 = 0;
        for row in y..y_end {
            let start = ((row * self.width + x) * 3) as usize;
            let end = ((row * self.width + x_end) * 3) as usize;
            for &byte in &self.data[start..end] {
                sum += byte as u64;
            }
            count += (end - start) as u64;
        }
        sum as f64 / count as f64
    }

    /// Mean brightness of the outer border strips (top, bottom, left, right).
    ///
    /// Dark borders on two or more sides are the signature of a screen
    /// recording with letterboxing or player chrome.
    pub fn border_brightness(&self, strip_px: u32) -> BorderBrightness {
        let strip = strip_px.min(self.width).min(self.height);
        if strip == 0 || self.is_empty() {
            return BorderBrightness::default();
        }

        BorderBrightness {
            top: self.region_brightness(0, 0, self.width, strip),
            bottom: self.region_brightness(0, self.height - strip, self.width, strip),
            left: self.region_brightness(0, 0, strip, self.height),
            right: self.region_brightness(self.width - strip, 0, strip, self.height),
        }
    }
}

/// Decode a JPEG frame to RGB
#[cfg(feature = "jpeg-decode")]
pub fn decode_jpeg(jpeg_data: &[u8]) -> Result<VideoFrame, image::ImageError> {
    use image::ImageFormat;

    let img = image::load_from_memory_with_format(jpeg_data, ImageFormat::Jpeg)?;
    let rgb = img.to_rgb8();

    Ok(VideoFrame {
        width: rgb.width(),
        height: rgb.height(),
        data: rgb.into_raw(),
    })
}

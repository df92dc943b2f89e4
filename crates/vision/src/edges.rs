use image::{GrayImage, Luma};
use video_ingest::Frame;

/// Canny hysteresis thresholds on the 8-bit intensity scale.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EdgeThresholds {
    pub low: f32,
    pub high: f32,
}

impl Default for EdgeThresholds {
    fn default() -> Self {
        Self {
            low: 100.0,
            high: 200.0,
        }
    }
}

/// Convert a BGR frame to single-channel intensity (ITU-R BT.601 weights).
///
/// Returns `None` when the buffer does not match the frame dimensions.
pub fn bgr_to_luma(frame: &Frame) -> Option<GrayImage> {
    if frame.width <= 0 || frame.height <= 0 || frame.data.len() != frame.expected_len() {
        return None;
    }

    let width = frame.width as u32;
    let height = frame.height as u32;
    let mut gray = GrayImage::new(width, height);
    for (pixel, bgr) in gray.pixels_mut().zip(frame.data.chunks_exact(3)) {
        let luma =
            0.114 * f32::from(bgr[0]) + 0.587 * f32::from(bgr[1]) + 0.299 * f32::from(bgr[2]);
        *pixel = Luma([luma.round().clamp(0.0, 255.0) as u8]);
    }
    Some(gray)
}

/// Binary edge map: 255 on detected edges, 0 elsewhere.
pub fn edge_map(gray: &GrayImage, thresholds: EdgeThresholds) -> GrayImage {
    imageproc::edges::canny(gray, thresholds.low, thresholds.high)
}

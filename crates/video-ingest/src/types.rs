use anyhow::Error;
use thiserror::Error;

/// Raw BGR frame captured from a video source.
#[derive(Clone, Debug)]
pub struct Frame {
    pub data: Vec<u8>,
    pub width: i32,
    pub height: i32,
    pub format: FrameFormat,
}

impl Frame {
    /// Number of bytes a tightly packed frame of this size occupies.
    pub fn expected_len(&self) -> usize {
        let channels = match self.format {
            FrameFormat::Bgr8 => 3,
        };
        (self.width.max(0) as usize) * (self.height.max(0) as usize) * channels
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameFormat {
    Bgr8,
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to open video source {uri:?}")]
    Open { uri: String },
    #[error("no frame returned by video source")]
    NoFrame,
    #[error(transparent)]
    Other(#[from] Error),
}

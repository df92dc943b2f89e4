//! OpenCV-backed camera handle.

use opencv::{
    core::{Mat, MatTraitConst, MatTraitConstManual},
    prelude::*,
    videoio::{self, VideoCapture, VideoCaptureTrait, VideoCaptureTraitConst},
};
use tracing::{debug, warn};

use crate::{
    source::{FrameSource, parse_device_index},
    types::{CaptureError, Frame, FrameFormat},
};

pub struct OpenCvCamera {
    cap: VideoCapture,
    uri: String,
    released: bool,
}

impl OpenCvCamera {
    /// Open a camera by index (`0`, `/dev/video0`) or any URI OpenCV accepts.
    pub fn open(uri: &str) -> Result<Self, CaptureError> {
        let cap = open_video_capture(uri)?;
        debug!("opened video source {uri}");
        Ok(Self {
            cap,
            uri: uri.to_string(),
            released: false,
        })
    }
}

impl FrameSource for OpenCvCamera {
    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        if self.released {
            return Err(CaptureError::NoFrame);
        }

        let mut frame = Mat::default();
        let grabbed = self
            .cap
            .read(&mut frame)
            .map_err(|e| CaptureError::Other(e.into()))?;
        if !grabbed {
            return Err(CaptureError::NoFrame);
        }

        let size = frame.size().map_err(|e| CaptureError::Other(e.into()))?;
        if size.width <= 0 || size.height <= 0 || frame.channels() != 3 {
            return Err(CaptureError::NoFrame);
        }

        let packed = if frame.is_continuous() {
            frame
        } else {
            frame
                .try_clone()
                .map_err(|e| CaptureError::Other(e.into()))?
        };
        let data = packed
            .data_bytes()
            .map_err(|e| CaptureError::Other(e.into()))?
            .to_vec();

        Ok(Frame {
            data,
            width: size.width,
            height: size.height,
            format: FrameFormat::Bgr8,
        })
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(err) = self.cap.release() {
            warn!("failed to release video source {}: {err}", self.uri);
        }
    }
}

impl Drop for OpenCvCamera {
    fn drop(&mut self) {
        self.release();
    }
}

/// Attempt to open a camera input either by index or URI.
fn open_video_capture(uri: &str) -> Result<VideoCapture, CaptureError> {
    if let Some(index) = parse_device_index(uri) {
        for backend in [videoio::CAP_V4L, videoio::CAP_ANY] {
            match VideoCapture::new(index, backend) {
                Ok(cap) => {
                    if cap.is_opened().map_err(|e| CaptureError::Other(e.into()))? {
                        return Ok(cap);
                    }
                }
                Err(err) => {
                    warn!("failed to open device #{index} with backend {backend}: {err}");
                }
            }
        }
    }

    for backend in [videoio::CAP_V4L, videoio::CAP_ANY] {
        match VideoCapture::from_file(uri, backend) {
            Ok(cap) => {
                if cap.is_opened().map_err(|e| CaptureError::Other(e.into()))? {
                    return Ok(cap);
                }
            }
            Err(err) => {
                warn!("failed to open {uri} with backend {backend}: {err}");
            }
        }
    }

    Err(CaptureError::Open {
        uri: uri.to_string(),
    })
}

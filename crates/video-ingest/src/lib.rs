//! Camera acquisition for single-shot captures.
//!
//! Frames are pulled on demand through [`FrameSource`]; the OpenCV-backed
//! [`OpenCvCamera`] is available with the `with-opencv` feature.

#[cfg(feature = "with-opencv")]
mod camera;
mod source;
mod types;

#[cfg(feature = "with-opencv")]
pub use camera::OpenCvCamera;
pub use source::{FrameSource, parse_device_index};
pub use types::{CaptureError, Frame, FrameFormat};

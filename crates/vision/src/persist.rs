//! On-disk artifacts for a single capture.
//!
//! Every successful capture writes `image_<ts>.jpg` (the frame as captured)
//! and `edges_<ts>.jpg` (its edge map) into one output directory, where `ts`
//! is the capture time in whole unix seconds. Two captures in the same second
//! resolve to the same paths and the later one overwrites the earlier.

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use image::{GenericImageView, GrayImage, PixelWithColorType, RgbImage, codecs::jpeg::JpegEncoder};
use thiserror::Error;
use tracing::{debug, info};
use video_ingest::Frame;

use crate::edges::{EdgeThresholds, bgr_to_luma, edge_map};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to create output directory {path:?}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("frame buffer does not match {width}x{height} BGR8")]
    InvalidFrame { width: i32, height: i32 },
    #[error("failed to encode {path:?}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to write {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Paths written for one capture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactPair {
    pub image: PathBuf,
    pub edges: PathBuf,
}

pub struct ArtifactWriter {
    output_dir: PathBuf,
    jpeg_quality: u8,
}

impl ArtifactWriter {
    pub fn new(output_dir: impl Into<PathBuf>, jpeg_quality: u8) -> Self {
        Self {
            output_dir: output_dir.into(),
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Create the output directory if it does not already exist.
    pub fn ensure_output_dir(&self) -> Result<(), PersistError> {
        fs::create_dir_all(&self.output_dir).map_err(|source| PersistError::CreateDir {
            path: self.output_dir.clone(),
            source,
        })
    }

    pub fn paths_for(&self, timestamp: i64) -> ArtifactPair {
        ArtifactPair {
            image: self.output_dir.join(format!("image_{timestamp}.jpg")),
            edges: self.output_dir.join(format!("edges_{timestamp}.jpg")),
        }
    }

    /// Write the captured frame, then its edge map.
    pub fn write_pair(&self, frame: &Frame, timestamp: i64) -> Result<ArtifactPair, PersistError> {
        let paths = self.paths_for(timestamp);
        let invalid = || PersistError::InvalidFrame {
            width: frame.width,
            height: frame.height,
        };

        let rgb = bgr_to_rgb(frame).ok_or_else(invalid)?;
        self.write_jpeg(&paths.image, &rgb)?;
        info!("Saved original image as {}", paths.image.display());

        let gray = bgr_to_luma(frame).ok_or_else(invalid)?;
        let edges: GrayImage = edge_map(&gray, EdgeThresholds::default());
        self.write_jpeg(&paths.edges, &edges)?;
        info!("Saved edges image as {}", paths.edges.display());

        Ok(paths)
    }

    fn write_jpeg<I>(&self, path: &Path, image: &I) -> Result<(), PersistError>
    where
        I: GenericImageView,
        I::Pixel: PixelWithColorType,
    {
        let write_err = |source| PersistError::Write {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(write_err)?;
        let mut writer = BufWriter::new(file);
        JpegEncoder::new_with_quality(&mut writer, self.jpeg_quality)
            .encode_image(image)
            .map_err(|source| PersistError::Encode {
                path: path.to_path_buf(),
                source,
            })?;
        writer.flush().map_err(write_err)?;
        debug!("wrote {}", path.display());
        Ok(())
    }
}

fn bgr_to_rgb(frame: &Frame) -> Option<RgbImage> {
    if frame.width <= 0 || frame.height <= 0 || frame.data.len() != frame.expected_len() {
        return None;
    }
    let mut rgb = Vec::with_capacity(frame.data.len());
    for chunk in frame.data.chunks_exact(3) {
        rgb.push(chunk[2]);
        rgb.push(chunk[1]);
        rgb.push(chunk[0]);
    }
    RgbImage::from_vec(frame.width as u32, frame.height as u32, rgb)
}

//! Frame post-processing and persistence for button-triggered captures.
//!
//! - `edges`: BGR → intensity conversion and Canny edge maps.
//! - `persist`: output directory handling and the per-capture JPEG pair.

pub mod edges;
pub mod persist;

pub use edges::{EdgeThresholds, bgr_to_luma, edge_map};
pub use persist::{ArtifactPair, ArtifactWriter, PersistError};

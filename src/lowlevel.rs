//! Building blocks for callers that post-process detections themselves.
//!
//! Most users only need [`DetectionEngine`](crate::DetectionEngine). These
//! exports cover IoU geometry, the default palette, and tensor layout
//! constants, for example to re-check overlaps after projecting detections.

pub use crate::candidate::geometry::{iou, BoxGeometry};
pub use crate::labels::{palette_color, PALETTE_SATURATION, PALETTE_VALUE};
pub use crate::tensor::BOX_CHANNELS;

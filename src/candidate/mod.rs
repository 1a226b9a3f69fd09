//! Detection candidates: IoU geometry, the output type, and suppression.

pub mod geometry;
pub(crate) mod nms;

use crate::labels::Rgb;
use geometry::BoxGeometry;

/// Final detection handed to the caller.
///
/// Coordinates are in normalized viewport space and are not clamped; the
/// caller owns projection into camera or screen space.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    /// Horizontal box center.
    pub center_x: f32,
    /// Vertical box center.
    pub center_y: f32,
    /// Box width.
    pub width: f32,
    /// Box height.
    pub height: f32,
    /// `objectness * class_prob` of the accepted proposal.
    pub confidence: f32,
    /// Index into the configured label table.
    pub class_index: usize,
    /// Label of `class_index`.
    pub class_label: String,
    /// Display color of `class_index`.
    pub display_color: Rgb,
}

impl Detection {
    /// Returns the box geometry of this detection.
    pub fn geometry(&self) -> BoxGeometry {
        BoxGeometry::new(self.center_x, self.center_y, self.width, self.height)
    }
}

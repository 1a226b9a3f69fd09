//! Detector configuration.

use crate::labels::{ClassTable, Rgb};
use crate::tensor::GridLayout;
use crate::util::{GridDetError, GridDetResult};
use std::collections::HashMap;

/// Configuration for a [`DetectionEngine`](crate::DetectionEngine).
///
/// The engine validates and freezes the configuration when it is built;
/// there is no way to change it afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorConfig {
    /// Cells per side of the output grid.
    pub grid_size: usize,
    /// Box slots predicted per cell.
    pub boxes_per_cell: usize,
    /// Number of classes in the shared class block.
    pub num_classes: usize,
    /// Gate applied to objectness and to `objectness * class_prob`.
    pub confidence_threshold: f32,
    /// Same-class overlaps above this IoU are suppressed.
    pub iou_threshold: f32,
    /// Maximum number of detections returned per call.
    pub max_detections: usize,
    /// Model input side length in pixels, used to normalize row-layout outputs.
    pub input_size: f32,
    /// Ordered class labels; length must equal `num_classes`.
    pub class_labels: Vec<String>,
    /// Optional display colors keyed by label.
    pub class_colors: Option<HashMap<String, Rgb>>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            grid_size: 7,
            boxes_per_cell: 2,
            num_classes: 0,
            confidence_threshold: 0.5,
            iou_threshold: 0.45,
            max_detections: 10,
            input_size: 640.0,
            class_labels: Vec::new(),
            class_colors: None,
        }
    }
}

impl DetectorConfig {
    /// Creates a default configuration for the given labels.
    ///
    /// `num_classes` is taken from the label count.
    pub fn with_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let class_labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        Self {
            num_classes: class_labels.len(),
            class_labels,
            ..Self::default()
        }
    }

    /// Returns the grid layout described by this configuration.
    pub fn layout(&self) -> GridLayout {
        GridLayout {
            grid_size: self.grid_size,
            boxes_per_cell: self.boxes_per_cell,
            num_classes: self.num_classes,
        }
    }

    /// Validates geometry, thresholds, and the label table length.
    pub fn validate(&self) -> GridDetResult<()> {
        if self.grid_size == 0 {
            return Err(GridDetError::InvalidConfig {
                reason: "grid_size must be > 0",
            });
        }
        if self.boxes_per_cell == 0 {
            return Err(GridDetError::InvalidConfig {
                reason: "boxes_per_cell must be > 0",
            });
        }
        if self.num_classes == 0 {
            return Err(GridDetError::InvalidConfig {
                reason: "num_classes must be > 0",
            });
        }
        if self.layout().checked_len().is_none() {
            return Err(GridDetError::InvalidConfig {
                reason: "grid layout size overflows usize",
            });
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(GridDetError::InvalidConfig {
                reason: "confidence_threshold must be in [0, 1]",
            });
        }
        if !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(GridDetError::InvalidConfig {
                reason: "iou_threshold must be in [0, 1]",
            });
        }
        if self.max_detections == 0 {
            return Err(GridDetError::InvalidConfig {
                reason: "max_detections must be > 0",
            });
        }
        if !self.input_size.is_finite() || self.input_size <= 0.0 {
            return Err(GridDetError::InvalidConfig {
                reason: "input_size must be finite and > 0",
            });
        }
        if self.class_labels.len() != self.num_classes {
            return Err(GridDetError::LabelCount {
                expected: self.num_classes,
                got: self.class_labels.len(),
            });
        }
        Ok(())
    }

    /// Validates the configuration and builds its class table.
    pub(crate) fn class_table(&self) -> GridDetResult<ClassTable> {
        self.validate()?;
        ClassTable::new(self.class_labels.clone(), self.class_colors.as_ref())
    }
}

//! Class label and display color table.
//!
//! Colors are stored in a table indexed by class index, so `color_for` is a
//! total lookup with no string hashing on the hot path. Labels without a
//! configured color take the palette entry for their index.

mod palette;

pub use palette::{palette_color, PALETTE_SATURATION, PALETTE_VALUE};

use crate::util::{GridDetError, GridDetResult};
use std::collections::HashMap;

/// 8-bit RGB display color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    /// Returns the red channel.
    pub fn r(&self) -> u8 {
        self.0[0]
    }

    /// Returns the green channel.
    pub fn g(&self) -> u8 {
        self.0[1]
    }

    /// Returns the blue channel.
    pub fn b(&self) -> u8 {
        self.0[2]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(value: [u8; 3]) -> Self {
        Rgb(value)
    }
}

/// Ordered class labels with one display color per class.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassTable {
    labels: Vec<String>,
    colors: Vec<Rgb>,
}

impl ClassTable {
    /// Color returned for an index outside the table.
    ///
    /// Detections produced by the engine never hit this entry; it exists so
    /// `color_for` stays total for arbitrary caller input.
    pub const DEFAULT_COLOR: Rgb = Rgb([255, 255, 255]);

    /// Builds a table from labels and optional per-label colors.
    ///
    /// Every key in `colors` must name a label in `labels`.
    pub fn new(labels: Vec<String>, colors: Option<&HashMap<String, Rgb>>) -> GridDetResult<Self> {
        if labels.is_empty() {
            return Err(GridDetError::InvalidConfig {
                reason: "class_labels must not be empty",
            });
        }

        let count = labels.len();
        let mut table: Vec<Rgb> = (0..count).map(|idx| palette_color(idx, count)).collect();

        if let Some(colors) = colors {
            for (label, color) in colors {
                let mut found = false;
                // Duplicate labels share the configured color.
                for (idx, name) in labels.iter().enumerate() {
                    if name == label {
                        table[idx] = *color;
                        found = true;
                    }
                }
                if !found {
                    return Err(GridDetError::UnknownColorLabel {
                        label: label.clone(),
                    });
                }
            }
        }

        Ok(Self {
            labels,
            colors: table,
        })
    }

    /// Parses a newline separated label list.
    ///
    /// Lines are trimmed and trailing blank lines are dropped, so a file that
    /// ends with a newline does not produce an extra class. A blank line
    /// between labels is rejected.
    pub fn from_label_text(
        text: &str,
        colors: Option<&HashMap<String, Rgb>>,
    ) -> GridDetResult<Self> {
        let mut labels: Vec<String> = text.split('\n').map(|line| line.trim().to_owned()).collect();
        while labels.last().is_some_and(|label| label.is_empty()) {
            labels.pop();
        }
        if labels.iter().any(|label| label.is_empty()) {
            return Err(GridDetError::InvalidConfig {
                reason: "label text contains a blank line between labels",
            });
        }
        Self::new(labels, colors)
    }

    /// Returns the number of classes.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns true if the table has no classes.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns the ordered labels.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Returns the label for `class_index`.
    pub fn label(&self, class_index: usize) -> Option<&str> {
        self.labels.get(class_index).map(String::as_str)
    }

    /// Returns the display color for `class_index`.
    pub fn color_for(&self, class_index: usize) -> Rgb {
        self.colors
            .get(class_index)
            .copied()
            .unwrap_or(Self::DEFAULT_COLOR)
    }
}

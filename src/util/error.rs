//! Error types for griddet.

use thiserror::Error;

/// Result alias for griddet operations.
pub type GridDetResult<T> = std::result::Result<T, GridDetError>;

/// Errors raised while building an engine or decoding a tensor.
///
/// Shape errors are terminal for the call that hit them and configuration
/// errors are terminal for construction; neither is retried internally.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GridDetError {
    /// A tensor dimension (or its backing length) disagrees with the
    /// configured geometry.
    #[error("tensor shape mismatch in {dim}: expected {expected}, got {got}")]
    ShapeMismatch {
        dim: &'static str,
        expected: usize,
        got: usize,
    },
    /// A configuration parameter is out of range.
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: &'static str },
    /// The label table length does not equal `num_classes`.
    #[error("label count mismatch: expected {expected} labels, got {got}")]
    LabelCount { expected: usize, got: usize },
    /// A color was configured for a label that is not in the label table.
    #[error("color configured for unknown label {label:?}")]
    UnknownColorLabel { label: String },
}

impl GridDetError {
    /// Returns true for errors raised at construction time.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            GridDetError::InvalidConfig { .. }
                | GridDetError::LabelCount { .. }
                | GridDetError::UnknownColorLabel { .. }
        )
    }
}

//! griddet decodes grid-encoded object detector outputs into ranked detections.
//!
//! The crate is the host-independent core of a camera → detector → overlay
//! pipeline: it takes the raw `[1, grid, grid, boxes * 5 + classes]` tensor a
//! model runtime produces, decodes box geometry with grid offsets and
//! log-scale sizes, gates on objectness and composed class confidence, and
//! runs class-aware non-maximum suppression with an output cap. Model
//! execution, camera capture, and rendering stay with the caller.
//!
//! ```
//! use griddet::{DetectionEngine, DetectorConfig, OwnedTensor};
//!
//! let engine = DetectionEngine::new(DetectorConfig::with_labels(["bottle", "can", "paper"]))?;
//! let tensor = OwnedTensor::zeros(engine.layout());
//! let detections = engine.infer_detections(tensor.data(), tensor.shape())?;
//! assert!(detections.is_empty());
//! # Ok::<(), griddet::GridDetError>(())
//! ```
//!
//! Parallel batch decoding is available with the `rayon` feature and stage
//! spans with the `tracing` feature.

mod candidate;
pub mod config;
mod decode;
pub mod engine;
pub mod labels;
pub mod lowlevel;
pub mod tensor;
mod trace;
pub mod util;

pub use candidate::Detection;
pub use config::DetectorConfig;
pub use decode::DecodeScratch;
pub use engine::DetectionEngine;
pub use labels::{ClassTable, Rgb};
pub use tensor::{GridLayout, OwnedTensor, RowTensorView, TensorView};
pub use util::{GridDetError, GridDetResult};

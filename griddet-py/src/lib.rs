//! Python bindings for the griddet detection decoding library.
//!
//! This module exposes the detection engine to Python via PyO3.

use std::collections::HashMap;

use numpy::{PyReadonlyArray3, PyReadonlyArray4, PyUntypedArrayMethods};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use griddet::{
    Detection as RustDetection, DetectionEngine as RustDetectionEngine,
    DetectorConfig as RustDetectorConfig, GridDetError, Rgb,
};

/// Convert a GridDetError to a Python exception.
fn to_py_err(err: GridDetError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// A detected object with normalized geometry.
#[pyclass]
#[derive(Clone)]
pub struct Detection {
    /// Horizontal box center in [0, 1] for in-image boxes.
    #[pyo3(get)]
    pub center_x: f32,
    /// Vertical box center.
    #[pyo3(get)]
    pub center_y: f32,
    /// Box width.
    #[pyo3(get)]
    pub width: f32,
    /// Box height.
    #[pyo3(get)]
    pub height: f32,
    /// Objectness times class probability.
    #[pyo3(get)]
    pub confidence: f32,
    /// Index into the label table.
    #[pyo3(get)]
    pub class_index: usize,
    /// Class label.
    #[pyo3(get)]
    pub label: String,
    /// Display color as an (r, g, b) tuple.
    #[pyo3(get)]
    pub color: (u8, u8, u8),
}

#[pymethods]
impl Detection {
    fn __repr__(&self) -> String {
        format!(
            "Detection(label='{}', confidence={:.4}, center=({:.3}, {:.3}), size=({:.3}, {:.3}))",
            self.label, self.confidence, self.center_x, self.center_y, self.width, self.height
        )
    }
}

impl From<RustDetection> for Detection {
    fn from(d: RustDetection) -> Self {
        let [r, g, b] = d.display_color.0;
        Self {
            center_x: d.center_x,
            center_y: d.center_y,
            width: d.width,
            height: d.height,
            confidence: d.confidence,
            class_index: d.class_index,
            label: d.class_label,
            color: (r, g, b),
        }
    }
}

/// Detector configuration.
#[pyclass]
#[derive(Clone)]
pub struct DetectorConfig {
    inner: RustDetectorConfig,
}

#[pymethods]
impl DetectorConfig {
    /// Create a new DetectorConfig.
    ///
    /// Args:
    ///     labels: Class labels in class-index order
    ///     grid_size: Cells per side of the output grid (default: 7)
    ///     boxes_per_cell: Box slots per cell (default: 2)
    ///     confidence_threshold: Gate for objectness and final confidence (default: 0.5)
    ///     iou_threshold: Same-class suppression threshold (default: 0.45)
    ///     max_detections: Maximum detections returned (default: 10)
    ///     input_size: Model input size for row-layout outputs (default: 640.0)
    ///     colors: Optional mapping from label to (r, g, b)
    #[new]
    #[pyo3(signature = (
        labels,
        grid_size = 7,
        boxes_per_cell = 2,
        confidence_threshold = 0.5,
        iou_threshold = 0.45,
        max_detections = 10,
        input_size = 640.0,
        colors = None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        labels: Vec<String>,
        grid_size: usize,
        boxes_per_cell: usize,
        confidence_threshold: f32,
        iou_threshold: f32,
        max_detections: usize,
        input_size: f32,
        colors: Option<HashMap<String, (u8, u8, u8)>>,
    ) -> PyResult<Self> {
        let class_colors = colors.map(|map| {
            map.into_iter()
                .map(|(label, (r, g, b))| (label, Rgb([r, g, b])))
                .collect()
        });
        let inner = RustDetectorConfig {
            grid_size,
            boxes_per_cell,
            confidence_threshold,
            iou_threshold,
            max_detections,
            input_size,
            class_colors,
            ..RustDetectorConfig::with_labels(labels)
        };
        inner.validate().map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Validate the configuration.
    fn validate(&self) -> PyResult<()> {
        self.inner.validate().map_err(to_py_err)
    }

    /// Expected grid tensor shape `(1, S, S, B*5 + C)`.
    #[getter]
    fn shape(&self) -> (usize, usize, usize, usize) {
        let [n, h, w, c] = self.inner.layout().shape();
        (n, h, w, c)
    }

    fn __repr__(&self) -> String {
        format!(
            "DetectorConfig(grid_size={}, boxes_per_cell={}, num_classes={}, confidence_threshold={}, iou_threshold={}, max_detections={})",
            self.inner.grid_size,
            self.inner.boxes_per_cell,
            self.inner.num_classes,
            self.inner.confidence_threshold,
            self.inner.iou_threshold,
            self.inner.max_detections
        )
    }
}

/// Decodes raw detector outputs into ranked detections.
#[pyclass]
pub struct DetectionEngine {
    inner: RustDetectionEngine,
}

#[pymethods]
impl DetectionEngine {
    /// Build an engine from a DetectorConfig.
    #[new]
    fn new(config: DetectorConfig) -> PyResult<Self> {
        let inner = RustDetectionEngine::new(config.inner).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Decode a grid output.
    ///
    /// Args:
    ///     tensor: 4D float32 numpy array (1 x S x S x channels)
    ///
    /// Returns:
    ///     List of Detection objects, sorted by confidence (best first)
    fn infer(&self, tensor: PyReadonlyArray4<'_, f32>) -> PyResult<Vec<Detection>> {
        let shape = tensor.shape().to_vec();
        let data = tensor.as_slice()?;
        let detections = self
            .inner
            .infer_detections(data, &shape)
            .map_err(to_py_err)?;
        Ok(detections.into_iter().map(Detection::from).collect())
    }

    /// Decode a pre-decoded row output.
    ///
    /// Args:
    ///     tensor: 3D float32 numpy array (1 x rows x (5 + num_classes))
    fn infer_rows(&self, tensor: PyReadonlyArray3<'_, f32>) -> PyResult<Vec<Detection>> {
        let shape = tensor.shape().to_vec();
        let data = tensor.as_slice()?;
        let detections = self
            .inner
            .infer_row_detections(data, &shape)
            .map_err(to_py_err)?;
        Ok(detections.into_iter().map(Detection::from).collect())
    }

    /// Decode several grid outputs in parallel.
    ///
    /// Args:
    ///     tensors: List of 4D float32 numpy arrays with the configured shape
    fn infer_batch(&self, tensors: Vec<PyReadonlyArray4<'_, f32>>) -> PyResult<Vec<Vec<Detection>>> {
        let expected = self.inner.layout().shape();
        let mut frames = Vec::with_capacity(tensors.len());
        for tensor in &tensors {
            if tensor.shape() != expected.as_slice() {
                return Err(PyValueError::new_err(format!(
                    "tensor shape {:?} does not match expected {:?}",
                    tensor.shape(),
                    expected
                )));
            }
            frames.push(tensor.as_slice()?);
        }
        let batched = self.inner.infer_batch(&frames).map_err(to_py_err)?;
        Ok(batched
            .into_iter()
            .map(|dets| dets.into_iter().map(Detection::from).collect())
            .collect())
    }

    /// Class labels in class-index order.
    #[getter]
    fn labels(&self) -> Vec<String> {
        self.inner.classes().labels().to_vec()
    }

    /// Display color for a class index as (r, g, b).
    fn color_for(&self, class_index: usize) -> (u8, u8, u8) {
        let [r, g, b] = self.inner.color_for(class_index).0;
        (r, g, b)
    }

    fn __repr__(&self) -> String {
        format!(
            "DetectionEngine(grid_size={}, num_classes={})",
            self.inner.config().grid_size,
            self.inner.config().num_classes
        )
    }
}

/// Convenience function to decode one grid output.
///
/// The grid size is taken from the tensor shape. For repeated decoding with
/// the same settings, build a DetectionEngine once instead.
///
/// Args:
///     tensor: 4D float32 numpy array (1 x S x S x channels)
///     labels: Class labels in class-index order
///     boxes_per_cell: Box slots per cell (default: 2)
///     confidence_threshold: Confidence gate (default: 0.5)
///     iou_threshold: Suppression threshold (default: 0.45)
///     max_detections: Maximum detections returned (default: 10)
///
/// Returns:
///     List of Detection objects, sorted by confidence (best first)
#[pyfunction]
#[pyo3(signature = (
    tensor,
    labels,
    boxes_per_cell = 2,
    confidence_threshold = 0.5,
    iou_threshold = 0.45,
    max_detections = 10
))]
fn detect(
    tensor: PyReadonlyArray4<'_, f32>,
    labels: Vec<String>,
    boxes_per_cell: usize,
    confidence_threshold: f32,
    iou_threshold: f32,
    max_detections: usize,
) -> PyResult<Vec<Detection>> {
    let shape = tensor.shape().to_vec();
    let engine = RustDetectionEngine::new(RustDetectorConfig {
        grid_size: shape[1],
        boxes_per_cell,
        confidence_threshold,
        iou_threshold,
        max_detections,
        ..RustDetectorConfig::with_labels(labels)
    })
    .map_err(to_py_err)?;

    let data = tensor.as_slice()?;
    let detections = engine.infer_detections(data, &shape).map_err(to_py_err)?;
    Ok(detections.into_iter().map(Detection::from).collect())
}

/// Python module for griddet detection decoding.
#[pymodule]
fn _griddet(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Detection>()?;
    m.add_class::<DetectorConfig>()?;
    m.add_class::<DetectionEngine>()?;
    m.add_function(wrap_pyfunction!(detect, m)?)?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}

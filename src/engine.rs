//! Detection engine: decode, gate, and suppress in one call.

use crate::candidate::nms::suppress;
use crate::candidate::Detection;
use crate::config::DetectorConfig;
use crate::decode::{decode_grid, decode_rows, DecodeScratch};
use crate::labels::{ClassTable, Rgb};
use crate::tensor::{GridLayout, RowTensorView, TensorView};
use crate::trace::{trace_event, trace_span};
use crate::util::GridDetResult;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Turns raw detector outputs into ranked, deduplicated detections.
///
/// The configuration is validated once in [`DetectionEngine::new`] and is
/// read-only afterwards, so one engine can serve many threads. Every call
/// owns its own proposal buffer.
#[derive(Clone, Debug)]
pub struct DetectionEngine {
    cfg: DetectorConfig,
    classes: ClassTable,
}

impl DetectionEngine {
    /// Validates `cfg` and builds an engine.
    pub fn new(cfg: DetectorConfig) -> GridDetResult<Self> {
        let classes = cfg.class_table()?;
        Ok(Self { cfg, classes })
    }

    /// Returns the configuration the engine was built with.
    pub fn config(&self) -> &DetectorConfig {
        &self.cfg
    }

    /// Returns the grid layout expected by [`infer_detections`](Self::infer_detections).
    pub fn layout(&self) -> GridLayout {
        self.cfg.layout()
    }

    /// Returns the class label and color table.
    pub fn classes(&self) -> &ClassTable {
        &self.classes
    }

    /// Returns the display color for `class_index`.
    pub fn color_for(&self, class_index: usize) -> Rgb {
        self.classes.color_for(class_index)
    }

    /// Decodes a `[1, grid, grid, channels]` tensor into detections.
    ///
    /// The result is sorted by descending confidence and holds at most
    /// `max_detections` entries. A shape that disagrees with the configured
    /// layout fails the call with no partial result.
    pub fn infer_detections(&self, data: &[f32], shape: &[usize]) -> GridDetResult<Vec<Detection>> {
        let mut scratch = DecodeScratch::new();
        self.infer_detections_with(data, shape, &mut scratch)
    }

    /// Same as [`infer_detections`](Self::infer_detections) but reuses `scratch`.
    pub fn infer_detections_with(
        &self,
        data: &[f32],
        shape: &[usize],
        scratch: &mut DecodeScratch,
    ) -> GridDetResult<Vec<Detection>> {
        let view = TensorView::new(data, shape, self.layout())?;
        Ok(self.infer_view(view, scratch))
    }

    /// Decodes an already validated tensor view.
    ///
    /// The view must have been built against this engine's layout; a view
    /// with a different layout is rejected.
    pub fn infer_tensor(&self, view: TensorView<'_>) -> GridDetResult<Vec<Detection>> {
        let view = TensorView::new(view.as_slice(), &view.shape(), self.layout())?;
        Ok(self.infer_view(view, &mut DecodeScratch::new()))
    }

    /// Decodes a pre-decoded `[1, rows, 5 + num_classes]` output.
    ///
    /// Row geometry is normalized by `input_size`; gating and suppression
    /// match the grid path.
    pub fn infer_row_detections(
        &self,
        data: &[f32],
        shape: &[usize],
    ) -> GridDetResult<Vec<Detection>> {
        let view = RowTensorView::new(data, shape, self.cfg.num_classes)?;
        let _span = trace_span!("infer_row_detections", rows = view.rows()).entered();

        let mut scratch = DecodeScratch::new();
        decode_rows(
            view,
            self.cfg.confidence_threshold,
            self.cfg.input_size,
            &mut scratch.proposals,
        );
        let detections = suppress(
            &mut scratch.proposals,
            self.cfg.iou_threshold,
            self.cfg.max_detections,
            &self.classes,
        );
        trace_event!("detections", count = detections.len());
        Ok(detections)
    }

    /// Decodes several frames in parallel.
    ///
    /// Output order matches input order and each entry equals what
    /// [`infer_detections`](Self::infer_detections) returns for that frame.
    #[cfg(feature = "rayon")]
    pub fn infer_batch(&self, frames: &[&[f32]]) -> GridDetResult<Vec<Vec<Detection>>> {
        let shape = self.layout().shape();
        frames
            .par_iter()
            .map_init(DecodeScratch::new, |scratch, data| {
                self.infer_detections_with(data, &shape, scratch)
            })
            .collect()
    }

    fn infer_view(&self, view: TensorView<'_>, scratch: &mut DecodeScratch) -> Vec<Detection> {
        let _span = trace_span!("infer_detections", grid = self.cfg.grid_size).entered();

        decode_grid(view, self.cfg.confidence_threshold, &mut scratch.proposals);
        let detections = suppress(
            &mut scratch.proposals,
            self.cfg.iou_threshold,
            self.cfg.max_detections,
            &self.classes,
        );
        scratch.proposals.clear();

        trace_event!("detections", count = detections.len());
        detections
    }
}

//! Decoding of raw detector outputs into scored proposals.
//!
//! Both decoders apply the same two-stage confidence gate: a box slot whose
//! objectness does not exceed the threshold is skipped before its class block
//! is scanned, and a surviving slot is dropped again if
//! `objectness * class_prob` does not exceed the threshold.

use crate::candidate::geometry::BoxGeometry;
use crate::tensor::{RowTensorView, TensorView, BOX_CHANNELS};
use crate::trace::{trace_event, trace_span};
use crate::util::math::argmax;

/// Scored box proposal prior to suppression.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Proposal {
    pub(crate) geometry: BoxGeometry,
    /// `objectness * class_prob`.
    pub(crate) confidence: f32,
    pub(crate) class_index: usize,
    /// Position in decode order; breaks confidence ties.
    pub(crate) order: usize,
}

/// Reusable proposal buffer.
///
/// Passing the same scratch to repeated engine calls keeps the proposal
/// allocation alive across frames. It never carries results between calls.
#[derive(Debug, Default)]
pub struct DecodeScratch {
    pub(crate) proposals: Vec<Proposal>,
}

impl DecodeScratch {
    /// Creates an empty scratch buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scratch buffer with room for `capacity` proposals.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            proposals: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of proposals the buffer can hold without growing.
    pub fn capacity(&self) -> usize {
        self.proposals.capacity()
    }
}

/// Gated class selection shared by both decoders.
///
/// Returns `(class_index, confidence)` when the composed confidence passes
/// the threshold.
#[inline]
fn score_slot(objectness: f32, class_block: &[f32], threshold: f32) -> Option<(usize, f32)> {
    let (class_index, class_prob) = argmax(class_block)?;
    let confidence = objectness * class_prob;
    if confidence > threshold {
        Some((class_index, confidence))
    } else {
        None
    }
}

/// Decodes a grid tensor into `out`, clearing it first.
///
/// Cells are scanned with `cy` outer and `cx` inner, box slots innermost;
/// `Proposal::order` records that position.
pub(crate) fn decode_grid(tensor: TensorView<'_>, threshold: f32, out: &mut Vec<Proposal>) {
    let layout = tensor.layout();
    let _span = trace_span!(
        "decode_grid",
        grid = layout.grid_size,
        boxes = layout.boxes_per_cell,
        classes = layout.num_classes
    )
    .entered();

    out.clear();
    let grid = layout.grid_size as f32;
    let class_offset = layout.class_offset();

    for (cy, cx, cell) in tensor.cells() {
        let (slots, class_block) = cell.split_at(class_offset);
        for (b, slot) in slots.chunks_exact(BOX_CHANNELS).enumerate() {
            let order = ((cy * layout.grid_size + cx) * layout.boxes_per_cell) + b;
            let objectness = slot[4];
            if objectness.is_nan() || objectness <= threshold {
                continue;
            }

            let Some((class_index, confidence)) =
                score_slot(objectness, class_block, threshold)
            else {
                continue;
            };

            let geometry = BoxGeometry::new(
                (slot[0] + cx as f32) / grid,
                (slot[1] + cy as f32) / grid,
                slot[2].exp() / grid,
                slot[3].exp() / grid,
            );
            out.push(Proposal {
                geometry,
                confidence,
                class_index,
                order,
            });
        }
    }

    trace_event!("decoded_proposals", count = out.len());
}

/// Decodes a pre-decoded row tensor into `out`, clearing it first.
///
/// Row geometry is in model-input pixels and is divided by `input_size`.
pub(crate) fn decode_rows(
    tensor: RowTensorView<'_>,
    threshold: f32,
    input_size: f32,
    out: &mut Vec<Proposal>,
) {
    let _span = trace_span!("decode_rows", rows = tensor.rows()).entered();

    out.clear();
    for (order, row) in tensor.iter_rows().enumerate() {
        let (slot, class_block) = row.split_at(BOX_CHANNELS);
        let objectness = slot[4];
        if objectness.is_nan() || objectness <= threshold {
            continue;
        }
        let Some((class_index, confidence)) =
            score_slot(objectness, class_block, threshold)
        else {
            continue;
        };

        let geometry = BoxGeometry::new(
            slot[0] / input_size,
            slot[1] / input_size,
            slot[2] / input_size,
            slot[3] / input_size,
        );
        out.push(Proposal {
            geometry,
            confidence,
            class_index,
            order,
        });
    }

    trace_event!("decoded_proposals", count = out.len());
}

//! Class-aware non-maximum suppression with an output cap.

use std::cmp::Ordering;

use crate::candidate::geometry::iou;
use crate::candidate::Detection;
use crate::decode::Proposal;
use crate::labels::ClassTable;
use crate::trace::{trace_event, trace_span};

fn proposal_cmp_desc(a: &Proposal, b: &Proposal) -> Ordering {
    b.confidence
        .total_cmp(&a.confidence)
        .then_with(|| a.order.cmp(&b.order))
}

/// Sorts proposals by descending confidence, earlier decode order first on ties.
pub(crate) fn sort_proposals_desc(proposals: &mut [Proposal]) {
    proposals.sort_by(proposal_cmp_desc);
}

/// Suppresses same-class overlaps and returns at most `max_detections`.
///
/// Proposals are ranked by confidence. Each surviving proposal is accepted
/// and then suppresses every lower-ranked proposal of the same class whose
/// IoU with it exceeds `iou_threshold`. Proposals of different classes never
/// suppress each other. Ranking stops as soon as the cap is reached, so a
/// later proposal of another class can be dropped by the cap alone.
pub(crate) fn suppress(
    proposals: &mut [Proposal],
    iou_threshold: f32,
    max_detections: usize,
    classes: &ClassTable,
) -> Vec<Detection> {
    let _span = trace_span!(
        "suppress",
        proposals = proposals.len(),
        max = max_detections
    )
    .entered();

    sort_proposals_desc(proposals);

    let mut suppressed = vec![false; proposals.len()];
    let mut accepted = Vec::with_capacity(max_detections.min(proposals.len()));

    for i in 0..proposals.len() {
        if accepted.len() >= max_detections {
            break;
        }
        if suppressed[i] {
            continue;
        }

        let best = &proposals[i];
        accepted.push(to_detection(best, classes));

        for (j, other) in proposals.iter().enumerate().skip(i + 1) {
            if suppressed[j] || other.class_index != best.class_index {
                continue;
            }
            if iou(&best.geometry, &other.geometry) > iou_threshold {
                suppressed[j] = true;
            }
        }
    }

    trace_event!("suppressed", accepted = accepted.len());
    accepted
}

fn to_detection(proposal: &Proposal, classes: &ClassTable) -> Detection {
    let g = proposal.geometry;
    Detection {
        center_x: g.center_x,
        center_y: g.center_y,
        width: g.width,
        height: g.height,
        confidence: proposal.confidence,
        class_index: proposal.class_index,
        class_label: classes
            .label(proposal.class_index)
            .unwrap_or_default()
            .to_owned(),
        display_color: classes.color_for(proposal.class_index),
    }
}

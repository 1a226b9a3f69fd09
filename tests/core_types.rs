use griddet::lowlevel::{iou, palette_color, BoxGeometry};
use griddet::{
    ClassTable, DetectionEngine, DetectorConfig, GridDetError, GridLayout, OwnedTensor, Rgb,
    RowTensorView, TensorView,
};
use std::collections::HashMap;

const LAYOUT: GridLayout = GridLayout {
    grid_size: 3,
    boxes_per_cell: 2,
    num_classes: 4,
};

#[test]
fn layout_channel_arithmetic() {
    assert_eq!(LAYOUT.channels(), 14);
    assert_eq!(LAYOUT.shape(), [1, 3, 3, 14]);
}

#[test]
fn tensor_view_rejects_wrong_rank() {
    let data = vec![0.0f32; 3 * 3 * 14];
    let err = TensorView::new(&data, &[3, 3, 14], LAYOUT).unwrap_err();
    assert_eq!(
        err,
        GridDetError::ShapeMismatch {
            dim: "rank",
            expected: 4,
            got: 3,
        }
    );
}

#[test]
fn tensor_view_rejects_batched_input() {
    let data = vec![0.0f32; 2 * 3 * 3 * 14];
    let err = TensorView::new(&data, &[2, 3, 3, 14], LAYOUT).unwrap_err();
    assert_eq!(
        err,
        GridDetError::ShapeMismatch {
            dim: "batch",
            expected: 1,
            got: 2,
        }
    );
}

#[test]
fn tensor_view_rejects_non_square_grid() {
    let data = vec![0.0f32; 3 * 4 * 14];
    let err = TensorView::new(&data, &[1, 3, 4, 14], LAYOUT).unwrap_err();
    assert_eq!(
        err,
        GridDetError::ShapeMismatch {
            dim: "width",
            expected: 3,
            got: 4,
        }
    );
}

#[test]
fn tensor_view_cell_access() {
    let data: Vec<f32> = (0..3 * 3 * 14).map(|v| v as f32).collect();
    let view = TensorView::from_slice(&data, LAYOUT).unwrap();
    assert_eq!(view.shape(), [1, 3, 3, 14]);
    let cell = view.cell(2, 1).unwrap();
    assert_eq!(cell.len(), 14);
    assert_eq!(cell[0], ((2 * 3 + 1) * 14) as f32);
    assert!(view.cell(1, 3).is_none());
}

#[test]
fn row_view_rejects_batch_and_length() {
    let data = vec![0.0f32; 18];
    assert_eq!(
        RowTensorView::new(&data, &[2, 1, 9], 4).unwrap_err(),
        GridDetError::ShapeMismatch {
            dim: "batch",
            expected: 1,
            got: 2,
        }
    );
    assert_eq!(
        RowTensorView::new(&data, &[1, 3, 9], 4).unwrap_err(),
        GridDetError::ShapeMismatch {
            dim: "data length",
            expected: 27,
            got: 18,
        }
    );
}

#[test]
fn owned_tensor_zeros_matches_layout() {
    let tensor = OwnedTensor::zeros(LAYOUT);
    assert_eq!(tensor.data().len(), 126);
    assert!(tensor.grid_view(LAYOUT).is_ok());
}

#[test]
fn class_table_colors_are_total() {
    let mut colors = HashMap::new();
    colors.insert("paper".to_string(), Rgb([0, 128, 255]));
    let table = ClassTable::new(
        vec!["bottle".into(), "can".into(), "paper".into()],
        Some(&colors),
    )
    .unwrap();

    assert_eq!(table.len(), 3);
    assert_eq!(table.color_for(2), Rgb([0, 128, 255]));
    assert_eq!(table.color_for(1), palette_color(1, 3));
    assert_eq!(table.color_for(99), ClassTable::DEFAULT_COLOR);
}

#[test]
fn engine_rejects_color_for_unknown_label() {
    let mut colors = HashMap::new();
    colors.insert("glass".to_string(), Rgb([1, 1, 1]));
    let err = DetectionEngine::new(DetectorConfig {
        class_colors: Some(colors),
        ..DetectorConfig::with_labels(["bottle", "can"])
    })
    .unwrap_err();
    assert!(err.is_config_error());
}

#[test]
fn engine_exposes_frozen_config() {
    let cfg = DetectorConfig {
        iou_threshold: 0.3,
        ..DetectorConfig::with_labels(["bottle"])
    };
    let engine = DetectionEngine::new(cfg.clone()).unwrap();
    assert_eq!(engine.config(), &cfg);
    assert_eq!(engine.classes().labels(), &["bottle"]);
    assert_eq!(engine.layout().channels(), 2 * 5 + 1);
}

#[test]
fn iou_is_symmetric() {
    let a = BoxGeometry::new(0.4, 0.5, 0.3, 0.2);
    let b = BoxGeometry::new(0.5, 0.45, 0.2, 0.3);
    assert!((iou(&a, &b) - iou(&b, &a)).abs() < 1e-7);
    assert!(iou(&a, &b) > 0.0 && iou(&a, &b) < 1.0);
}

//! Integration tests replaying hand-computed decoding cases.
//!
//! Each case under `tests/data` describes a sparse tensor (only the box slots
//! and class blocks that are non-zero) together with the detections the
//! engine must return for it.

use griddet::{DetectionEngine, DetectorConfig, GridLayout, OwnedTensor};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Tolerance for geometry and confidence values written with six decimals.
const VALUE_TOLERANCE: f32 = 1e-4;

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    case_id: String,
    file: String,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    cases: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize)]
struct CaseConfig {
    grid_size: usize,
    boxes_per_cell: usize,
    confidence_threshold: f32,
    iou_threshold: f32,
    max_detections: usize,
    labels: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct BoxEntry {
    cell: [usize; 2],
    slot: usize,
    values: [f32; 5],
}

#[derive(Debug, Deserialize)]
struct ClassEntry {
    cell: [usize; 2],
    probs: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct Expected {
    center_x: f32,
    center_y: f32,
    width: f32,
    height: f32,
    confidence: f32,
    label: String,
}

#[derive(Debug, Deserialize)]
struct Case {
    case_id: String,
    config: CaseConfig,
    #[serde(default)]
    boxes: Vec<BoxEntry>,
    #[serde(default)]
    classes: Vec<ClassEntry>,
    expected: Vec<Expected>,
}

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
}

fn discover_cases() -> Vec<(String, PathBuf)> {
    let dir = data_dir();
    let manifest_text =
        fs::read_to_string(dir.join("manifest.json")).expect("Failed to read manifest");
    let manifest: Manifest =
        serde_json::from_str(&manifest_text).expect("Failed to parse manifest");
    manifest
        .cases
        .into_iter()
        .map(|entry| (entry.case_id, dir.join(entry.file)))
        .collect()
}

fn cell_base(layout: GridLayout, cell: [usize; 2]) -> usize {
    (cell[0] * layout.grid_size + cell[1]) * layout.channels()
}

fn build_tensor(case: &Case, layout: GridLayout) -> OwnedTensor {
    let mut tensor = OwnedTensor::zeros(layout);
    let data = tensor.data_mut();
    for entry in &case.boxes {
        let start = cell_base(layout, entry.cell) + entry.slot * 5;
        data[start..start + 5].copy_from_slice(&entry.values);
    }
    for entry in &case.classes {
        let start = cell_base(layout, entry.cell) + layout.boxes_per_cell * 5;
        data[start..start + entry.probs.len()].copy_from_slice(&entry.probs);
    }
    tensor
}

fn close(got: f32, want: f32) -> bool {
    (got - want).abs() <= VALUE_TOLERANCE
}

fn run_case(path: &Path) -> Result<(), String> {
    let text = fs::read_to_string(path).map_err(|e| format!("Failed to read case: {}", e))?;
    let case: Case =
        serde_json::from_str(&text).map_err(|e| format!("Failed to parse case: {}", e))?;

    let engine = DetectionEngine::new(DetectorConfig {
        grid_size: case.config.grid_size,
        boxes_per_cell: case.config.boxes_per_cell,
        confidence_threshold: case.config.confidence_threshold,
        iou_threshold: case.config.iou_threshold,
        max_detections: case.config.max_detections,
        ..DetectorConfig::with_labels(case.config.labels.iter().cloned())
    })
    .map_err(|e| format!("Invalid config: {}", e))?;

    let tensor = build_tensor(&case, engine.layout());
    let detections = engine
        .infer_detections(tensor.data(), tensor.shape())
        .map_err(|e| format!("Inference failed: {}", e))?;

    if detections.len() != case.expected.len() {
        return Err(format!(
            "{}: expected {} detections, got {}",
            case.case_id,
            case.expected.len(),
            detections.len()
        ));
    }

    for (idx, (got, want)) in detections.iter().zip(case.expected.iter()).enumerate() {
        let matches = close(got.center_x, want.center_x)
            && close(got.center_y, want.center_y)
            && close(got.width, want.width)
            && close(got.height, want.height)
            && close(got.confidence, want.confidence)
            && got.class_label == want.label;
        if !matches {
            return Err(format!(
                "{}: detection {} mismatch: got {:?}, expected {:?}",
                case.case_id, idx, got, want
            ));
        }
    }
    Ok(())
}

#[test]
fn fixture_cases_match_expected_detections() {
    let cases = discover_cases();
    assert!(!cases.is_empty(), "manifest lists no cases");

    let mut failures: Vec<(String, String)> = vec![];
    for (case_id, path) in &cases {
        match run_case(path) {
            Ok(()) => println!("PASS: {}", case_id),
            Err(e) => {
                println!("FAIL: {} - {}", case_id, e);
                failures.push((case_id.clone(), e));
            }
        }
    }

    assert!(
        failures.is_empty(),
        "{} of {} fixture cases failed",
        failures.len(),
        cases.len()
    );
}

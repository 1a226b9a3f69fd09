#![cfg(feature = "rayon")]

use griddet::{DetectionEngine, DetectorConfig, OwnedTensor};

fn make_frame(engine: &DetectionEngine, seed: usize) -> OwnedTensor {
    let layout = engine.layout();
    let mut tensor = OwnedTensor::zeros(layout);
    let channels = layout.channels();
    let class_offset = layout.boxes_per_cell * 5;

    for (cell_idx, cell) in tensor.data_mut().chunks_exact_mut(channels).enumerate() {
        let mix = (cell_idx * 31 + seed * 17) % 97;
        for (slot_idx, slot) in cell[..class_offset].chunks_exact_mut(5).enumerate() {
            let m = (mix + slot_idx * 13) % 97;
            slot[0] = (m % 10) as f32 / 10.0;
            slot[1] = ((m / 10) % 10) as f32 / 10.0;
            slot[2] = (m % 7) as f32 / 7.0 - 0.5;
            slot[3] = (m % 5) as f32 / 5.0 - 0.5;
            slot[4] = m as f32 / 97.0;
        }
        let class = mix % (channels - class_offset);
        cell[class_offset + class] = 0.6 + (mix % 4) as f32 / 10.0;
    }
    tensor
}

#[test]
fn batch_matches_sequential_calls() {
    let engine = DetectionEngine::new(DetectorConfig {
        confidence_threshold: 0.3,
        iou_threshold: 0.45,
        max_detections: 20,
        ..DetectorConfig::with_labels(["bottle", "can", "paper", "glass"])
    })
    .unwrap();

    let frames: Vec<OwnedTensor> = (0..12).map(|seed| make_frame(&engine, seed)).collect();
    let slices: Vec<&[f32]> = frames.iter().map(|f| f.data()).collect();

    let batched = engine.infer_batch(&slices).unwrap();
    assert_eq!(batched.len(), frames.len());

    for (frame, parallel) in frames.iter().zip(batched.iter()) {
        let sequential = engine.infer_detections(frame.data(), frame.shape()).unwrap();
        assert_eq!(&sequential, parallel);
    }
    assert!(batched.iter().any(|dets| !dets.is_empty()));
}

#[test]
fn batch_reports_malformed_frame() {
    let engine = DetectionEngine::new(DetectorConfig::with_labels(["bottle"])).unwrap();
    let good = OwnedTensor::zeros(engine.layout());
    let short = vec![0.0f32; 3];
    let frames: Vec<&[f32]> = vec![good.data(), &short];
    assert!(engine.infer_batch(&frames).is_err());
}

use clap::Parser;
use griddet::{ClassTable, Detection, DetectionEngine, DetectorConfig, OwnedTensor, Rgb};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "GridDet CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum LayoutConfig {
    #[default]
    Grid,
    Rows,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    tensor_path: String,
    labels_path: Option<String>,
    labels: Vec<String>,
    colors: HashMap<String, [u8; 3]>,
    layout: LayoutConfig,
    grid_size: usize,
    boxes_per_cell: usize,
    confidence_threshold: f32,
    iou_threshold: f32,
    max_detections: usize,
    input_size: f32,
    output_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let cfg = DetectorConfig::default();
        Self {
            tensor_path: String::new(),
            labels_path: None,
            labels: Vec::new(),
            colors: HashMap::new(),
            layout: LayoutConfig::Grid,
            grid_size: cfg.grid_size,
            boxes_per_cell: cfg.boxes_per_cell,
            confidence_threshold: cfg.confidence_threshold,
            iou_threshold: cfg.iou_threshold,
            max_detections: cfg.max_detections,
            input_size: cfg.input_size,
            output_path: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TensorFile {
    shape: Vec<usize>,
    data: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct DetectionRecord {
    center_x: f32,
    center_y: f32,
    width: f32,
    height: f32,
    confidence: f32,
    class_index: usize,
    label: String,
    color: [u8; 3],
}

impl From<Detection> for DetectionRecord {
    fn from(value: Detection) -> Self {
        Self {
            center_x: value.center_x,
            center_y: value.center_y,
            width: value.width,
            height: value.height,
            confidence: value.confidence,
            class_index: value.class_index,
            label: value.class_label,
            color: value.display_color.0,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    count: usize,
    detections: Vec<DetectionRecord>,
}

fn load_labels(config: &Config) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    match &config.labels_path {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            let table = ClassTable::from_label_text(&text, None)?;
            Ok(table.labels().to_vec())
        }
        None => Ok(config.labels.clone()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("griddet=debug".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.tensor_path.is_empty() {
        return Err("tensor_path must be set in the config".into());
    }

    let labels = load_labels(&config)?;
    if labels.is_empty() {
        return Err("either labels or labels_path must provide at least one label".into());
    }
    let colors: Option<HashMap<String, Rgb>> = if config.colors.is_empty() {
        None
    } else {
        Some(
            config
                .colors
                .iter()
                .map(|(label, rgb)| (label.clone(), Rgb::from(*rgb)))
                .collect(),
        )
    };

    let engine = DetectionEngine::new(DetectorConfig {
        grid_size: config.grid_size,
        boxes_per_cell: config.boxes_per_cell,
        confidence_threshold: config.confidence_threshold,
        iou_threshold: config.iou_threshold,
        max_detections: config.max_detections,
        input_size: config.input_size,
        class_colors: colors,
        ..DetectorConfig::with_labels(labels)
    })?;

    let tensor_text = fs::read_to_string(&config.tensor_path)?;
    let tensor_file: TensorFile = serde_json::from_str(&tensor_text)?;
    let tensor = OwnedTensor::new(tensor_file.data, tensor_file.shape)?;

    let detections = match config.layout {
        LayoutConfig::Grid => engine.infer_detections(tensor.data(), tensor.shape())?,
        LayoutConfig::Rows => engine.infer_row_detections(tensor.data(), tensor.shape())?,
    };
    tracing::info!(count = detections.len(), "inference finished");

    let output = Output {
        count: detections.len(),
        detections: detections.into_iter().map(DetectionRecord::from).collect(),
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}

//! Configuration of the `cascade_detect` tool.
//!
//! ```json
//! {
//!   "input": "data/group.png",
//!   "cascade": "data/face.json",
//!   "params": { "scan": { "scale_factor": 1.2, "min_window_size": 24 } },
//!   "output": {
//!     "json_out": "out/detections.json",
//!     "annotated_image": "out/detections.png"
//!   }
//! }
//! ```

use crate::detector::DetectorParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct DetectToolConfig {
    pub input: PathBuf,
    pub cascade: PathBuf,
    #[serde(default)]
    pub params: DetectorParams,
    pub output: DetectOutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct DetectOutputConfig {
    pub json_out: PathBuf,
    /// Input image with detection outlines drawn in.
    #[serde(default)]
    pub annotated_image: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<DetectToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&data).map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

fn parse_config(data: &str) -> Result<DetectToolConfig, serde_json::Error> {
    serde_json::from_str(data)
}

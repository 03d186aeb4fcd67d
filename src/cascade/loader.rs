//! JSON persistence of cascades.
//!
//! ```json
//! {
//!   "windowWidth": 24,
//!   "windowHeight": 24,
//!   "stages": [
//!     {
//!       "threshold": 0.8,
//!       "classifiers": [
//!         {
//!           "feature": { "rects": [
//!             { "x": 0, "y": 0, "width": 12, "height": 24, "weight": 1.0 },
//!             { "x": 12, "y": 0, "width": 12, "height": 24, "weight": -1.0 }
//!           ] },
//!           "threshold": -0.1,
//!           "polarity": 1,
//!           "weight": 0.8
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Loading runs the same validation as [`CascadeModel::new`]; any violation
//! is a [`ConfigError`].

use super::model::{CascadeModel, Stage};
use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// On-disk shape, validated into a [`CascadeModel`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeFile {
    pub window_width: u32,
    pub window_height: u32,
    pub stages: Vec<Stage>,
}

impl TryFrom<CascadeFile> for CascadeModel {
    type Error = ConfigError;

    fn try_from(file: CascadeFile) -> Result<Self, Self::Error> {
        CascadeModel::new(file.window_width, file.window_height, file.stages)
    }
}

impl CascadeModel {
    /// Parse and validate a cascade from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let file: CascadeFile = serde_json::from_str(json)?;
        CascadeModel::try_from(file)
    }

    /// Serialize to the JSON layout accepted by [`CascadeModel::from_json_str`].
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Read, parse and validate a cascade file.
pub fn load_cascade(path: &Path) -> Result<CascadeModel, ConfigError> {
    let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let model = CascadeModel::from_json_str(&json)?;
    log::debug!(
        "loaded cascade {} ({}x{}, {} stages)",
        path.display(),
        model.window_width(),
        model.window_height(),
        model.stage_count()
    );
    Ok(model)
}

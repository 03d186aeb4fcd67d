//! Detector-level parameters.
//!
//! [`DetectorParams`] wraps the scan configuration with run-level knobs that
//! do not affect which windows are evaluated, only whether a run is allowed
//! to finish.

use crate::error::ConfigError;
use crate::scan::ScanParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorParams {
    /// Scale-space scan and merge settings.
    pub scan: ScanParams,
    /// Wall-clock budget per `detect` call. Checked before each scale level.
    pub deadline_ms: Option<u64>,
}

impl DetectorParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scan.validate()
    }

    pub fn budget(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }

    pub fn with_scan(mut self, scan: ScanParams) -> Self {
        self.scan = scan;
        self
    }

    pub fn with_deadline_ms(mut self, deadline_ms: u64) -> Self {
        self.deadline_ms = Some(deadline_ms);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_json_keeps_defaults() {
        let params: DetectorParams =
            serde_json::from_str(r#"{ "scan": { "step_fraction": 0.25 }, "deadline_ms": 40 }"#)
                .unwrap();
        assert_eq!(params.scan.step_fraction, 0.25);
        assert_eq!(params.scan.scale_factor, 1.1);
        assert_eq!(params.budget(), Some(Duration::from_millis(40)));
        assert!(DetectorParams::default().budget().is_none());
    }
}

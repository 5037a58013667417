//! Pipeline configuration.
//!
//! Every field has a default matching the reference tuning, and the whole
//! struct deserializes with `#[serde(default)]` so a JSON file only needs to
//! name the values it changes.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{CardError, Result};

/// Gaussian blur parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaussianParameters {
    /// Kernel width and height, must be odd
    pub kernel_size: u32,
    /// Standard deviation; zero or below derives it from the kernel size
    pub sigma: f32,
}

impl Default for GaussianParameters {
    fn default() -> Self {
        Self {
            kernel_size: 3,
            sigma: 0.0,
        }
    }
}

/// Canny hysteresis thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CannyParameters {
    pub low_threshold: f32,
    pub high_threshold: f32,
}

impl Default for CannyParameters {
    fn default() -> Self {
        Self {
            low_threshold: 0.0,
            high_threshold: 255.0,
        }
    }
}

/// Which traced borders are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalMode {
    /// Only outermost borders
    External,
    /// Every border, outer and hole
    List,
}

/// How traced border points are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApproximationMode {
    /// Every border pixel
    None,
    /// Horizontal, vertical and diagonal runs collapsed to their end points
    Simple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContourParameters {
    pub retrieval: RetrievalMode,
    pub approximation: ApproximationMode,
}

impl Default for ContourParameters {
    fn default() -> Self {
        Self {
            retrieval: RetrievalMode::External,
            approximation: ApproximationMode::Simple,
        }
    }
}

/// Immutable per-invocation configuration of the card pipeline
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub gaussian: GaussianParameters,
    pub canny: CannyParameters,
    pub contours: ContourParameters,
    /// Keep every intermediate image on the frame result (off by default)
    pub capture_diagnostics: bool,
}

impl PipelineConfig {
    /// Configuration that records every intermediate image
    pub fn with_diagnostics() -> Self {
        Self {
            capture_diagnostics: true,
            ..Default::default()
        }
    }

    /// Load a (possibly partial) JSON configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no stage can run with
    pub fn validate(&self) -> Result<()> {
        let k = self.gaussian.kernel_size;
        if k == 0 || k % 2 == 0 {
            return Err(CardError::InvalidKernelSize(k));
        }

        let canny = &self.canny;
        if canny.low_threshold > canny.high_threshold {
            return Err(CardError::InvalidCannyThresholds {
                low: canny.low_threshold,
                high: canny.high_threshold,
            });
        }

        Ok(())
    }
}

use std::fs;
use std::path::Path;

use binmask_imgproc::filter::RepeatCount;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Repeat counts for the three iterated stages of the pipeline.
///
/// Missing fields fall back to one pass each. Negative or fractional counts are rejected when the
/// config is parsed.
///
/// # Example
///
/// ```
/// use binmask::PipelineConfig;
///
/// let config = PipelineConfig::from_json_str(r#"{ "median_repeats": 3 }"#).unwrap();
/// assert_eq!(config.median_repeats.get(), 3);
/// assert_eq!(config.erosion_repeats.get(), 1);
///
/// assert!(PipelineConfig::from_json_str(r#"{ "dilation_repeats": -1 }"#).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Number of 3x3 median passes on the grayscale image.
    pub median_repeats: RepeatCount,
    /// Number of 3x3 erosion passes on the binary image.
    pub erosion_repeats: RepeatCount,
    /// Number of 3x3 dilation passes on the eroded image.
    pub dilation_repeats: RepeatCount,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            median_repeats: RepeatCount::new(1),
            erosion_repeats: RepeatCount::new(1),
            dilation_repeats: RepeatCount::new(1),
        }
    }
}

impl PipelineConfig {
    /// Parse a config from a JSON string.
    pub fn from_json_str(data: &str) -> Result<Self, PipelineError> {
        Ok(serde_json::from_str(data)?)
    }

    /// Load a config from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .map_err(|e| PipelineError::ConfigFile(path.to_path_buf(), e))?;
        let config = Self::from_json_str(&data)?;
        log::debug!("loaded {config:?} from {}", path.display());
        Ok(config)
    }
}

use std::path::PathBuf;

use binmask_image::{ErrorKind, ImageError};
use binmask_io::IoError;

/// An error type for the pipeline and its configuration.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// A raster operation failed.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Reading or writing a raster failed.
    #[error(transparent)]
    Io(#[from] IoError),

    /// The configuration file could not be read.
    #[error("Failed to read config file {0}")]
    ConfigFile(PathBuf, #[source] std::io::Error),

    /// The configuration could not be parsed.
    #[error("Invalid pipeline config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl PipelineError {
    /// Classify the error, if it maps to one of the raster error kinds.
    ///
    /// Configuration parse failures count as [`ErrorKind::InvalidParameter`], since that is where
    /// negative or non-numeric repeat counts are rejected.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            PipelineError::Image(err) => Some(err.kind()),
            PipelineError::Io(IoError::ImageCreationError(err)) => Some(err.kind()),
            PipelineError::Io(IoError::UnsupportedImageFormat(_)) => {
                Some(ErrorKind::UnsupportedFormat)
            }
            PipelineError::ConfigParse(_) => Some(ErrorKind::InvalidParameter),
            _ => None,
        }
    }
}

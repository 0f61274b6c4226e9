#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use binmask_image as image;

#[doc(inline)]
pub use binmask_imgproc as imgproc;

#[doc(inline)]
pub use binmask_io as io;

/// Pipeline configuration loaded from JSON.
pub mod config;

/// Error types for the pipeline.
pub mod error;

/// The staged grayscale, median, Otsu and morphology pipeline.
pub mod pipeline;

pub use crate::config::PipelineConfig;
pub use crate::error::PipelineError;
pub use crate::pipeline::{Pipeline, Stage};

#![deny(missing_docs)]
//! Image types and traits for generating and manipulating rasters

/// image representation for raster processing purposes.
pub mod image;

/// Error types for the image module.
pub mod error;

pub use crate::error::{ErrorKind, ImageError};
pub use crate::image::{Image, ImageSize};

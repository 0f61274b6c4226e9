//! Binary morphology over a fixed 3x3, 8-connected structuring element.
//!
//! On a binary image (samples in `{0, 255}`) erosion keeps a pixel only if its whole
//! neighborhood is foreground and dilation sets it if any neighbor is. Both are implemented as
//! neighborhood minimum / maximum, so they also behave as grayscale morphology.

mod ops;

pub use ops::{dilate, erode, DilationRule, ErosionRule};

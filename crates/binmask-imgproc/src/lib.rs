#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// color transformations module.
pub mod color;

/// image basic operations module.
pub mod core;

/// sliding window filtering module.
pub mod filter;

/// compute image histogram module.
pub mod histogram;

/// binary morphology module.
pub mod morphology;

/// border handling for neighborhood operations.
pub mod padding;

/// module containing parallization utilities.
pub mod parallel;

/// operations to threshold images.
pub mod threshold;

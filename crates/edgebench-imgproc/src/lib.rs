#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the filter operations.
pub mod error;

/// image filtering module.
pub mod filter;

/// module containing parallization utilities.
pub mod parallel;

/// sequential recomputation and comparison of filter outputs.
pub mod verify;

pub use crate::error::FilterError;

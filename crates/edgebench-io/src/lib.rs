#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
pub mod error;

/// High-level image reading and writing functions.
///
/// See [`functional::read_image_mirrored_rgba32f`] to load a square benchmark input.
pub mod functional;

pub use crate::error::IoError;

#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// image representation for the filter kernels.
pub mod image;

/// Error types for the image module.
pub mod error;

/// image basic operations module.
pub mod ops;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};

/// A 4-channel floating point image, the buffer type consumed by the edge filter.
pub type Rgba32f = Image<f32, 4>;

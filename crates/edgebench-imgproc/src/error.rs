use edgebench_image::ImageError;

use crate::parallel::ParallelError;

/// An error type for the filter operations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FilterError {
    /// The input or output buffer is invalid.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// The dispatch of the kernel failed.
    #[error("dispatch failed: {0}")]
    Dispatch(#[from] ParallelError),

    /// The verification range does not cover any pixel of the image.
    #[error("verification range starting at {0} is outside of an image with {1} pixels")]
    EmptyVerificationRange(usize, usize),
}

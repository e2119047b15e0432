//! Filter operations
//!
//! This module provides the Sobel edge detection filter.

/// Filter kernels
pub mod kernels;

/// Sobel gradient magnitude filter
mod sobel;
pub use sobel::*;

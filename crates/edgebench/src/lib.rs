#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use edgebench_image as image;

#[doc(inline)]
pub use edgebench_imgproc as imgproc;

#[doc(inline)]
pub use edgebench_io as io;

/// benchmark harness: the benchmark trait, its arguments and the runner.
pub mod bench;

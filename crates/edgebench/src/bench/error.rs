use edgebench_image::ImageError;
use edgebench_imgproc::{parallel::ParallelError, FilterError};
use edgebench_io::IoError;

/// An error type for the benchmark harness.
#[derive(thiserror::Error, Debug)]
pub enum BenchError {
    /// The benchmark arguments are not valid.
    #[error("invalid benchmark argument: {0}")]
    InvalidArgument(String),

    /// `run` or `verify` was called before `setup`.
    #[error("the benchmark has not been set up")]
    NotSetUp,

    /// The output buffer does not hold the result of a completed pass.
    #[error("no completed pass to read the output from")]
    OutputNotReady,

    /// The filter failed.
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// The execution context could not be created.
    #[error(transparent)]
    Parallel(#[from] ParallelError),

    /// A buffer could not be created.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Reading the input or writing the output failed.
    #[error(transparent)]
    Io(#[from] IoError),
}

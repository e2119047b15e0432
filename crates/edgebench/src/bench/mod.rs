//! Benchmark harness
//!
//! A benchmark goes through `setup`, one or more `run`s and a final `verify`, driven by
//! [`BenchmarkApp`].

mod app;
pub use app::*;

mod args;
pub use args::*;

mod error;
pub use error::BenchError;

mod result;
pub use result::*;

mod sobel;
pub use sobel::SobelBench;

use std::path::Path;

use edgebench_imgproc::verify::VerificationSetting;

/// A benchmark that can be driven by [`BenchmarkApp`].
pub trait Benchmark: Sized {
    /// Name reported in the results.
    fn name() -> &'static str;

    /// Create the benchmark and acquire its execution context.
    fn new(args: &BenchmarkArgs) -> Result<Self, BenchError>;

    /// Allocate and populate the buffers.
    fn setup(&mut self) -> Result<(), BenchError>;

    /// Execute one pass. Blocks until every unit of work has completed.
    fn run(&mut self) -> Result<(), BenchError>;

    /// Check the output of the last pass against a sequential recomputation.
    fn verify(
        &self,
        setting: &VerificationSetting,
        tolerance: f32,
    ) -> Result<VerificationOutcome, BenchError>;

    /// Persist the output of the last pass.
    fn save_output(&self, path: &Path) -> Result<(), BenchError>;

    /// Number of worker threads a run may use.
    fn num_threads(&self) -> usize;
}

use std::path::PathBuf;

use edgebench_imgproc::parallel::ExecutionStrategy;
use edgebench_imgproc::verify::{VerificationSetting, DEFAULT_TOLERANCE};

use super::BenchError;

/// Where the input image of a benchmark comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    /// Read an image file and mirror it to the problem size.
    File(PathBuf),
    /// Uniform random channels in `[0, 1)` from a seeded generator.
    Random {
        /// Seed of the generator.
        seed: u64,
    },
    /// Every pixel set to the same value.
    Constant([f32; 4]),
}

impl Default for InputSource {
    fn default() -> Self {
        InputSource::Random { seed: 0 }
    }
}

/// Benchmark configuration
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkArgs {
    /// Side length N of the N x N problem.
    pub problem_size: usize,
    /// Number of timed runs.
    pub num_runs: usize,
    /// Number of untimed warm-up runs.
    pub warmup_runs: usize,
    /// How work is spread over threads.
    pub strategy: ExecutionStrategy,
    /// Source of the input image.
    pub input: InputSource,
    /// Optional path to write the final output image to.
    pub output: Option<PathBuf>,
    /// Whether to verify the output after the timed runs.
    pub verify: bool,
    /// Pixels to verify.
    pub verification: VerificationSetting,
    /// Absolute per-channel tolerance of the verification.
    pub tolerance: f32,
}

impl Default for BenchmarkArgs {
    fn default() -> Self {
        Self {
            problem_size: 1024,
            num_runs: 5,
            warmup_runs: 1,
            strategy: ExecutionStrategy::default(),
            input: InputSource::default(),
            output: None,
            verify: true,
            verification: VerificationSetting::default(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl BenchmarkArgs {
    /// Default arguments for a problem of side length `problem_size`.
    pub fn new(problem_size: usize) -> Self {
        Self {
            problem_size,
            ..Default::default()
        }
    }

    /// Check the arguments before any buffer is allocated.
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.problem_size == 0 {
            return Err(BenchError::InvalidArgument(
                "problem size must be > 0".to_string(),
            ));
        }
        if self.num_runs == 0 {
            return Err(BenchError::InvalidArgument(
                "number of runs must be > 0".to_string(),
            ));
        }
        if self
            .problem_size
            .checked_mul(self.problem_size)
            .and_then(|area| area.checked_mul(4))
            .is_none()
        {
            return Err(BenchError::InvalidArgument(format!(
                "problem size {} is too large",
                self.problem_size
            )));
        }
        if self.tolerance.is_nan() || self.tolerance < 0.0 {
            return Err(BenchError::InvalidArgument(format!(
                "tolerance must be >= 0, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args_are_valid() -> Result<(), BenchError> {
        let args = BenchmarkArgs::new(16);
        args.validate()?;
        assert_eq!(args.problem_size, 16);
        assert_eq!(args.input, InputSource::Random { seed: 0 });
        assert!(args.verify);
        Ok(())
    }

    #[test]
    fn test_invalid_args() {
        let zero_size = BenchmarkArgs::new(0);
        assert!(matches!(
            zero_size.validate(),
            Err(BenchError::InvalidArgument(_))
        ));

        let no_runs = BenchmarkArgs {
            num_runs: 0,
            ..BenchmarkArgs::new(4)
        };
        assert!(matches!(no_runs.validate(), Err(BenchError::InvalidArgument(_))));

        let overflow = BenchmarkArgs::new(usize::MAX);
        assert!(matches!(overflow.validate(), Err(BenchError::InvalidArgument(_))));

        let nan_tolerance = BenchmarkArgs {
            tolerance: f32::NAN,
            ..BenchmarkArgs::new(4)
        };
        assert!(matches!(
            nan_tolerance.validate(),
            Err(BenchError::InvalidArgument(_))
        ));
    }
}

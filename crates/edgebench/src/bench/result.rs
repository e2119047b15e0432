use std::time::Duration;

use serde::Serialize;

use edgebench_imgproc::verify::VerificationReport;

use super::BenchmarkArgs;

/// A mismatching pixel, flattened for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MismatchSummary {
    /// Column of the pixel.
    pub x: usize,
    /// Row of the pixel.
    pub y: usize,
    /// Recomputed channels.
    pub expected: Vec<f32>,
    /// Produced channels.
    pub actual: Vec<f32>,
}

/// Outcome of verifying a benchmark output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationOutcome {
    /// Number of pixels that were recomputed.
    pub checked: usize,
    /// Number of pixels outside of the tolerance.
    pub mismatches: usize,
    /// The first mismatching pixel in scan order.
    pub first_mismatch: Option<MismatchSummary>,
}

impl VerificationOutcome {
    /// Whether every checked pixel matched.
    pub fn passed(&self) -> bool {
        self.mismatches == 0
    }
}

impl<const C: usize> From<VerificationReport<C>> for VerificationOutcome {
    fn from(report: VerificationReport<C>) -> Self {
        Self {
            checked: report.checked,
            mismatches: report.mismatches,
            first_mismatch: report.first_mismatch.map(|m| MismatchSummary {
                x: m.x,
                y: m.y,
                expected: m.expected.to_vec(),
                actual: m.actual.to_vec(),
            }),
        }
    }
}

/// Benchmark result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkResult {
    /// Benchmark name
    pub name: String,
    /// Side length of the problem
    pub problem_size: usize,
    /// Execution strategy
    pub strategy: String,
    /// Number of worker threads
    pub num_threads: usize,
    /// Number of timed runs
    pub runs: usize,
    /// Fastest run in seconds
    pub min_seconds: f64,
    /// Average run in seconds
    pub mean_seconds: f64,
    /// Slowest run in seconds
    pub max_seconds: f64,
    /// Standard deviation of the runs in seconds
    pub std_seconds: f64,
    /// Output pixels per second of the average run, in millions
    pub mpixels_per_second: f64,
    /// Verification outcome, if verification ran
    pub verification: Option<VerificationOutcome>,
}

impl BenchmarkResult {
    pub(crate) fn new(
        name: &str,
        args: &BenchmarkArgs,
        num_threads: usize,
        durations: &[Duration],
        verification: Option<VerificationOutcome>,
    ) -> Self {
        let secs = durations
            .iter()
            .map(Duration::as_secs_f64)
            .collect::<Vec<_>>();

        let runs = secs.len();
        let mean = secs.iter().sum::<f64>() / runs.max(1) as f64;
        let min = secs.iter().copied().fold(f64::INFINITY, f64::min);
        let max = secs.iter().copied().fold(0.0, f64::max);
        let variance = secs.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / runs.max(1) as f64;

        let pixels = (args.problem_size * args.problem_size) as f64;
        let mpixels_per_second = if mean > 0.0 {
            pixels / mean / 1e6
        } else {
            0.0
        };

        Self {
            name: name.to_string(),
            problem_size: args.problem_size,
            strategy: args.strategy.to_string(),
            num_threads,
            runs,
            min_seconds: if runs == 0 { 0.0 } else { min },
            mean_seconds: mean,
            max_seconds: max,
            std_seconds: variance.sqrt(),
            mpixels_per_second,
            verification,
        }
    }

    /// Whether the run verified, or verification was skipped.
    pub fn passed(&self) -> bool {
        self.verification
            .as_ref()
            .map_or(true, VerificationOutcome::passed)
    }
}

impl std::fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} N={} strategy={} threads={} runs={} mean={:.6}s min={:.6}s max={:.6}s std={:.6}s ({:.2} Mpix/s)",
            self.name,
            self.problem_size,
            self.strategy,
            self.num_threads,
            self.runs,
            self.mean_seconds,
            self.min_seconds,
            self.max_seconds,
            self.std_seconds,
            self.mpixels_per_second,
        )?;
        match &self.verification {
            Some(v) if v.passed() => write!(f, " verification: PASSED ({} pixels)", v.checked),
            Some(v) => write!(
                f,
                " verification: FAILED ({} of {} pixels)",
                v.mismatches, v.checked
            ),
            None => write!(f, " verification: skipped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgebench_imgproc::verify::Mismatch;

    #[test]
    fn test_statistics() {
        let args = BenchmarkArgs::new(1000);
        let durations = [
            Duration::from_millis(100),
            Duration::from_millis(200),
            Duration::from_millis(300),
        ];
        let result = BenchmarkResult::new("sobel", &args, 4, &durations, None);

        assert_eq!(result.runs, 3);
        assert!((result.min_seconds - 0.1).abs() < 1e-9);
        assert!((result.mean_seconds - 0.2).abs() < 1e-9);
        assert!((result.max_seconds - 0.3).abs() < 1e-9);
        assert!((result.std_seconds - (0.02f64 / 3.0).sqrt()).abs() < 1e-9);
        assert!((result.mpixels_per_second - 5.0).abs() < 1e-6);
        assert!(result.passed());
    }

    #[test]
    fn test_outcome_from_report() {
        let report = VerificationReport::<2> {
            checked: 10,
            mismatches: 1,
            first_mismatch: Some(Mismatch {
                x: 3,
                y: 1,
                expected: [0.5, 0.0],
                actual: [0.25, 0.0],
            }),
        };
        let outcome = VerificationOutcome::from(report);
        assert!(!outcome.passed());
        let first = outcome.first_mismatch.as_ref().expect("mismatch expected");
        assert_eq!((first.x, first.y), (3, 1));
        assert_eq!(first.expected, vec![0.5, 0.0]);

        let args = BenchmarkArgs::new(4);
        let result = BenchmarkResult::new("sobel", &args, 1, &[Duration::ZERO], Some(outcome));
        assert!(!result.passed());
        assert!(result.to_string().contains("FAILED (1 of 10 pixels)"));
    }
}

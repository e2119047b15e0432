use std::time::{Duration, Instant};

use super::{BenchError, Benchmark, BenchmarkArgs, BenchmarkResult};

/// Drives a [`Benchmark`] through setup, warm-up, timed runs and verification.
#[derive(Debug, Clone)]
pub struct BenchmarkApp {
    args: BenchmarkArgs,
}

impl BenchmarkApp {
    /// Create a runner after validating its arguments.
    pub fn new(args: BenchmarkArgs) -> Result<Self, BenchError> {
        args.validate()?;
        Ok(Self { args })
    }

    /// The arguments every benchmark is run with.
    pub fn args(&self) -> &BenchmarkArgs {
        &self.args
    }

    /// Run benchmark `B` once end to end.
    ///
    /// The first failing step aborts the whole run; nothing is retried.
    ///
    /// # Returns
    ///
    /// The timing statistics of the timed runs and, unless disabled, the verification
    /// outcome. A failed verification is reported in the result, not as an error.
    pub fn run<B: Benchmark>(&self) -> Result<BenchmarkResult, BenchError> {
        let args = &self.args;

        log::info!(
            "Running {} with N={}, strategy: {}, warmup: {}, runs: {}",
            B::name(),
            args.problem_size,
            args.strategy,
            args.warmup_runs,
            args.num_runs
        );

        let mut bench = B::new(args)?;
        bench.setup()?;

        for i in 0..args.warmup_runs {
            log::debug!("{} warm-up run {}/{}", B::name(), i + 1, args.warmup_runs);
            bench.run()?;
        }

        let mut durations: Vec<Duration> = Vec::with_capacity(args.num_runs);
        for i in 0..args.num_runs {
            let start = Instant::now();
            bench.run()?;
            let duration = start.elapsed();

            log::debug!(
                "{} run {}/{}: {:?}",
                B::name(),
                i + 1,
                args.num_runs,
                duration
            );
            durations.push(duration);
        }

        let verification = if args.verify {
            let outcome = bench.verify(&args.verification, args.tolerance)?;
            if outcome.passed() {
                log::info!("verification passed on {} pixels", outcome.checked);
            } else {
                log::error!(
                    "verification failed on {} of {} pixels",
                    outcome.mismatches,
                    outcome.checked
                );
            }
            Some(outcome)
        } else {
            log::info!("verification skipped");
            None
        };

        if let Some(path) = &args.output {
            bench.save_output(path)?;
        }

        let num_threads = bench.num_threads();
        let result = BenchmarkResult::new(B::name(), args, num_threads, &durations, verification);
        log::info!("{result}");

        Ok(result)
    }
}

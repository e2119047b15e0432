use std::path::PathBuf;

use argh::FromArgs;
use edgebench::bench::{BenchmarkApp, BenchmarkArgs, InputSource, SobelBench};
use edgebench::imgproc::parallel::ExecutionStrategy;
use edgebench::imgproc::verify::VerificationSetting;

/// Environment variable read when `--size` is not given.
const SIZE_ENV_VAR: &str = "EDGEBENCH_SIZE";

const DEFAULT_SIZE: usize = 1024;

/// Benchmarks a 3x3 Sobel edge filter over an N x N RGBA f32 image
#[derive(Debug, FromArgs)]
struct Args {
    /// side length N of the image; falls back to $EDGEBENCH_SIZE, then 1024
    #[argh(option, short = 's')]
    size: Option<usize>,

    /// number of timed runs
    #[argh(option, short = 'n', default = "5")]
    num_runs: usize,

    /// number of untimed warm-up runs
    #[argh(option, short = 'w', default = "1")]
    warmup: usize,

    /// execution strategy: elements, rows, serial or fixed
    #[argh(option, default = "String::from(\"elements\")")]
    strategy: String,

    /// number of threads for the fixed strategy
    #[argh(option, short = 't', default = "1")]
    threads: usize,

    /// input image path; a seeded random image is used when omitted
    #[argh(option, short = 'i')]
    input: Option<PathBuf>,

    /// path to write the output image to
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,

    /// first linear pixel index to verify
    #[argh(option, default = "0")]
    verify_begin: usize,

    /// number of pixels to verify; all remaining pixels when omitted
    #[argh(option)]
    verify_range: Option<usize>,

    /// skip verification
    #[argh(switch)]
    no_verify: bool,

    /// seed of the random input image
    #[argh(option, default = "0")]
    seed: u64,

    /// path to write the results to as JSON
    #[argh(option, short = 'r')]
    results: Option<PathBuf>,
}

fn to_execution_strategy(name: &str, threads: usize) -> Result<ExecutionStrategy, String> {
    match name {
        "elements" => Ok(ExecutionStrategy::ParallelElements),
        "rows" => Ok(ExecutionStrategy::ParallelRows),
        "serial" => Ok(ExecutionStrategy::Serial),
        "fixed" => Ok(ExecutionStrategy::Fixed(threads)),
        _ => Err(format!("Unsupported execution strategy: {name}")),
    }
}

fn problem_size(size: Option<usize>) -> Result<usize, String> {
    if let Some(size) = size {
        return Ok(size);
    }
    match std::env::var(SIZE_ENV_VAR) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|e| format!("invalid {SIZE_ENV_VAR}={value}: {e}")),
        Err(_) => Ok(DEFAULT_SIZE),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();

    let input = match args.input {
        Some(path) => InputSource::File(path),
        None => InputSource::Random { seed: args.seed },
    };

    let bench_args = BenchmarkArgs {
        problem_size: problem_size(args.size)?,
        num_runs: args.num_runs,
        warmup_runs: args.warmup,
        strategy: to_execution_strategy(&args.strategy, args.threads)?,
        input,
        output: args.output,
        verify: !args.no_verify,
        verification: VerificationSetting {
            begin: args.verify_begin,
            range: args.verify_range,
        },
        ..Default::default()
    };

    let app = BenchmarkApp::new(bench_args)?;
    let result = app.run::<SobelBench>()?;

    println!("{result}");

    if let Some(path) = args.results {
        let file = std::fs::File::create(&path)?;
        serde_json::to_writer_pretty(file, &result)?;
        log::info!("wrote results to {}", path.display());
    }

    if !result.passed() {
        log::error!("verification failed");
        std::process::exit(1);
    }

    Ok(())
}

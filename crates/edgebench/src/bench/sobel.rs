use std::path::Path;

use rand::{rngs::StdRng, Rng, SeedableRng};

use edgebench_image::{Image, ImageSize, Rgba32f};
use edgebench_imgproc::filter::sobel_edges;
use edgebench_imgproc::parallel::Dispatcher;
use edgebench_imgproc::verify::{verify_sobel, VerificationSetting};
use edgebench_io::functional as F;

use super::{BenchError, Benchmark, BenchmarkArgs, InputSource, VerificationOutcome};

struct SobelBuffers {
    input: Rgba32f,
    output: Rgba32f,
}

/// Sobel edge detection over an N x N RGBA f32 image.
///
/// The output buffer is only readable after a `run` has completed: a failed or
/// missing run leaves it marked as not ready.
pub struct SobelBench {
    args: BenchmarkArgs,
    dispatcher: Dispatcher,
    buffers: Option<SobelBuffers>,
    output_ready: bool,
}

impl SobelBench {
    /// The execution context the benchmark runs on.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// The input image, once set up.
    pub fn input(&self) -> Option<&Rgba32f> {
        self.buffers.as_ref().map(|b| &b.input)
    }

    /// The output image of the last completed run.
    pub fn output(&self) -> Option<&Rgba32f> {
        match (&self.buffers, self.output_ready) {
            (Some(b), true) => Some(&b.output),
            _ => None,
        }
    }

    fn load_input(&self) -> Result<Rgba32f, BenchError> {
        let n = self.args.problem_size;
        let image = match &self.args.input {
            InputSource::File(path) => F::read_image_mirrored_rgba32f(path, n)?,
            InputSource::Random { seed } => {
                let mut rng = StdRng::seed_from_u64(*seed);
                Image::<f32, 4>::from_size_fn(ImageSize::square(n), |_, _| {
                    [rng.random(), rng.random(), rng.random(), rng.random()]
                })?
            }
            InputSource::Constant(value) => {
                Image::<f32, 4>::from_size_fn(ImageSize::square(n), |_, _| *value)?
            }
        };
        Ok(image)
    }
}

impl Benchmark for SobelBench {
    fn name() -> &'static str {
        "sobel3"
    }

    fn new(args: &BenchmarkArgs) -> Result<Self, BenchError> {
        args.validate()?;
        Ok(Self {
            args: args.clone(),
            dispatcher: Dispatcher::new(args.strategy)?,
            buffers: None,
            output_ready: false,
        })
    }

    fn setup(&mut self) -> Result<(), BenchError> {
        let input = self.load_input()?;
        let output = Image::from_size_val(input.size(), 0.0)?;
        log::debug!("allocated {} input and output buffers", input.size());

        self.buffers = Some(SobelBuffers { input, output });
        self.output_ready = false;
        Ok(())
    }

    fn run(&mut self) -> Result<(), BenchError> {
        let buffers = self.buffers.as_mut().ok_or(BenchError::NotSetUp)?;

        self.output_ready = false;
        sobel_edges(&buffers.input, &mut buffers.output, &mut self.dispatcher)?;
        self.output_ready = true;

        Ok(())
    }

    fn verify(
        &self,
        setting: &VerificationSetting,
        tolerance: f32,
    ) -> Result<VerificationOutcome, BenchError> {
        let buffers = self.buffers.as_ref().ok_or(BenchError::NotSetUp)?;
        if !self.output_ready {
            return Err(BenchError::OutputNotReady);
        }

        let report = verify_sobel(&buffers.input, &buffers.output, setting, tolerance)?;
        if let Some(m) = &report.first_mismatch {
            log::warn!(
                "mismatch at ({}, {}): expected {:?}, got {:?}",
                m.x,
                m.y,
                m.expected,
                m.actual
            );
        }

        Ok(report.into())
    }

    fn save_output(&self, path: &Path) -> Result<(), BenchError> {
        let output = self.output().ok_or(BenchError::OutputNotReady)?;
        F::write_image_rgba32f(path, output)?;
        log::info!("wrote output to {}", path.display());
        Ok(())
    }

    fn num_threads(&self) -> usize {
        self.dispatcher.num_threads()
    }
}

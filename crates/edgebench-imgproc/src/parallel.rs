use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;
use thiserror::Error;

use edgebench_image::Image;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The output buffer has no pixels to produce.
    #[error("the dispatch domain is empty")]
    EmptyDomain,

    /// A unit of work panicked; the output buffer must not be used.
    #[error("kernel {kernel} panicked: {message}")]
    KernelPanicked {
        /// The kernel that was running.
        kernel: KernelId,
        /// The panic payload, if it was a string.
        message: String,
    },
}

/// Controls how parallel operations are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool to process every pixel in parallel.
    ///
    /// This maximizes parallelism but may have overhead for small operations.
    #[default]
    ParallelElements,

    /// Use the global Rayon thread pool to process rows in parallel.
    ///
    /// This is often more cache-friendly than [`ExecutionStrategy::ParallelElements`].
    ParallelRows,

    /// Run sequentially on the current thread.
    Serial,

    /// Run on a dedicated thread pool with `n` threads.
    ///
    /// The pool is built once by [`Dispatcher::new`] and reused for every submission.
    Fixed(usize),
}

impl std::fmt::Display for ExecutionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ExecutionStrategy::ParallelElements => write!(f, "parallel-elements"),
            ExecutionStrategy::ParallelRows => write!(f, "parallel-rows"),
            ExecutionStrategy::Serial => write!(f, "serial"),
            ExecutionStrategy::Fixed(n) => write!(f, "fixed({n})"),
        }
    }
}

/// Identifies each kernel body that can be submitted to a [`Dispatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelId {
    /// The 3x3 Sobel gradient magnitude kernel.
    Sobel3x3,
    /// Coordinate probe used by the dispatcher tests.
    #[cfg(test)]
    Probe,
}

impl std::fmt::Display for KernelId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            KernelId::Sobel3x3 => write!(f, "sobel3x3"),
            #[cfg(test)]
            KernelId::Probe => write!(f, "probe"),
        }
    }
}

/// A per-pixel computation over a 2D index domain.
///
/// Each invocation produces exactly one output pixel from the coordinate it is given
/// and must not observe any other invocation's output.
pub trait GridKernel<T, const C: usize>: Sync {
    /// Unique identifier of this kernel body.
    const ID: KernelId;

    /// Compute the output pixel at column `x` and row `y`.
    fn compute(&self, x: usize, y: usize) -> [T; C];
}

/// Parallel execution context that fans kernels out over an output image.
///
/// # Examples
///
/// ```
/// use edgebench_imgproc::parallel::{Dispatcher, ExecutionStrategy};
///
/// let dispatcher = Dispatcher::new(ExecutionStrategy::Fixed(2)).unwrap();
/// assert_eq!(dispatcher.num_threads(), 2);
/// ```
#[derive(Debug)]
pub struct Dispatcher {
    strategy: ExecutionStrategy,
    pool: Option<rayon::ThreadPool>,
    launches: HashMap<KernelId, usize>,
}

impl Dispatcher {
    /// Create a dispatcher for the given strategy.
    ///
    /// # Errors
    ///
    /// Returns an error if a [`ExecutionStrategy::Fixed`] pool cannot be built.
    pub fn new(strategy: ExecutionStrategy) -> Result<Self, ParallelError> {
        let pool = match strategy {
            ExecutionStrategy::Fixed(0) => return Err(ParallelError::InvalidThreadCount(0)),
            ExecutionStrategy::Fixed(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| ParallelError::BuildError(e.to_string()))?,
            ),
            _ => None,
        };

        Ok(Self {
            strategy,
            pool,
            launches: HashMap::new(),
        })
    }

    /// The strategy this dispatcher was built with.
    pub fn strategy(&self) -> ExecutionStrategy {
        self.strategy
    }

    /// Number of worker threads a submission may use.
    pub fn num_threads(&self) -> usize {
        match (&self.pool, self.strategy) {
            (Some(pool), _) => pool.current_num_threads(),
            (None, ExecutionStrategy::Serial) => 1,
            (None, _) => rayon::current_num_threads(),
        }
    }

    /// Number of completed submissions of the given kernel.
    pub fn launches(&self, id: KernelId) -> usize {
        self.launches.get(&id).copied().unwrap_or(0)
    }

    /// Run `kernel` once for every pixel of `dst` and wait for all of them to finish.
    ///
    /// # Arguments
    ///
    /// * `kernel` - The kernel body to evaluate at each coordinate.
    /// * `dst` - The output image; its size defines the dispatch domain.
    ///
    /// # Errors
    ///
    /// Returns [`ParallelError::EmptyDomain`] before touching `dst` if it has no pixels,
    /// and [`ParallelError::KernelPanicked`] if any unit of work panicked. In the latter
    /// case the contents of `dst` are unspecified.
    pub fn submit<K, T, const C: usize>(
        &mut self,
        kernel: &K,
        dst: &mut Image<T, C>,
    ) -> Result<(), ParallelError>
    where
        K: GridKernel<T, C>,
        T: Copy + Send,
    {
        if C == 0 || dst.size().area() == 0 {
            return Err(ParallelError::EmptyDomain);
        }

        log::debug!(
            "dispatching {} over {}x{} with {}",
            K::ID,
            dst.cols(),
            dst.rows(),
            self.strategy
        );

        let cols = dst.cols();
        let data = dst.as_slice_mut();
        let strategy = self.strategy;
        let pool = self.pool.as_ref();

        panic::catch_unwind(AssertUnwindSafe(|| {
            fill_grid(strategy, pool, kernel, data, cols)
        }))
        .map_err(|payload| ParallelError::KernelPanicked {
            kernel: K::ID,
            message: panic_message(payload.as_ref()),
        })?;

        *self.launches.entry(K::ID).or_insert(0) += 1;

        Ok(())
    }
}

fn fill_grid<K, T, const C: usize>(
    strategy: ExecutionStrategy,
    pool: Option<&rayon::ThreadPool>,
    kernel: &K,
    data: &mut [T],
    cols: usize,
) where
    K: GridKernel<T, C>,
    T: Copy + Send,
{
    let write = |i: usize, dst_pixel: &mut [T]| {
        dst_pixel.copy_from_slice(&kernel.compute(i % cols, i / cols));
    };

    match (strategy, pool) {
        (ExecutionStrategy::Serial, _) => {
            data.chunks_exact_mut(C)
                .enumerate()
                .for_each(|(i, dst_pixel)| write(i, dst_pixel));
        }
        (ExecutionStrategy::ParallelRows, _) => {
            data.par_chunks_exact_mut(C * cols)
                .enumerate()
                .for_each(|(y, dst_row)| {
                    dst_row
                        .chunks_exact_mut(C)
                        .enumerate()
                        .for_each(|(x, dst_pixel)| write(y * cols + x, dst_pixel));
                });
        }
        (ExecutionStrategy::Fixed(_), Some(pool)) => pool.install(|| {
            data.par_chunks_exact_mut(C)
                .enumerate()
                .for_each(|(i, dst_pixel)| write(i, dst_pixel));
        }),
        _ => {
            data.par_chunks_exact_mut(C)
                .enumerate()
                .for_each(|(i, dst_pixel)| write(i, dst_pixel));
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

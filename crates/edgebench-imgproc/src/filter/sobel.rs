use edgebench_image::{Image, ImageError};

use super::kernels::{sobel_coefficient_h, sobel_coefficient_v, SOBEL_RADIUS};
use crate::error::FilterError;
use crate::parallel::{Dispatcher, GridKernel, KernelId};

/// Compute the raw horizontal and vertical Sobel responses at column `x` and row `y`.
///
/// The centre pixel never contributes, and neighbours that fall outside the image are
/// dropped rather than padded or replicated, so border pixels accumulate fewer terms.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `x` - The column of the output pixel.
/// * `y` - The row of the output pixel.
///
/// # Returns
///
/// The per-channel accumulators `(gx, gy)`.
///
/// PRECONDITION: `x < src.cols()` and `y < src.rows()`.
pub fn sobel_gradients_at<const C: usize>(
    src: &Image<f32, C>,
    x: usize,
    y: usize,
) -> ([f32; C], [f32; C]) {
    let gx = accumulate(src, x, y, false, sobel_coefficient_h);
    let gy = accumulate(src, x, y, true, sobel_coefficient_v);
    (gx, gy)
}

// Weighted sum over the in-range 8-neighbourhood of (x, y). With `transposed` the walk
// visits columns in the outer loop, so both kernels are summed along their own rows.
#[inline]
fn accumulate<const C: usize>(
    src: &Image<f32, C>,
    x: usize,
    y: usize,
    transposed: bool,
    coefficient: fn(isize, isize) -> f32,
) -> [f32; C] {
    let mut acc = [0.0f32; C];

    let (cols, rows) = (src.cols() as isize, src.rows() as isize);
    let (x, y) = (x as isize, y as isize);

    for outer in -SOBEL_RADIUS..=SOBEL_RADIUS {
        for inner in -SOBEL_RADIUS..=SOBEL_RADIUS {
            let (dx, dy) = if transposed {
                (outer, inner)
            } else {
                (inner, outer)
            };
            if dx == 0 && dy == 0 {
                continue;
            }

            let (xs, ys) = (x + dx, y + dy);
            if xs < 0 || xs >= cols || ys < 0 || ys >= rows {
                continue;
            }

            let sample = src.pixel_unchecked(xs as usize, ys as usize);
            let w = coefficient(dx, dy);
            for ch in 0..C {
                acc[ch] += w * sample[ch];
            }
        }
    }

    acc
}

/// Compute the clamped Sobel gradient magnitude at column `x` and row `y`.
///
/// Every returned channel lies in `[0.0, 1.0]`; a NaN magnitude is reported as `0.0`.
///
/// PRECONDITION: `x < src.cols()` and `y < src.rows()`.
pub fn sobel_pixel<const C: usize>(src: &Image<f32, C>, x: usize, y: usize) -> [f32; C] {
    let (gx, gy) = sobel_gradients_at(src, x, y);
    let mut out = [0.0f32; C];
    for ch in 0..C {
        out[ch] = clamp_unit(gx[ch].hypot(gy[ch]));
    }
    out
}

#[inline]
fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// The Sobel edge detection kernel body bound to its input image.
pub struct SobelKernel<'a, const C: usize> {
    src: &'a Image<f32, C>,
}

impl<'a, const C: usize> SobelKernel<'a, C> {
    /// Bind the kernel to the image it reads from.
    pub fn new(src: &'a Image<f32, C>) -> Self {
        Self { src }
    }
}

impl<const C: usize> GridKernel<f32, C> for SobelKernel<'_, C> {
    const ID: KernelId = KernelId::Sobel3x3;

    #[inline]
    fn compute(&self, x: usize, y: usize) -> [f32; C] {
        sobel_pixel(self.src, x, y)
    }
}

/// Compute the Sobel gradient magnitude of an image.
///
/// One unit of work is dispatched per output pixel; the call returns once all of them
/// have completed.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `dispatcher` - The execution context to run the kernel on.
///
/// # Errors
///
/// Returns an error if the images differ in size or if the dispatch fails. On a
/// dispatch failure the contents of `dst` must be discarded.
///
/// # Examples
///
/// ```
/// use edgebench_image::Image;
/// use edgebench_imgproc::filter::sobel_edges;
/// use edgebench_imgproc::parallel::{Dispatcher, ExecutionStrategy};
///
/// let src = Image::<f32, 4>::from_size_val([4, 4].into(), 0.5).unwrap();
/// let mut dst = Image::<f32, 4>::from_size_val(src.size(), 0.0).unwrap();
/// let mut dispatcher = Dispatcher::new(ExecutionStrategy::default()).unwrap();
///
/// sobel_edges(&src, &mut dst, &mut dispatcher).unwrap();
///
/// // a flat field has no interior edges
/// assert_eq!(dst.get_pixel(1, 2).unwrap(), [0.0; 4]);
/// ```
pub fn sobel_edges<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    dispatcher: &mut Dispatcher,
) -> Result<(), FilterError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        )
        .into());
    }

    dispatcher.submit(&SobelKernel::new(src), dst)?;

    Ok(())
}

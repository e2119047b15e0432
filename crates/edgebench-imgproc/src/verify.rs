use edgebench_image::{Image, ImageError};

use crate::error::FilterError;
use crate::filter::sobel_pixel;

/// Default absolute per-channel tolerance used when comparing filter outputs.
pub const DEFAULT_TOLERANCE: f32 = 1e-5;

/// The linear range of pixels to recompute, with pixel `i` at `(i % width, i / width)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationSetting {
    /// First linear pixel index to check.
    pub begin: usize,
    /// Number of pixels to check; `None` checks until the end of the image.
    pub range: Option<usize>,
}

impl Default for VerificationSetting {
    fn default() -> Self {
        Self {
            begin: 0,
            range: None,
        }
    }
}

impl VerificationSetting {
    /// Check `range` pixels starting at linear index `begin`.
    pub fn new(begin: usize, range: usize) -> Self {
        Self {
            begin,
            range: Some(range),
        }
    }

    /// Resolve the setting against an image with `num_pixels` pixels.
    fn resolve(&self, num_pixels: usize) -> Result<std::ops::Range<usize>, FilterError> {
        if self.begin >= num_pixels || self.range == Some(0) {
            return Err(FilterError::EmptyVerificationRange(self.begin, num_pixels));
        }
        let end = match self.range {
            Some(range) => self.begin.saturating_add(range).min(num_pixels),
            None => num_pixels,
        };
        Ok(self.begin..end)
    }
}

/// A pixel whose produced value differs from the recomputed one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mismatch<const C: usize> {
    /// Column of the pixel.
    pub x: usize,
    /// Row of the pixel.
    pub y: usize,
    /// Value produced by the sequential recomputation.
    pub expected: [f32; C],
    /// Value found in the output buffer.
    pub actual: [f32; C],
}

impl<const C: usize> Mismatch<C> {
    /// Largest absolute per-channel difference.
    pub fn max_abs_diff(&self) -> f32 {
        self.expected
            .iter()
            .zip(self.actual.iter())
            .map(|(e, a)| (e - a).abs())
            .fold(0.0, f32::max)
    }
}

/// Outcome of a verification pass.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationReport<const C: usize> {
    /// Number of pixels that were recomputed.
    pub checked: usize,
    /// Number of pixels outside of the tolerance.
    pub mismatches: usize,
    /// The first mismatching pixel in scan order.
    pub first_mismatch: Option<Mismatch<C>>,
}

impl<const C: usize> VerificationReport<C> {
    /// Whether every checked pixel matched.
    pub fn passed(&self) -> bool {
        self.mismatches == 0
    }
}

/// Recompute the Sobel filter sequentially and compare it with a produced output.
///
/// # Arguments
///
/// * `src` - The image the filter was applied to.
/// * `dst` - The produced output image.
/// * `setting` - The pixels to check.
/// * `tolerance` - The absolute per-channel tolerance.
///
/// # Errors
///
/// Returns an error if the images differ in size or the range selects no pixel.
/// A mismatch is not an error; it is reported through [`VerificationReport`].
///
/// # Examples
///
/// ```
/// use edgebench_image::Image;
/// use edgebench_imgproc::verify::{verify_sobel, VerificationSetting, DEFAULT_TOLERANCE};
///
/// let src = Image::<f32, 4>::from_size_val([3, 3].into(), 0.5).unwrap();
/// let dst = Image::<f32, 4>::from_size_val([3, 3].into(), 0.0).unwrap();
///
/// let report =
///     verify_sobel(&src, &dst, &VerificationSetting::default(), DEFAULT_TOLERANCE).unwrap();
///
/// // only the centre pixel of a flat 3x3 image has zero response
/// assert_eq!(report.checked, 9);
/// assert_eq!(report.mismatches, 8);
/// ```
pub fn verify_sobel<const C: usize>(
    src: &Image<f32, C>,
    dst: &Image<f32, C>,
    setting: &VerificationSetting,
    tolerance: f32,
) -> Result<VerificationReport<C>, FilterError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        )
        .into());
    }

    let cols = src.cols();
    let pixels = setting.resolve(src.size().area())?;

    let mut report = VerificationReport {
        checked: 0,
        mismatches: 0,
        first_mismatch: None,
    };

    for i in pixels {
        let (x, y) = (i % cols, i / cols);
        let expected = sobel_pixel(src, x, y);
        let actual = dst.pixel_unchecked(x, y);
        report.checked += 1;

        // a NaN in the output never compares within tolerance
        let matches = expected
            .iter()
            .zip(actual.iter())
            .all(|(e, a)| (e - a).abs() <= tolerance);

        if !matches {
            report.mismatches += 1;
            if report.first_mismatch.is_none() {
                report.first_mismatch = Some(Mismatch {
                    x,
                    y,
                    expected,
                    actual,
                });
            }
        }
    }

    Ok(report)
}

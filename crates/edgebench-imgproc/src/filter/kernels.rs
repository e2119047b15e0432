/// The 3x3 Sobel kernel for the horizontal gradient, stored row-major.
///
/// The vertical gradient kernel is its transpose and is read from the same array
/// through [`sobel_coefficient_v`].
pub const SOBEL_KERNEL_3X3: [f32; 9] = [
    1.0, 0.0, -1.0, //
    2.0, 0.0, -2.0, //
    1.0, 0.0, -1.0,
];

/// Radius of the Sobel neighbourhood.
pub const SOBEL_RADIUS: isize = 1;

// linear index of the centre coefficient
const CENTER: isize = 4;

/// Horizontal gradient weight for the neighbour at offset (`dx`, `dy`).
///
/// Reads row `dy`, column `dx` of [`SOBEL_KERNEL_3X3`], with both offsets in {-1, 0, 1}.
///
/// # Examples
///
/// ```
/// use edgebench_imgproc::filter::kernels::sobel_coefficient_h;
///
/// assert_eq!(sobel_coefficient_h(-1, 0), 2.0);
/// assert_eq!(sobel_coefficient_h(1, 0), -2.0);
/// assert_eq!(sobel_coefficient_h(0, 1), 0.0);
/// ```
#[inline]
pub fn sobel_coefficient_h(dx: isize, dy: isize) -> f32 {
    debug_assert!(dx.abs() <= SOBEL_RADIUS && dy.abs() <= SOBEL_RADIUS);
    SOBEL_KERNEL_3X3[(CENTER + dx + dy * 3) as usize]
}

/// Vertical gradient weight for the neighbour at offset (`dx`, `dy`).
///
/// Same backing array as [`sobel_coefficient_h`] with the roles of the offsets swapped.
#[inline]
pub fn sobel_coefficient_v(dx: isize, dy: isize) -> f32 {
    debug_assert!(dx.abs() <= SOBEL_RADIUS && dy.abs() <= SOBEL_RADIUS);
    SOBEL_KERNEL_3X3[(CENTER + dy + dx * 3) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    const OFFSETS: [isize; 3] = [-1, 0, 1];

    #[test]
    fn test_sobel_kernel_3x3() {
        #[rustfmt::skip]
        let expected_h = [
            [1.0, 0.0, -1.0],
            [2.0, 0.0, -2.0],
            [1.0, 0.0, -1.0],
        ];
        #[rustfmt::skip]
        let expected_v = [
            [1.0, 2.0, 1.0],
            [0.0, 0.0, 0.0],
            [-1.0, -2.0, -1.0],
        ];
        for (r, dy) in OFFSETS.iter().enumerate() {
            for (c, dx) in OFFSETS.iter().enumerate() {
                assert_eq!(sobel_coefficient_h(*dx, *dy), expected_h[r][c]);
                assert_eq!(sobel_coefficient_v(*dx, *dy), expected_v[r][c]);
            }
        }
    }

    #[test]
    fn test_sobel_kernel_transpose() {
        for dy in OFFSETS {
            for dx in OFFSETS {
                assert_eq!(sobel_coefficient_h(dx, dy), sobel_coefficient_v(dy, dx));
            }
        }
    }

    #[test]
    fn test_sobel_kernel_zero_sum() {
        let sum_h: f32 = SOBEL_KERNEL_3X3.iter().sum();
        assert_eq!(sum_h, 0.0);
        assert_eq!(sobel_coefficient_h(0, 0), 0.0);
        assert_eq!(sobel_coefficient_v(0, 0), 0.0);
    }
}

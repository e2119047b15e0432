use approx::assert_abs_diff_eq;
use rand::{rngs::StdRng, Rng, SeedableRng};

use edgebench_image::{Image, ImageSize};
use edgebench_imgproc::filter::kernels::{sobel_coefficient_h, sobel_coefficient_v};
use edgebench_imgproc::filter::{sobel_edges, sobel_gradients_at};
use edgebench_imgproc::parallel::{Dispatcher, ExecutionStrategy, KernelId};
use edgebench_imgproc::verify::{verify_sobel, VerificationSetting, DEFAULT_TOLERANCE};
use edgebench_imgproc::FilterError;

const STRATEGIES: [ExecutionStrategy; 4] = [
    ExecutionStrategy::Serial,
    ExecutionStrategy::ParallelElements,
    ExecutionStrategy::ParallelRows,
    ExecutionStrategy::Fixed(3),
];

fn random_image(n: usize, seed: u64) -> Image<f32, 4> {
    let mut rng = StdRng::seed_from_u64(seed);
    Image::from_size_fn(ImageSize::square(n), |_, _| {
        [
            rng.random_range(-0.5..1.5),
            rng.random::<f32>(),
            rng.random::<f32>(),
            rng.random_range(0.0..0.1),
        ]
    })
    .unwrap()
}

fn run(src: &Image<f32, 4>, strategy: ExecutionStrategy) -> Result<Image<f32, 4>, FilterError> {
    let mut dst = Image::from_size_val(src.size(), -1.0)?;
    let mut dispatcher = Dispatcher::new(strategy)?;
    sobel_edges(src, &mut dst, &mut dispatcher)?;
    assert_eq!(dispatcher.launches(KernelId::Sobel3x3), 1);
    Ok(dst)
}

#[test]
fn boundary_exclusion_impulse_response() -> Result<(), FilterError> {
    // a unit impulse anywhere in the image must reach (x, y) only through its in-range
    // 3x3 neighbourhood, and only with the matching coefficient
    let n = 4;
    for py in 0..n {
        for px in 0..n {
            let mut src = Image::<f32, 1>::from_size_val(ImageSize::square(n), 0.0)?;
            src.set_pixel(px, py, [1.0])?;

            for y in 0..n {
                for x in 0..n {
                    let dx = px as isize - x as isize;
                    let dy = py as isize - y as isize;
                    let neighbour = dx.abs() <= 1 && dy.abs() <= 1 && (dx, dy) != (0, 0);
                    let (ex, ey) = if neighbour {
                        (sobel_coefficient_h(dx, dy), sobel_coefficient_v(dx, dy))
                    } else {
                        (0.0, 0.0)
                    };

                    let (gx, gy) = sobel_gradients_at(&src, x, y);
                    assert_eq!(gx, [ex], "gx at ({x}, {y}) for impulse ({px}, {py})");
                    assert_eq!(gy, [ey], "gy at ({x}, {y}) for impulse ({px}, {py})");
                }
            }
        }
    }
    Ok(())
}

#[test]
fn output_range_invariant() -> Result<(), FilterError> {
    let src = random_image(17, 7);
    for strategy in STRATEGIES {
        let dst = run(&src, strategy)?;
        assert!(dst.as_slice().iter().all(|v| (0.0..=1.0).contains(v)));
    }
    Ok(())
}

#[test]
fn determinism_across_runs_and_strategies() -> Result<(), FilterError> {
    let src = random_image(23, 11);
    let reference = run(&src, ExecutionStrategy::Serial)?;
    for strategy in STRATEGIES {
        assert_eq!(run(&src, strategy)?.as_slice(), reference.as_slice());
        assert_eq!(run(&src, strategy)?.as_slice(), reference.as_slice());
    }
    Ok(())
}

#[test]
fn flat_field_zero_response() -> Result<(), FilterError> {
    let n = 12;
    let color = [0.3, 0.7, 0.1, 1.0];
    let src = Image::<f32, 4>::from_size_fn(ImageSize::square(n), |_, _| color)?;
    let dst = run(&src, ExecutionStrategy::default())?;
    for y in 1..n - 1 {
        for x in 1..n - 1 {
            assert_eq!(dst.get_pixel(x, y)?, [0.0; 4], "pixel ({x}, {y})");
        }
    }
    Ok(())
}

#[test]
fn transpose_swaps_gradients() -> Result<(), FilterError> {
    let src = random_image(5, 3);
    let transposed = Image::<f32, 4>::from_size_fn(src.size(), |x, y| src.pixel_unchecked(y, x))?;

    for y in 1..4 {
        for x in 1..4 {
            let (gx, gy) = sobel_gradients_at(&src, x, y);
            let (gx_t, gy_t) = sobel_gradients_at(&transposed, y, x);
            for ch in 0..4 {
                assert_abs_diff_eq!(gx[ch], gy_t[ch], epsilon = 1e-6);
                assert_abs_diff_eq!(gy[ch], gx_t[ch], epsilon = 1e-6);
            }
        }
    }
    Ok(())
}

#[test]
fn verifier_agrees_with_dispatch() -> Result<(), FilterError> {
    for (n, seed) in [(8, 1), (16, 2), (33, 3)] {
        let src = random_image(n, seed);
        for strategy in STRATEGIES {
            let dst = run(&src, strategy)?;
            let report =
                verify_sobel(&src, &dst, &VerificationSetting::default(), DEFAULT_TOLERANCE)?;
            assert!(report.passed(), "{strategy} n={n}: {report:?}");
            assert_eq!(report.checked, n * n);
        }
    }
    Ok(())
}

#[test]
fn verifier_detects_corrupted_output() -> Result<(), FilterError> {
    let src = random_image(8, 5);
    let mut dst = run(&src, ExecutionStrategy::ParallelRows)?;
    let px = dst.get_pixel(5, 6)?;
    dst.set_pixel(5, 6, [px[0], px[1], px[2], px[3] + 0.5])?;

    let report = verify_sobel(&src, &dst, &VerificationSetting::default(), DEFAULT_TOLERANCE)?;
    assert_eq!(report.mismatches, 1);
    let mismatch = report.first_mismatch.unwrap();
    assert_eq!((mismatch.x, mismatch.y), (5, 6));
    Ok(())
}

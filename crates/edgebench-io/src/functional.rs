use std::path::Path;

use edgebench_image::{ops, Image, ImageSize};

use crate::error::IoError;

/// Reads an RGBA8 image from the given file path.
///
/// The method tries to read from any image format supported by the image crate and
/// converts it to four 8-bit channels.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An image containing the image data.
pub fn read_image_any_rgba8(file_path: impl AsRef<Path>) -> Result<Image<u8, 4>, IoError> {
    let file_path = file_path.as_ref().to_owned();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path));
    }

    let img = image::ImageReader::open(&file_path)?
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    if size.area() == 0 {
        return Err(IoError::InvalidImageSize(size.width, size.height));
    }

    Ok(Image::new(size, img.into_rgba8().into_raw())?)
}

/// Reads an image and fills a `size` x `size` RGBA f32 buffer from it.
///
/// Channels are scaled to `[0, 1]`. The source is tiled by mirroring it at each of
/// its edges, so any side length is valid: a larger source is cropped to its top-left
/// corner and a smaller one is reflected until the buffer is full.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
/// * `size` - The side length of the output image.
pub fn read_image_mirrored_rgba32f(
    file_path: impl AsRef<Path>,
    size: usize,
) -> Result<Image<f32, 4>, IoError> {
    if size == 0 {
        return Err(IoError::InvalidImageSize(size, size));
    }

    let src_u8 = read_image_any_rgba8(file_path)?;

    let mut src = Image::<f32, 4>::from_size_val(src_u8.size(), 0.0)?;
    ops::cast_and_scale(&src_u8, &mut src, 1.0 / 255.0)?;

    log::debug!(
        "mirroring a {}x{} image into {size}x{size}",
        src.width(),
        src.height()
    );

    let (width, height) = (src.width(), src.height());
    let image = Image::from_size_fn(ImageSize::square(size), |x, y| {
        src.pixel_unchecked(mirror_index(x, width), mirror_index(y, height))
    })?;

    Ok(image)
}

/// Writes an RGBA f32 image to the given file path.
///
/// Channels are clamped to `[0, 1]` and quantized to 8 bits; the format is chosen
/// from the file extension.
///
/// # Arguments
///
/// * `file_path` - The path to the output image.
/// * `image` - The image to write.
pub fn write_image_rgba32f(
    file_path: impl AsRef<Path>,
    image: &Image<f32, 4>,
) -> Result<(), IoError> {
    let data = image
        .as_slice()
        .iter()
        .map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect::<Vec<_>>();

    let buffer =
        image::RgbaImage::from_raw(image.width() as u32, image.height() as u32, data)
            .ok_or(IoError::InvalidImageSize(image.width(), image.height()))?;

    buffer
        .save(file_path.as_ref())
        .map_err(IoError::ImageEncodeError)?;

    Ok(())
}

// reflect `i` into [0, len), repeating the edge pixel at each fold
fn mirror_index(i: usize, len: usize) -> usize {
    let period = 2 * len;
    let r = i % period;
    if r < len {
        r
    } else {
        period - 1 - r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirror_index() {
        let idx = (0..9).map(|i| mirror_index(i, 3)).collect::<Vec<_>>();
        assert_eq!(idx, vec![0, 1, 2, 2, 1, 0, 0, 1, 2]);
        assert!((0..4).all(|i| mirror_index(i, 1) == 0));
    }

    #[test]
    fn read_missing_file() {
        let res = read_image_mirrored_rgba32f("does/not/exist.png", 4);
        assert!(matches!(res, Err(IoError::FileDoesNotExist(_))));
    }

    #[test]
    fn read_zero_size() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("one.png");
        write_image_rgba32f(&file_path, &Image::from_size_val([1, 1].into(), 0.5)?)?;

        let res = read_image_mirrored_rgba32f(&file_path, 0);
        assert!(matches!(res, Err(IoError::InvalidImageSize(0, 0))));
        Ok(())
    }

    #[test]
    fn read_write_mirrored() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("ramp.png");

        // 3x2 image whose channels encode the pixel position
        let src = Image::<f32, 4>::from_size_fn([3, 2].into(), |x, y| {
            [x as f32 * 51.0 / 255.0, y as f32 * 102.0 / 255.0, 1.0, 1.0]
        })?;
        write_image_rgba32f(&file_path, &src)?;
        assert!(file_path.exists(), "File does not exist: {:?}", file_path);

        let back = read_image_any_rgba8(&file_path)?;
        assert_eq!(back.size(), src.size());
        assert_eq!(back.get_pixel(2, 1)?, [102, 102, 255, 255]);

        let mirrored = read_image_mirrored_rgba32f(&file_path, 5)?;
        assert_eq!(mirrored.size(), ImageSize::square(5));
        for y in 0..5 {
            for x in 0..5 {
                let expected = src.get_pixel(mirror_index(x, 3), mirror_index(y, 2))?;
                let actual = mirrored.get_pixel(x, y)?;
                for ch in 0..4 {
                    assert!((expected[ch] - actual[ch]).abs() < 1e-6, "pixel ({x}, {y})");
                }
            }
        }

        // a smaller buffer crops the top-left corner
        let cropped = read_image_mirrored_rgba32f(&file_path, 1)?;
        let expected = [0.0, 0.0, 1.0, 1.0];
        for (a, e) in cropped.as_slice().iter().zip(expected.iter()) {
            assert!((a - e).abs() < 1e-6);
        }
        Ok(())
    }

    #[test]
    fn write_clamps_out_of_range() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("clamped.png");
        let src = Image::<f32, 4>::new([2, 1].into(), vec![-1.0, 2.0, 0.5, 1.0, 0.0, 1.0, 0.0, 1.0])?;
        write_image_rgba32f(&file_path, &src)?;

        let back = read_image_any_rgba8(&file_path)?;
        assert_eq!(back.as_slice(), &[0, 255, 128, 255, 0, 255, 0, 255]);
        Ok(())
    }
}

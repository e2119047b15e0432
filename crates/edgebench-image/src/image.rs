use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use edgebench_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl ImageSize {
    /// Create the size of a square image with side length `n`.
    pub fn square(n: usize) -> Self {
        Self {
            width: n,
            height: n,
        }
    }

    /// Total number of pixels covered by this size.
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Represents an image with pixel data.
///
/// The pixel data is stored contiguously in row-major order with shape (H, W, C).
/// A pixel is addressed by its column `x` and its row `y`.
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T, const C: usize> {
    size: ImageSize,
    data: Vec<T>,
}

impl<T, const C: usize> Image<T, C> {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The pixel data of the image.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the image size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use edgebench_image::{Image, ImageSize};
    ///
    /// let image = Image::<f32, 4>::new(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     vec![0f32; 10 * 20 * 4],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.num_channels(), 4);
    /// ```
    pub fn new(size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        if data.len() != size.width * size.height * C {
            return Err(ImageError::InvalidChannelShape(
                data.len(),
                size.width * size.height * C,
            ));
        }

        Ok(Self { size, data })
    }

    /// Create a new image with the given size and every element set to `val`.
    ///
    /// # Examples
    ///
    /// ```
    /// use edgebench_image::{Image, ImageSize};
    ///
    /// let image = Image::<f32, 4>::from_size_val([3, 2].into(), 0.5).unwrap();
    ///
    /// assert_eq!(image.get_pixel(2, 1).unwrap(), [0.5; 4]);
    /// ```
    pub fn from_size_val(size: ImageSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        let data = vec![val; size.width * size.height * C];
        Image::new(size, data)
    }

    /// Create a new image by evaluating `f(x, y)` for every pixel.
    ///
    /// Pixels are generated in row-major order.
    pub fn from_size_fn(
        size: ImageSize,
        mut f: impl FnMut(usize, usize) -> [T; C],
    ) -> Result<Self, ImageError> {
        let mut data = Vec::with_capacity(size.area() * C);
        for y in 0..size.height {
            for x in 0..size.width {
                data.extend(f(x, y));
            }
        }
        Image::new(size, data)
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.size.width
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.size.height
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of channels in the image.
    pub fn num_channels(&self) -> usize {
        C
    }

    /// Get the pixel data as a flat slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the pixel data as a flat mutable slice.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the image and return the pixel data.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.size.width + x) * C
    }

    /// Get the channels of the pixel at column `x` and row `y`.
    ///
    /// # Errors
    ///
    /// If the coordinates are outside of the image, an error is returned.
    pub fn get_pixel(&self, x: usize, y: usize) -> Result<[T; C], ImageError>
    where
        T: Copy,
    {
        if x >= self.width() || y >= self.height() {
            return Err(ImageError::PixelIndexOutOfBounds(
                x,
                y,
                self.width(),
                self.height(),
            ));
        }
        Ok(self.pixel_unchecked(x, y))
    }

    /// Get the channels of the pixel at column `x` and row `y` without the error path.
    ///
    /// PRECONDITION: `x < width` and `y < height`, otherwise this panics.
    #[inline]
    pub fn pixel_unchecked(&self, x: usize, y: usize) -> [T; C]
    where
        T: Copy,
    {
        let offset = self.offset(x, y);
        let mut pixel = [self.data[offset]; C];
        pixel.copy_from_slice(&self.data[offset..offset + C]);
        pixel
    }

    /// Set the channels of the pixel at column `x` and row `y`.
    ///
    /// # Errors
    ///
    /// If the coordinates are outside of the image, an error is returned.
    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: [T; C]) -> Result<(), ImageError>
    where
        T: Copy,
    {
        if x >= self.width() || y >= self.height() {
            return Err(ImageError::PixelIndexOutOfBounds(
                x,
                y,
                self.width(),
                self.height(),
            ));
        }
        let offset = self.offset(x, y);
        self.data[offset..offset + C].copy_from_slice(&pixel);
        Ok(())
    }
}

use crate::error::InputError;

/// Borrowed 8-bit grayscale buffer. Rows start `stride` bytes apart; only
/// the first `w` bytes of each row are pixels.
#[derive(Clone, Copy, Debug)]
pub struct ImageU8<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize, // bytes between rows
    pub data: &'a [u8],
}

impl<'a> ImageU8<'a> {
    /// Wrap `data` after checking that the geometry is addressable.
    pub fn new(w: usize, h: usize, stride: usize, data: &'a [u8]) -> Result<Self, InputError> {
        let image = Self { w, h, stride, data };
        image.validate()?;
        Ok(image)
    }

    /// Checks dimensions, stride and buffer length.
    ///
    /// The last row only needs `w` bytes, so a buffer cropped right after the
    /// final pixel is accepted.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.w == 0 || self.h == 0 {
            return Err(InputError::ZeroDimensions {
                width: self.w,
                height: self.h,
            });
        }
        if self.stride < self.w {
            return Err(InputError::StrideTooSmall {
                stride: self.stride,
                width: self.w,
            });
        }
        let required = self.stride * (self.h - 1) + self.w;
        if self.data.len() < required {
            return Err(InputError::BufferTooShort {
                len: self.data.len(),
                required,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.stride + x]
    }
}

impl<'a> crate::image::traits::ImageView for ImageU8<'a> {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[u8]> {
        (self.stride == self.w).then(|| &self.data[..self.w * self.h])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageView;

    #[test]
    fn rejects_zero_dimensions() {
        let data = [0u8; 4];
        let err = ImageU8::new(0, 2, 2, &data).unwrap_err();
        assert_eq!(err, InputError::ZeroDimensions { width: 0, height: 2 });
    }

    #[test]
    fn rejects_short_buffer_and_narrow_stride() {
        let data = [0u8; 10];
        assert_eq!(
            ImageU8::new(4, 3, 3, &data).unwrap_err(),
            InputError::StrideTooSmall { stride: 3, width: 4 }
        );
        assert_eq!(
            ImageU8::new(4, 3, 4, &data).unwrap_err(),
            InputError::BufferTooShort { len: 10, required: 12 }
        );
    }

    #[test]
    fn padded_rows_skip_stride_tail() {
        // 3x2 image, stride 5, last row cropped after the final pixel.
        let data = [1u8, 2, 3, 99, 99, 4, 5, 6];
        let img = ImageU8::new(3, 2, 5, &data).expect("valid geometry");
        assert_eq!(img.row(1), &[4, 5, 6]);
        assert_eq!(img.get(2, 0), 3);
        assert!(img.as_slice().is_none());
    }
}

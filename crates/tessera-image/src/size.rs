/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Image dimensions
use core::fmt::{Display, Formatter};

use crate::errors::ImageErrors;

/// The width and height of an image, both always positive
///
/// # Example
/// ```
/// use tessera_image::size::ImageSize;
///
/// let size = ImageSize::new(640, 480).unwrap();
/// assert_eq!(size, (640, 480));
/// assert_eq!(size.to_string(), "640x480");
///
/// assert!(ImageSize::new(0, 480).is_err());
/// assert!(ImageSize::try_from((1.5, 2.0)).is_err());
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageSize {
    width:  usize,
    height: usize
}

impl ImageSize {
    /// Create a size, failing if either side is zero or negative
    pub fn new(width: i64, height: i64) -> Result<ImageSize, ImageErrors> {
        match (usize::try_from(width), usize::try_from(height)) {
            (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok(ImageSize {
                width:  w,
                height: h
            }),
            _ => Err(ImageErrors::NonPositiveSize(width, height))
        }
    }
    pub const fn width(&self) -> usize {
        self.width
    }
    pub const fn height(&self) -> usize {
        self.height
    }
    /// Width and height as a tuple
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }
    /// The size with width and height exchanged
    pub(crate) const fn transposed(self) -> ImageSize {
        ImageSize {
            width:  self.height,
            height: self.width
        }
    }
}

impl TryFrom<(usize, usize)> for ImageSize {
    type Error = ImageErrors;

    fn try_from((width, height): (usize, usize)) -> Result<Self, Self::Error> {
        if width == 0 || height == 0 {
            return Err(ImageErrors::NonPositiveSize(
                width as i64,
                height as i64
            ));
        }
        Ok(ImageSize { width, height })
    }
}

impl TryFrom<(i64, i64)> for ImageSize {
    type Error = ImageErrors;

    fn try_from((width, height): (i64, i64)) -> Result<Self, Self::Error> {
        ImageSize::new(width, height)
    }
}

impl TryFrom<(f64, f64)> for ImageSize {
    type Error = ImageErrors;

    fn try_from((width, height): (f64, f64)) -> Result<Self, Self::Error> {
        if width.fract() != 0.0 || height.fract() != 0.0 || !width.is_finite() || !height.is_finite()
        {
            return Err(ImageErrors::NonIntegralSize(width, height));
        }
        ImageSize::new(width as i64, height as i64)
    }
}

impl PartialEq<(usize, usize)> for ImageSize {
    fn eq(&self, other: &(usize, usize)) -> bool {
        self.dimensions() == *other
    }
}

impl Display for ImageSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::ErrorKind;
    use crate::size::ImageSize;

    #[test]
    fn rejects_non_positive() {
        for (w, h) in [(0, 1), (1, 0), (-4, 3), (3, -4)] {
            let err = ImageSize::new(w, h).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
        assert!(ImageSize::try_from((0_usize, 5_usize)).is_err());
    }

    #[test]
    fn rejects_fractions() {
        assert!(ImageSize::try_from((2.5, 3.0)).is_err());
        assert!(ImageSize::try_from((f64::NAN, 3.0)).is_err());
        assert!(ImageSize::try_from((-2.0, 3.0)).is_err());
        assert_eq!(ImageSize::try_from((2.0, 3.0)).unwrap(), (2, 3));
    }
}

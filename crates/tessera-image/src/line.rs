/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Windows onto one scanline of an image buffer
use core::fmt::{Debug, Formatter};

use tessera_core::mode::ColorMode;

use crate::errors::ImageErrors;
use crate::image::Image;
use crate::index::{normalize, Slice};
use crate::pixel::{PixelView, PixelViewMut};
use crate::size::ImageSize;

/// Copy the selected pixels of a row into a new one row image
fn slice_row(mode: &'static ColorMode, bytes: &[u8], slice: Slice) -> Result<Image, ImageErrors> {
    let bpp = mode.bytes_per_pixel()?;
    let positions = slice.positions(bytes.len() / bpp)?;
    let size = ImageSize::try_from((positions.len(), 1))?;

    let mut out = Vec::with_capacity(positions.len() * bpp);
    for x in positions {
        out.extend_from_slice(&bytes[x * bpp..(x + 1) * bpp]);
    }
    Image::from_bytes(mode, size, out)
}

/// A read only view of one row of pixels
#[derive(Copy, Clone)]
pub struct LineView<'a> {
    mode:  &'static ColorMode,
    bpp:   usize,
    bytes: &'a [u8]
}

impl<'a> LineView<'a> {
    pub(crate) fn new(mode: &'static ColorMode, bpp: usize, bytes: &'a [u8]) -> LineView<'a> {
        LineView { mode, bpp, bytes }
    }
    pub const fn mode(&self) -> &'static ColorMode {
        self.mode
    }
    /// Number of pixels in the row
    pub const fn len(&self) -> usize {
        self.bytes.len() / self.bpp
    }
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
    /// The raw bytes of the row, native endian
    pub const fn bytes(&self) -> &'a [u8] {
        self.bytes
    }
    /// A pixel of the row, negative indices count from the end
    pub fn pixel(&self, x: isize) -> Result<PixelView<'a>, ImageErrors> {
        let x = normalize(x, self.len())?;
        Ok(PixelView::new(
            self.mode,
            &self.bytes[x * self.bpp..(x + 1) * self.bpp]
        ))
    }
    /// Copy the pixels a slice selects into a new image one row tall
    pub fn slice(&self, slice: Slice) -> Result<Image, ImageErrors> {
        slice_row(self.mode, self.bytes, slice)
    }
    pub fn pixels(&self) -> impl Iterator<Item = PixelView<'a>> + 'a {
        let mode = self.mode;
        self.bytes
            .chunks_exact(self.bpp)
            .map(move |pixel| PixelView::new(mode, pixel))
    }
    /// Copy the row into a new image one row tall
    pub fn to_image(&self) -> Result<Image, ImageErrors> {
        self.slice(Slice::full())
    }
}

impl Debug for LineView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.pixels()).finish()
    }
}

impl PartialEq for LineView<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.mode == other.mode && self.bytes == other.bytes
    }
}

/// A view of one row of pixels that can also write to it
pub struct LineViewMut<'a> {
    mode:  &'static ColorMode,
    bpp:   usize,
    bytes: &'a mut [u8]
}

impl<'a> LineViewMut<'a> {
    pub(crate) fn new(mode: &'static ColorMode, bpp: usize, bytes: &'a mut [u8]) -> LineViewMut<'a> {
        LineViewMut { mode, bpp, bytes }
    }
    /// Reborrow as a read only view
    pub fn as_view(&self) -> LineView<'_> {
        LineView::new(self.mode, self.bpp, &*self.bytes)
    }
    pub fn mode(&self) -> &'static ColorMode {
        self.mode
    }
    pub fn len(&self) -> usize {
        self.bytes.len() / self.bpp
    }
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
    pub fn pixel(&self, x: isize) -> Result<PixelView<'_>, ImageErrors> {
        let x = normalize(x, self.len())?;
        Ok(PixelView::new(
            self.mode,
            &self.bytes[x * self.bpp..(x + 1) * self.bpp]
        ))
    }
    pub fn pixel_mut(&mut self, x: isize) -> Result<PixelViewMut<'_>, ImageErrors> {
        let x = normalize(x, self.len())?;
        Ok(PixelViewMut::new(
            self.mode,
            &mut self.bytes[x * self.bpp..(x + 1) * self.bpp]
        ))
    }
    pub fn slice(&self, slice: Slice) -> Result<Image, ImageErrors> {
        slice_row(self.mode, &*self.bytes, slice)
    }
    pub fn pixels(&self) -> impl Iterator<Item = PixelView<'_>> + '_ {
        let mode = self.mode;
        self.bytes
            .chunks_exact(self.bpp)
            .map(move |pixel| PixelView::new(mode, pixel))
    }
    pub fn pixels_mut(&mut self) -> impl Iterator<Item = PixelViewMut<'_>> + '_ {
        let mode = self.mode;
        self.bytes
            .chunks_exact_mut(self.bpp)
            .map(move |pixel| PixelViewMut::new(mode, pixel))
    }
    pub fn to_image(&self) -> Result<Image, ImageErrors> {
        self.slice(Slice::full())
    }

    /// Overwrite the row with another row of the same mode and width
    pub fn assign(&mut self, line: &LineView) -> Result<(), ImageErrors> {
        if line.mode != self.mode || line.bytes.len() != self.bytes.len() {
            return Err(ImageErrors::ShapeMismatch(format!(
                "cannot assign a {} row of {} pixels to a {} row of {} pixels",
                line.mode.name(),
                line.len(),
                self.mode.name(),
                self.len()
            )));
        }
        self.bytes.copy_from_slice(line.bytes);
        Ok(())
    }
    /// Overwrite the row with an image one row tall
    pub fn assign_image_row(&mut self, image: &Image) -> Result<(), ImageErrors> {
        if image.size().height() != 1 {
            return Err(ImageErrors::ShapeMismatch(format!(
                "a row can only be assigned from an image one row tall, found {}",
                image.size()
            )));
        }
        self.assign(&image.line(0)?)
    }
}

impl Debug for LineViewMut<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        self.as_view().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use tessera_core::mode::{L, LA};
    use tessera_core::sample::Sample;

    use crate::image::Image;
    use crate::index::Slice;
    use crate::line::{LineView, LineViewMut};
    use crate::size::ImageSize;

    #[test]
    fn pixels_and_slices() {
        let bytes = [1, 10, 2, 20, 3, 30];
        let line = LineView::new(&LA, 2, &bytes);

        assert_eq!(line.len(), 3);
        assert_eq!(line.pixel(-1).unwrap().value(), [Sample::Int(3), Sample::Int(30)]);
        assert!(line.pixel(3).is_err());

        let tail = line.slice(Slice::reversed()).unwrap();
        assert_eq!(tail.size(), (3, 1));
        assert_eq!(tail.buffer(), [3, 30, 2, 20, 1, 10]);

        // an empty selection has no valid size
        assert!(line.slice(Slice::from(2..1)).is_err());
    }

    #[test]
    fn assignment_checks_width() {
        let mut bytes = [0; 3];
        let mut line = LineViewMut::new(&L, 1, &mut bytes);

        let row = Image::from_bytes(&L, ImageSize::new(3, 1).unwrap(), vec![7, 8, 9]).unwrap();
        line.assign_image_row(&row).unwrap();
        assert_eq!(line.as_view().bytes(), [7, 8, 9]);

        let short = Image::new(&L, ImageSize::new(2, 1).unwrap()).unwrap();
        assert!(line.assign_image_row(&short).is_err());

        for mut pixel in line.pixels_mut() {
            pixel.set(0, Sample::Int(1)).unwrap();
        }
        assert_eq!(line.as_view().bytes(), [1, 1, 1]);
    }
}

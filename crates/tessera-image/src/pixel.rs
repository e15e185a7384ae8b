/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Windows onto a single pixel of an image buffer
//!
//! A pixel view borrows the bytes of one pixel and reads or writes its
//! components through the image's mode, it never owns data.
use core::fmt::{Debug, Formatter};

use tessera_core::mode::ColorMode;
use tessera_core::sample::Sample;

use crate::errors::ImageErrors;
use crate::index::{normalize, Slice};

fn read_component(mode: &ColorMode, bytes: &[u8], index: usize) -> Sample {
    let width = mode.bytes_per_component();
    mode.read_sample(&bytes[index * width..])
}

fn read_value(mode: &ColorMode, bytes: &[u8]) -> Vec<Sample> {
    bytes
        .chunks_exact(mode.bytes_per_component())
        .map(|component| mode.read_sample(component))
        .collect()
}

/// Encode a whole pixel value into `out`, checking the component count
pub(crate) fn encode_value(
    mode: &ColorMode, value: &[Sample], out: &mut [u8]
) -> Result<(), ImageErrors> {
    if value.len() != mode.num_components() {
        return Err(ImageErrors::ShapeMismatch(format!(
            "{} components given for a {} pixel",
            value.len(),
            mode.name()
        )));
    }
    for (sample, component) in value
        .iter()
        .zip(out.chunks_exact_mut(mode.bytes_per_component()))
    {
        mode.write_sample(*sample, component)?;
    }
    Ok(())
}

fn component_position(mode: &ColorMode, name: &str) -> Result<usize, ImageErrors> {
    mode.component_index(name)
        .ok_or_else(|| ImageErrors::UnknownComponent(name.to_string()))
}

/// A read only view of one pixel
#[derive(Copy, Clone)]
pub struct PixelView<'a> {
    mode:  &'static ColorMode,
    bytes: &'a [u8]
}

impl<'a> PixelView<'a> {
    pub(crate) fn new(mode: &'static ColorMode, bytes: &'a [u8]) -> PixelView<'a> {
        PixelView { mode, bytes }
    }
    pub const fn mode(&self) -> &'static ColorMode {
        self.mode
    }
    /// Number of components
    pub const fn len(&self) -> usize {
        self.mode.num_components()
    }
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// The raw bytes of the pixel, native endian
    pub const fn bytes(&self) -> &'a [u8] {
        self.bytes
    }
    /// A single component, negative indices count from the last one
    pub fn get(&self, index: isize) -> Result<Sample, ImageErrors> {
        let index = normalize(index, self.len())?;
        Ok(read_component(self.mode, self.bytes, index))
    }
    /// The components a slice selects, in selection order
    pub fn get_slice(&self, slice: Slice) -> Result<Vec<Sample>, ImageErrors> {
        Ok(slice
            .positions(self.len())?
            .into_iter()
            .map(|i| read_component(self.mode, self.bytes, i))
            .collect())
    }
    /// A component by name, e.g `"g"` for an RGB pixel
    pub fn component(&self, name: &str) -> Result<Sample, ImageErrors> {
        let index = component_position(self.mode, name)?;
        Ok(read_component(self.mode, self.bytes, index))
    }
    /// Every component in mode order
    pub fn value(&self) -> Vec<Sample> {
        read_value(self.mode, self.bytes)
    }
}

impl Debug for PixelView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}{:?}", self.mode.name(), self.value())
    }
}

impl PartialEq for PixelView<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.mode == other.mode && self.bytes == other.bytes
    }
}

/// A view of one pixel that can also write components
pub struct PixelViewMut<'a> {
    mode:  &'static ColorMode,
    bytes: &'a mut [u8]
}

impl<'a> PixelViewMut<'a> {
    pub(crate) fn new(mode: &'static ColorMode, bytes: &'a mut [u8]) -> PixelViewMut<'a> {
        PixelViewMut { mode, bytes }
    }
    /// Reborrow as a read only view
    pub fn as_view(&self) -> PixelView<'_> {
        PixelView::new(self.mode, &*self.bytes)
    }
    pub fn mode(&self) -> &'static ColorMode {
        self.mode
    }
    pub fn len(&self) -> usize {
        self.mode.num_components()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    pub fn get(&self, index: isize) -> Result<Sample, ImageErrors> {
        self.as_view().get(index)
    }
    pub fn get_slice(&self, slice: Slice) -> Result<Vec<Sample>, ImageErrors> {
        self.as_view().get_slice(slice)
    }
    pub fn component(&self, name: &str) -> Result<Sample, ImageErrors> {
        self.as_view().component(name)
    }
    pub fn value(&self) -> Vec<Sample> {
        self.as_view().value()
    }

    /// Write a single component
    ///
    /// Samples the component cannot hold are rejected, the pixel is
    /// left untouched
    pub fn set(&mut self, index: isize, sample: Sample) -> Result<(), ImageErrors> {
        let index = normalize(index, self.len())?;
        let width = self.mode.bytes_per_component();

        self.mode
            .write_sample(sample, &mut self.bytes[index * width..])?;
        Ok(())
    }
    /// Write the components a slice selects, `samples` must have
    /// exactly one value per selected component
    pub fn set_slice(&mut self, slice: Slice, samples: &[Sample]) -> Result<(), ImageErrors> {
        let positions = slice.positions(self.len())?;

        if positions.len() != samples.len() {
            return Err(ImageErrors::ShapeMismatch(format!(
                "slice selects {} components but {} were given",
                positions.len(),
                samples.len()
            )));
        }
        let width = self.mode.bytes_per_component();
        let mut scratch = self.bytes.to_vec();

        for (position, sample) in positions.into_iter().zip(samples) {
            self.mode
                .write_sample(*sample, &mut scratch[position * width..])?;
        }
        self.bytes.copy_from_slice(&scratch);
        Ok(())
    }
    pub fn set_component(&mut self, name: &str, sample: Sample) -> Result<(), ImageErrors> {
        let index = component_position(self.mode, name)?;
        self.set(index as isize, sample)
    }
    /// Replace the whole pixel, one sample per component
    pub fn set_value(&mut self, value: &[Sample]) -> Result<(), ImageErrors> {
        let mut scratch = self.bytes.to_vec();
        encode_value(self.mode, value, &mut scratch)?;
        self.bytes.copy_from_slice(&scratch);
        Ok(())
    }
}

impl Debug for PixelViewMut<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        self.as_view().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use tessera_core::mode::{RGB, RGB48};
    use tessera_core::sample::Sample;

    use crate::errors::ErrorKind;
    use crate::index::Slice;
    use crate::pixel::{PixelView, PixelViewMut};

    #[test]
    fn components_by_index_and_name() {
        let bytes = [10, 20, 30];
        let pixel = PixelView::new(&RGB, &bytes);

        assert_eq!(pixel.get(0).unwrap(), Sample::Int(10));
        assert_eq!(pixel.get(-1).unwrap(), Sample::Int(30));
        assert_eq!(pixel.component("g").unwrap(), Sample::Int(20));
        assert_eq!(
            pixel.get_slice(Slice::reversed()).unwrap(),
            [Sample::Int(30), Sample::Int(20), Sample::Int(10)]
        );
        assert!(pixel.get(3).is_err());
        assert_eq!(
            pixel.component("a").unwrap_err().kind(),
            ErrorKind::Contract
        );
    }

    #[test]
    fn writes_are_checked() {
        let mut bytes = [0; 6];
        let mut pixel = PixelViewMut::new(&RGB48, &mut bytes);

        pixel.set_component("b", Sample::Int(1000)).unwrap();
        pixel.set(0, Sample::Int(7)).unwrap();
        assert_eq!(
            pixel.value(),
            [Sample::Int(7), Sample::Int(0), Sample::Int(1000)]
        );

        // too many components, and a value too large for 16 bits
        assert!(pixel.set_value(&[Sample::Int(1); 4]).is_err());
        assert!(pixel
            .set_value(&[Sample::Int(1), Sample::Int(1), Sample::Int(70000)])
            .is_err());
        assert_eq!(pixel.get(0).unwrap(), Sample::Int(7));

        pixel
            .set_slice(Slice::from(1..3), &[Sample::Int(2), Sample::Int(3)])
            .unwrap();
        assert_eq!(
            pixel.get_slice(Slice::from(1..)).unwrap(),
            [Sample::Int(2), Sample::Int(3)]
        );
    }
}

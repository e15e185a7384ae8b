/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! This module represents a single image
//!
//! An image is
//!
//! - a colour mode, describing the layout of a pixel
//!     - a size, which never changes after creation
//!         - one contiguous buffer of `mode.get_length(width, height)` bytes
//!             - and a map of sidecar metadata codecs fill in
//!
//! Components are stored in native endian, codecs convert at their boundary.
//!
//! Interleaved images can be indexed by row, by pixel or by a pair of
//! slices, see [`ImageKey`]. Rows and pixels come back as views into the
//! buffer while anything selected by a slice is copied into a new image.
//!
//! Planar images (e.g [`YV12`](tessera_core::mode::YV12)) store each
//! component in its own plane, there is no per-pixel layout to index so
//! every row or pixel operation on them returns
//! [`ImageErrors::PlanarImage`]. Extracting single planes as images
//! is not supported yet.
use core::cmp::Ordering;
use core::fmt::{Debug, Formatter};

use tessera_core::color::parse_color;
use tessera_core::info::ImageInfo;
use tessera_core::mode::ColorMode;
use tessera_core::sample::Sample;

use crate::errors::ImageErrors;
pub use crate::index::{Axis, ImageKey, Slice};
use crate::index::normalize;
use crate::line::{LineView, LineViewMut};
use crate::pixel::{encode_value, PixelView, PixelViewMut};
use crate::size::ImageSize;

/// What an image is created from, besides a mode and size
#[derive(Clone)]
pub enum Source<'a> {
    /// Copy the buffer and metadata of another image
    Image(&'a Image),
    /// Take ownership of raw native endian bytes
    Bytes(Vec<u8>)
}

/// Arguments for [`Image::build`]
///
/// Mode and size are required unless a source image is given, in which
/// case they default to the source's. A fill colour and a source cannot
/// be combined.
///
/// # Example
/// ```
/// use tessera_core::mode::RGB;
/// use tessera_core::sample::Sample;
/// use tessera_image::image::{Image, ImageBuilder};
/// use tessera_image::size::ImageSize;
///
/// let red = [Sample::Int(255), Sample::Int(0), Sample::Int(0)];
/// let builder = ImageBuilder::new()
///     .mode(&RGB)
///     .size(ImageSize::new(2, 2).unwrap())
///     .color(&red);
///
/// let image = Image::build(builder).unwrap();
/// assert_eq!(image.buffer(), [255, 0, 0, 255, 0, 0, 255, 0, 0, 255, 0, 0]);
/// ```
#[derive(Clone, Default)]
pub struct ImageBuilder<'a> {
    mode:   Option<&'static ColorMode>,
    size:   Option<ImageSize>,
    color:  Option<&'a [Sample]>,
    source: Option<Source<'a>>
}

impl<'a> ImageBuilder<'a> {
    pub fn new() -> ImageBuilder<'a> {
        ImageBuilder::default()
    }
    pub fn mode(mut self, mode: &'static ColorMode) -> Self {
        self.mode = Some(mode);
        self
    }
    pub fn size(mut self, size: ImageSize) -> Self {
        self.size = Some(size);
        self
    }
    /// Fill every pixel with this colour, one sample per component
    pub fn color(mut self, color: &'a [Sample]) -> Self {
        self.color = Some(color);
        self
    }
    pub fn source(mut self, source: Source<'a>) -> Self {
        self.source = Some(source);
        self
    }
}

/// Build a buffer where every pixel (or every sample of a plane) is `color`
fn filled_buffer(
    mode: &'static ColorMode, size: ImageSize, color: &[Sample]
) -> Result<Vec<u8>, ImageErrors> {
    if color.len() != mode.num_components() {
        return Err(ImageErrors::ColorLength(color.len(), mode.num_components()));
    }
    let (width, height) = size.dimensions();
    let component_width = mode.bytes_per_component();

    if mode.is_planar() {
        let mut buffer = Vec::with_capacity(mode.get_length(width, height));

        for (sample, (sx, sy)) in color.iter().zip(mode.subsampling()) {
            let mut encoded = vec![0; component_width];
            mode.write_sample(*sample, &mut encoded)?;

            buffer.extend(encoded.repeat((width / sx) * (height / sy)));
        }
        return Ok(buffer);
    }
    let mut pixel = vec![0; mode.bytes_per_pixel()?];
    encode_value(mode, color, &mut pixel)?;

    Ok(pixel.repeat(width * height))
}

/// The result of [`Image::get`]
#[derive(Debug)]
pub enum Selection<'a> {
    Line(LineView<'a>),
    Pixel(PixelView<'a>),
    Image(Image)
}

impl<'a> Selection<'a> {
    pub fn line(self) -> Option<LineView<'a>> {
        match self {
            Selection::Line(line) => Some(line),
            _ => None
        }
    }
    pub fn pixel(self) -> Option<PixelView<'a>> {
        match self {
            Selection::Pixel(pixel) => Some(pixel),
            _ => None
        }
    }
    pub fn image(self) -> Option<Image> {
        match self {
            Selection::Image(image) => Some(image),
            _ => None
        }
    }
}

/// A value for [`Image::set`]
#[derive(Copy, Clone)]
pub enum Assignment<'a> {
    /// One pixel value, only valid for a key selecting one pixel
    Pixel(&'a [Sample]),
    /// An image the exact shape of the selection
    Image(&'a Image),
    /// Pixel values for every selected pixel, row by row
    Rows(&'a [Vec<Sample>])
}

/// Represents a single image
#[derive(Clone)]
pub struct Image {
    mode:   &'static ColorMode,
    size:   ImageSize,
    buffer: Vec<u8>,
    info:   ImageInfo
}

impl Image {
    /// Create an image filled with the mode's transparent colour
    ///
    /// # Example
    /// ```
    /// use tessera_core::mode::{CMYK, L};
    /// use tessera_image::image::Image;
    /// use tessera_image::size::ImageSize;
    ///
    /// let size = ImageSize::new(3, 2).unwrap();
    /// assert_eq!(Image::new(&L, size).unwrap().buffer(), [0; 6]);
    /// assert_eq!(Image::new(&CMYK, size).unwrap().buffer(), [255; 24]);
    /// ```
    pub fn new(mode: &'static ColorMode, size: ImageSize) -> Result<Image, ImageErrors> {
        Image::build(ImageBuilder::new().mode(mode).size(size))
    }
    /// Create an image with every pixel set to `color`
    pub fn with_color(
        mode: &'static ColorMode, size: ImageSize, color: &[Sample]
    ) -> Result<Image, ImageErrors> {
        Image::build(ImageBuilder::new().mode(mode).size(size).color(color))
    }
    /// Create an image filled with a colour written as text, see
    /// [`parse_color`] for the accepted notations
    ///
    /// The parsed values are used as is, so the notation must give
    /// as many components as `mode` has.
    pub fn with_color_str(
        mode: &'static ColorMode, size: ImageSize, color: &str
    ) -> Result<Image, ImageErrors> {
        let (_, values) = parse_color(color)?;
        Image::with_color(mode, size, &values)
    }
    /// Wrap raw native endian bytes, which must be exactly
    /// `mode.get_length(width, height)` long
    pub fn from_bytes(
        mode: &'static ColorMode, size: ImageSize, bytes: Vec<u8>
    ) -> Result<Image, ImageErrors> {
        Image::build(
            ImageBuilder::new()
                .mode(mode)
                .size(size)
                .source(Source::Bytes(bytes))
        )
    }
    /// Copy another image, including its metadata
    pub fn from_image(image: &Image) -> Result<Image, ImageErrors> {
        Image::build(ImageBuilder::new().source(Source::Image(image)))
    }

    /// The general constructor, see [`ImageBuilder`]
    pub fn build(builder: ImageBuilder) -> Result<Image, ImageErrors> {
        if builder.color.is_some() && builder.source.is_some() {
            return Err(ImageErrors::ColorAndSource);
        }
        let source_image = match &builder.source {
            Some(Source::Image(image)) => Some(*image),
            _ => None
        };
        let mode = builder
            .mode
            .or(source_image.map(|x| x.mode))
            .ok_or(ImageErrors::MissingMode)?;
        // only catalog members are valid
        let mode = ColorMode::from_name(mode.name())?;

        let size = builder
            .size
            .or(source_image.map(|x| x.size))
            .ok_or(ImageErrors::MissingSize)?;

        let (width, height) = size.dimensions();
        let (x_div, y_div) = (mode.x_divisor(), mode.y_divisor());

        if width % x_div != 0 || height % y_div != 0 {
            return Err(ImageErrors::IndivisibleSize(
                mode.name(),
                (width, height),
                (x_div, y_div)
            ));
        }
        let expected = mode.get_length(width, height);
        let mut info = ImageInfo::new();

        let buffer = match builder.source {
            Some(Source::Image(image)) => {
                if image.buffer.len() != expected {
                    return Err(ImageErrors::SourceLength(expected, image.buffer.len()));
                }
                info = image.info.clone();
                image.buffer.clone()
            }
            Some(Source::Bytes(bytes)) => {
                if bytes.len() != expected {
                    return Err(ImageErrors::SourceLength(expected, bytes.len()));
                }
                bytes
            }
            None => filled_buffer(
                mode,
                size,
                builder.color.unwrap_or(mode.transparent_color())
            )?
        };

        Ok(Image {
            mode,
            size,
            buffer,
            info
        })
    }

    pub const fn mode(&self) -> &'static ColorMode {
        self.mode
    }
    pub const fn size(&self) -> ImageSize {
        self.size
    }
    /// Get image dimensions as a tuple of (width,height)
    pub const fn dimensions(&self) -> (usize, usize) {
        self.size.dimensions()
    }
    pub const fn is_planar(&self) -> bool {
        self.mode.is_planar()
    }
    /// The raw buffer, native endian
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }
    pub fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }
    pub fn into_buffer(self) -> Vec<u8> {
        self.buffer
    }
    /// Sidecar metadata, e.g a palette or gamma set by a decoder
    pub const fn info(&self) -> &ImageInfo {
        &self.info
    }
    pub fn info_mut(&mut self) -> &mut ImageInfo {
        &mut self.info
    }
    /// Number of rows
    pub fn len(&self) -> Result<usize, ImageErrors> {
        self.bytes_per_pixel("len")?;
        Ok(self.size.height())
    }
    /// Images are never empty, this exists to pair with [`len`](Self::len)
    pub fn is_empty(&self) -> bool {
        false
    }

    fn bytes_per_pixel(&self, operation: &'static str) -> Result<usize, ImageErrors> {
        if self.mode.is_planar() {
            return Err(ImageErrors::PlanarImage(operation));
        }
        Ok(self.mode.bytes_per_pixel()?)
    }
    /// Byte range of pixel `(x, y)`, both already normalised
    fn pixel_range(&self, bpp: usize, x: usize, y: usize) -> core::ops::Range<usize> {
        let start = (y * self.size.width() + x) * bpp;
        start..start + bpp
    }

    /// Index the image
    ///
    /// # Example
    /// ```
    /// use tessera_core::mode::L;
    /// use tessera_image::image::{Image, Selection, Slice};
    /// use tessera_image::size::ImageSize;
    ///
    /// let size = ImageSize::new(3, 2).unwrap();
    /// let image = Image::from_bytes(&L, size, vec![0, 1, 2, 3, 4, 5]).unwrap();
    ///
    /// let row = image.get(-1).unwrap().line().unwrap();
    /// assert_eq!(row.bytes(), [3, 4, 5]);
    ///
    /// let bottom = image.get((Slice::full(), 1)).unwrap().image().unwrap();
    /// assert_eq!(bottom.buffer(), [3, 4, 5]);
    ///
    /// let corner = image.get((Slice::from(1..), Slice::reversed())).unwrap();
    /// assert_eq!(corner.image().unwrap().buffer(), [4, 5, 1, 2]);
    /// ```
    pub fn get<K: Into<ImageKey>>(&self, key: K) -> Result<Selection<'_>, ImageErrors> {
        match key.into() {
            ImageKey::Row(y) => self.line(y).map(Selection::Line),
            ImageKey::Rows(rows) => self.rows(rows).map(Selection::Image),
            ImageKey::Point(Axis::Index(x), Axis::Index(y)) => {
                self.pixel(x, y).map(Selection::Pixel)
            }
            ImageKey::Point(x, y) => self.crop(x, y).map(Selection::Image)
        }
    }

    /// A view of row `y`, negative rows count from the bottom
    pub fn line(&self, y: isize) -> Result<LineView<'_>, ImageErrors> {
        let bpp = self.bytes_per_pixel("indexing")?;
        let y = normalize(y, self.size.height())?;
        let stride = self.size.width() * bpp;

        Ok(LineView::new(
            self.mode,
            bpp,
            &self.buffer[y * stride..(y + 1) * stride]
        ))
    }
    pub fn line_mut(&mut self, y: isize) -> Result<LineViewMut<'_>, ImageErrors> {
        let bpp = self.bytes_per_pixel("indexing")?;
        let y = normalize(y, self.size.height())?;
        let stride = self.size.width() * bpp;

        Ok(LineViewMut::new(
            self.mode,
            bpp,
            &mut self.buffer[y * stride..(y + 1) * stride]
        ))
    }
    /// A view of the pixel at column `x`, row `y`
    pub fn pixel(&self, x: isize, y: isize) -> Result<PixelView<'_>, ImageErrors> {
        let bpp = self.bytes_per_pixel("indexing")?;
        let x = normalize(x, self.size.width())?;
        let y = normalize(y, self.size.height())?;
        let range = self.pixel_range(bpp, x, y);

        Ok(PixelView::new(self.mode, &self.buffer[range]))
    }
    pub fn pixel_mut(&mut self, x: isize, y: isize) -> Result<PixelViewMut<'_>, ImageErrors> {
        let bpp = self.bytes_per_pixel("indexing")?;
        let x = normalize(x, self.size.width())?;
        let y = normalize(y, self.size.height())?;
        let range = self.pixel_range(bpp, x, y);

        Ok(PixelViewMut::new(self.mode, &mut self.buffer[range]))
    }
    /// Copy the rows a slice selects into a new image
    pub fn rows(&self, rows: Slice) -> Result<Image, ImageErrors> {
        self.crop(Axis::Range(Slice::full()), Axis::Range(rows))
    }
    /// Copy the selected columns of the selected rows into a new image
    pub fn crop(&self, x: Axis, y: Axis) -> Result<Image, ImageErrors> {
        let bpp = self.bytes_per_pixel("indexing")?;
        let columns = x.positions(self.size.width())?;
        let rows = y.positions(self.size.height())?;

        let size = ImageSize::try_from((columns.len(), rows.len()))?;
        let mut out = Vec::with_capacity(columns.len() * rows.len() * bpp);

        for y in &rows {
            for x in &columns {
                out.extend_from_slice(&self.buffer[self.pixel_range(bpp, *x, *y)]);
            }
        }
        Image::from_bytes(self.mode, size, out)
    }

    /// Assign to the region a key selects
    ///
    /// A key selecting one pixel takes a pixel value. Any key takes an
    /// image of the same mode and the exact shape of the selection, or
    /// one pixel value per selected pixel. Nothing is written if any
    /// check fails.
    ///
    /// # Example
    /// ```
    /// use tessera_core::mode::L;
    /// use tessera_core::sample::Sample;
    /// use tessera_image::image::{Assignment, Image, Slice};
    /// use tessera_image::size::ImageSize;
    ///
    /// let mut image = Image::new(&L, ImageSize::new(2, 2).unwrap()).unwrap();
    /// image.set((1, 0), Assignment::Pixel(&[Sample::Int(9)])).unwrap();
    ///
    /// let row = vec![vec![Sample::Int(1)], vec![Sample::Int(2)]];
    /// image.set(-1, Assignment::Rows(&row)).unwrap();
    ///
    /// assert_eq!(image.buffer(), [0, 9, 1, 2]);
    /// ```
    pub fn set<K: Into<ImageKey>>(&mut self, key: K, value: Assignment) -> Result<(), ImageErrors> {
        let bpp = self.bytes_per_pixel("indexing")?;
        let key = key.into();

        let (x, y) = match key {
            ImageKey::Row(y) => (Axis::Range(Slice::full()), Axis::Index(y)),
            ImageKey::Rows(rows) => (Axis::Range(Slice::full()), Axis::Range(rows)),
            ImageKey::Point(x, y) => (x, y)
        };
        let columns = x.positions(self.size.width())?;
        let rows = y.positions(self.size.height())?;
        let count = columns.len() * rows.len();

        // encoded pixels of the selection, row by row
        let encoded = match value {
            Assignment::Pixel(pixel) => {
                if !matches!(key, ImageKey::Point(Axis::Index(_), Axis::Index(_))) {
                    return Err(ImageErrors::WrongKey(
                        "a single pixel value needs a key selecting one pixel"
                    ));
                }
                let mut out = vec![0; bpp];
                encode_value(self.mode, pixel, &mut out)?;
                out
            }
            Assignment::Image(image) => {
                if image.mode != self.mode || image.size.dimensions() != (columns.len(), rows.len())
                {
                    return Err(ImageErrors::ShapeMismatch(format!(
                        "cannot assign a {} {} image to a {}x{} {} selection",
                        image.size,
                        image.mode.name(),
                        columns.len(),
                        rows.len(),
                        self.mode.name()
                    )));
                }
                image.buffer.clone()
            }
            Assignment::Rows(pixels) => {
                if pixels.len() != count {
                    return Err(ImageErrors::ShapeMismatch(format!(
                        "{} pixel values given for a selection of {count} pixels",
                        pixels.len()
                    )));
                }
                let mut out = vec![0; count * bpp];

                for (value, chunk) in pixels.iter().zip(out.chunks_exact_mut(bpp)) {
                    encode_value(self.mode, value, chunk)?;
                }
                out
            }
        };

        let mut pixels = encoded.chunks_exact(bpp);

        for y in &rows {
            for x in &columns {
                if let Some(pixel) = pixels.next() {
                    let range = self.pixel_range(bpp, *x, *y);
                    self.buffer[range].copy_from_slice(pixel);
                }
            }
        }
        Ok(())
    }

    /// Iterate over rows, top to bottom
    pub fn lines(&self) -> Result<impl Iterator<Item = LineView<'_>> + '_, ImageErrors> {
        let bpp = self.bytes_per_pixel("iteration")?;
        let mode = self.mode;

        Ok(self
            .buffer
            .chunks_exact(self.size.width() * bpp)
            .map(move |row| LineView::new(mode, bpp, row)))
    }
    pub fn lines_mut(&mut self) -> Result<impl Iterator<Item = LineViewMut<'_>> + '_, ImageErrors> {
        let bpp = self.bytes_per_pixel("iteration")?;
        let mode = self.mode;

        Ok(self
            .buffer
            .chunks_exact_mut(self.size.width() * bpp)
            .map(move |row| LineViewMut::new(mode, bpp, row)))
    }
    /// Iterate over pixels in row major order
    pub fn pixels(&self) -> Result<impl Iterator<Item = PixelView<'_>> + '_, ImageErrors> {
        let bpp = self.bytes_per_pixel("pixels")?;
        let mode = self.mode;

        Ok(self
            .buffer
            .chunks_exact(bpp)
            .map(move |pixel| PixelView::new(mode, pixel)))
    }
    pub fn pixels_mut(
        &mut self
    ) -> Result<impl Iterator<Item = PixelViewMut<'_>> + '_, ImageErrors> {
        let bpp = self.bytes_per_pixel("pixels")?;
        let mode = self.mode;

        Ok(self
            .buffer
            .chunks_exact_mut(bpp)
            .map(move |pixel| PixelViewMut::new(mode, pixel)))
    }

    /// Build an image of the transposed size where the pixel at `(x, y)`
    /// lands on `position(x, y)`
    fn remap<F>(&self, operation: &'static str, position: F) -> Result<Image, ImageErrors>
    where
        F: Fn(usize, usize) -> (usize, usize)
    {
        let bpp = self.bytes_per_pixel(operation)?;
        let size = self.size.transposed();
        let mut out = vec![0; self.buffer.len()];

        for (y, row) in self
            .buffer
            .chunks_exact(self.size.width() * bpp)
            .enumerate()
        {
            for (x, pixel) in row.chunks_exact(bpp).enumerate() {
                let (new_x, new_y) = position(x, y);
                let start = (new_y * size.width() + new_x) * bpp;
                out[start..start + bpp].copy_from_slice(pixel);
            }
        }
        Image::from_bytes(self.mode, size, out)
    }

    /// Rotate clockwise by 90 degrees into a new image
    ///
    /// # Example
    /// ```
    /// use tessera_core::mode::L;
    /// use tessera_image::image::Image;
    /// use tessera_image::size::ImageSize;
    ///
    /// let size = ImageSize::new(2, 3).unwrap();
    /// let image = Image::from_bytes(&L, size, vec![0, 1, 2, 3, 4, 5]).unwrap();
    ///
    /// let rotated = image.rotate90().unwrap();
    /// assert_eq!(rotated.size(), (3, 2));
    /// assert_eq!(rotated.buffer(), [4, 2, 0, 5, 3, 1]);
    /// ```
    pub fn rotate90(&self) -> Result<Image, ImageErrors> {
        let new_width = self.size.height();
        self.remap("rotate90", |x, y| (new_width - y - 1, x))
    }
    /// Rotate by 180 degrees into a new image, the same as reversing
    /// both rows and columns
    pub fn rotate180(&self) -> Result<Image, ImageErrors> {
        self.bytes_per_pixel("rotate180")?;
        self.crop(Axis::Range(Slice::reversed()), Axis::Range(Slice::reversed()))
    }
    /// Rotate counter clockwise by 90 degrees into a new image
    pub fn rotate270(&self) -> Result<Image, ImageErrors> {
        let new_height = self.size.width();
        self.remap("rotate270", |x, y| (y, new_height - x - 1))
    }

    /// Replace every component of every pixel with the result of a filter
    ///
    /// - One positional filter is applied to every component
    /// - Several positional filters apply in component order, components
    ///   without a filter are left as they are
    /// - Named filters override the positional filter of their component
    ///
    /// More positional filters than components, or a name the mode does
    /// not have, is an error. If a filter produces a sample a component
    /// cannot hold the image is left unchanged.
    ///
    /// # Example
    /// ```
    /// use tessera_core::mode::RGB;
    /// use tessera_core::sample::Sample;
    /// use tessera_image::image::Image;
    /// use tessera_image::size::ImageSize;
    ///
    /// let color = [Sample::Int(10), Sample::Int(20), Sample::Int(30)];
    /// let mut image = Image::with_color(&RGB, ImageSize::new(1, 1).unwrap(), &color).unwrap();
    ///
    /// image.map(&[&|c| c * 2], &[("b", &|c| c + 1)]).unwrap();
    /// assert_eq!(image.buffer(), [20, 40, 31]);
    /// ```
    #[allow(clippy::type_complexity)]
    pub fn map(
        &mut self, positional: &[&dyn Fn(Sample) -> Sample],
        named: &[(&str, &dyn Fn(Sample) -> Sample)]
    ) -> Result<(), ImageErrors> {
        let bpp = self.bytes_per_pixel("map")?;
        let components = self.mode.num_components();

        if positional.len() > components {
            return Err(ImageErrors::TooManyFilters(positional.len(), components));
        }
        let mut filters: Vec<Option<&dyn Fn(Sample) -> Sample>> = match positional {
            [single] => vec![Some(*single); components],
            _ => (0..components).map(|i| positional.get(i).copied()).collect()
        };
        for (name, filter) in named {
            let index = self
                .mode
                .component_index(name)
                .ok_or_else(|| ImageErrors::UnknownComponent(name.to_string()))?;
            filters[index] = Some(*filter);
        }

        let width = self.mode.bytes_per_component();
        let mut out = self.buffer.clone();

        for pixel in out.chunks_exact_mut(bpp) {
            for (component, filter) in pixel.chunks_exact_mut(width).zip(&filters) {
                if let Some(filter) = filter {
                    let sample = filter(self.mode.read_sample(component));
                    self.mode.write_sample(sample, component)?;
                }
            }
        }
        self.buffer = out;
        Ok(())
    }
    /// Apply one filter to every component
    pub fn map_all<F: Fn(Sample) -> Sample>(&mut self, filter: F) -> Result<(), ImageErrors> {
        self.map(&[&filter], &[])
    }

    /// Whether `relation` holds between every component of `self` and the
    /// matching component of `other`
    fn all_samples<F>(&self, other: &Image, relation: F) -> Result<bool, ImageErrors>
    where
        F: Fn(&Sample, &Sample) -> bool
    {
        if self.mode != other.mode || self.size != other.size {
            return Err(ImageErrors::IncomparableImages);
        }
        let width = self.mode.bytes_per_component();

        Ok(self
            .buffer
            .chunks_exact(width)
            .zip(other.buffer.chunks_exact(width))
            .all(|(a, b)| relation(&self.mode.read_sample(a), &self.mode.read_sample(b))))
    }
    /// Every component strictly less than in `other`
    pub fn lt(&self, other: &Image) -> Result<bool, ImageErrors> {
        self.all_samples(other, |a, b| a < b)
    }
    pub fn le(&self, other: &Image) -> Result<bool, ImageErrors> {
        self.all_samples(other, |a, b| a <= b)
    }
    pub fn gt(&self, other: &Image) -> Result<bool, ImageErrors> {
        self.all_samples(other, |a, b| a > b)
    }
    pub fn ge(&self, other: &Image) -> Result<bool, ImageErrors> {
        self.all_samples(other, |a, b| a >= b)
    }
    /// Every component equal to its counterpart in `other`
    pub fn eq_pixels(&self, other: &Image) -> Result<bool, ImageErrors> {
        self.all_samples(other, |a, b| a == b)
    }
    pub fn ne_pixels(&self, other: &Image) -> Result<bool, ImageErrors> {
        self.eq_pixels(other).map(|equal| !equal)
    }
}

impl Debug for Image {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Image")
            .field("mode", &self.mode.name())
            .field("size", &self.size)
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

/// Same mode, same size and the same bytes, metadata is not compared
impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        self.mode == other.mode && self.size == other.size && self.buffer == other.buffer
    }
}

/// Images are only ordered when every component relates to its
/// counterpart the same way, e.g `Some(Less)` means every component is
/// strictly less. Mixed relations and images of different mode or size
/// give `None`.
impl PartialOrd for Image {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.eq_pixels(other).ok()? {
            Some(Ordering::Equal)
        } else if self.lt(other).ok()? {
            Some(Ordering::Less)
        } else if self.gt(other).ok()? {
            Some(Ordering::Greater)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use tessera_core::mode::{L, L16, RGB, YV12};
    use tessera_core::sample::Sample;

    use crate::errors::{ErrorKind, ImageErrors};
    use crate::image::{Assignment, Image, ImageBuilder, Selection, Slice, Source};
    use crate::index::Axis;
    use crate::size::ImageSize;

    #[test]
    fn builder_checks() {
        let size = ImageSize::new(2, 2).unwrap();
        let source = Image::new(&L, size).unwrap();

        let gray = [Sample::Int(1)];
        let both = ImageBuilder::new()
            .color(&gray)
            .source(Source::Image(&source));
        assert!(matches!(
            Image::build(both),
            Err(ImageErrors::ColorAndSource)
        ));

        assert!(matches!(
            Image::build(ImageBuilder::new().size(size)),
            Err(ImageErrors::MissingMode)
        ));
        assert!(matches!(
            Image::with_color(&RGB, size, &[Sample::Int(1)]),
            Err(ImageErrors::ColorLength(1, 3))
        ));
        assert!(matches!(
            Image::from_bytes(&L, size, vec![0; 3]),
            Err(ImageErrors::SourceLength(4, 3))
        ));
        assert!(matches!(
            Image::new(&YV12, ImageSize::new(3, 2).unwrap()),
            Err(ImageErrors::IndivisibleSize(..))
        ));

        // size and mode come from the source
        let copy = Image::build(ImageBuilder::new().source(Source::Image(&source))).unwrap();
        assert_eq!(copy, source);
    }

    #[test]
    fn buffer_length_matches_mode() {
        let size = ImageSize::new(4, 2).unwrap();

        for mode in tessera_core::mode::MODES {
            let image = Image::new(mode, size).unwrap();
            assert_eq!(image.buffer().len(), mode.get_length(4, 2), "{}", mode.name());
        }
    }

    #[test]
    fn planar_fill_and_errors() {
        let image = Image::new(&YV12, ImageSize::new(2, 2).unwrap()).unwrap();

        // one luma plane of four samples then two chroma samples
        assert_eq!(image.buffer(), [16; 6]);
        assert!(image.is_planar());

        for err in [
            image.get(0).unwrap_err(),
            image.len().unwrap_err(),
            image.pixels().err().unwrap(),
            image.lines().err().unwrap(),
            image.rotate90().unwrap_err()
        ] {
            assert_eq!(err.kind(), ErrorKind::Contract);
        }
        let mut image = image;
        assert!(image.set(0, Assignment::Pixel(&[])).is_err());
        assert!(image.map_all(|x| x).is_err());
    }

    #[test]
    fn get_shapes() {
        let size = ImageSize::new(3, 2).unwrap();
        let image = Image::from_bytes(&L, size, vec![0, 1, 2, 3, 4, 5]).unwrap();

        assert!(matches!(image.get(1).unwrap(), Selection::Line(_)));
        assert!(matches!(image.get((2, -1)).unwrap(), Selection::Pixel(_)));
        assert!(matches!(image.get(Slice::full()).unwrap(), Selection::Image(_)));

        let pixel = image.get((-1, 0)).unwrap().pixel().unwrap();
        assert_eq!(pixel.value(), [Sample::Int(2)]);

        let rows = image.get(Slice::reversed()).unwrap().image().unwrap();
        assert_eq!(rows.buffer(), [3, 4, 5, 0, 1, 2]);

        let column = image.crop(Axis::Index(1), Axis::Range(Slice::full())).unwrap();
        assert_eq!(column.size(), (1, 2));
        assert_eq!(column.buffer(), [1, 4]);

        assert_eq!(image.get(2).unwrap_err().kind(), ErrorKind::Contract);
        assert!(image.get((3, 0)).is_err());
        assert!(image.get(Slice::full().with_step(0)).is_err());
    }

    #[test]
    fn slices_are_copies() {
        let size = ImageSize::new(2, 2).unwrap();
        let image = Image::new(&L, size).unwrap();

        let mut copy = image.rows(Slice::full()).unwrap();
        copy.pixel_mut(0, 0).unwrap().set(0, Sample::Int(5)).unwrap();

        assert_eq!(image.buffer(), [0; 4]);
        assert_eq!(copy.buffer(), [5, 0, 0, 0]);
    }

    #[test]
    fn set_shapes() {
        let size = ImageSize::new(3, 2).unwrap();
        let mut image = Image::new(&L16, size).unwrap();

        let patch = Image::from_bytes(&L16, ImageSize::new(2, 1).unwrap(), {
            [1000_u16, 2000]
                .iter()
                .flat_map(|x| x.to_ne_bytes())
                .collect()
        })
        .unwrap();
        image
            .set((Slice::from(1..), 1), Assignment::Image(&patch))
            .unwrap();
        assert_eq!(image.pixel(2, 1).unwrap().value(), [Sample::Int(2000)]);

        // wrong shape, wrong mode, pixel value for a region
        assert!(image.set(0, Assignment::Image(&patch)).is_err());
        let narrow = Image::new(&L, ImageSize::new(3, 1).unwrap()).unwrap();
        assert!(image.set(0, Assignment::Image(&narrow)).is_err());
        assert!(image
            .set(0, Assignment::Pixel(&[Sample::Int(1)]))
            .is_err());

        // nothing is written when one value does not fit
        let values = vec![vec![Sample::Int(1)], vec![Sample::Int(1)], vec![Sample::Int(1 << 20)]];
        assert!(image.set(0, Assignment::Rows(&values)).is_err());
        assert_eq!(image.line(0).unwrap().bytes(), [0; 6]);
    }

    #[test]
    fn map_filter_rules() {
        let size = ImageSize::new(1, 1).unwrap();
        let color = [Sample::Int(1), Sample::Int(2), Sample::Int(3)];
        let mut image = Image::with_color(&RGB, size, &color).unwrap();

        // fewer filters than components leaves the rest alone
        image.map(&[&|c| c + 10, &|c| c + 20], &[]).unwrap();
        assert_eq!(image.buffer(), [11, 22, 3]);

        image.map(&[], &[("r", &|_| Sample::Int(0))]).unwrap();
        assert_eq!(image.buffer(), [0, 22, 3]);

        let identity = |c: Sample| c;
        assert!(matches!(
            image.map(&[&identity, &identity, &identity, &identity], &[]),
            Err(ImageErrors::TooManyFilters(4, 3))
        ));
        assert!(matches!(
            image.map(&[], &[("a", &identity)]),
            Err(ImageErrors::UnknownComponent(_))
        ));

        // overflow leaves the image untouched
        assert!(image.map_all(|c| c * 100).is_err());
        assert_eq!(image.buffer(), [0, 22, 3]);
    }

    #[test]
    fn comparisons() {
        let size = ImageSize::new(2, 1).unwrap();
        let low = Image::from_bytes(&L, size, vec![1, 2]).unwrap();
        let high = Image::from_bytes(&L, size, vec![3, 4]).unwrap();
        let mixed = Image::from_bytes(&L, size, vec![0, 9]).unwrap();

        assert!(low.lt(&high).unwrap());
        assert!(low.le(&high).unwrap());
        assert!(high.gt(&low).unwrap());
        assert!(!low.lt(&mixed).unwrap());
        assert!(!low.gt(&mixed).unwrap());
        assert!(low.ne_pixels(&high).unwrap());
        assert!(low.eq_pixels(&low.clone()).unwrap());

        assert!(low < high);
        assert!(low.partial_cmp(&mixed).is_none());

        let other_size = Image::new(&L, ImageSize::new(1, 2).unwrap()).unwrap();
        assert!(matches!(
            low.lt(&other_size),
            Err(ImageErrors::IncomparableImages)
        ));
        let other_mode = Image::new(&L16, size).unwrap();
        assert!(low.eq_pixels(&other_mode).is_err());
        assert_ne!(low, other_mode);
    }
}

/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Keys used to index into images, lines and pixels
//!
//! Integer indices may be negative, counting from the end. Slices follow
//! the usual `start:stop:step` rules, out of range bounds are clamped and
//! a negative step walks backwards.
use core::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo};

use crate::errors::ImageErrors;

/// A `start:stop:step` selection along one axis
///
/// Missing bounds default to the whole axis in the direction of
/// the step, a missing step is one.
///
/// # Example
/// ```
/// use tessera_image::index::Slice;
///
/// assert_eq!(Slice::from(1..4).positions(10).unwrap(), [1, 2, 3]);
/// assert_eq!(Slice::reversed().positions(3).unwrap(), [2, 1, 0]);
/// assert_eq!(Slice::new(Some(-2), None, None).positions(5).unwrap(), [3, 4]);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Slice {
    pub start: Option<isize>,
    pub stop:  Option<isize>,
    pub step:  Option<isize>
}

impl Slice {
    pub const fn new(start: Option<isize>, stop: Option<isize>, step: Option<isize>) -> Slice {
        Slice { start, stop, step }
    }
    /// `::`, everything in order
    pub const fn full() -> Slice {
        Slice::new(None, None, None)
    }
    /// `::-1`, everything in reverse
    pub const fn reversed() -> Slice {
        Slice::new(None, None, Some(-1))
    }
    /// The same bounds with a different step
    pub const fn with_step(self, step: isize) -> Slice {
        Slice::new(self.start, self.stop, Some(step))
    }

    /// Resolve the slice against an axis of `length` items into a
    /// concrete `(start, stop, step)`
    pub fn indices(&self, length: usize) -> Result<(isize, isize, isize), ImageErrors> {
        let step = self.step.unwrap_or(1);

        if step == 0 {
            return Err(ImageErrors::ZeroStep);
        }
        let length = length as isize;
        let (lower, upper) = if step < 0 { (-1, length - 1) } else { (0, length) };

        let clamp = |bound: isize| {
            if bound < 0 {
                (bound + length).max(lower)
            } else {
                bound.min(upper)
            }
        };
        let start = match self.start {
            Some(start) => clamp(start),
            None if step < 0 => upper,
            None => lower
        };
        let stop = match self.stop {
            Some(stop) => clamp(stop),
            None if step < 0 => lower,
            None => upper
        };
        Ok((start, stop, step))
    }

    /// Every position the slice selects on an axis of `length` items,
    /// in selection order
    pub fn positions(&self, length: usize) -> Result<Vec<usize>, ImageErrors> {
        let (start, stop, step) = self.indices(length)?;
        let mut positions = vec![];
        let mut i = start;

        while (step > 0 && i < stop) || (step < 0 && i > stop) {
            positions.push(i as usize);

            match i.checked_add(step) {
                Some(next) => i = next,
                None => break
            }
        }
        Ok(positions)
    }
}

impl From<Range<isize>> for Slice {
    fn from(range: Range<isize>) -> Self {
        Slice::new(Some(range.start), Some(range.end), None)
    }
}

impl From<RangeInclusive<isize>> for Slice {
    fn from(range: RangeInclusive<isize>) -> Self {
        let (start, end) = range.into_inner();
        // `a..=-1` runs to the end
        let stop = if end == -1 { None } else { end.checked_add(1) };
        Slice::new(Some(start), stop, None)
    }
}

impl From<RangeFrom<isize>> for Slice {
    fn from(range: RangeFrom<isize>) -> Self {
        Slice::new(Some(range.start), None, None)
    }
}

impl From<RangeTo<isize>> for Slice {
    fn from(range: RangeTo<isize>) -> Self {
        Slice::new(None, Some(range.end), None)
    }
}

impl From<RangeFull> for Slice {
    fn from(_: RangeFull) -> Self {
        Slice::full()
    }
}

/// Normalise a possibly negative index against an axis of `length` items
pub(crate) fn normalize(index: isize, length: usize) -> Result<usize, ImageErrors> {
    let resolved = if index < 0 { index + length as isize } else { index };

    if resolved < 0 || resolved >= length as isize {
        return Err(ImageErrors::IndexOutOfRange(index, length));
    }
    Ok(resolved as usize)
}

/// Selection along one axis of a two dimensional key
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    Index(isize),
    Range(Slice)
}

impl Axis {
    /// Positions selected on an axis of `length` items
    pub fn positions(&self, length: usize) -> Result<Vec<usize>, ImageErrors> {
        match self {
            Axis::Index(index) => Ok(vec![normalize(*index, length)?]),
            Axis::Range(slice) => slice.positions(length)
        }
    }
}

impl From<isize> for Axis {
    fn from(index: isize) -> Self {
        Axis::Index(index)
    }
}

impl From<Slice> for Axis {
    fn from(slice: Slice) -> Self {
        Axis::Range(slice)
    }
}

impl From<Range<isize>> for Axis {
    fn from(range: Range<isize>) -> Self {
        Axis::Range(range.into())
    }
}

impl From<RangeFull> for Axis {
    fn from(_: RangeFull) -> Self {
        Axis::Range(Slice::full())
    }
}

/// A key accepted by [`Image::get`](crate::image::Image::get) and
/// [`Image::set`](crate::image::Image::set)
///
/// | key                          | selects                       |
/// |------------------------------|-------------------------------|
/// | `Row(y)`                     | a line view                   |
/// | `Rows(slice)`                | a new image of those rows     |
/// | `Point(Index(x), Index(y))`  | a pixel view                  |
/// | `Point(x, y)`, any `Range`   | a new image of the selection  |
///
/// `Rows(slice)` is the same as `Point(Range(..), Range(slice))`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ImageKey {
    Row(isize),
    Rows(Slice),
    /// Column then row
    Point(Axis, Axis)
}

impl From<isize> for ImageKey {
    fn from(row: isize) -> Self {
        ImageKey::Row(row)
    }
}

impl From<Slice> for ImageKey {
    fn from(rows: Slice) -> Self {
        ImageKey::Rows(rows)
    }
}

impl From<Range<isize>> for ImageKey {
    fn from(rows: Range<isize>) -> Self {
        ImageKey::Rows(rows.into())
    }
}

impl From<RangeFull> for ImageKey {
    fn from(_: RangeFull) -> Self {
        ImageKey::Rows(Slice::full())
    }
}

impl From<(isize, isize)> for ImageKey {
    fn from((x, y): (isize, isize)) -> Self {
        ImageKey::Point(Axis::Index(x), Axis::Index(y))
    }
}

impl From<(Axis, Axis)> for ImageKey {
    fn from((x, y): (Axis, Axis)) -> Self {
        ImageKey::Point(x, y)
    }
}

impl From<(Slice, Slice)> for ImageKey {
    fn from((x, y): (Slice, Slice)) -> Self {
        ImageKey::Point(Axis::Range(x), Axis::Range(y))
    }
}

impl From<(Slice, isize)> for ImageKey {
    fn from((x, y): (Slice, isize)) -> Self {
        ImageKey::Point(Axis::Range(x), Axis::Index(y))
    }
}

impl From<(isize, Slice)> for ImageKey {
    fn from((x, y): (isize, Slice)) -> Self {
        ImageKey::Point(Axis::Index(x), Axis::Range(y))
    }
}

#[cfg(test)]
mod tests {
    use crate::index::{normalize, Slice};

    #[test]
    fn slice_indices_clamp() {
        assert_eq!(Slice::from(-100..100).indices(5).unwrap(), (0, 5, 1));
        assert_eq!(Slice::reversed().indices(5).unwrap(), (4, -1, -1));
        assert_eq!(
            Slice::new(Some(10), Some(-10), Some(-2)).indices(5).unwrap(),
            (4, -1, -2)
        );
        assert!(Slice::full().with_step(0).indices(5).is_err());
    }

    #[test]
    fn slice_positions() {
        assert_eq!(Slice::full().with_step(2).positions(5).unwrap(), [0, 2, 4]);
        assert_eq!(
            Slice::new(Some(-1), Some(0), Some(-2)).positions(6).unwrap(),
            [5, 3, 1]
        );
        assert!(Slice::from(3..1).positions(5).unwrap().is_empty());
        assert_eq!(Slice::from(1..=-1).positions(4).unwrap(), [1, 2, 3]);
        assert_eq!(Slice::from(1..=2).positions(4).unwrap(), [1, 2]);
    }

    #[test]
    fn extreme_steps_take_one_position() {
        let forward = Slice::new(Some(4), None, Some(isize::MAX));
        assert_eq!(forward.positions(5).unwrap(), [4]);
        assert_eq!(Slice::full().with_step(isize::MAX).positions(5).unwrap(), [0]);

        let backward = Slice::new(Some(4), None, Some(isize::MIN + 1));
        assert_eq!(backward.positions(5).unwrap(), [4]);
        assert_eq!(Slice::reversed().with_step(isize::MIN).positions(5).unwrap(), [4]);

        assert_eq!(Slice::from(2..=isize::MAX).positions(4).unwrap(), [2, 3]);
    }

    #[test]
    fn negative_indices_wrap() {
        assert_eq!(normalize(-1, 3).unwrap(), 2);
        assert_eq!(normalize(0, 3).unwrap(), 0);
        assert!(normalize(3, 3).is_err());
        assert!(normalize(-4, 3).is_err());
    }
}

/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Colour modes and the catalog of supported pixel layouts
//!
//! A mode describes how a pixel is laid out in an image buffer, i.e which
//! components it has, how wide each component is and the range of values
//! a component takes.
//!
//! Modes are never constructed at runtime, the only valid modes are the
//! static members of the catalog below, see [`MODES`].
//!
//! Components are stored in native endian with no padding between them.
use core::fmt::{Display, Formatter};

use crate::errors::ModeErrors;
use crate::sample::Sample;

/// The range of values a component takes
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Interval {
    Int(u64, u64),
    Float(f64, f64)
}

impl Interval {
    pub const fn min(self) -> Sample {
        match self {
            Interval::Int(min, _) => Sample::Int(min),
            Interval::Float(min, _) => Sample::Float(min)
        }
    }
    pub const fn max(self) -> Sample {
        match self {
            Interval::Int(_, max) => Sample::Int(max),
            Interval::Float(_, max) => Sample::Float(max)
        }
    }
    pub const fn is_float(self) -> bool {
        matches!(self, Interval::Float(..))
    }
}

/// A description of a pixel layout
///
/// See the module docs for more details
#[derive(Debug)]
pub struct ColorMode {
    name:               &'static str,
    components:         &'static [&'static str],
    bits_per_component: usize,
    planar:             bool,
    subsampling:        &'static [(usize, usize)],
    intervals:          &'static [Interval],
    transparent_color:  &'static [Sample]
}

impl ColorMode {
    /// The catalog name of the mode, e.g `RGB`
    pub const fn name(&self) -> &'static str {
        self.name
    }
    /// Component names in storage order
    pub const fn components(&self) -> &'static [&'static str] {
        self.components
    }
    pub const fn num_components(&self) -> usize {
        self.components.len()
    }
    pub const fn bits_per_component(&self) -> usize {
        self.bits_per_component
    }
    pub const fn bytes_per_component(&self) -> usize {
        self.bits_per_component / 8
    }
    /// Whether components are stored in separate planes
    pub const fn is_planar(&self) -> bool {
        self.planar
    }
    /// Whether components are floating point values
    pub fn is_float(&self) -> bool {
        self.intervals.iter().any(|interval| interval.is_float())
    }
    /// Horizontal and vertical downsampling factor for each component
    pub const fn subsampling(&self) -> &'static [(usize, usize)] {
        self.subsampling
    }
    pub const fn intervals(&self) -> &'static [Interval] {
        self.intervals
    }
    /// The value an image of this mode is filled with when no colour is given
    pub const fn transparent_color(&self) -> &'static [Sample] {
        self.transparent_color
    }
    /// Image widths in this mode must be a multiple of this
    pub fn x_divisor(&self) -> usize {
        self.subsampling.iter().map(|(x, _)| *x).max().unwrap_or(1)
    }
    /// Image heights in this mode must be a multiple of this
    pub fn y_divisor(&self) -> usize {
        self.subsampling.iter().map(|(_, y)| *y).max().unwrap_or(1)
    }
    /// Number of bytes a single pixel occupies
    ///
    /// Planar modes have no such number, and return an error
    pub fn bytes_per_pixel(&self) -> Result<usize, ModeErrors> {
        if self.planar {
            return Err(ModeErrors::PlanarUnsupported(self.name, "bytes_per_pixel"));
        }
        Ok(self.num_components() * self.bytes_per_component())
    }
    /// Number of bytes needed to store an image of `width` by `height`
    /// pixels in this mode
    pub fn get_length(&self, width: usize, height: usize) -> usize {
        if self.planar {
            self.subsampling
                .iter()
                .map(|(sx, sy)| (width / sx) * (height / sy) * self.bits_per_component / 8)
                .sum()
        } else {
            width * height * self.num_components() * self.bytes_per_component()
        }
    }
    /// Position of a named component, if the mode has it
    pub fn component_index(&self, name: &str) -> Option<usize> {
        self.components.iter().position(|c| *c == name)
    }
    /// Largest value an integer component can store
    pub const fn max_int(&self) -> u64 {
        if self.bits_per_component >= 64 {
            u64::MAX
        } else {
            (1_u64 << self.bits_per_component) - 1
        }
    }
    /// Look up a mode in the catalog by its name
    pub fn from_name(name: &str) -> Result<&'static ColorMode, ModeErrors> {
        MODES
            .iter()
            .copied()
            .find(|mode| mode.name == name)
            .ok_or_else(|| ModeErrors::UnknownMode(name.to_string()))
    }
    /// Read one component from the start of `bytes`
    ///
    /// # Panics
    /// If `bytes` is shorter than a component
    pub fn read_sample(&self, bytes: &[u8]) -> Sample {
        let bytes = &bytes[..self.bytes_per_component()];

        match (self.bits_per_component, self.is_float()) {
            (32, true) => Sample::Float(f64::from(f32::from_ne_bytes(ne_array(bytes)))),
            (64, true) => Sample::Float(f64::from_ne_bytes(ne_array(bytes))),
            (16, _) => Sample::Int(u64::from(u16::from_ne_bytes(ne_array(bytes)))),
            (32, _) => Sample::Int(u64::from(u32::from_ne_bytes(ne_array(bytes)))),
            (64, _) => Sample::Int(u64::from_ne_bytes(ne_array(bytes))),
            _ => Sample::Int(u64::from(bytes[0]))
        }
    }
    /// Write one component to the start of `out`
    ///
    /// Integer samples that do not fit the component width, and floats
    /// with a fractional part written to integer modes are rejected.
    pub fn write_sample(&self, sample: Sample, out: &mut [u8]) -> Result<(), ModeErrors> {
        let out = &mut out[..self.bytes_per_component()];

        if self.is_float() {
            match self.bits_per_component {
                32 => out.copy_from_slice(&(sample.as_f64() as f32).to_ne_bytes()),
                _ => out.copy_from_slice(&sample.as_f64().to_ne_bytes())
            }
            return Ok(());
        }
        let value = match sample {
            Sample::Int(value) => value,
            Sample::Float(value) => {
                if value.fract() != 0.0 || value < 0.0 || value > self.max_int() as f64 {
                    return Err(ModeErrors::SampleMismatch(self.name, sample));
                }
                value as u64
            }
        };
        if value > self.max_int() {
            return Err(ModeErrors::SampleMismatch(self.name, sample));
        }
        match self.bits_per_component {
            8 => out[0] = value as u8,
            16 => out.copy_from_slice(&(value as u16).to_ne_bytes()),
            32 => out.copy_from_slice(&(value as u32).to_ne_bytes()),
            _ => out.copy_from_slice(&value.to_ne_bytes())
        }
        Ok(())
    }
}

fn ne_array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut array = [0; N];
    array.copy_from_slice(&bytes[..N]);
    array
}

impl PartialEq for ColorMode {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self, other) || self.name == other.name
    }
}

impl Eq for ColorMode {}

impl Display for ColorMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name)
    }
}

const U8: Interval = Interval::Int(0, 0xFF);
const U16: Interval = Interval::Int(0, 0xFFFF);
const U32: Interval = Interval::Int(0, 0xFFFF_FFFF);
const UNIT: Interval = Interval::Float(0.0, 1.0);
const HUE: Interval = Interval::Float(0.0, 360.0);

const FULL: (usize, usize) = (1, 1);
const HALF: (usize, usize) = (2, 2);

const I0: Sample = Sample::Int(0);
const F0: Sample = Sample::Float(0.0);

macro_rules! full {
    ($_component:tt) => {
        FULL
    };
}

macro_rules! interleaved {
    ($(#[$docs:meta])* $ident:ident, $name:literal, [$($component:literal),+], $bits:literal, $intervals:expr, $transparent:expr) => {
        $(#[$docs])*
        pub static $ident: ColorMode = ColorMode {
            name:               $name,
            components:         &[$($component),+],
            bits_per_component: $bits,
            planar:             false,
            subsampling:        &[$(full!($component)),+],
            intervals:          &$intervals,
            transparent_color:  &$transparent
        };
    };
}

interleaved!(
    /// 8 bit luma
    L, "L", ["l"], 8, [U8], [I0]
);
interleaved!(
    /// 16 bit luma
    L16, "L16", ["l"], 16, [U16], [I0]
);
interleaved!(
    /// 32 bit integer luma
    I, "I", ["l"], 32, [U32], [I0]
);
interleaved!(
    /// 8 bit luma with alpha
    LA, "LA", ["l", "a"], 8, [U8, U8], [I0, I0]
);
interleaved!(
    /// 16 bit luma with alpha
    LA32, "LA32", ["l", "a"], 16, [U16, U16], [I0, I0]
);
interleaved!(L32F, "L32F", ["l"], 32, [UNIT], [F0]);
interleaved!(L64F, "L64F", ["l"], 64, [UNIT], [F0]);
interleaved!(LA32F, "LA32F", ["l", "a"], 32, [UNIT, UNIT], [F0, F0]);
interleaved!(RGB, "RGB", ["r", "g", "b"], 8, [U8, U8, U8], [I0, I0, I0]);
interleaved!(RGB48, "RGB48", ["r", "g", "b"], 16, [U16, U16, U16], [I0, I0, I0]);
interleaved!(RGBA, "RGBA", ["r", "g", "b", "a"], 8, [U8, U8, U8, U8], [I0, I0, I0, I0]);
interleaved!(
    RGBA64, "RGBA64", ["r", "g", "b", "a"], 16, [U16, U16, U16, U16], [I0, I0, I0, I0]
);
interleaved!(RGB96F, "RGB96F", ["r", "g", "b"], 32, [UNIT, UNIT, UNIT], [F0, F0, F0]);
interleaved!(
    RGBA128F, "RGBA128F", ["r", "g", "b", "a"], 32, [UNIT, UNIT, UNIT, UNIT], [F0, F0, F0, F0]
);
interleaved!(RGB192F, "RGB192F", ["r", "g", "b"], 64, [UNIT, UNIT, UNIT], [F0, F0, F0]);
interleaved!(
    RGBA256F, "RGBA256F", ["r", "g", "b", "a"], 64, [UNIT, UNIT, UNIT, UNIT], [F0, F0, F0, F0]
);
interleaved!(
    /// Hue in degrees, saturation and value in `0..1`
    HSV96, "HSV96", ["h", "s", "v"], 32, [HUE, UNIT, UNIT], [F0, F0, F0]
);
interleaved!(HSL96, "HSL96", ["h", "s", "l"], 32, [HUE, UNIT, UNIT], [F0, F0, F0]);
interleaved!(HSV192, "HSV192", ["h", "s", "v"], 64, [HUE, UNIT, UNIT], [F0, F0, F0]);
interleaved!(HSL192, "HSL192", ["h", "s", "l"], 64, [HUE, UNIT, UNIT], [F0, F0, F0]);
interleaved!(
    /// 8 bit CMYK, transparent is full ink on every channel
    CMYK, "CMYK", ["c", "m", "y", "k"], 8, [U8, U8, U8, U8],
    [Sample::Int(255), Sample::Int(255), Sample::Int(255), Sample::Int(255)]
);
interleaved!(
    CMYK64, "CMYK64", ["c", "m", "y", "k"], 16, [U16, U16, U16, U16],
    [Sample::Int(65535), Sample::Int(65535), Sample::Int(65535), Sample::Int(65535)]
);

/// Planar video range YCrCb, chroma planes are subsampled by two in
/// both directions
pub static YV12: ColorMode = ColorMode {
    name:               "YV12",
    components:         &["y", "cr", "cb"],
    bits_per_component: 8,
    planar:             true,
    subsampling:        &[FULL, HALF, HALF],
    intervals:          &[
        Interval::Int(16, 235),
        Interval::Int(16, 240),
        Interval::Int(16, 240)
    ],
    transparent_color:  &[Sample::Int(16), Sample::Int(16), Sample::Int(16)]
};

/// Planar full range YCrCb as used by JPEG
pub static JPEG_YV12: ColorMode = ColorMode {
    name:               "JPEG_YV12",
    components:         &["y", "cr", "cb"],
    bits_per_component: 8,
    planar:             true,
    subsampling:        &[FULL, HALF, HALF],
    intervals:          &[U8, U8, U8],
    transparent_color:  &[I0, I0, I0]
};

/// Every mode an image can be created with
pub static MODES: [&ColorMode; 24] = [
    &L, &L16, &I, &LA, &LA32, &L32F, &L64F, &LA32F, &RGB, &RGB48, &RGBA, &RGBA64, &RGB96F,
    &RGBA128F, &RGB192F, &RGBA256F, &YV12, &JPEG_YV12, &HSV96, &HSL96, &HSV192, &HSL192, &CMYK,
    &CMYK64
];

#[cfg(test)]
mod tests {
    use crate::mode::*;

    #[test]
    fn planar_length_sums_planes() {
        assert_eq!(YV12.get_length(10, 10), 150);
        assert_eq!(YV12.x_divisor(), 2);
        assert_eq!(YV12.y_divisor(), 2);
        assert!(YV12.bytes_per_pixel().is_err());
    }

    #[test]
    fn bytes_per_pixel_matches_layout() {
        let expected: [(&ColorMode, usize); 20] = [
            (&L, 1),
            (&L16, 2),
            (&I, 4),
            (&LA, 2),
            (&LA32, 4),
            (&L32F, 4),
            (&L64F, 8),
            (&LA32F, 8),
            (&RGB, 3),
            (&RGB48, 6),
            (&RGBA, 4),
            (&RGBA64, 8),
            (&RGB96F, 12),
            (&RGBA128F, 16),
            (&RGB192F, 24),
            (&RGBA256F, 32),
            (&HSV96, 12),
            (&HSL192, 24),
            (&CMYK, 4),
            (&CMYK64, 8)
        ];
        for (mode, bytes) in expected {
            assert_eq!(mode.bytes_per_pixel().unwrap(), bytes, "{}", mode.name());
            assert_eq!(mode.get_length(3, 2), bytes * 6);
        }
    }

    #[test]
    fn float_flag_follows_intervals() {
        assert!(HSV96.is_float());
        assert!(L32F.is_float());
        assert!(!I.is_float());
        assert!(!CMYK64.is_float());
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(ColorMode::from_name("RGBA").unwrap(), &RGBA);
        assert!(ColorMode::from_name("XYZ").is_err());
        assert_ne!(&RGB, &RGB48);
    }

    #[test]
    fn sample_round_trip_and_range() {
        let mut buf = [0_u8; 8];

        L16.write_sample(Sample::Int(513), &mut buf).unwrap();
        assert_eq!(L16.read_sample(&buf), Sample::Int(513));

        assert!(L.write_sample(Sample::Int(256), &mut buf).is_err());
        assert!(L.write_sample(Sample::Float(1.5), &mut buf).is_err());
        L.write_sample(Sample::Float(7.0), &mut buf).unwrap();
        assert_eq!(L.read_sample(&buf), Sample::Int(7));

        L32F.write_sample(Sample::Float(0.25), &mut buf).unwrap();
        assert_eq!(L32F.read_sample(&buf), Sample::Float(0.25));
    }
}

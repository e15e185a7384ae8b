/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A single component value
//!
//! Modes store components as 8, 16, 32 or 64 bit unsigned integers
//! or as 32/64 bit floats, a [`Sample`] can carry any of them.
use core::cmp::Ordering;
use core::fmt::{Display, Formatter};
use core::ops::{Add, Mul, Sub};

/// A component value read from, or about to be written to an image
///
/// Integer and float samples compare equal when they hold the same
/// numeric value, e.g `Sample::Int(1) == Sample::Float(1.0)`
#[derive(Copy, Clone, Debug)]
pub enum Sample {
    /// An unsigned integer component
    Int(u64),
    /// A floating point component
    Float(f64)
}

impl Sample {
    /// Return the value as an unsigned integer
    ///
    /// Floats are rounded and clamped to the `u64` range,
    /// negative floats become zero.
    pub fn as_u64(self) -> u64 {
        match self {
            Sample::Int(value) => value,
            Sample::Float(value) => {
                if value.is_nan() || value <= 0.0 {
                    0
                } else if value >= u64::MAX as f64 {
                    u64::MAX
                } else {
                    value.round() as u64
                }
            }
        }
    }
    /// Return the value as a float
    pub fn as_f64(self) -> f64 {
        match self {
            Sample::Int(value) => value as f64,
            Sample::Float(value) => value
        }
    }

    pub const fn is_float(self) -> bool {
        matches!(self, Sample::Float(_))
    }
}

impl Default for Sample {
    fn default() -> Self {
        Sample::Int(0)
    }
}

impl PartialEq for Sample {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Sample::Int(a), Sample::Int(b)) => a == b,
            _ => self.as_f64() == other.as_f64()
        }
    }
}

impl PartialOrd for Sample {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Sample::Int(a), Sample::Int(b)) => Some(a.cmp(b)),
            _ => self.as_f64().partial_cmp(&other.as_f64())
        }
    }
}

impl Display for Sample {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Sample::Int(value) => write!(f, "{value}"),
            Sample::Float(value) => write!(f, "{value}")
        }
    }
}

macro_rules! from_int {
    ($($int:ty),+) => {
        $(
            impl From<$int> for Sample {
                fn from(value: $int) -> Self {
                    Sample::Int(u64::from(value))
                }
            }
        )+
    };
}

from_int!(u8, u16, u32, u64);

impl From<f32> for Sample {
    fn from(value: f32) -> Self {
        Sample::Float(f64::from(value))
    }
}

impl From<f64> for Sample {
    fn from(value: f64) -> Self {
        Sample::Float(value)
    }
}

// integer arithmetic saturates, range checks happen when the
// sample is written back to a buffer
impl Mul<u64> for Sample {
    type Output = Sample;

    fn mul(self, rhs: u64) -> Self::Output {
        match self {
            Sample::Int(value) => Sample::Int(value.saturating_mul(rhs)),
            Sample::Float(value) => Sample::Float(value * rhs as f64)
        }
    }
}

impl Add<u64> for Sample {
    type Output = Sample;

    fn add(self, rhs: u64) -> Self::Output {
        match self {
            Sample::Int(value) => Sample::Int(value.saturating_add(rhs)),
            Sample::Float(value) => Sample::Float(value + rhs as f64)
        }
    }
}

impl Sub<u64> for Sample {
    type Output = Sample;

    fn sub(self, rhs: u64) -> Self::Output {
        match self {
            Sample::Int(value) => Sample::Int(value.saturating_sub(rhs)),
            Sample::Float(value) => Sample::Float(value - rhs as f64)
        }
    }
}

impl Mul<f64> for Sample {
    type Output = Sample;

    fn mul(self, rhs: f64) -> Self::Output {
        Sample::Float(self.as_f64() * rhs)
    }
}

impl Add<f64> for Sample {
    type Output = Sample;

    fn add(self, rhs: f64) -> Self::Output {
        Sample::Float(self.as_f64() + rhs)
    }
}

#[cfg(test)]
mod tests {
    use crate::sample::Sample;

    #[test]
    fn mixed_equality() {
        assert_eq!(Sample::Int(3), Sample::Float(3.0));
        assert_ne!(Sample::Int(3), Sample::Float(3.5));
        assert!(Sample::Int(2) < Sample::Float(2.5));
    }

    #[test]
    fn integer_ops_saturate() {
        assert_eq!(Sample::Int(u64::MAX) * 2, Sample::Int(u64::MAX));
        assert_eq!(Sample::Int(1) - 5, Sample::Int(0));
        assert_eq!(Sample::Int(21) * 2, Sample::Int(42));
    }

    #[test]
    fn float_conversions() {
        assert_eq!(Sample::Float(-3.0).as_u64(), 0);
        assert_eq!(Sample::Float(2.6).as_u64(), 3);
        assert_eq!(Sample::from(0.5_f32).as_f64(), 0.5);
    }
}

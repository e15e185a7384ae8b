/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::fmt::{Debug, Display, Formatter};
use std::io;

/// Errors occurring during decoding
pub enum PPMDecodeErrors {
    Generic(String),
    GenericStatic(&'static str),
    InvalidHeader(String),
    /// The maximum allowed, the value found
    LargeDimensions(usize, usize),
    ZeroDimensions,
    /// Expected number of samples, number found
    TruncatedData(usize, usize),
    /// The sample, the declared maximum
    SampleOutOfRange(u32, u32)
}

impl Debug for PPMDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Generic(val) => {
                writeln!(f, "{val}")
            }
            Self::GenericStatic(val) => writeln!(f, "{val}"),
            Self::InvalidHeader(val) => {
                writeln!(f, "Invalid header, reason: {val}")
            }
            Self::LargeDimensions(expected, found) => {
                writeln!(
                    f,
                    "Too large dimensions, expected a value less than {expected} but found {found}"
                )
            }
            Self::ZeroDimensions => {
                writeln!(f, "Image width and height must be greater than zero")
            }
            Self::TruncatedData(expected, found) => {
                writeln!(f, "Expected {expected} samples but only found {found}")
            }
            Self::SampleOutOfRange(sample, maxval) => {
                writeln!(f, "Sample {sample} is larger than the declared maximum {maxval}")
            }
        }
    }
}

impl Display for PPMDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for PPMDecodeErrors {}

/// Errors occurring during encoding
pub enum PPMEncodeErrors {
    Static(&'static str),
    /// The format name and the mode name
    UnsupportedMode(&'static str, &'static str),
    /// Expected length, found length
    WrongInputSize(usize, usize),
    InvalidMaxval(u32),
    IOErrors(io::Error)
}

impl From<io::Error> for PPMEncodeErrors {
    fn from(err: io::Error) -> Self {
        PPMEncodeErrors::IOErrors(err)
    }
}

impl Debug for PPMEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Static(errors) => {
                writeln!(f, "{errors}")
            }
            Self::UnsupportedMode(format, mode) => {
                writeln!(f, "{format} cannot store images of mode {mode}")
            }
            Self::WrongInputSize(expected, found) => {
                writeln!(f, "Expected input of length {expected} but found {found}")
            }
            Self::InvalidMaxval(maxval) => {
                writeln!(f, "Maxval {maxval} is outside the allowed range 1..=65535")
            }
            Self::IOErrors(err) => {
                writeln!(f, "{err}")
            }
        }
    }
}

impl Display for PPMEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for PPMEncodeErrors {}

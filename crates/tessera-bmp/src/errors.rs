/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::fmt::{Debug, Display, Formatter};

/// BMP errors that can occur during decoding
#[non_exhaustive]
pub enum BmpDecoderErrors {
    /// The file/bytes do not start with `BM`
    InvalidMagicBytes,
    /// The pixel data is too small, expected at least
    /// a size but got another size
    TooSmallBuffer(usize, usize),
    /// Generic message
    GenericStatic(&'static str),
    /// Generic allocated message
    Generic(String),
    /// Too large dimensions for a given width or
    /// height
    TooLargeDimensions(&'static str, usize, usize),
    /// A valid bmp feature this decoder does not implement,
    /// e.g. run length encoding
    Unsupported(&'static str),
    /// A calculation overflowed
    OverFlowOccurred
}

impl Debug for BmpDecoderErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidMagicBytes => {
                writeln!(f, "Invalid magic bytes, file does not start with BM")
            }
            Self::TooSmallBuffer(expected, found) => {
                writeln!(
                    f,
                    "Too small of buffer, expected {expected} but found {found}"
                )
            }
            Self::GenericStatic(header) => {
                writeln!(f, "{header}")
            }
            Self::TooLargeDimensions(dimension, expected, found) => {
                writeln!(
                    f,
                    "Too large dimensions for {dimension} , {found} exceeds {expected}"
                )
            }
            Self::Generic(message) => {
                writeln!(f, "{message}")
            }
            Self::Unsupported(feature) => {
                writeln!(f, "Unsupported bmp feature: {feature}")
            }
            Self::OverFlowOccurred => {
                writeln!(f, "Overflow occurred")
            }
        }
    }
}

impl Display for BmpDecoderErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for BmpDecoderErrors {}

impl From<&'static str> for BmpDecoderErrors {
    fn from(value: &'static str) -> Self {
        BmpDecoderErrors::GenericStatic(value)
    }
}

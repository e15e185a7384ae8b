/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::fmt::{Debug, Display, Formatter};
use std::io;

/// Errors occurring while reading or writing bitmaps
pub enum XbmErrors {
    GenericStatic(&'static str),
    InvalidHeader(String),
    /// The maximum allowed, the value found
    LargeDimensions(usize, usize),
    ZeroDimensions,
    /// Expected number of bytes, number found
    TruncatedData(usize, usize),
    /// A valid bitmap this crate cannot read, e.g. X10 `short` arrays
    Unsupported(&'static str),
    /// Expected length, found length
    WrongInputSize(usize, usize),
    IOErrors(io::Error)
}

impl Debug for XbmErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
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
                writeln!(f, "Expected {expected} data bytes but only found {found}")
            }
            Self::Unsupported(what) => {
                writeln!(f, "Unsupported bitmap: {what}")
            }
            Self::WrongInputSize(expected, found) => {
                writeln!(f, "Expected input of length {expected} but found {found}")
            }
            Self::IOErrors(err) => {
                writeln!(f, "{err}")
            }
        }
    }
}

impl Display for XbmErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for XbmErrors {}

impl From<io::Error> for XbmErrors {
    fn from(err: io::Error) -> Self {
        XbmErrors::IOErrors(err)
    }
}

impl From<&'static str> for XbmErrors {
    fn from(value: &'static str) -> Self {
        XbmErrors::GenericStatic(value)
    }
}

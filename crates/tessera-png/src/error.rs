/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible during png operations
use core::fmt::{Debug, Display, Formatter};
use std::io;

use zune_inflate::errors::InflateDecodeErrors;

/// Errors possible when decoding a png
pub enum PngDecodeErrors {
    /// The first 8 bytes are not the png signature
    BadSignature,
    /// The crc stored in the file and the one calculated
    BadCrc(u32, u32),
    /// Problems inflating image data or a compressed chunk
    ZlibDecodeErrors(InflateDecodeErrors),
    /// Adam7 interlaced images
    UnsupportedInterlace,
    /// A palette image without a `PLTE` chunk
    EmptyPalette,
    /// A chunk appeared where it is not allowed, the chunk name
    /// and the reason
    BadChunkOrder(&'static str, &'static str),
    /// An unknown chunk that decoders must understand
    UnknownCriticalChunk(String),
    GenericStatic(&'static str),
    Generic(String)
}

impl Debug for PngDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BadSignature => writeln!(f, "Bad PNG signature, not a png"),
            Self::BadCrc(expected, found) => writeln!(
                f,
                "CRC does not match, expected {expected:08X} but found {found:08X}"
            ),
            Self::ZlibDecodeErrors(err) => {
                writeln!(f, "Error decoding idat chunks {err:?}")
            }
            Self::UnsupportedInterlace => {
                writeln!(f, "Adam7 interlaced images are not implemented")
            }
            Self::EmptyPalette => writeln!(f, "Indexed image without a PLTE chunk"),
            Self::BadChunkOrder(chunk, reason) => {
                writeln!(f, "Chunk {chunk} out of order, {reason}")
            }
            Self::UnknownCriticalChunk(name) => {
                writeln!(f, "Marker {name} unknown but deemed necessary")
            }
            Self::GenericStatic(val) => writeln!(f, "{val}"),
            Self::Generic(val) => writeln!(f, "{val}")
        }
    }
}

impl Display for PngDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for PngDecodeErrors {}

impl From<&'static str> for PngDecodeErrors {
    fn from(val: &'static str) -> Self {
        Self::GenericStatic(val)
    }
}

impl From<String> for PngDecodeErrors {
    fn from(val: String) -> Self {
        Self::Generic(val)
    }
}

impl From<InflateDecodeErrors> for PngDecodeErrors {
    fn from(val: InflateDecodeErrors) -> Self {
        Self::ZlibDecodeErrors(val)
    }
}

/// Errors possible when encoding a png
pub enum PngEncodeErrors {
    /// The mode name
    UnsupportedMode(&'static str),
    /// Expected length, found length
    WrongInputSize(usize, usize),
    GenericStatic(&'static str),
    IOErrors(io::Error)
}

impl Debug for PngEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnsupportedMode(mode) => {
                writeln!(f, "PNG cannot store images of mode {mode}")
            }
            Self::WrongInputSize(expected, found) => {
                writeln!(f, "Expected input of length {expected} but found {found}")
            }
            Self::GenericStatic(val) => writeln!(f, "{val}"),
            Self::IOErrors(err) => writeln!(f, "{err}")
        }
    }
}

impl Display for PngEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for PngEncodeErrors {}

impl From<io::Error> for PngEncodeErrors {
    fn from(err: io::Error) -> Self {
        Self::IOErrors(err)
    }
}

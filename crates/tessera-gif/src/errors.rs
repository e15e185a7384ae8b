/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::fmt::{Debug, Display, Formatter};

/// Errors possible when decoding a gif
pub enum GifDecoderErrors {
    /// File is not a gif
    NotAGif,
    /// A generic error
    Static(&'static str),
    /// A generic error with an owned message, used by lzw decoders
    Generic(String),
    /// To large dimensions for width or height
    TooLargeDimensions(&'static str, usize, usize),
    /// Too small size, expected and found
    TooSmallSize(usize, usize),
    /// A block introducer that is neither an extension,
    /// an image descriptor nor the trailer
    UnknownBlock(u8),
    /// The stream holds no image descriptor
    NoFrames,
    /// Pixel data was requested but no lzw decoder was provided
    LzwUnavailable
}

impl Debug for GifDecoderErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotAGif => {
                writeln!(f, "Not a gif, magic bytes didn't match")
            }
            Self::Static(v) => {
                writeln!(f, "{v}")
            }
            Self::Generic(v) => {
                writeln!(f, "{v}")
            }
            Self::TooLargeDimensions(a, b, c) => {
                writeln!(
                    f,
                    "Too large dimensions for {a} expected less than {b} but found {c}"
                )
            }
            Self::TooSmallSize(at_least, present) => {
                writeln!(f, "Expected a size of {at_least} but found {present}")
            }
            Self::UnknownBlock(byte) => {
                writeln!(f, "Unknown block introducer {byte:#04X}")
            }
            Self::NoFrames => {
                writeln!(f, "The gif contains no image")
            }
            Self::LzwUnavailable => {
                writeln!(
                    f,
                    "Lzw decompression is not implemented, no lzw decoder was provided"
                )
            }
        }
    }
}

impl Display for GifDecoderErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for GifDecoderErrors {}

impl From<&'static str> for GifDecoderErrors {
    fn from(value: &'static str) -> Self {
        Self::Static(value)
    }
}

impl From<String> for GifDecoderErrors {
    fn from(value: String) -> Self {
        Self::Generic(value)
    }
}

/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible during image creation, manipulation and codec I/O
//!
//! Every failure is an [`ImageErrors`], use [`ImageErrors::kind`] to tell
//! the broad categories apart without matching every variant.
use core::fmt::{Debug, Display, Formatter};
use std::io;

use tessera_core::errors::ModeErrors;

use crate::codecs::ImageFormat;

/// Broad categories of [`ImageErrors`]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad arguments when creating an image or an image size
    Validation,
    /// A file could not be read or written because its contents
    /// do not follow the format
    Format,
    /// An operation was called in a way the image model does not allow,
    /// e.g indexing a planar image or assigning a row of the wrong width
    Contract,
    /// A valid request for a feature that does not exist yet
    NotImplemented,
    /// No codec is registered for a file extension
    UnknownExtension,
    /// The underlying file or stream failed
    Io
}

/// All errors possible in this crate
pub enum ImageErrors {
    /// Width or height of zero or less
    NonPositiveSize(i64, i64),
    /// Width or height with a fractional part
    NonIntegralSize(f64, f64),
    /// Number of fill components given, number the mode has
    ColorLength(usize, usize),
    /// Both a fill colour and a source were given
    ColorAndSource,
    /// No mode was given and there is no source image to take it from
    MissingMode,
    /// No size was given and there is no source image to take it from
    MissingSize,
    /// Expected buffer length, length given
    SourceLength(usize, usize),
    /// Mode name, dimensions, the divisors the dimensions must be a multiple of
    IndivisibleSize(&'static str, (usize, usize), (usize, usize)),
    ModeErrors(ModeErrors),
    /// An operation that needs a single per-pixel layout was called on
    /// a planar image
    PlanarImage(&'static str),
    /// Index given, length of the axis
    IndexOutOfRange(isize, usize),
    /// A slice with a step of zero
    ZeroStep,
    /// The key cannot be used with the value it is paired with
    WrongKey(&'static str),
    ShapeMismatch(String),
    /// Filters given, components in the mode
    TooManyFilters(usize, usize),
    UnknownComponent(String),
    /// Images differ in mode or size
    IncomparableImages,
    #[cfg(feature = "ppm")]
    PPMDecodeErrors(tessera_ppm::PPMDecodeErrors),
    #[cfg(feature = "ppm")]
    PPMEncodeErrors(tessera_ppm::PPMEncodeErrors),
    #[cfg(feature = "png")]
    PngDecodeErrors(tessera_png::error::PngDecodeErrors),
    #[cfg(feature = "png")]
    PngEncodeErrors(tessera_png::error::PngEncodeErrors),
    #[cfg(feature = "gif")]
    GifDecodeErrors(tessera_gif::GifDecoderErrors),
    #[cfg(feature = "bmp")]
    BmpDecodeErrors(tessera_bmp::BmpDecoderErrors),
    #[cfg(feature = "xbm")]
    XbmErrors(tessera_xbm::XbmErrors),
    /// A file that belongs to a sibling format, e.g a PGM
    /// file read as PBM
    FormatMismatch(String),
    /// The format exists but this build was compiled without it
    FormatNotIncluded(ImageFormat),
    NotImplemented(&'static str),
    UnknownExtension(String),
    IoErrors(io::Error)
}

impl ImageErrors {
    /// The category this error falls under
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NonPositiveSize(..)
            | Self::NonIntegralSize(..)
            | Self::ColorLength(..)
            | Self::ColorAndSource
            | Self::MissingMode
            | Self::MissingSize
            | Self::SourceLength(..)
            | Self::IndivisibleSize(..) => ErrorKind::Validation,

            Self::ModeErrors(err) => match err {
                ModeErrors::PlanarUnsupported(..) => ErrorKind::Contract,
                _ => ErrorKind::Validation
            },

            Self::PlanarImage(_)
            | Self::IndexOutOfRange(..)
            | Self::ZeroStep
            | Self::WrongKey(_)
            | Self::ShapeMismatch(_)
            | Self::TooManyFilters(..)
            | Self::UnknownComponent(_)
            | Self::IncomparableImages => ErrorKind::Contract,

            #[cfg(feature = "ppm")]
            Self::PPMDecodeErrors(_) => ErrorKind::Format,
            #[cfg(feature = "ppm")]
            Self::PPMEncodeErrors(err) => match err {
                tessera_ppm::PPMEncodeErrors::IOErrors(_) => ErrorKind::Io,
                _ => ErrorKind::Format
            },
            #[cfg(feature = "png")]
            Self::PngDecodeErrors(err) => match err {
                tessera_png::error::PngDecodeErrors::UnsupportedInterlace => {
                    ErrorKind::NotImplemented
                }
                _ => ErrorKind::Format
            },
            #[cfg(feature = "png")]
            Self::PngEncodeErrors(err) => match err {
                tessera_png::error::PngEncodeErrors::IOErrors(_) => ErrorKind::Io,
                _ => ErrorKind::Format
            },
            #[cfg(feature = "gif")]
            Self::GifDecodeErrors(err) => match err {
                tessera_gif::GifDecoderErrors::LzwUnavailable => ErrorKind::NotImplemented,
                _ => ErrorKind::Format
            },
            #[cfg(feature = "bmp")]
            Self::BmpDecodeErrors(err) => match err {
                tessera_bmp::BmpDecoderErrors::Unsupported(_) => ErrorKind::NotImplemented,
                _ => ErrorKind::Format
            },
            #[cfg(feature = "xbm")]
            Self::XbmErrors(err) => match err {
                tessera_xbm::XbmErrors::Unsupported(_) => ErrorKind::NotImplemented,
                tessera_xbm::XbmErrors::IOErrors(_) => ErrorKind::Io,
                _ => ErrorKind::Format
            },
            Self::FormatMismatch(_) => ErrorKind::Format,

            Self::FormatNotIncluded(_) | Self::NotImplemented(_) => ErrorKind::NotImplemented,
            Self::UnknownExtension(_) => ErrorKind::UnknownExtension,
            Self::IoErrors(_) => ErrorKind::Io
        }
    }
}

impl Debug for ImageErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NonPositiveSize(width, height) => {
                writeln!(f, "Image sizes must be positive, found {width}x{height}")
            }
            Self::NonIntegralSize(width, height) => {
                writeln!(f, "Image sizes must be whole numbers, found {width}x{height}")
            }
            Self::ColorLength(found, expected) => {
                writeln!(
                    f,
                    "Fill colour has {found} components but the mode has {expected}"
                )
            }
            Self::ColorAndSource => {
                writeln!(f, "A fill colour and a source cannot be given together")
            }
            Self::MissingMode => writeln!(f, "No mode given and no source to take it from"),
            Self::MissingSize => writeln!(f, "No size given and no source to take it from"),
            Self::SourceLength(expected, found) => {
                writeln!(
                    f,
                    "Source buffer has {found} bytes but the image needs {expected}"
                )
            }
            Self::IndivisibleSize(mode, (width, height), (x_div, y_div)) => {
                writeln!(
                    f,
                    "Mode {mode} needs the width to be a multiple of {x_div} and the height a multiple of {y_div}, found {width}x{height}"
                )
            }
            Self::ModeErrors(err) => writeln!(f, "{err:?}"),
            Self::PlanarImage(operation) => {
                writeln!(f, "Planar images do not support {operation}")
            }
            Self::IndexOutOfRange(index, length) => {
                writeln!(f, "Index {index} out of range for length {length}")
            }
            Self::ZeroStep => writeln!(f, "Slice step cannot be zero"),
            Self::WrongKey(reason) => writeln!(f, "Wrong key: {reason}"),
            Self::ShapeMismatch(reason) => writeln!(f, "Shape mismatch: {reason}"),
            Self::TooManyFilters(found, components) => {
                writeln!(
                    f,
                    "{found} filters given but the mode only has {components} components"
                )
            }
            Self::UnknownComponent(name) => {
                writeln!(f, "The mode has no component named {name:?}")
            }
            Self::IncomparableImages => {
                writeln!(f, "Only images of the same mode and size can be compared")
            }
            #[cfg(feature = "ppm")]
            Self::PPMDecodeErrors(err) => writeln!(f, "ppm: {err:?}"),
            #[cfg(feature = "ppm")]
            Self::PPMEncodeErrors(err) => writeln!(f, "ppm: {err:?}"),
            #[cfg(feature = "png")]
            Self::PngDecodeErrors(err) => writeln!(f, "png: {err:?}"),
            #[cfg(feature = "png")]
            Self::PngEncodeErrors(err) => writeln!(f, "png: {err:?}"),
            #[cfg(feature = "gif")]
            Self::GifDecodeErrors(err) => writeln!(f, "gif: {err:?}"),
            #[cfg(feature = "bmp")]
            Self::BmpDecodeErrors(err) => writeln!(f, "bmp: {err:?}"),
            #[cfg(feature = "xbm")]
            Self::XbmErrors(err) => writeln!(f, "xbm: {err:?}"),
            Self::FormatMismatch(reason) => writeln!(f, "{reason}"),
            Self::FormatNotIncluded(format) => {
                writeln!(
                    f,
                    "The {format:?} codec was not included in this build, enable its feature"
                )
            }
            Self::NotImplemented(what) => writeln!(f, "Not implemented: {what}"),
            Self::UnknownExtension(ext) => {
                writeln!(f, "No codec registered for extension {ext:?}")
            }
            Self::IoErrors(err) => writeln!(f, "I/O error: {err}")
        }
    }
}

impl Display for ImageErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for ImageErrors {}

impl From<ModeErrors> for ImageErrors {
    fn from(err: ModeErrors) -> Self {
        ImageErrors::ModeErrors(err)
    }
}

impl From<io::Error> for ImageErrors {
    fn from(err: io::Error) -> Self {
        ImageErrors::IoErrors(err)
    }
}

#[cfg(feature = "ppm")]
impl From<tessera_ppm::PPMDecodeErrors> for ImageErrors {
    fn from(err: tessera_ppm::PPMDecodeErrors) -> Self {
        ImageErrors::PPMDecodeErrors(err)
    }
}

#[cfg(feature = "ppm")]
impl From<tessera_ppm::PPMEncodeErrors> for ImageErrors {
    fn from(err: tessera_ppm::PPMEncodeErrors) -> Self {
        ImageErrors::PPMEncodeErrors(err)
    }
}

#[cfg(feature = "png")]
impl From<tessera_png::error::PngDecodeErrors> for ImageErrors {
    fn from(err: tessera_png::error::PngDecodeErrors) -> Self {
        ImageErrors::PngDecodeErrors(err)
    }
}

#[cfg(feature = "png")]
impl From<tessera_png::error::PngEncodeErrors> for ImageErrors {
    fn from(err: tessera_png::error::PngEncodeErrors) -> Self {
        ImageErrors::PngEncodeErrors(err)
    }
}

#[cfg(feature = "gif")]
impl From<tessera_gif::GifDecoderErrors> for ImageErrors {
    fn from(err: tessera_gif::GifDecoderErrors) -> Self {
        ImageErrors::GifDecodeErrors(err)
    }
}

#[cfg(feature = "bmp")]
impl From<tessera_bmp::BmpDecoderErrors> for ImageErrors {
    fn from(err: tessera_bmp::BmpDecoderErrors) -> Self {
        ImageErrors::BmpDecodeErrors(err)
    }
}

#[cfg(feature = "xbm")]
impl From<tessera_xbm::XbmErrors> for ImageErrors {
    fn from(err: tessera_xbm::XbmErrors) -> Self {
        ImageErrors::XbmErrors(err)
    }
}

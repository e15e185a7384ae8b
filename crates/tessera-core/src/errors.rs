/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors raised by colour mode operations
use core::fmt::{Debug, Display, Formatter};

use crate::sample::Sample;

/// Errors possible when working with colour modes
pub enum ModeErrors {
    /// An operation that needs a single per-pixel layout was
    /// called on a planar mode.
    ///
    /// Arguments are the mode name and the operation
    PlanarUnsupported(&'static str, &'static str),
    /// A mode name that is not part of the catalog
    UnknownMode(String),
    /// A sample cannot be stored in a component of the mode
    /// without losing information
    SampleMismatch(&'static str, Sample),
    /// A colour string in none of the supported notations
    InvalidColor(String)
}

impl Debug for ModeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::PlanarUnsupported(mode, operation) => {
                writeln!(f, "{operation} is not supported for planar modes (mode {mode})")
            }
            Self::UnknownMode(name) => {
                writeln!(f, "Unknown colour mode {name:?}")
            }
            Self::SampleMismatch(mode, sample) => {
                writeln!(f, "Sample {sample:?} cannot be stored in a {mode} component")
            }
            Self::InvalidColor(text) => {
                writeln!(f, "Not a valid colour {text:?}")
            }
        }
    }
}

impl Display for ModeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for ModeErrors {}

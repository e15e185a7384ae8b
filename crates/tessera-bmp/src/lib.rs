/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! A BMP decoder
//!
//! This crate features a BMP decoder for the Windows and OS/2 header
//! family, from the 12 byte core header to the 124 byte v5 header.
//!
//! # Supported formats
//! - Paletted images (1 bit, 2 bits, 4 bits and 8 bits)
//! - 24 bit BGR and 32 bit BGRX images
//! - Masked images (16 bit and 32 bit formats)
//! - Bottom-up and top-down row order
//!
//! # Unsupported formats
//! - RLE (4 bit and 8 bit)
//! - Embedded PNG and JPEGs
//!
//! These fail with [`BmpDecoderErrors::Unsupported`]

pub use crate::decoder::{probe_bmp, BmpDecoder};
pub use crate::errors::BmpDecoderErrors;
pub use tessera_core;

mod common;
mod decoder;
mod errors;
mod utils;

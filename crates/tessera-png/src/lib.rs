/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A png decoder and encoder
//!
//! This features a simple PNG reader and writer which supports
//! non-interlaced ISO/IEC 15948:2003 (E) images.
//!
//! # Features
//! - Chunk ordering and CRC validation
//! - All standard ancillary chunks are exposed as image metadata
//! - Palette and sub-byte depth expansion
//! - Adaptive row filtering when encoding
//!
//! # Decode to u8 or u16 depending on depth
//!
//! Images with 16 bit depth decode to `u16` samples, everything else
//! decodes to `u8` samples, that's what the `decode` api returns.
//!
//!```no_run
//! use tessera_png::PngDecoder;
//! use tessera_core::result::DecodingResult;
//! let mut decoder = PngDecoder::new(&[]);
//!
//! let pixels = decoder.decode().unwrap();
//!
//! match pixels {
//!    DecodingResult::U8(px)=>{
//!        // do something with images with 8 bit depths
//!    }
//!    DecodingResult::U16(px)=>{
//!        // do something with images with 16 bit depths
//!    }
//!}
//!```
//!
//! # Extracting metadata
//!
//! Once headers have been decoded, ancillary chunks can be read via
//! [`get_info()`](PngDecoder::get_info), the keys are
//!
//! | Key                  | Chunk  |
//! |----------------------|--------|
//! | `palette`            | `PLTE` |
//! | `transparency`       | `tRNS` |
//! | `gamma`              | `gAMA` |
//! | `chromaticity`       | `cHRM` |
//! | `srgb_intent`        | `sRGB` |
//! | `icc_profile`        | `iCCP` |
//! | `text`               | `tEXt`, `zTXt`, `iTXt` |
//! | `background`         | `bKGD` |
//! | `physical`           | `pHYs` |
//! | `significant_bits`   | `sBIT` |
//! | `suggested_palettes` | `sPLT` |
//! | `histogram`          | `hIST` |
//! | `time`               | `tIME` |
#![allow(clippy::op_ref, clippy::identity_op)]

pub use decoder::{PngDecoder, PngInfo};
pub use encoder::PngEncoder;
pub use enums::{InterlaceMethod, PngColor};
pub use tessera_core;

mod constants;
mod crc;
mod decoder;
mod encoder;
mod enums;
pub mod error;
mod filters;
mod headers;

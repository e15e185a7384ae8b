/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A Netpbm decoder and encoder
//!
//! This crate handles the whole Netpbm family
//!
//! | Magic | Format | Samples |
//! |-------|--------|---------|
//! | `P1`  | PBM    | ASCII   |
//! | `P2`  | PGM    | ASCII   |
//! | `P3`  | PPM    | ASCII   |
//! | `P4`  | PBM    | binary  |
//! | `P5`  | PGM    | binary  |
//! | `P6`  | PPM    | binary  |
//! | `P7`  | PAM    | binary  |
//!
//! Bitmaps decode to 8 bit luma where a set bit (black) becomes 0 and
//! a clear bit becomes 255. Graymaps and pixmaps decode to 8 or 16 bit
//! samples depending on the declared maximum value, samples are rescaled
//! from `[0, maxval]` to the full range of the output.
//!
//! # Example
//! ```
//! use tessera_ppm::PPMDecoder;
//!
//! let mut decoder = PPMDecoder::new(b"P2 2 1 4 0 4");
//! let pixels = decoder.decode().unwrap().u8().unwrap();
//! assert_eq!(pixels, [0, 255]);
//! ```
pub use decoder::*;
pub use encoder::*;
pub use errors::*;
pub use tessera_core;

mod decoder;
mod encoder;
mod errors;

/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! An X11 bitmap (XBM) decoder and encoder
//!
//! XBM files are C source fragments meant to be `#include`d
//!
//! ```c
//! #define cursor_width 16
//! #define cursor_height 16
//! #define cursor_x_hot 1
//! #define cursor_y_hot 1
//! static char cursor_bits[] = {
//!  0x00, 0x00, ...
//! };
//! ```
//!
//! Pixels are packed eight to a byte, least significant bit first,
//! with every row starting on a new byte. Bitmaps decode to 8 bit luma
//! where a set bit becomes 255.
//!
//! The hotspot and the identifier prefix are reported through
//! [`XbmDecoder::get_info`] as `hotspot` and `label`.
//!
//! X10 bitmaps, which store 16 bit `short` words, are not supported.
pub use decoder::{probe_xbm, XbmDecoder};
pub use encoder::XbmEncoder;
pub use errors::XbmErrors;
pub use tessera_core;

mod decoder;
mod encoder;
mod errors;

/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A gif header and block parser
//!
//! The decoder walks the whole block structure of a gif, the header,
//! logical screen descriptor and colour tables, graphic control, comment,
//! plain text and application extensions and every image descriptor with
//! its data sub-blocks.
//!
//! Lzw decompression is not part of this crate, frames keep their raw
//! code stream. To resolve pixels provide an [`LzwDecoder`], the first
//! frame is then painted onto the logical screen.
//!
//! # Example
//! ```
//! use tessera_gif::GifDecoder;
//!
//! // 1x1 screen, two entry global table, one frame, trailer
//! let data = [
//!     b'G', b'I', b'F', b'8', b'9', b'a', 1, 0, 1, 0, 0x80, 0, 0,
//!     0, 0, 0, 255, 255, 255,
//!     0x2C, 0, 0, 0, 0, 1, 0, 1, 0, 0, 2, 2, 0x4C, 0x01, 0, 0x3B
//! ];
//! let mut decoder = GifDecoder::new(&data);
//! decoder.decode_headers().unwrap();
//!
//! assert_eq!(decoder.get_dimensions(), Some((1, 1)));
//! assert_eq!(decoder.frames().len(), 1);
//! // no lzw decoder was set
//! assert!(decoder.decode().is_err());
//! ```
pub use decoder::{GifDecoder, GifFrame, GraphicControl, LzwDecoder};
pub use enums::{DisposalMethod, GifVersion};
pub use errors::GifDecoderErrors;
pub use tessera_core;

mod decoder;
mod enums;
mod errors;

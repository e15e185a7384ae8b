/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Decoder and Encoder Options
//!
//! All supported options are put into one _Options struct to allow for global configurations,
//! e.g the same `DecoderOptions` can be reused for all decoders
pub use decoder::DecoderOptions;
pub use encoder::{EncoderOptions, EncodingFormat, RowFilter};

mod decoder;
mod encoder;

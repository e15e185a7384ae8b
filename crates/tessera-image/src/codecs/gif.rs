/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![cfg(feature = "gif")]
//! Gif reading
//!
//! Headers and blocks are always parsed, pixels need an
//! [`LzwDecoder`] set through [`CodecConfig::set_lzw_decoder`].
//! Without one reading fails with a not implemented error.
use tessera_core::mode::ColorMode;
pub use tessera_gif::{GifDecoder, GifDecoderErrors, LzwDecoder};

use crate::codecs::{image_from_samples, CodecConfig};
use crate::errors::ImageErrors;
use crate::image::Image;
use crate::traits::DecoderTrait;

pub(crate) fn decode_gif(data: &[u8], config: &CodecConfig) -> Result<Image, ImageErrors> {
    let mut decoder = GifDecoder::new_with_options(data, config.decoder_options());

    if let Some(lzw) = &config.lzw {
        decoder.set_lzw_decoder(lzw.as_ref());
    }
    DecoderTrait::decode(&mut decoder)
}

impl DecoderTrait for GifDecoder<'_> {
    fn decode(&mut self) -> Result<Image, ImageErrors> {
        let pixels = self.decode()?;

        let mode = self.get_mode().ok_or(ImageErrors::MissingMode)?;
        let dimensions = self.get_dimensions().ok_or(ImageErrors::MissingSize)?;

        let mut image = image_from_samples(mode, dimensions, pixels)?;

        if let Some(info) = self.get_info() {
            image.info_mut().extend(&info);
        }
        Ok(image)
    }

    fn dimensions(&self) -> Option<(usize, usize)> {
        self.get_dimensions()
    }

    fn mode(&self) -> Option<&'static ColorMode> {
        self.get_mode()
    }

    fn name(&self) -> &'static str {
        "GIF Decoder"
    }
}

/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![cfg(feature = "bmp")]
//! Windows bitmap reading
use tessera_core::mode::ColorMode;
pub use tessera_bmp::{probe_bmp, BmpDecoder, BmpDecoderErrors};

use crate::errors::ImageErrors;
use crate::image::Image;
use crate::size::ImageSize;
use crate::traits::DecoderTrait;

impl DecoderTrait for BmpDecoder<'_> {
    fn decode(&mut self) -> Result<Image, ImageErrors> {
        let pixels = self.decode()?;

        let mode = self.get_mode().ok_or(ImageErrors::MissingMode)?;
        let (width, height) = self.get_dimensions().ok_or(ImageErrors::MissingSize)?;

        let size = ImageSize::try_from((width, height))?;
        let mut image = Image::from_bytes(mode, size, pixels)?;

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
        "BMP Decoder"
    }
}

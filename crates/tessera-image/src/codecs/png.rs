/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![cfg(feature = "png")]

//! Represents a png image decoder and encoder
//!
//! Ancillary chunks end up in [`Image::info`], on writing the `gamma`
//! and `text` entries are carried back into `gAMA` and `tEXt` chunks.
use std::io::Write;

use tessera_core::mode::ColorMode;
pub use tessera_png::error::{PngDecodeErrors, PngEncodeErrors};
pub use tessera_png::{PngDecoder, PngEncoder as PngEnc, PngInfo};

use crate::codecs::{image_from_samples, CodecConfig, ImageFormat};
use crate::errors::ImageErrors;
use crate::image::Image;
use crate::traits::{DecoderTrait, EncoderTrait};

impl DecoderTrait for PngDecoder<'_> {
    fn decode(&mut self) -> Result<Image, ImageErrors> {
        let pixels = self.decode()?;

        let mode = self.get_mode().ok_or(ImageErrors::MissingMode)?;
        let dimensions = self.get_dimensions().ok_or(ImageErrors::MissingSize)?;

        let mut image = image_from_samples(mode, dimensions, pixels)?;

        if let Some(info) = self.get_info() {
            image.info_mut().extend(info);
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
        "PNG Decoder"
    }
}

/// Writes images as png
pub struct PngEncoder {
    config: CodecConfig
}

impl PngEncoder {
    pub fn new(config: CodecConfig) -> PngEncoder {
        PngEncoder { config }
    }
}

impl EncoderTrait for PngEncoder {
    fn name(&self) -> &'static str {
        "PNG Encoder"
    }

    fn encode_inner<W: Write>(&mut self, image: &Image, sink: W) -> Result<usize, ImageErrors> {
        let options = self.config.encoder_options(image);

        let mut encoder = PngEnc::new(image.buffer(), options);
        encoder.add_info(image.info());

        Ok(encoder.encode(sink)?)
    }

    fn supports_mode(&self, mode: &ColorMode) -> bool {
        matches!(
            mode.name(),
            "L" | "L16" | "LA" | "LA32" | "RGB" | "RGB48" | "RGBA" | "RGBA64"
        )
    }

    fn format(&self) -> ImageFormat {
        ImageFormat::Png
    }
}

#[cfg(test)]
mod tests {
    use tessera_core::info::InfoValue;
    use tessera_core::mode::{RGB48, RGBA, YV12};
    use tessera_core::sample::Sample;

    use crate::codecs::ImageFormat;
    use crate::errors::ErrorKind;
    use crate::image::Image;
    use crate::size::ImageSize;

    #[test]
    fn wide_images_keep_their_samples() {
        let size = ImageSize::new(2, 1).unwrap();
        let color = [Sample::Int(1), Sample::Int(300), Sample::Int(65535)];
        let image = Image::with_color(&RGB48, size, &color).unwrap();

        let encoded = image.write_to_vec(ImageFormat::Png).unwrap();
        let decoded = Image::read(ImageFormat::Png, encoded.as_slice()).unwrap();

        assert_eq!(decoded, image);
        assert_eq!(decoded.pixel(1, 0).unwrap().value(), color);
    }

    #[test]
    fn gamma_survives_a_round_trip() {
        let mut image = Image::new(&RGBA, ImageSize::new(3, 2).unwrap()).unwrap();
        image.info_mut().insert("gamma", 0.45455);

        let encoded = image.write_to_vec(ImageFormat::Png).unwrap();
        let decoded = Image::read(ImageFormat::Png, encoded.as_slice()).unwrap();

        let gamma = decoded.info().get("gamma").and_then(InfoValue::as_float);
        assert!((gamma.unwrap() - 0.45455).abs() < 1e-5);
    }

    #[test]
    fn unsupported_modes_are_rejected() {
        let image = Image::new(&YV12, ImageSize::new(2, 2).unwrap()).unwrap();
        let err = image.write_to_vec(ImageFormat::Png).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Contract);
    }
}

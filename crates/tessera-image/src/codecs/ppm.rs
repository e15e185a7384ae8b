/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![cfg(feature = "ppm")]
//! Netpbm family reading and writing
//!
//! `pbm`, `pgm`, `ppm` and `pam` only accept files of their own
//! family member, `pnm` accepts any of them.
use std::io::Write;

use log::trace;
use tessera_core::mode::ColorMode;
pub use tessera_ppm::{
    probe_pnm, PPMDecodeErrors, PPMDecoder, PPMEncodeErrors, PPMEncoder as PPMEnc, PnmFormat,
    PnmVersion
};

use crate::codecs::{image_from_samples, CodecConfig, ImageFormat};
use crate::errors::ImageErrors;
use crate::image::Image;
use crate::traits::{DecoderTrait, EncoderTrait};

/// The family member a format is restricted to, `None` for `pnm`
const fn pnm_format(format: ImageFormat) -> Option<PnmFormat> {
    match format {
        ImageFormat::Pbm => Some(PnmFormat::Pbm),
        ImageFormat::Pgm => Some(PnmFormat::Pgm),
        ImageFormat::Ppm => Some(PnmFormat::Ppm),
        ImageFormat::Pam => Some(PnmFormat::Pam),
        _ => None
    }
}

/// Decode a Netpbm file, checking the magic number matches `format`
pub(crate) fn decode_pnm(
    format: ImageFormat, data: &[u8], config: &CodecConfig
) -> Result<Image, ImageErrors> {
    // a missing magic number is left for the decoder to report
    if let Some(version) = probe_pnm(data) {
        match pnm_format(format) {
            Some(expected) if expected != version.format() => {
                return Err(ImageErrors::FormatMismatch(format!(
                    "Expected a {} file but found {} ({version}) data",
                    expected.name(),
                    version.format().name()
                )));
            }
            Some(_) => {}
            None => trace!("pnm file holds {} data", version.format().name())
        }
    }
    let mut decoder = PPMDecoder::new_with_options(config.decoder_options(), data);

    DecoderTrait::decode(&mut decoder)
}

impl DecoderTrait for PPMDecoder<'_> {
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
        "PNM Decoder"
    }
}

/// Writes images as one of the Netpbm family members
pub struct PPMEncoder {
    format: ImageFormat,
    config: CodecConfig
}

impl PPMEncoder {
    /// Create an encoder for one of the Netpbm formats
    ///
    /// With [`ImageFormat::Pnm`] the family member is chosen from the
    /// mode of the image, PGM for luma, PPM for RGB and PAM for
    /// anything with alpha.
    pub fn new(format: ImageFormat, config: CodecConfig) -> PPMEncoder {
        PPMEncoder { format, config }
    }
}

impl EncoderTrait for PPMEncoder {
    fn name(&self) -> &'static str {
        "PNM Encoder"
    }

    fn encode_inner<W: Write>(&mut self, image: &Image, sink: W) -> Result<usize, ImageErrors> {
        let mode = image.mode();
        let format = pnm_format(self.format)
            .or_else(|| PnmFormat::for_mode(mode))
            .ok_or(PPMEncodeErrors::UnsupportedMode("PNM", mode.name()))?;

        let options = self.config.encoder_options(image);

        let bytes_written = PPMEnc::new(image.buffer(), options).encode(format, sink)?;

        Ok(bytes_written)
    }

    fn supports_mode(&self, mode: &ColorMode) -> bool {
        match pnm_format(self.format) {
            Some(format) => format.supports_mode(mode),
            None => PnmFormat::for_mode(mode).is_some()
        }
    }

    fn format(&self) -> ImageFormat {
        self.format
    }
}

#[cfg(test)]
mod tests {
    use tessera_core::mode::{L, RGB};

    use crate::codecs::ppm::decode_pnm;
    use crate::codecs::{CodecConfig, ImageFormat};
    use crate::errors::{ErrorKind, ImageErrors};

    #[test]
    fn family_members_are_checked() {
        let pgm = b"P5 1 1 255 \x80";
        let config = CodecConfig::default();

        assert!(matches!(
            decode_pnm(ImageFormat::Pbm, pgm, &config),
            Err(ImageErrors::FormatMismatch(_))
        ));
        let image = decode_pnm(ImageFormat::Pnm, pgm, &config).unwrap();
        assert_eq!(image.mode(), &L);

        let ppm = b"P3 1 1 255 1 2 3";
        let image = decode_pnm(ImageFormat::Ppm, ppm, &config).unwrap();
        assert_eq!(image.mode(), &RGB);
        assert_eq!(image.buffer(), [1, 2, 3]);
    }

    #[test]
    fn garbage_is_a_format_error() {
        let err = decode_pnm(ImageFormat::Pnm, b"not a pnm", &CodecConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }
}

/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![cfg(feature = "xbm")]
//! X11 bitmap reading and writing
//!
//! Bitmaps decode to [`L`] images with set bits as 255. Any interleaved
//! image can be written, whether a pixel becomes a set bit is decided by
//! the `clip` predicate of the [`CodecConfig`], by default a pixel is set
//! when it differs from the transparent colour of its mode.
use std::io::Write;

use tessera_core::info::InfoValue;
use tessera_core::mode::{ColorMode, L};
pub use tessera_xbm::{probe_xbm, XbmDecoder, XbmEncoder as XbmEnc, XbmErrors};

use crate::codecs::{CodecConfig, ImageFormat};
use crate::errors::ImageErrors;
use crate::image::Image;
use crate::size::ImageSize;
use crate::traits::{DecoderTrait, EncoderTrait};

impl DecoderTrait for XbmDecoder<'_> {
    fn decode(&mut self) -> Result<Image, ImageErrors> {
        let pixels = self.decode()?;

        let (width, height) = self.get_dimensions().ok_or(ImageErrors::MissingSize)?;
        let size = ImageSize::try_from((width, height))?;

        let mut image = Image::from_bytes(&L, size, pixels)?;

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
        "XBM Decoder"
    }
}

/// Writes images as X11 bitmaps
pub struct XbmEncoder {
    config: CodecConfig
}

impl XbmEncoder {
    pub fn new(config: CodecConfig) -> XbmEncoder {
        XbmEncoder { config }
    }

    /// One byte per pixel, non zero for set bits
    fn clip(&self, image: &Image) -> Result<Vec<u8>, ImageErrors> {
        let transparent = image.mode().transparent_color();

        Ok(image
            .pixels()?
            .map(|pixel| {
                let set = match &self.config.clip {
                    Some(clip) => clip(&pixel, image),
                    None => pixel.value() != transparent
                };
                u8::from(set)
            })
            .collect())
    }
}

impl EncoderTrait for XbmEncoder {
    fn name(&self) -> &'static str {
        "XBM Encoder"
    }

    fn encode_inner<W: Write>(&mut self, image: &Image, sink: W) -> Result<usize, ImageErrors> {
        let bits = self.clip(image)?;

        // the configured label wins over one read from a file
        let label = match &self.config.label {
            Some(label) => label.as_str(),
            None => image
                .info()
                .get("label")
                .and_then(InfoValue::as_text)
                .unwrap_or("")
        };
        let (width, height) = image.dimensions();
        let options = self
            .config
            .encoder_options(image)
            .set_mode(&L)
            .set_width(width)
            .set_height(height)
            .set_label(label);

        let mut encoder = XbmEnc::new(&bits, options);
        encoder.add_info(image.info());

        Ok(encoder.encode(sink)?)
    }

    fn supports_mode(&self, mode: &ColorMode) -> bool {
        !mode.is_planar()
    }

    fn format(&self) -> ImageFormat {
        ImageFormat::Xbm
    }
}

#[cfg(test)]
mod tests {
    use tessera_core::mode::{L, RGB};
    use tessera_core::sample::Sample;

    use crate::codecs::{CodecConfig, ImageFormat, Registry};
    use crate::image::Image;
    use crate::size::ImageSize;

    #[test]
    fn default_clip_uses_transparent_color() {
        let size = ImageSize::new(3, 1).unwrap();
        let mut image = Image::new(&RGB, size).unwrap();
        image
            .pixel_mut(1, 0)
            .unwrap()
            .set_value(&[Sample::Int(0), Sample::Int(0), Sample::Int(1)])
            .unwrap();

        let config = CodecConfig::new().set_label("dot");
        let mut out = vec![];
        Registry::with_all_formats()
            .write_with(ImageFormat::Xbm, &image, &mut out, &config)
            .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "#define dot_width 3\n#define dot_height 1\nstatic char dot_bits[] = {\n 0x02\n};\n"
        );
    }

    #[test]
    fn label_and_hotspot_survive() {
        let data = b"#define arrow_width 2\n#define arrow_height 1\n#define arrow_x_hot 1\n\
                     #define arrow_y_hot 0\nstatic char arrow_bits[] = { 0x01 };\n";

        let image = Image::read(ImageFormat::Xbm, &data[..]).unwrap();
        assert_eq!(image.mode(), &L);
        assert_eq!(image.buffer(), [255, 0]);

        let written = String::from_utf8(image.write_to_vec(ImageFormat::Xbm).unwrap()).unwrap();
        assert!(written.starts_with("#define arrow_width 2\n"));
        assert!(written.contains("#define arrow_x_hot 1\n#define arrow_y_hot 0\n"));
    }
}

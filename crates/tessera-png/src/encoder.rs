/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::borrow::Cow;
use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use tessera_core::bytestream::ZByteWriter;
use tessera_core::info::{ImageInfo, InfoValue};
use tessera_core::mode::ColorMode;
use tessera_core::options::EncoderOptions;

use crate::constants::{IDAT_CHUNK_SIZE, PNG_SIGNATURE};
use crate::enums::{FilterMethod, PngColor};
use crate::error::PngEncodeErrors;
use crate::filters::{choose_compression_filter, filter_scanline};
use crate::headers::writers::{
    text_chunk_name, write_chunk, write_gamma, write_header_fn, write_ihdr, write_text
};

/// The png colour type and bit depth used to store a mode
fn png_color_for_mode(mode: &ColorMode) -> Option<(PngColor, u8)> {
    match mode.name() {
        "L" => Some((PngColor::Luma, 8)),
        "L16" => Some((PngColor::Luma, 16)),
        "LA" => Some((PngColor::LumaA, 8)),
        "LA32" => Some((PngColor::LumaA, 16)),
        "RGB" => Some((PngColor::RGB, 8)),
        "RGB48" => Some((PngColor::RGB, 16)),
        "RGBA" => Some((PngColor::RGBA, 8)),
        "RGBA64" => Some((PngColor::RGBA, 16)),
        _ => None
    }
}

/// A png encoder
///
/// Input is the sample buffer of an image in native endian,
/// 16 bit samples are converted to big endian while encoding.
///
/// # Example
/// ```
/// use tessera_core::mode::L;
/// use tessera_core::options::EncoderOptions;
/// use tessera_png::{PngDecoder, PngEncoder};
///
/// let pixels = [0, 64, 128, 255];
/// let mut out = vec![];
///
/// PngEncoder::new(&pixels, EncoderOptions::new(2, 2, &L)).encode(&mut out).unwrap();
///
/// let decoded = PngDecoder::new(&out).decode().unwrap().u8().unwrap();
/// assert_eq!(decoded, pixels);
/// ```
pub struct PngEncoder<'a> {
    pub(crate) options: EncoderOptions,
    pub(crate) data:    &'a [u8],
    pub(crate) gamma:   Option<f64>,
    pub(crate) text:    Vec<(String, String)>
}

impl<'a> PngEncoder<'a> {
    /// Create a new encoder that can encode an image into a PNG chunk
    pub fn new(data: &'a [u8], options: EncoderOptions) -> PngEncoder<'a> {
        PngEncoder {
            options,
            data,
            gamma: None,
            text: Vec::new()
        }
    }

    /// Write a `gAMA` chunk with this gamma
    pub fn set_gamma(&mut self, gamma: f64) {
        self.gamma = Some(gamma);
    }

    /// Add a text chunk
    pub fn add_text(&mut self, keyword: &str, text: &str) {
        self.text.push((keyword.to_string(), text.to_string()));
    }

    /// Carry over the metadata png can store from decoded image info,
    /// that is `gamma` and the `text` map
    pub fn add_info(&mut self, info: &ImageInfo) {
        if let Some(gamma) = info.get("gamma").and_then(InfoValue::as_float) {
            self.set_gamma(gamma);
        }
        if let Some(text) = info.get("text").and_then(InfoValue::as_map) {
            for (keyword, value) in text {
                if let Some(value) = value.as_text() {
                    self.add_text(keyword, value);
                }
            }
        }
    }

    /// Encode the image into `sink`, returning the number of bytes written
    pub fn encode<W: Write>(&self, sink: W) -> Result<usize, PngEncodeErrors> {
        let mode = self.options.get_mode();
        let (color, depth) =
            png_color_for_mode(mode).ok_or(PngEncodeErrors::UnsupportedMode(mode.name()))?;

        let (width, height) = (self.options.get_width(), self.options.get_height());

        if width == 0 || height == 0 {
            return Err(PngEncodeErrors::GenericStatic(
                "Image dimensions must be non-zero"
            ));
        }
        let (Ok(png_width), Ok(png_height)) = (u32::try_from(width), u32::try_from(height))
        else {
            return Err(PngEncodeErrors::GenericStatic("Image dimensions too large"));
        };

        let expected_data_size = mode.get_length(width, height);

        if self.data.len() != expected_data_size {
            return Err(PngEncodeErrors::WrongInputSize(
                expected_data_size,
                self.data.len()
            ));
        }
        for (keyword, _) in &self.text {
            if keyword.is_empty() || keyword.len() > 79 || !keyword.is_ascii() {
                return Err(PngEncodeErrors::GenericStatic(
                    "Text keywords must be 1 to 79 ASCII characters"
                ));
            }
        }

        // png stores wide samples big endian
        let pixels: Cow<[u8]> = if depth == 16 {
            Cow::Owned(
                self.data
                    .chunks_exact(2)
                    .flat_map(|x| u16::from_ne_bytes([x[0], x[1]]).to_be_bytes())
                    .collect()
            )
        } else {
            Cow::Borrowed(self.data)
        };

        let filtered = self.add_filters(&pixels, mode);

        let mut compressor = ZlibEncoder::new(Vec::<u8>::new(), Compression::default());
        compressor.write_all(&filtered)?;
        let encoded_chunks = compressor.finish()?;

        let mut writer = ZByteWriter::new(sink);

        // write signature
        writer.write_u64_be(PNG_SIGNATURE)?;
        write_header_fn(&mut writer, b"IHDR", |w| {
            write_ihdr(w, png_width, png_height, depth, color)
        })?;

        if let Some(gamma) = self.gamma {
            write_header_fn(&mut writer, b"gAMA", |w| write_gamma(w, gamma))?;
        }
        for (keyword, text) in &self.text {
            write_header_fn(&mut writer, text_chunk_name(text), |w| {
                write_text(w, keyword, text)
            })?;
        }

        // Most decoders love data in 8KB chunks, since
        // probably libpng does that by default
        // so let's try emulating that
        for chunk in encoded_chunks.chunks(IDAT_CHUNK_SIZE) {
            write_chunk(b"IDAT", chunk, &mut writer)?;
        }
        // iend is empty
        write_header_fn(&mut writer, b"IEND", |_| Ok(()))?;

        writer.flush()?;

        Ok(writer.bytes_written())
    }

    /// Filter every scanline, prefixing each with its filter type
    fn add_filters(&self, pixels: &[u8], mode: &ColorMode) -> Vec<u8> {
        let height = self.options.get_height();
        let scanline_size = pixels.len() / height;
        let components = mode.num_components() * mode.bytes_per_component();

        let fixed_filter = FilterMethod::from_row_filter(self.options.get_row_filter());

        // allocate space for filtered scanline
        let mut filtered = vec![0; (scanline_size + 1) * height];
        let mut scratch = vec![0; scanline_size + 1];

        // one row above the current processing row
        let mut previous_scanline: &[u8] = &[];

        for (current_scanline, filter_s) in pixels
            .chunks_exact(scanline_size)
            .zip(filtered.chunks_exact_mut(scanline_size + 1))
        {
            let filter = fixed_filter.unwrap_or_else(|| {
                choose_compression_filter(
                    previous_scanline,
                    current_scanline,
                    components,
                    &mut scratch
                )
            });

            filter_scanline(
                current_scanline,
                previous_scanline,
                filter_s,
                filter,
                components
            );
            previous_scanline = current_scanline;
        }
        filtered
    }
}

#[cfg(test)]
mod tests {
    use tessera_core::mode::{L, RGBA64};
    use tessera_core::options::{EncoderOptions, RowFilter};

    use crate::{PngDecoder, PngEncoder};

    #[test]
    fn test_simple_write() {
        let width = 40;
        let height = 10;
        let data = vec![100; width * height];

        let options = EncoderOptions::new(width, height, &L);

        let mut sink = vec![];

        PngEncoder::new(&data, options).encode(&mut sink).unwrap();

        let mut decoder = PngDecoder::new(&sink);
        let bytes = decoder.decode_raw().unwrap();
        assert_eq!(&data, &bytes);
    }

    #[test]
    fn sixteen_bit_is_big_endian_in_file() {
        let samples: Vec<u16> = vec![0x0102, 0x0304, 0x0506, 0xFFFF];
        let data: Vec<u8> = samples.iter().flat_map(|x| x.to_ne_bytes()).collect();

        let options = EncoderOptions::new(1, 1, &RGBA64).set_row_filter(RowFilter::None);
        let mut sink = vec![];

        PngEncoder::new(&data, options).encode(&mut sink).unwrap();

        let mut decoder = PngDecoder::new(&sink);
        assert_eq!(
            decoder.decode_raw().unwrap(),
            [1, 2, 3, 4, 5, 6, 0xFF, 0xFF]
        );
        let mut decoder = PngDecoder::new(&sink);
        assert_eq!(decoder.decode().unwrap().u16().unwrap(), samples);
    }

    #[test]
    fn rejects_wrong_sizes() {
        let mut sink = vec![];

        assert!(PngEncoder::new(&[0; 3], EncoderOptions::new(2, 2, &L))
            .encode(&mut sink)
            .is_err());
        assert!(PngEncoder::new(&[], EncoderOptions::new(0, 2, &L))
            .encode(&mut sink)
            .is_err());
    }
}

/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::io::Write;

use tessera_core::bytestream::ZByteWriter;
use tessera_core::mode::ColorMode;
use tessera_core::options::{EncoderOptions, EncodingFormat};

use crate::decoder::{PnmFormat, PnmVersion};
use crate::errors::PPMEncodeErrors;

fn pam_tuple_type(mode: &ColorMode) -> &'static str {
    match mode.num_components() {
        1 => "GRAYSCALE",
        2 => "GRAYSCALE_ALPHA",
        3 => "RGB",
        _ => "RGB_ALPHA"
    }
}

/// A Netpbm encoder
///
/// Input is the sample buffer of an image in native endian, laid out
/// as the mode in the options describes it.
///
/// # Example
/// ```
/// use tessera_core::mode::L;
/// use tessera_core::options::{EncoderOptions, EncodingFormat};
/// use tessera_ppm::{PPMEncoder, PnmFormat};
///
/// let options = EncoderOptions::new(3, 1, &L).set_format(EncodingFormat::Plain);
/// let mut out = vec![];
///
/// PPMEncoder::new(&[0, 128, 255], options).encode(PnmFormat::Pgm, &mut out).unwrap();
/// assert_eq!(out, b"P2\n3 1\n255\n0 128 255");
/// ```
pub struct PPMEncoder<'a> {
    data:    &'a [u8],
    options: EncoderOptions
}

impl<'a> PPMEncoder<'a> {
    /// Create a new encoder for `data` with the dimensions and
    /// mode given in `options`
    pub fn new(data: &'a [u8], options: EncoderOptions) -> PPMEncoder<'a> {
        PPMEncoder { data, options }
    }

    /// Encode the image as `format` into `sink`, returning
    /// the number of bytes written
    pub fn encode<W: Write>(&self, format: PnmFormat, sink: W) -> Result<usize, PPMEncodeErrors> {
        let mode = self.options.get_mode();
        let (width, height) = (self.options.get_width(), self.options.get_height());

        if !format.supports_mode(mode) {
            return Err(PPMEncodeErrors::UnsupportedMode(format.name(), mode.name()));
        }
        if width == 0 || height == 0 {
            return Err(PPMEncodeErrors::Static("Image dimensions must be non-zero"));
        }
        let expected = mode.get_length(width, height);

        if self.data.len() != expected {
            return Err(PPMEncodeErrors::WrongInputSize(expected, self.data.len()));
        }
        let plain = self.options.get_format() == EncodingFormat::Plain;
        let version = format.version(plain);

        let mut writer = ZByteWriter::new(sink);

        match format {
            PnmFormat::Pbm => self.encode_bits(version, &mut writer)?,
            _ => self.encode_samples(version, &mut writer)?
        }
        writer.flush()?;

        Ok(writer.bytes_written())
    }

    fn encode_bits<W: Write>(
        &self, version: PnmVersion, writer: &mut ZByteWriter<W>
    ) -> Result<(), PPMEncodeErrors> {
        let width = self.options.get_width();

        let header = format!("{version}\n{width} {}\n", self.options.get_height());
        writer.write_all(header.as_bytes())?;

        // pixels darker than the midpoint are black, which is a set bit
        let black = |sample: u8| sample < 128;

        if version.is_plain() {
            for (i, row) in self.data.chunks_exact(width).enumerate() {
                if i != 0 {
                    writer.write_u8(b'\n')?;
                }
                let row: Vec<u8> = row
                    .iter()
                    .map(|x| if black(*x) { b'1' } else { b'0' })
                    .collect();
                writer.write_all(&row)?;
            }
        } else {
            let mut packed = vec![0_u8; (width + 7) / 8];

            for row in self.data.chunks_exact(width) {
                packed.fill(0);

                for (x, sample) in row.iter().enumerate() {
                    if black(*sample) {
                        packed[x / 8] |= 1 << (7 - (x % 8));
                    }
                }
                writer.write_all(&packed)?;
            }
        }
        Ok(())
    }

    fn encode_samples<W: Write>(
        &self, version: PnmVersion, writer: &mut ZByteWriter<W>
    ) -> Result<(), PPMEncodeErrors> {
        let mode = self.options.get_mode();
        let (width, height) = (self.options.get_width(), self.options.get_height());

        let full = mode.max_int() as u32;
        let maxval = self.options.get_maxval().unwrap_or(full);

        if maxval == 0 || maxval > 65535 {
            return Err(PPMEncodeErrors::InvalidMaxval(maxval));
        }

        let header = match version {
            PnmVersion::P7 => format!(
                "P7\nWIDTH {width}\nHEIGHT {height}\nDEPTH {}\nMAXVAL {maxval}\nTUPLTYPE {}\nENDHDR\n",
                mode.num_components(),
                pam_tuple_type(mode)
            ),
            _ => format!("{version}\n{width} {height}\n{maxval}\n")
        };
        writer.write_all(header.as_bytes())?;

        let bytes_per_sample = mode.bytes_per_component();

        // inverse of the rescale done by the decoder
        let samples = self.data.chunks_exact(bytes_per_sample).map(|x| {
            let sample = match x {
                [a, b] => u32::from(u16::from_ne_bytes([*a, *b])),
                _ => u32::from(x[0])
            };
            if maxval == full {
                sample
            } else {
                ((u64::from(sample) * u64::from(maxval) + u64::from(full) / 2) / u64::from(full))
                    as u32
            }
        });

        if version.is_plain() {
            let row_length = width * mode.num_components();
            let mut line = String::new();

            for (i, sample) in samples.enumerate() {
                if i % row_length == 0 {
                    if i != 0 {
                        line.push('\n');
                    }
                } else {
                    line.push(' ');
                }
                line.push_str(&sample.to_string());

                if line.len() > 1 << 16 {
                    writer.write_all(line.as_bytes())?;
                    line.clear();
                }
            }
            writer.write_all(line.as_bytes())?;
        } else if maxval > 255 {
            let out: Vec<u8> = samples.flat_map(|x| (x as u16).to_be_bytes()).collect();
            writer.write_all(&out)?;
        } else {
            let out: Vec<u8> = samples.map(|x| x as u8).collect();
            writer.write_all(&out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tessera_core::mode::{L, L16, LA, RGB, RGBA};
    use tessera_core::options::{EncoderOptions, EncodingFormat};

    use crate::decoder::PnmFormat;
    use crate::encoder::PPMEncoder;

    #[test]
    fn pam_header_layout() {
        let options = EncoderOptions::new(1, 1, &LA);
        let mut out = vec![];

        PPMEncoder::new(&[7, 9], options)
            .encode(PnmFormat::Pam, &mut out)
            .unwrap();

        let expected =
            b"P7\nWIDTH 1\nHEIGHT 1\nDEPTH 2\nMAXVAL 255\nTUPLTYPE GRAYSCALE_ALPHA\nENDHDR\n\x07\x09";
        assert_eq!(out, expected);
    }

    #[test]
    fn maxval_rescale_on_write() {
        let options = EncoderOptions::new(2, 1, &L)
            .set_format(EncodingFormat::Plain)
            .set_maxval(Some(15));
        let mut out = vec![];

        PPMEncoder::new(&[255, 85], options)
            .encode(PnmFormat::Pgm, &mut out)
            .unwrap();
        assert_eq!(out, b"P2\n2 1\n15\n15 5");
    }

    #[test]
    fn sixteen_bit_written_big_endian() {
        let options = EncoderOptions::new(1, 1, &L16);
        let data = 0x1234_u16.to_ne_bytes();
        let mut out = vec![];

        PPMEncoder::new(&data, options)
            .encode(PnmFormat::Pgm, &mut out)
            .unwrap();
        assert_eq!(out, b"P5\n1 1\n65535\n\x12\x34");
    }

    #[test]
    fn plain_rows_split_by_newline() {
        let options = EncoderOptions::new(1, 2, &RGB).set_format(EncodingFormat::Plain);
        let mut out = vec![];

        PPMEncoder::new(&[1, 2, 3, 4, 5, 6], options)
            .encode(PnmFormat::Ppm, &mut out)
            .unwrap();
        assert_eq!(out, b"P3\n1 2\n255\n1 2 3\n4 5 6");
    }

    #[test]
    fn rejects_unsupported_modes() {
        let mut out = vec![];
        let options = EncoderOptions::new(1, 1, &RGBA);

        assert!(PPMEncoder::new(&[0; 4], options.clone())
            .encode(PnmFormat::Ppm, &mut out)
            .is_err());
        assert!(PPMEncoder::new(&[0; 4], options.clone())
            .encode(PnmFormat::Pbm, &mut out)
            .is_err());
        // wrong buffer size
        assert!(PPMEncoder::new(&[0; 3], options)
            .encode(PnmFormat::Pam, &mut out)
            .is_err());
    }
}

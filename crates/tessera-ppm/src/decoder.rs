/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::fmt::{Display, Formatter};

use log::{info, warn};
use tessera_core::bytestream::ZByteReader;
use tessera_core::info::ImageInfo;
use tessera_core::mode::{ColorMode, L, L16, LA, LA32, RGB, RGB48, RGBA, RGBA64};
use tessera_core::options::DecoderOptions;
use tessera_core::result::DecodingResult;

use crate::errors::PPMDecodeErrors;

/// A member of the Netpbm family, independent of
/// whether samples are stored as text or binary
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PnmFormat {
    Pbm,
    Pgm,
    Ppm,
    Pam
}

impl PnmFormat {
    /// The format a generic `pnm` writer picks for a mode
    ///
    /// Luma goes to PGM, RGB to PPM and anything with alpha to PAM
    pub fn for_mode(mode: &ColorMode) -> Option<PnmFormat> {
        match mode.name() {
            "L" | "L16" => Some(PnmFormat::Pgm),
            "RGB" | "RGB48" => Some(PnmFormat::Ppm),
            "LA" | "LA32" | "RGBA" | "RGBA64" => Some(PnmFormat::Pam),
            _ => None
        }
    }
    /// Whether the format can store images of this mode
    pub fn supports_mode(self, mode: &ColorMode) -> bool {
        match self {
            PnmFormat::Pbm => mode.name() == "L",
            PnmFormat::Pgm => matches!(mode.name(), "L" | "L16"),
            PnmFormat::Ppm => matches!(mode.name(), "RGB" | "RGB48"),
            PnmFormat::Pam => PnmFormat::for_mode(mode).is_some()
        }
    }
    pub const fn name(self) -> &'static str {
        match self {
            PnmFormat::Pbm => "PBM",
            PnmFormat::Pgm => "PGM",
            PnmFormat::Ppm => "PPM",
            PnmFormat::Pam => "PAM"
        }
    }
    /// The magic number used when writing this format
    ///
    /// PAM has no text variant, `plain` is ignored for it
    pub const fn version(self, plain: bool) -> PnmVersion {
        match (self, plain) {
            (PnmFormat::Pbm, true) => PnmVersion::P1,
            (PnmFormat::Pgm, true) => PnmVersion::P2,
            (PnmFormat::Ppm, true) => PnmVersion::P3,
            (PnmFormat::Pbm, false) => PnmVersion::P4,
            (PnmFormat::Pgm, false) => PnmVersion::P5,
            (PnmFormat::Ppm, false) => PnmVersion::P6,
            (PnmFormat::Pam, _) => PnmVersion::P7
        }
    }
}

/// Netpbm magic numbers
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PnmVersion {
    P1,
    P2,
    P3,
    P4,
    P5,
    P6,
    P7
}

impl PnmVersion {
    /// Identify the version from the first two bytes of a file
    pub fn from_magic(magic: &[u8]) -> Option<PnmVersion> {
        match magic.get(..2)? {
            b"P1" => Some(PnmVersion::P1),
            b"P2" => Some(PnmVersion::P2),
            b"P3" => Some(PnmVersion::P3),
            b"P4" => Some(PnmVersion::P4),
            b"P5" => Some(PnmVersion::P5),
            b"P6" => Some(PnmVersion::P6),
            b"P7" => Some(PnmVersion::P7),
            _ => None
        }
    }
    pub const fn format(self) -> PnmFormat {
        match self {
            PnmVersion::P1 | PnmVersion::P4 => PnmFormat::Pbm,
            PnmVersion::P2 | PnmVersion::P5 => PnmFormat::Pgm,
            PnmVersion::P3 | PnmVersion::P6 => PnmFormat::Ppm,
            PnmVersion::P7 => PnmFormat::Pam
        }
    }
    /// Whether samples are written as ASCII decimals
    pub const fn is_plain(self) -> bool {
        matches!(self, PnmVersion::P1 | PnmVersion::P2 | PnmVersion::P3)
    }
}

impl Display for PnmVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Return the Netpbm version of a buffer, or `None` if
/// the buffer does not start with a Netpbm magic number
pub fn probe_pnm(bytes: &[u8]) -> Option<PnmVersion> {
    PnmVersion::from_magic(bytes)
}

/// Choose the decoded mode from the number of samples per pixel
/// and the declared maximum value
fn select_mode(depth: usize, maxval: u32) -> Result<&'static ColorMode, PPMDecodeErrors> {
    let narrow = [&L, &LA, &RGB, &RGBA];
    let wide = [&L16, &LA32, &RGB48, &RGBA64];

    let modes = if maxval > 255 { wide } else { narrow };

    match depth {
        1..=4 => Ok(modes[depth - 1]),
        _ => Err(PPMDecodeErrors::InvalidHeader(format!(
            "Depth {depth} is not in the supported range 1..=4"
        )))
    }
}

/// An instance of a Netpbm decoder
///
/// The decoder handles every magic number from P1 to P7
pub struct PPMDecoder<'a> {
    width:           usize,
    height:          usize,
    depth:           usize,
    maxval:          u32,
    version:         PnmVersion,
    mode:            &'static ColorMode,
    tuple_type:      Option<String>,
    decoded_headers: bool,
    reader:          ZByteReader<'a>,
    options:         DecoderOptions
}

impl<'a> PPMDecoder<'a> {
    /// Create a new decoder with default options
    ///
    /// # Example
    /// ```
    /// use tessera_ppm::PPMDecoder;
    /// let mut decoder = PPMDecoder::new(b"NOT VALID PPM");
    ///
    /// assert!(decoder.decode().is_err());
    /// ```
    pub fn new(data: &'a [u8]) -> PPMDecoder<'a> {
        PPMDecoder::new_with_options(DecoderOptions::default(), data)
    }
    /// Create a new decoder with the specified options
    pub fn new_with_options(options: DecoderOptions, data: &'a [u8]) -> PPMDecoder<'a> {
        PPMDecoder {
            width: 0,
            height: 0,
            depth: 0,
            maxval: 0,
            version: PnmVersion::P6,
            mode: &RGB,
            tuple_type: None,
            decoded_headers: false,
            reader: ZByteReader::new(data),
            options
        }
    }
    /// Read the headers and store them in internal state
    pub fn read_headers(&mut self) -> Result<(), PPMDecodeErrors> {
        if self.decoded_headers {
            return Ok(());
        }
        let magic = self
            .reader
            .get(2)
            .map_err(|_| PPMDecodeErrors::GenericStatic("Not enough bytes for a magic number"))?;

        let version = PnmVersion::from_magic(magic).ok_or_else(|| {
            PPMDecodeErrors::Generic(format!(
                "Unknown Netpbm magic number {:?}",
                String::from_utf8_lossy(magic)
            ))
        })?;

        match version {
            PnmVersion::P7 => self.decode_pam_header()?,
            _ => self.decode_pnm_header(version)?
        }
        if self.width == 0 || self.height == 0 {
            return Err(PPMDecodeErrors::ZeroDimensions);
        }
        if self.width > self.options.get_max_width() {
            return Err(PPMDecodeErrors::LargeDimensions(
                self.options.get_max_width(),
                self.width
            ));
        }
        if self.height > self.options.get_max_height() {
            return Err(PPMDecodeErrors::LargeDimensions(
                self.options.get_max_height(),
                self.height
            ));
        }
        if self.maxval == 0 || self.maxval > 65535 {
            return Err(PPMDecodeErrors::InvalidHeader(format!(
                "Maxval {} is outside the allowed range 1..=65535",
                self.maxval
            )));
        }
        self.mode = select_mode(self.depth, self.maxval)?;
        self.version = version;
        self.decoded_headers = true;

        info!("Version: {version}");
        info!("Width: {}, height: {}", self.width, self.height);
        info!("Maxval: {}", self.maxval);
        info!("Mode: {}", self.mode);

        Ok(())
    }

    /// Decode headers of P1 to P6
    fn decode_pnm_header(&mut self, version: PnmVersion) -> Result<(), PPMDecodeErrors> {
        skip_spaces(&mut self.reader);
        self.width = get_integer(&mut self.reader)?;
        skip_spaces(&mut self.reader);
        self.height = get_integer(&mut self.reader)?;

        self.maxval = match version.format() {
            PnmFormat::Pbm => 1,
            _ => {
                skip_spaces(&mut self.reader);
                get_integer(&mut self.reader)?.try_into().unwrap_or(u32::MAX)
            }
        };
        self.depth = match version.format() {
            PnmFormat::Ppm => 3,
            _ => 1
        };

        if !version.is_plain() {
            // exactly one whitespace byte separates header and raster
            match self.reader.get_u8_err() {
                Ok(byte) if byte.is_ascii_whitespace() => (),
                _ => {
                    return Err(PPMDecodeErrors::InvalidHeader(
                        "Expected a whitespace character after the header".to_string()
                    ))
                }
            }
        }
        Ok(())
    }

    fn decode_pam_header(&mut self) -> Result<(), PPMDecodeErrors> {
        let mut width = None;
        let mut height = None;
        let mut depth = None;
        let mut maxval = None;

        loop {
            skip_spaces(&mut self.reader);

            if self.reader.eof() {
                return Err(PPMDecodeErrors::GenericStatic(
                    "PAM header is not terminated by ENDHDR"
                ));
            }
            match get_token(&mut self.reader) {
                b"WIDTH" => width = Some(self.get_header_integer()?),
                b"HEIGHT" => height = Some(self.get_header_integer()?),
                b"DEPTH" => depth = Some(self.get_header_integer()?),
                b"MAXVAL" => maxval = Some(self.get_header_integer()?),
                b"TUPLTYPE" => {
                    let value = get_line(&mut self.reader);
                    let value = String::from_utf8_lossy(value).trim().to_string();

                    // multiple tuple type lines are concatenated
                    self.tuple_type = match self.tuple_type.take() {
                        Some(previous) => Some(format!("{previous} {value}")),
                        None => Some(value)
                    };
                }
                b"ENDHDR" => {
                    get_line(&mut self.reader);
                    break;
                }
                token => {
                    return Err(PPMDecodeErrors::InvalidHeader(format!(
                        "Unknown/unsupported header declaration {}",
                        String::from_utf8_lossy(token)
                    )));
                }
            }
        }
        let missing = |name: &str| {
            PPMDecodeErrors::InvalidHeader(format!("PAM header is missing {name}"))
        };

        self.width = width.ok_or_else(|| missing("WIDTH"))?;
        self.height = height.ok_or_else(|| missing("HEIGHT"))?;
        self.depth = depth.ok_or_else(|| missing("DEPTH"))?;
        self.maxval = maxval
            .ok_or_else(|| missing("MAXVAL"))?
            .try_into()
            .unwrap_or(u32::MAX);

        Ok(())
    }

    fn get_header_integer(&mut self) -> Result<usize, PPMDecodeErrors> {
        skip_spaces(&mut self.reader);
        get_integer(&mut self.reader)
    }

    /// Return image dimensions or none if headers aren't decoded
    pub const fn get_dimensions(&self) -> Option<(usize, usize)> {
        if self.decoded_headers {
            Some((self.width, self.height))
        } else {
            None
        }
    }
    /// Return the colour mode of decoded samples or none if
    /// headers aren't decoded
    pub const fn get_mode(&self) -> Option<&'static ColorMode> {
        if self.decoded_headers {
            Some(self.mode)
        } else {
            None
        }
    }
    /// Return the magic number of the image or none if
    /// headers aren't decoded
    pub const fn get_version(&self) -> Option<PnmVersion> {
        if self.decoded_headers {
            Some(self.version)
        } else {
            None
        }
    }
    /// Return the maximum sample value declared by the file
    pub const fn get_maxval(&self) -> Option<u32> {
        if self.decoded_headers {
            Some(self.maxval)
        } else {
            None
        }
    }
    /// Return metadata read from the headers
    ///
    /// This contains `maxval` and for PAM files the `tupltype`
    /// if one was declared
    pub fn get_info(&self) -> Option<ImageInfo> {
        if !self.decoded_headers {
            return None;
        }
        let mut info = ImageInfo::new();
        info.insert("maxval", u64::from(self.maxval));

        if let Some(tuple_type) = &self.tuple_type {
            info.insert("tupltype", tuple_type.as_str());
        }
        Some(info)
    }

    /// Decode a Netpbm file and return the samples from it
    ///
    /// Samples are 8 bit unless the maxval is above 255 in which
    /// case they are 16 bit.
    pub fn decode(&mut self) -> Result<DecodingResult, PPMDecodeErrors> {
        self.read_headers()?;

        let count = self.width * self.height * self.depth;

        match self.version {
            PnmVersion::P1 => self.decode_plain_bits(count),
            PnmVersion::P4 => self.decode_raw_bits(),
            PnmVersion::P2 | PnmVersion::P3 => {
                let samples = self.decode_plain_samples(count)?;
                self.scale(samples)
            }
            _ => {
                let samples = self.decode_raw_samples(count)?;
                self.scale(samples)
            }
        }
    }

    fn decode_raw_bits(&mut self) -> Result<DecodingResult, PPMDecodeErrors> {
        let stride = (self.width + 7) / 8;
        let data = self
            .reader
            .get(stride * self.height)
            .map_err(|_| {
                PPMDecodeErrors::TruncatedData(stride * self.height, self.reader.get_bytes_left())
            })?;

        let mut out = vec![0_u8; self.width * self.height];

        for (in_row, out_row) in data.chunks_exact(stride).zip(out.chunks_exact_mut(self.width)) {
            for (x, pixel) in out_row.iter_mut().enumerate() {
                let bit = (in_row[x / 8] >> (7 - (x % 8))) & 1;
                // a set bit is black
                *pixel = if bit == 1 { 0 } else { 255 };
            }
        }
        Ok(DecodingResult::U8(out))
    }

    fn decode_plain_bits(&mut self, count: usize) -> Result<DecodingResult, PPMDecodeErrors> {
        // every plain value takes at least one byte
        let mut out = Vec::with_capacity(count.min(self.reader.get_bytes_left()));

        while out.len() < count {
            skip_spaces(&mut self.reader);

            match self.reader.get_u8_err() {
                Ok(b'0') => out.push(255),
                Ok(b'1') => out.push(0),
                Ok(byte) => {
                    return Err(PPMDecodeErrors::Generic(format!(
                        "Unexpected character {:?} in plain PBM data",
                        byte as char
                    )))
                }
                Err(_) => return Err(PPMDecodeErrors::TruncatedData(count, out.len()))
            }
        }
        Ok(DecodingResult::U8(out))
    }

    fn decode_plain_samples(&mut self, count: usize) -> Result<Vec<u32>, PPMDecodeErrors> {
        // every plain value takes at least one byte
        let mut out = Vec::with_capacity(count.min(self.reader.get_bytes_left()));

        while out.len() < count {
            skip_spaces(&mut self.reader);

            if self.reader.eof() {
                return Err(PPMDecodeErrors::TruncatedData(count, out.len()));
            }
            let sample = get_integer(&mut self.reader)?;
            out.push(sample.try_into().unwrap_or(u32::MAX));
        }
        Ok(out)
    }

    fn decode_raw_samples(&mut self, count: usize) -> Result<Vec<u32>, PPMDecodeErrors> {
        let bytes_per_sample = if self.maxval > 255 { 2 } else { 1 };

        let data = self.reader.get(count * bytes_per_sample).map_err(|_| {
            PPMDecodeErrors::TruncatedData(count, self.reader.get_bytes_left() / bytes_per_sample)
        })?;

        let samples = if bytes_per_sample == 2 {
            // 16 bit samples are big endian
            data.chunks_exact(2)
                .map(|x| u32::from(u16::from_be_bytes([x[0], x[1]])))
                .collect()
        } else {
            data.iter().map(|x| u32::from(*x)).collect()
        };
        Ok(samples)
    }

    /// Rescale samples from `[0, maxval]` to the full range of the mode
    ///
    /// Samples above maxval are an error in strict mode, otherwise they
    /// are clamped
    fn scale(&self, samples: Vec<u32>) -> Result<DecodingResult, PPMDecodeErrors> {
        if self.options.get_strict_mode() {
            if let Some(sample) = samples.iter().find(|x| **x > self.maxval) {
                return Err(PPMDecodeErrors::SampleOutOfRange(*sample, self.maxval));
            }
        }
        let maxval = u64::from(self.maxval);
        let max_out = self.mode.max_int();
        let mut clamped = 0_usize;

        let mut rescale = |sample: u32| -> u64 {
            let mut sample = u64::from(sample);

            if sample > maxval {
                clamped += 1;
                sample = maxval;
            }
            if maxval == max_out {
                sample
            } else {
                (sample * max_out + maxval / 2) / maxval
            }
        };

        let result = if max_out > 255 {
            DecodingResult::U16(samples.into_iter().map(|x| rescale(x) as u16).collect())
        } else {
            DecodingResult::U8(samples.into_iter().map(|x| rescale(x) as u8).collect())
        };
        if clamped > 0 {
            warn!(
                "{clamped} samples were larger than maxval {} and were clamped",
                self.maxval
            );
        }
        Ok(result)
    }
}

/// Skip all whitespace characters and comments
/// until one hits a character that isn't a space or
/// we reach eof
fn skip_spaces(byte_stream: &mut ZByteReader) {
    while let Some(byte) = byte_stream.peek_u8() {
        if byte == b'#' {
            // skip the whole comment
            while let Ok(byte) = byte_stream.get_u8_err() {
                if byte == b'\n' {
                    break;
                }
            }
        } else if byte.is_ascii_whitespace() {
            byte_stream.skip(1);
        } else {
            break;
        }
    }
}

/// Read an unsigned decimal integer, failing if there are no digits
fn get_integer(byte_stream: &mut ZByteReader) -> Result<usize, PPMDecodeErrors> {
    let mut value = 0_usize;
    let mut digits = 0;

    while let Some(byte) = byte_stream.peek_u8() {
        if !byte.is_ascii_digit() {
            break;
        }
        value = value
            .checked_mul(10)
            .and_then(|x| x.checked_add(usize::from(byte - b'0')))
            .ok_or(PPMDecodeErrors::GenericStatic("Integer overflow in header"))?;
        digits += 1;
        byte_stream.skip(1);
    }
    if digits == 0 {
        let found = byte_stream.peek_u8().map_or('?', char::from);
        return Err(PPMDecodeErrors::Generic(format!(
            "Expected a decimal integer but found {found:?}"
        )));
    }
    Ok(value)
}

/// Return all bytes preceding a whitespace, the whitespace
/// is left in the stream
fn get_token<'a>(byte_stream: &mut ZByteReader<'a>) -> &'a [u8] {
    let start = byte_stream.get_position();

    while let Some(byte) = byte_stream.peek_u8() {
        if byte.is_ascii_whitespace() {
            break;
        }
        byte_stream.skip(1);
    }
    let end = byte_stream.get_position();
    byte_stream.rewind(end - start);
    byte_stream.get(end - start).unwrap_or(&[])
}

/// Return the rest of the current line, consuming the newline
fn get_line<'a>(byte_stream: &mut ZByteReader<'a>) -> &'a [u8] {
    let line = byte_stream.remaining();
    let length = line.iter().position(|x| *x == b'\n').unwrap_or(line.len());

    byte_stream.skip((length + 1).min(line.len()));
    &line[..length]
}

#[cfg(test)]
mod tests {
    use tessera_core::mode::{L16, LA, RGB};

    use crate::decoder::{PPMDecoder, PnmVersion};

    #[test]
    fn comments_between_tokens() {
        let data = b"P5\n# created by hand\n2 # width\n1\n255\n\x10\x20";
        let mut decoder = PPMDecoder::new(data);

        let pixels = decoder.decode().unwrap().u8().unwrap();
        assert_eq!(pixels, [0x10, 0x20]);
        assert_eq!(decoder.get_version(), Some(PnmVersion::P5));
    }

    #[test]
    fn raw_data_may_start_with_whitespace_bytes() {
        let data = b"P5 2 1 255\n\x20\x0a";
        let pixels = PPMDecoder::new(data).decode().unwrap().u8().unwrap();
        assert_eq!(pixels, [0x20, 0x0a]);
    }

    #[test]
    fn sixteen_bit_big_endian() {
        let data = b"P5 1 1 65535\n\x12\x34";
        let mut decoder = PPMDecoder::new(data);
        let pixels = decoder.decode().unwrap().u16().unwrap();

        assert_eq!(pixels, [0x1234]);
        assert_eq!(decoder.get_mode(), Some(&L16));
    }

    #[test]
    fn plain_samples_are_rescaled() {
        let mut decoder = PPMDecoder::new(b"P3\n1 1\n15\n15 0 5\n");
        let pixels = decoder.decode().unwrap().u8().unwrap();

        assert_eq!(pixels, [255, 0, 85]);
        assert_eq!(decoder.get_mode(), Some(&RGB));
    }

    #[test]
    fn plain_bits_without_separators() {
        let pixels = PPMDecoder::new(b"P1\n3 2\n010\n1 1 0")
            .decode()
            .unwrap()
            .u8()
            .unwrap();
        assert_eq!(pixels, [255, 0, 255, 0, 0, 255]);
    }

    #[test]
    fn pam_header() {
        let data = b"P7\nWIDTH 2\nHEIGHT 1\nDEPTH 2\nMAXVAL 255\nTUPLTYPE GRAYSCALE_ALPHA\nENDHDR\n\x01\x02\x03\x04";
        let mut decoder = PPMDecoder::new(data);
        let pixels = decoder.decode().unwrap().u8().unwrap();

        assert_eq!(pixels, [1, 2, 3, 4]);
        assert_eq!(decoder.get_mode(), Some(&LA));
        let info = decoder.get_info().unwrap();
        assert_eq!(info.get("tupltype").and_then(|x| x.as_text()), Some("GRAYSCALE_ALPHA"));
    }

    #[test]
    fn pam_missing_fields() {
        let data = b"P7\nWIDTH 2\nHEIGHT 1\nMAXVAL 255\nENDHDR\n\x01\x02";
        assert!(PPMDecoder::new(data).decode().is_err());
    }

    #[test]
    fn truncated_raster() {
        assert!(PPMDecoder::new(b"P6 2 2 255\n\x00\x00\x00").decode().is_err());
        assert!(PPMDecoder::new(b"P2 2 2 255\n1 2 3").decode().is_err());
        assert!(PPMDecoder::new(b"P4 9 1\n\xff").decode().is_err());
    }

    #[test]
    fn bad_headers() {
        assert!(PPMDecoder::new(b"P9 1 1 255\n\x00").decode().is_err());
        assert!(PPMDecoder::new(b"P5 0 1 255\n").decode().is_err());
        assert!(PPMDecoder::new(b"P5 1 1 70000\n\x00\x00").decode().is_err());
        assert!(PPMDecoder::new(b"P5 x 1 255\n\x00").decode().is_err());
    }
}

/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use log::{info, trace, warn};
use tessera_core::bytestream::ZByteReader;
use tessera_core::info::ImageInfo;
use tessera_core::mode::{ColorMode, L};
use tessera_core::options::DecoderOptions;

use crate::errors::XbmErrors;

/// Probe some bytes to see if they look like an X11 bitmap
pub fn probe_xbm(bytes: &[u8]) -> bool {
    let mut reader = ZByteReader::new(bytes);
    skip_spaces(&mut reader);

    if reader.get_u8_err() != Ok(b'#') {
        return false;
    }
    skip_spaces(&mut reader);
    get_word(&mut reader) == b"define"
}

/// An X11 bitmap decoder
///
/// Bitmaps are C source, a pair of `#define`s for the size, an optional
/// hotspot pair and a `char` array with 8 pixels per byte, least
/// significant bit first. Set bits decode to 255, clear bits to 0.
///
/// # Example
/// ```
/// use tessera_xbm::XbmDecoder;
///
/// let source = b"#define dot_width 3
/// #define dot_height 1
/// static char dot_bits[] = { 0x05 };";
///
/// let mut decoder = XbmDecoder::new(source);
/// assert_eq!(decoder.decode().unwrap(), [255, 0, 255]);
/// assert_eq!(decoder.get_label(), Some("dot"));
/// ```
pub struct XbmDecoder<'a> {
    reader:          ZByteReader<'a>,
    options:         DecoderOptions,
    width:           usize,
    height:          usize,
    label:           String,
    hotspot:         Option<(usize, usize)>,
    decoded_headers: bool
}

impl<'a> XbmDecoder<'a> {
    /// Create a new decoder with default options
    pub fn new(data: &'a [u8]) -> XbmDecoder<'a> {
        XbmDecoder::new_with_options(data, DecoderOptions::default())
    }

    /// Create a new decoder with the specified options
    pub fn new_with_options(data: &'a [u8], options: DecoderOptions) -> XbmDecoder<'a> {
        XbmDecoder {
            reader: ZByteReader::new(data),
            options,
            width: 0,
            height: 0,
            label: String::new(),
            hotspot: None,
            decoded_headers: false
        }
    }

    /// Read the `#define` lines and the array declaration up to its
    /// opening brace
    pub fn decode_headers(&mut self) -> Result<(), XbmErrors> {
        if self.decoded_headers {
            return Ok(());
        }
        let mut width = None;
        let mut height = None;
        let mut x_hot = None;
        let mut y_hot = None;
        let mut seen_prefix = false;

        loop {
            skip_spaces(&mut self.reader);

            if self.reader.peek_u8() != Some(b'#') {
                break;
            }
            self.reader.skip(1);
            skip_spaces(&mut self.reader);

            let directive = get_word(&mut self.reader);
            if directive != b"define" {
                trace!(
                    "Skipping preprocessor directive {}",
                    String::from_utf8_lossy(directive)
                );
                skip_line(&mut self.reader);
                continue;
            }
            skip_spaces(&mut self.reader);
            let name = String::from_utf8_lossy(get_word(&mut self.reader)).into_owned();

            let (label, slot) = if let Some(label) = name.strip_suffix("_width") {
                (label, &mut width)
            } else if let Some(label) = name.strip_suffix("_height") {
                (label, &mut height)
            } else if let Some(label) = name.strip_suffix("_x_hot") {
                (label, &mut x_hot)
            } else if let Some(label) = name.strip_suffix("_y_hot") {
                (label, &mut y_hot)
            } else {
                // only the size and hotspot defines need integer values
                warn!("Skipping define {name}");
                skip_line(&mut self.reader);
                continue;
            };
            skip_spaces(&mut self.reader);
            let value = get_integer(&mut self.reader)?;

            if seen_prefix && label != self.label {
                warn!("Define {name} does not share the prefix {:?}", self.label);
            }
            if !seen_prefix {
                self.label = label.to_string();
                seen_prefix = true;
            }
            *slot = Some(value);
        }

        let width = width.ok_or(XbmErrors::GenericStatic("Missing _width define"))?;
        let height = height.ok_or(XbmErrors::GenericStatic("Missing _height define"))?;

        if width == 0 || height == 0 {
            return Err(XbmErrors::ZeroDimensions);
        }
        if width > self.options.get_max_width() {
            return Err(XbmErrors::LargeDimensions(
                self.options.get_max_width(),
                width
            ));
        }
        if height > self.options.get_max_height() {
            return Err(XbmErrors::LargeDimensions(
                self.options.get_max_height(),
                height
            ));
        }

        match (x_hot, y_hot) {
            (Some(x), Some(y)) => self.hotspot = Some((x, y)),
            (None, None) => (),
            _ => warn!("Ignoring a hotspot with a single coordinate")
        }

        self.read_declaration()?;

        self.width = width;
        self.height = height;
        self.decoded_headers = true;

        info!("Width: {width}, height: {height}");
        trace!("Label: {:?}", self.label);

        Ok(())
    }

    /// `static [unsigned] char <label>_bits[] = {`
    fn read_declaration(&mut self) -> Result<(), XbmErrors> {
        let mut words = vec![];

        loop {
            skip_spaces(&mut self.reader);
            let word = get_word(&mut self.reader);
            if word.is_empty() {
                break;
            }
            words.push(word);
        }
        if words.contains(&&b"short"[..]) {
            return Err(XbmErrors::Unsupported("X10 bitmaps with short arrays"));
        }
        if !words.contains(&&b"char"[..]) {
            return Err(XbmErrors::InvalidHeader(
                "expected a char array declaration".to_string()
            ));
        }
        match words.last() {
            Some(name) if name.ends_with(b"_bits") => (),
            _ => {
                return Err(XbmErrors::InvalidHeader(
                    "expected an array named <label>_bits".to_string()
                ))
            }
        }
        expect(&mut self.reader, b'[')?;
        skip_spaces(&mut self.reader);
        // optional array length
        if self.reader.peek_u8().is_some_and(|x| x.is_ascii_digit()) {
            get_integer(&mut self.reader)?;
        }
        expect(&mut self.reader, b']')?;
        expect(&mut self.reader, b'=')?;
        expect(&mut self.reader, b'{')?;
        Ok(())
    }

    /// Return the width and height, or `None` if headers haven't been decoded
    pub const fn get_dimensions(&self) -> Option<(usize, usize)> {
        if !self.decoded_headers {
            return None;
        }
        Some((self.width, self.height))
    }

    /// Bitmaps always decode to 8 bit luma
    pub const fn get_mode(&self) -> Option<&'static ColorMode> {
        if !self.decoded_headers {
            return None;
        }
        Some(&L)
    }

    /// The prefix of the defines, e.g. `cursor` for `cursor_width`
    pub fn get_label(&self) -> Option<&str> {
        self.decoded_headers.then_some(self.label.as_str())
    }

    /// The `_x_hot`, `_y_hot` pair if both were defined
    pub const fn get_hotspot(&self) -> Option<(usize, usize)> {
        self.hotspot
    }

    /// `hotspot` as a pair and `label` as text, `None` if headers
    /// haven't been decoded
    pub fn get_info(&self) -> Option<ImageInfo> {
        if !self.decoded_headers {
            return None;
        }
        let mut info = ImageInfo::new();

        if let Some((x, y)) = self.hotspot {
            info.insert("hotspot", (x as i64, y as i64));
        }
        info.insert("label", self.label.as_str());
        Some(info)
    }

    /// Decode the bitmap into one byte per pixel
    pub fn decode(&mut self) -> Result<Vec<u8>, XbmErrors> {
        self.decode_headers()?;

        let bytes_per_row = self.width.div_ceil(8);
        let expected = bytes_per_row * self.height;
        let mut packed = Vec::with_capacity(expected);

        loop {
            skip_spaces(&mut self.reader);

            match self.reader.peek_u8() {
                Some(b'}') => break,
                Some(b',') => self.reader.skip(1),
                Some(_) => packed.push(get_hex_byte(&mut self.reader)?),
                None => return Err(XbmErrors::TruncatedData(expected, packed.len()))
            }
        }

        if packed.len() < expected {
            return Err(XbmErrors::TruncatedData(expected, packed.len()));
        }
        if packed.len() > expected {
            if self.options.get_strict_mode() {
                return Err(XbmErrors::InvalidHeader(format!(
                    "{} data bytes for a {}x{} bitmap",
                    packed.len(),
                    self.width,
                    self.height
                )));
            }
            warn!("Ignoring {} extra data bytes", packed.len() - expected);
        }

        let mut pixels = vec![0_u8; self.width * self.height];

        for (row, bits) in pixels
            .chunks_exact_mut(self.width)
            .zip(packed.chunks_exact(bytes_per_row))
        {
            for (x, pixel) in row.iter_mut().enumerate() {
                if (bits[x / 8] >> (x % 8)) & 1 == 1 {
                    *pixel = 255;
                }
            }
        }
        Ok(pixels)
    }
}

/// Skip whitespace and C comments
fn skip_spaces(reader: &mut ZByteReader) {
    while let Some(byte) = reader.peek_u8() {
        if byte.is_ascii_whitespace() {
            reader.skip(1);
        } else if matches!(reader.peek_at(0, 2), Ok(b"/*")) {
            reader.skip(2);
            while reader.has(1) && !matches!(reader.peek_at(0, 2), Ok(b"*/")) {
                reader.skip(1);
            }
            reader.skip(2);
        } else if matches!(reader.peek_at(0, 2), Ok(b"//")) {
            skip_line(reader);
        } else {
            break;
        }
    }
}

fn skip_line(reader: &mut ZByteReader) {
    while let Ok(byte) = reader.get_u8_err() {
        if byte == b'\n' {
            break;
        }
    }
}

/// Return a run of identifier characters, possibly empty
fn get_word<'a>(reader: &mut ZByteReader<'a>) -> &'a [u8] {
    let rest = reader.remaining();
    let length = rest
        .iter()
        .position(|x| !(x.is_ascii_alphanumeric() || *x == b'_'))
        .unwrap_or(rest.len());

    reader.skip(length);
    &rest[..length]
}

fn expect(reader: &mut ZByteReader, byte: u8) -> Result<(), XbmErrors> {
    skip_spaces(reader);

    match reader.get_u8_err() {
        Ok(found) if found == byte => Ok(()),
        Ok(found) => Err(XbmErrors::InvalidHeader(format!(
            "expected {:?} but found {:?}",
            char::from(byte),
            char::from(found)
        ))),
        Err(_) => Err(XbmErrors::InvalidHeader(format!(
            "expected {:?} but the data ended",
            char::from(byte)
        )))
    }
}

/// Read an unsigned decimal integer, failing if there are no digits
fn get_integer(reader: &mut ZByteReader) -> Result<usize, XbmErrors> {
    let digits = get_word(reader);

    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(XbmErrors::InvalidHeader(format!(
            "expected a decimal integer but found {:?}",
            String::from_utf8_lossy(digits)
        )));
    }
    digits
        .iter()
        .try_fold(0_usize, |acc, x| {
            acc.checked_mul(10)?.checked_add(usize::from(x - b'0'))
        })
        .ok_or(XbmErrors::GenericStatic("Integer overflow in header"))
}

/// Read a `0xHH` data byte
fn get_hex_byte(reader: &mut ZByteReader) -> Result<u8, XbmErrors> {
    let token = get_word(reader);

    let digits = token
        .strip_prefix(b"0x")
        .or_else(|| token.strip_prefix(b"0X"))
        .filter(|x| (1..=2).contains(&x.len()))
        .and_then(|x| core::str::from_utf8(x).ok())
        .and_then(|x| u8::from_str_radix(x, 16).ok());

    digits.ok_or_else(|| {
        XbmErrors::InvalidHeader(format!(
            "expected a 0xHH data byte but found {:?}",
            String::from_utf8_lossy(token)
        ))
    })
}

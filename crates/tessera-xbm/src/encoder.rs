/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::io::Write;

use log::trace;
use tessera_core::bytestream::ZByteWriter;
use tessera_core::info::{ImageInfo, InfoValue};
use tessera_core::mode::L;
use tessera_core::options::EncoderOptions;

use crate::errors::XbmErrors;

/// An X11 bitmap encoder
///
/// Input is one byte per pixel in [`L`] mode, any non-zero sample
/// is written as a set bit. Callers with other modes decide which
/// pixels are set before handing the samples over.
///
/// The identifiers are prefixed with the label from the options,
/// which may be empty.
///
/// # Example
/// ```
/// use tessera_core::mode::L;
/// use tessera_core::options::EncoderOptions;
/// use tessera_xbm::XbmEncoder;
///
/// let options = EncoderOptions::new(3, 1, &L).set_label("dot");
/// let mut out = vec![];
///
/// XbmEncoder::new(&[1, 0, 1], options).encode(&mut out).unwrap();
/// assert_eq!(
///     out,
///     b"#define dot_width 3\n#define dot_height 1\nstatic char dot_bits[] = {\n 0x05\n};\n"
/// );
/// ```
pub struct XbmEncoder<'a> {
    data:    &'a [u8],
    options: EncoderOptions,
    hotspot: Option<(usize, usize)>
}

impl<'a> XbmEncoder<'a> {
    /// Create a new encoder for `data` with the dimensions and
    /// label given in `options`
    pub fn new(data: &'a [u8], options: EncoderOptions) -> XbmEncoder<'a> {
        XbmEncoder {
            data,
            options,
            hotspot: None
        }
    }

    /// Write `_x_hot` and `_y_hot` defines
    pub fn set_hotspot(&mut self, x: usize, y: usize) {
        self.hotspot = Some((x, y));
    }

    /// Pick up a `hotspot` pair from decoded metadata, other keys are
    /// ignored
    pub fn add_info(&mut self, info: &ImageInfo) {
        if let Some((x, y)) = info.get("hotspot").and_then(InfoValue::as_pair) {
            match (usize::try_from(x), usize::try_from(y)) {
                (Ok(x), Ok(y)) => self.set_hotspot(x, y),
                _ => trace!("Ignoring negative hotspot ({x}, {y})")
            }
        }
    }

    /// Encode the bitmap into `sink`, returning the number of
    /// bytes written
    pub fn encode<W: Write>(&self, sink: W) -> Result<usize, XbmErrors> {
        let (width, height) = (self.options.get_width(), self.options.get_height());

        if self.options.get_mode() != &L {
            return Err(XbmErrors::GenericStatic(
                "Bitmaps can only be encoded from 8 bit luma"
            ));
        }
        if width == 0 || height == 0 {
            return Err(XbmErrors::ZeroDimensions);
        }
        if self.data.len() != width * height {
            return Err(XbmErrors::WrongInputSize(width * height, self.data.len()));
        }
        let label = self.options.get_label();

        let mut writer = ZByteWriter::new(sink);

        let mut header = format!("#define {label}_width {width}\n#define {label}_height {height}\n");
        if let Some((x, y)) = self.hotspot {
            header.push_str(&format!("#define {label}_x_hot {x}\n#define {label}_y_hot {y}\n"));
        }
        header.push_str(&format!("static char {label}_bits[] = {{\n"));
        writer.write_all(header.as_bytes())?;

        let mut packed = vec![0_u8; width.div_ceil(8)];

        for row in self.data.chunks_exact(width) {
            packed.fill(0);

            for (x, sample) in row.iter().enumerate() {
                if *sample != 0 {
                    packed[x / 8] |= 1 << (x % 8);
                }
            }
            let tokens: Vec<String> = packed.iter().map(|x| format!("0x{x:02x}")).collect();

            writer.write_u8(b' ')?;
            writer.write_all(tokens.join(" ").as_bytes())?;
            writer.write_u8(b'\n')?;
        }
        writer.write_all(b"};\n")?;
        writer.flush()?;

        Ok(writer.bytes_written())
    }
}

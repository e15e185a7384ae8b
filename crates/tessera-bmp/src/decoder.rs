/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

// BMP is a format that has been extended multiple times, the decoder
// follows the header history below.
//
// WINDOWS VERSIONS OF THE BMP FORMAT
// ----------------------------------
// WinBMPv2.
// - First is a 14 byte file header that includes: the magic number ("BM"),
//   file size, and offset to the pixel data.
// - Next is a 12 byte info header which includes: the info header size,
//   width, height, number of color planes, and bits-per-pixel
//   which must be 1, 4, 8 or 24.
// - Next is the semi-optional color table, which has length 2^bpp and has 3
//   bytes per value (BGR). The color table is required if bpp is 1, 4, or 8.
// - Next is an optional gap.
// - Next is the pixel data, which is pointed to by the data offset.
//
// WinBMPv3. This is the most widely used version.
// - It changed the info header to 40 bytes by taking the WinBMPv2 info
//   header, enlargening its width and height fields, and adding more fields
//   including: a compression type and number of colors.
// - The semi-optional color table is now 4 bytes per value (BGR0), and its
//   length is the number of colors, or 2^bpp if that is zero.
// - Compression can be RGB (i.e. no compression), RLE4 (if bpp==4) or
//   RLE8 (if bpp==8) values.
//
// WinBMPv3-NT. A variant of WinBMPv3.
// - bpp can now be 16 or 32, in which case compression can be RGB or the
//   new BITFIELDS value; in the latter case an additional 12 bytes of color
//   bitfields follow the info header.
//
// WinBMPv4.
// - It extended the info header to 108 bytes, including the 12 bytes of color
//   mask data from WinBMPv3-NT, plus alpha mask data, and also color-space and
//   gamma correction fields.
//
// WinBMPv5.
// - It extended the info header to 124 bytes, adding color profile data.
//
// OS/2 VERSIONS OF THE BMP FORMAT
// -------------------------------
// OS2-BMPv1.
// - Almost identical to WinBMPv2; the differences are basically ignorable.
//
// OS2-BMPv2.
// - Similar to WinBMPv3.
// - The info header is 64 bytes but can be reduced to as little as 16; any
//   omitted fields are treated as zero. The first 40 bytes of these fields are
//   nearly identical to the WinBMPv3 info header; the remaining 24 bytes are
//   different.
// - Also adds compression types "Huffman 1D" and "RLE24", which we don't
//   support.
//
// In every variant the channel masks, when present, sit at file offset 54,
// either inside the info header or directly after a 40 byte one.

use log::{info, trace, warn};
use tessera_core::bytestream::ZByteReader;
use tessera_core::info::ImageInfo;
use tessera_core::mode::ColorMode;
use tessera_core::options::DecoderOptions;

use crate::common::{BmpCompression, BmpPixelFormat, DibHeader};
use crate::utils::{expand_bits_to_byte, ChannelMask};
use crate::BmpDecoderErrors;

const FILE_HEADER_SIZE: usize = 14;
const MASK_OFFSET: usize = 54;

/// Probe some bytes to see
/// if they consist of a BMP image
pub fn probe_bmp(bytes: &[u8]) -> bool {
    if let Some(magic_bytes) = bytes.get(0..2) {
        if magic_bytes == b"BM" {
            // skip file_size   -> 4
            // skip reserved    -> 4
            // skip data offset -> 4
            // read sz
            if let Some(sz) = bytes.get(14..18) {
                let sz = u32::from_le_bytes([sz[0], sz[1], sz[2], sz[3]]);
                return DibHeader::from_size(sz).is_some();
            }
        }
    }
    false
}

/// A BMP decoder.
///
/// Output is RGB for indexed, 24 bit and unmasked 32 bit images, RGBA for
/// masked images with an alpha mask and L for 8 bit images without a
/// colour table.
///
/// # Example
/// ```no_run
/// use tessera_bmp::BmpDecoder;
///
/// fn main() -> Result<(), tessera_bmp::BmpDecoderErrors> {
///     let mut decoder = BmpDecoder::new(b"BM");
///     decoder.decode_headers()?;
///     // after decoding headers, we can safely access the image metadata
///     let (w, h) = decoder.get_dimensions().unwrap();
///     println!("Image width: {w}\t Image height: {h}");
///
///     let pixels = decoder.decode()?;
///     println!("Pixels length:{}", pixels.len());
///     Ok(())
/// }
/// ```
pub struct BmpDecoder<'a> {
    bytes:           ZByteReader<'a>,
    options:         DecoderOptions,
    width:           usize,
    height:          usize,
    top_down:        bool,
    dib:             Option<DibHeader>,
    depth:           u16,
    pix_fmt:         BmpPixelFormat,
    masks:           [ChannelMask; 4],
    palette:         Vec<[u8; 3]>,
    data_offset:     usize,
    resolution:      Option<(i32, i32)>,
    decoded_headers: bool
}

impl<'a> BmpDecoder<'a> {
    /// Create a new bmp decoder that reads data from
    /// `data`
    pub fn new(data: &'a [u8]) -> BmpDecoder<'a> {
        BmpDecoder::new_with_options(data, DecoderOptions::default())
    }

    /// Create a new decoder instance with specified options
    pub fn new_with_options(data: &'a [u8], options: DecoderOptions) -> BmpDecoder<'a> {
        BmpDecoder {
            bytes: ZByteReader::new(data),
            options,
            width: 0,
            height: 0,
            top_down: false,
            dib: None,
            depth: 0,
            pix_fmt: BmpPixelFormat::BGR,
            masks: [ChannelMask::new(0); 4],
            palette: vec![],
            data_offset: 0,
            resolution: None,
            decoded_headers: false
        }
    }

    /// Decode headers stored in the bmp file and store
    /// information in the decode context
    ///
    /// After calling this, most information fields will be filled
    /// except the actual decoding bytes
    pub fn decode_headers(&mut self) -> Result<(), BmpDecoderErrors> {
        if self.decoded_headers {
            return Ok(());
        }

        if self.bytes.get_u8_err()? != b'B' || self.bytes.get_u8_err()? != b'M' {
            return Err(BmpDecoderErrors::InvalidMagicBytes);
        }
        // 4 bytes file size
        // skip 4 reserved bytes
        self.bytes.skip(8);

        let data_offset = self.bytes.get_u32_le_err()? as usize;
        let dib_size = self.bytes.get_u32_le_err()?;

        let dib = DibHeader::from_size(dib_size).ok_or_else(|| {
            BmpDecoderErrors::Generic(format!("Unknown information header size {dib_size}"))
        })?;

        if data_offset < FILE_HEADER_SIZE + dib_size as usize {
            return Err(BmpDecoderErrors::GenericStatic("Invalid data offset"));
        }

        let (width, height) = match dib {
            DibHeader::Core => (
                i64::from(self.bytes.get_u16_le_err()?),
                i64::from(self.bytes.get_u16_le_err()?)
            ),
            _ => (
                i64::from(self.bytes.get_u32_le_err()? as i32),
                i64::from(self.bytes.get_u32_le_err()? as i32)
            )
        };

        if width <= 0 {
            return Err(BmpDecoderErrors::GenericStatic(
                "Width is zero or negative, invalid image"
            ));
        }
        if height == 0 {
            return Err(BmpDecoderErrors::GenericStatic(
                "Height is zero, invalid image"
            ));
        }
        self.top_down = height < 0;
        self.width = width as usize;
        self.height = height.unsigned_abs() as usize;

        if self.height > self.options.get_max_height() {
            return Err(BmpDecoderErrors::TooLargeDimensions(
                "height",
                self.options.get_max_height(),
                self.height
            ));
        }

        if self.width > self.options.get_max_width() {
            return Err(BmpDecoderErrors::TooLargeDimensions(
                "width",
                self.options.get_max_width(),
                self.width
            ));
        }

        // planes
        if self.bytes.get_u16_le_err()? != 1 {
            return Err(BmpDecoderErrors::GenericStatic("Invalid BMP header"));
        }

        let depth = self.bytes.get_u16_le_err()?;

        let mut colors_used = 0;

        let compression = if dib.is_extended() {
            let value = self.bytes.get_u32_le_err()?;
            // image size
            self.bytes.skip(4);
            let x_ppm = self.bytes.get_u32_le_err()? as i32;
            let y_ppm = self.bytes.get_u32_le_err()? as i32;
            colors_used = self.bytes.get_u32_le_err()?;

            if x_ppm != 0 || y_ppm != 0 {
                self.resolution = Some((x_ppm, y_ppm));
            }

            if matches!(dib, DibHeader::Os2V2(_)) && (value == 3 || value == 4) {
                return Err(BmpDecoderErrors::Unsupported(
                    "OS/2 Huffman 1D and RLE24 compression"
                ));
            }
            BmpCompression::from_u32(value)
                .ok_or(BmpDecoderErrors::GenericStatic("Unknown BMP compression scheme"))?
        } else {
            BmpCompression::RGB
        };

        match compression {
            BmpCompression::RLE4 | BmpCompression::RLE8 => {
                return Err(BmpDecoderErrors::Unsupported("Run length encoded pixel data"));
            }
            BmpCompression::JPEG | BmpCompression::PNG => {
                return Err(BmpDecoderErrors::Unsupported("Embedded JPEG or PNG data"));
            }
            _ => ()
        }

        let mut palette_start = FILE_HEADER_SIZE + dib_size as usize;

        if compression.has_masks() {
            if depth != 16 && depth != 32 {
                return Err(BmpDecoderErrors::GenericStatic(
                    "Bitfields are only valid for 16 and 32 bit images"
                ));
            }
            let has_alpha_mask =
                compression == BmpCompression::ALPHABITFIELDS || dib.size() >= 56;

            self.bytes.set_position(MASK_OFFSET);
            for mask in self.masks.iter_mut().take(if has_alpha_mask { 4 } else { 3 }) {
                *mask = ChannelMask::new(self.bytes.get_u32_le_err()?);
            }
            // masks following a 40 byte header are not part of it
            if dib == DibHeader::Info {
                palette_start += if has_alpha_mask { 16 } else { 12 };
            }
        } else if depth == 16 {
            // 5-5-5
            self.masks = [
                ChannelMask::new(0x7C00),
                ChannelMask::new(0x03E0),
                ChannelMask::new(0x001F),
                ChannelMask::new(0)
            ];
        }

        self.pix_fmt = match depth {
            1 | 2 | 4 | 8 => {
                if depth == 2 {
                    warn!("Depth of 2 not officially supported");
                }
                let entry_size = dib.palette_entry_size();
                let available = data_offset.saturating_sub(palette_start) / entry_size;

                let mut colors = 1_usize << depth;

                if colors_used != 0 {
                    if colors_used as usize > colors {
                        let msg = format!(
                            "Incorrect number of colors {colors_used} for depth {depth}"
                        );
                        if self.options.get_strict_mode() {
                            return Err(BmpDecoderErrors::Generic(msg));
                        }
                        warn!("{msg}");
                    } else {
                        colors = colors_used as usize;
                    }
                }
                if available == 0 && depth == 8 {
                    // no colour table, samples are grey levels
                    BmpPixelFormat::GRAY8
                } else {
                    if available < colors {
                        if self.options.get_strict_mode() || available == 0 {
                            return Err(BmpDecoderErrors::GenericStatic(
                                "Invalid Palette entries"
                            ));
                        }
                        warn!("Colour table holds {available} of {colors} entries");
                        colors = available;
                    }
                    self.bytes.set_position(palette_start);
                    let table = self.bytes.get(colors * entry_size)?;

                    self.palette = table
                        .chunks_exact(entry_size)
                        .map(|x| [x[2], x[1], x[0]])
                        .collect();
                    BmpPixelFormat::PAL8
                }
            }
            16 => BmpPixelFormat::MASKED,
            24 => BmpPixelFormat::BGR,
            32 if compression.has_masks() => BmpPixelFormat::MASKED,
            32 => BmpPixelFormat::BGRX,
            _ => {
                let message = format!("Depth {depth} unsupported");
                return Err(BmpDecoderErrors::Generic(message));
            }
        };

        info!("Width: {}", self.width);
        info!("Height: {}", self.height);
        trace!("Header size  : {dib_size}");
        trace!("Pixel format : {:?}", self.pix_fmt);
        trace!("Compression  : {:?}", compression);
        trace!("Bit depth: {:?}", depth);

        self.dib = Some(dib);
        self.depth = depth;
        self.data_offset = data_offset;
        self.decoded_headers = true;

        Ok(())
    }

    /// Get dimensions of the image
    ///
    /// This is a tuple of width,height
    ///
    /// # Returns
    /// - `Some((width,height))`  - The image dimensions
    /// - `None`: Indicates that the image headers weren't decoded
    ///    or an error occurred during decoding the headers
    pub fn get_dimensions(&self) -> Option<(usize, usize)> {
        if !self.decoded_headers {
            return None;
        }
        Some((self.width, self.height))
    }

    /// Bits per pixel in the file
    pub fn get_depth(&self) -> Option<u16> {
        self.decoded_headers.then_some(self.depth)
    }

    /// Get the colour mode of decoded pixels or none if the headers weren't decoded
    pub fn get_mode(&self) -> Option<&'static ColorMode> {
        if !self.decoded_headers {
            return None;
        }
        Some(self.pix_fmt.mode(!self.masks[3].is_empty()))
    }

    /// Header facts, `None` if headers weren't decoded
    ///
    /// | Key               | Value |
    /// |-------------------|-------|
    /// | `dib_header_size` | size of the info header |
    /// | `resolution`      | pixels per metre, x and y |
    /// | `palette`         | colour table as RGB triples |
    pub fn get_info(&self) -> Option<ImageInfo> {
        let dib = self.dib?;
        let mut info = ImageInfo::new();

        info.insert("dib_header_size", u64::from(dib.size()));

        if let Some((x, y)) = self.resolution {
            info.insert("resolution", (i64::from(x), i64::from(y)));
        }
        if !self.palette.is_empty() {
            info.insert("palette", self.palette.concat());
        }
        Some(info)
    }

    /// Return the expected size of the output buffer
    ///
    /// Returns `None` if headers haven't been decoded or if calculation overflows
    pub fn output_buf_size(&self) -> Option<usize> {
        if !self.decoded_headers {
            return None;
        }
        self.width
            .checked_mul(self.height)?
            .checked_mul(self.get_mode()?.num_components())
    }

    /// Decode an image returning the decoded bytes as an
    /// allocated `Vec<u8>` or an error if decoding could not be completed
    pub fn decode(&mut self) -> Result<Vec<u8>, BmpDecoderErrors> {
        self.decode_headers()?;

        let output_size = self
            .output_buf_size()
            .ok_or(BmpDecoderErrors::OverFlowOccurred)?;

        let components = output_size / (self.width * self.height);
        let out_stride = self.width * components;

        // bmp rounds up each line to be a multiple of 4, padding the end if necessary
        let in_stride = (usize::from(self.depth) * self.width + 31) / 32 * 4;
        let expected = in_stride
            .checked_mul(self.height)
            .ok_or(BmpDecoderErrors::OverFlowOccurred)?;

        self.bytes.set_position(self.data_offset);

        let available = self.bytes.get_bytes_left();
        let pixel_data = self
            .bytes
            .get(expected)
            .map_err(|_| BmpDecoderErrors::TooSmallBuffer(expected, available))?;

        let mut output = vec![0_u8; output_size];
        let mut indices = vec![0_u8; self.width];

        // masked pixels are 16 or 32 bit little endian words
        let word_size = usize::from(self.depth / 8);
        let read_word: fn(&[u8]) -> u32 = if self.depth == 16 {
            |x| u32::from(u16::from_le_bytes([x[0], x[1]]))
        } else {
            |x| u32::from_le_bytes([x[0], x[1], x[2], x[3]])
        };

        // BMP format writes from bottom to top meaning the first row in the stream
        // is the last row of the image unless the height was negative
        for (stored_row, in_row) in pixel_data.chunks_exact(in_stride).enumerate() {
            let y = if self.top_down {
                stored_row
            } else {
                self.height - stored_row - 1
            };
            let out_row = &mut output[y * out_stride..(y + 1) * out_stride];

            match self.pix_fmt {
                BmpPixelFormat::PAL8 => {
                    if self.depth < 8 {
                        expand_bits_to_byte(usize::from(self.depth), in_row, &mut indices);
                    } else {
                        indices.copy_from_slice(&in_row[..self.width]);
                    }
                    self.expand_palette(&indices, out_row)?;
                }
                BmpPixelFormat::GRAY8 => {
                    out_row.copy_from_slice(&in_row[..self.width]);
                }
                BmpPixelFormat::BGR => {
                    for (out, pixel) in out_row.chunks_exact_mut(3).zip(in_row.chunks_exact(3)) {
                        out.copy_from_slice(&[pixel[2], pixel[1], pixel[0]]);
                    }
                }
                BmpPixelFormat::BGRX => {
                    for (out, pixel) in out_row.chunks_exact_mut(3).zip(in_row.chunks_exact(4)) {
                        out.copy_from_slice(&[pixel[2], pixel[1], pixel[0]]);
                    }
                }
                BmpPixelFormat::MASKED => {
                    let [mr, mg, mb, ma] = self.masks;

                    let words = in_row.chunks_exact(word_size).map(read_word);

                    for (out, v) in out_row.chunks_exact_mut(components).zip(words) {
                        out[0] = mr.extract(v);
                        out[1] = mg.extract(v);
                        out[2] = mb.extract(v);
                        if components == 4 {
                            out[3] = ma.extract(v);
                        }
                    }
                }
            }
        }
        Ok(output)
    }

    /// Resolve palette indices to RGB triples
    fn expand_palette(&self, indices: &[u8], out: &mut [u8]) -> Result<(), BmpDecoderErrors> {
        for (index, pixel) in indices.iter().zip(out.chunks_exact_mut(3)) {
            match self.palette.get(usize::from(*index)) {
                Some(entry) => pixel.copy_from_slice(entry),
                None if self.options.get_strict_mode() => {
                    return Err(BmpDecoderErrors::GenericStatic(
                        "Palette index larger than the colour table"
                    ));
                }
                // out of range indices stay black
                None => pixel.fill(0)
            }
        }
        Ok(())
    }
}

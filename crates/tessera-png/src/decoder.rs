/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use log::trace;
use tessera_core::bytestream::ZByteReader;
use tessera_core::info::ImageInfo;
use tessera_core::mode::{ColorMode, L, L16, LA, LA32, RGB, RGB48, RGBA, RGBA64};
use tessera_core::options::DecoderOptions;
use tessera_core::result::DecodingResult;
use zune_inflate::{DeflateDecoder, DeflateOptions};

use crate::constants::PNG_SIGNATURE;
use crate::enums::{FilterMethod, InterlaceMethod, PngChunkType, PngColor};
use crate::error::PngDecodeErrors;
use crate::filters::{
    handle_avg, handle_avg_first, handle_paeth, handle_paeth_first, handle_sub, handle_up
};
use crate::headers::default_chunk_handler;

#[derive(Copy, Clone)]
pub(crate) struct PLTEEntry {
    pub red:   u8,
    pub green: u8,
    pub blue:  u8,
    pub alpha: u8
}

impl Default for PLTEEntry {
    fn default() -> Self {
        // but a tRNS chunk may contain fewer values than there are palette entries.
        // In this case, the alpha value for all remaining palette entries is assumed to be 255
        PLTEEntry {
            red:   0,
            green: 0,
            blue:  0,
            alpha: 255
        }
    }
}

#[derive(Copy, Clone)]
pub(crate) struct PngChunk {
    pub length:     usize,
    pub chunk_type: PngChunkType,
    pub chunk:      [u8; 4]
}

/// Facts from the IHDR chunk
#[derive(Default, Debug, Copy, Clone)]
pub struct PngInfo {
    pub width:            usize,
    pub height:           usize,
    pub depth:            u8,
    pub color:            PngColor,
    pub component:        u8,
    pub interlace_method: InterlaceMethod
}

/// A png decoder
///
/// # Example
/// ```no_run
/// use tessera_png::PngDecoder;
///
/// let data = std::fs::read("image.png").unwrap();
/// let mut decoder = PngDecoder::new(&data);
///
/// decoder.decode_headers().unwrap();
/// let mode = decoder.get_mode().unwrap();
/// let pixels = decoder.decode().unwrap();
/// ```
pub struct PngDecoder<'a> {
    pub(crate) stream:          ZByteReader<'a>,
    pub(crate) options:         DecoderOptions,
    pub(crate) png_info:        PngInfo,
    pub(crate) palette:         Vec<PLTEEntry>,
    pub(crate) palette_entries: usize,
    pub(crate) idat_chunks:     Vec<u8>,
    pub(crate) info:            ImageInfo,
    pub(crate) seen_hdr:        bool,
    pub(crate) seen_headers:    bool,
    pub(crate) seen_trns:       bool,
    pub(crate) seen_chunks:     Vec<PngChunkType>,
    pub(crate) seen_idat:       bool,
    pub(crate) idat_ended:      bool
}

impl<'a> PngDecoder<'a> {
    pub fn new(data: &'a [u8]) -> PngDecoder<'a> {
        PngDecoder::new_with_options(data, DecoderOptions::default())
    }
    pub fn new_with_options(data: &'a [u8], options: DecoderOptions) -> PngDecoder<'a> {
        PngDecoder {
            stream: ZByteReader::new(data),
            options,
            png_info: PngInfo::default(),
            palette: Vec::new(),
            palette_entries: 0,
            idat_chunks: Vec::with_capacity(37), // randomly chosen size, my favourite number,
            info: ImageInfo::new(),
            seen_hdr: false,
            seen_headers: false,
            seen_trns: false,
            seen_chunks: Vec::new(),
            seen_idat: false,
            idat_ended: false
        }
    }

    /// Get image dimensions or none if they aren't decoded
    pub const fn get_dimensions(&self) -> Option<(usize, usize)> {
        if !self.seen_hdr {
            return None;
        }
        Some((self.png_info.width, self.png_info.height))
    }
    /// Bit depth declared in the IHDR chunk
    pub const fn get_depth(&self) -> Option<u8> {
        if !self.seen_hdr {
            return None;
        }
        Some(self.png_info.depth)
    }
    /// The IHDR facts, or none if headers aren't decoded
    pub const fn get_png_info(&self) -> Option<&PngInfo> {
        if !self.seen_hdr {
            return None;
        }
        Some(&self.png_info)
    }
    /// The mode of the samples [`decode`](Self::decode) returns
    ///
    /// Palette images expand to RGB, or RGBA when a
    /// `tRNS` chunk is present, so this is only known after
    /// [`decode_headers`](Self::decode_headers)
    pub fn get_mode(&self) -> Option<&'static ColorMode> {
        if !self.seen_headers {
            return None;
        }
        let wide = self.png_info.depth == 16;

        let mode = match self.png_info.color {
            PngColor::Luma if wide => &L16,
            PngColor::Luma => &L,
            PngColor::LumaA if wide => &LA32,
            PngColor::LumaA => &LA,
            PngColor::RGB if wide => &RGB48,
            PngColor::RGB => &RGB,
            PngColor::RGBA if wide => &RGBA64,
            PngColor::RGBA => &RGBA,
            PngColor::Palette if self.seen_trns => &RGBA,
            PngColor::Palette => &RGB
        };
        Some(mode)
    }
    /// Ancillary chunk data, available after headers are decoded
    pub const fn get_info(&self) -> Option<&ImageInfo> {
        if !self.seen_headers {
            return None;
        }
        Some(&self.info)
    }

    fn read_chunk_header(&mut self) -> Result<PngChunk, PngDecodeErrors> {
        // Format is length - chunk type - [data] -  crc chunk, load crc chunk now
        let chunk_length = self.stream.get_u32_be_err()? as usize;
        let chunk_type_int = self.stream.get_u32_be_err()?.to_be_bytes();

        let chunk_type = PngChunkType::from_bytes(&chunk_type_int);

        if !self.stream.has(chunk_length + 4 /*crc stream*/) {
            let err = format!(
                "Not enough bytes for chunk {:?}, bytes requested are {}, but bytes present are {}",
                std::str::from_utf8(&chunk_type_int).unwrap_or("XXXX"),
                chunk_length + 4,
                self.stream.get_bytes_left()
            );

            return Err(PngDecodeErrors::Generic(err));
        }
        // Confirm the CRC here.
        #[cfg(feature = "crc")]
        {
            if self.options.png_get_confirm_crc() {
                use crate::crc::calc_crc;

                let mut crc_bytes = [0; 4];
                crc_bytes.copy_from_slice(self.stream.peek_at(chunk_length, 4)?);

                let crc = u32::from_be_bytes(crc_bytes);

                // go back and point to chunk type.
                self.stream.rewind(4);
                // read chunk type + chunk data
                let bytes = self.stream.peek_at(0, chunk_length + 4)?;

                // calculate crc
                let calc_crc = calc_crc(bytes);

                if crc != calc_crc {
                    return Err(PngDecodeErrors::BadCrc(crc, calc_crc));
                }
                // go point after the chunk type
                // The other parts expect the bit-reader to point to the
                // start of the chunk data.
                self.stream.skip(4);
            }
        }

        Ok(PngChunk {
            length: chunk_length,
            chunk: chunk_type_int,
            chunk_type
        })
    }

    /// Enforce where a chunk may appear relative to the others
    fn check_chunk_order(&mut self, chunk: PngChunkType) -> Result<(), PngDecodeErrors> {
        let name = chunk.name();
        let seen = |chunk: PngChunkType| self.seen_chunks.contains(&chunk);

        if chunk.is_unique() && seen(chunk) {
            return Err(PngDecodeErrors::BadChunkOrder(name, "it may only appear once"));
        }
        if chunk.should_appear_before_plte() && seen(PngChunkType::PLTE) {
            return Err(PngDecodeErrors::BadChunkOrder(name, "it must appear before PLTE"));
        }
        if chunk.should_appear_after_plte()
            && self.png_info.color == PngColor::Palette
            && !seen(PngChunkType::PLTE)
        {
            return Err(PngDecodeErrors::BadChunkOrder(name, "it must appear after PLTE"));
        }
        if chunk == PngChunkType::PLTE
            && matches!(self.png_info.color, PngColor::Luma | PngColor::LumaA)
        {
            return Err(PngDecodeErrors::BadChunkOrder(
                name,
                "greyscale images cannot have a palette"
            ));
        }

        if chunk == PngChunkType::IDAT {
            if self.idat_ended {
                return Err(PngDecodeErrors::BadChunkOrder(
                    name,
                    "IDAT chunks must be consecutive"
                ));
            }
            self.seen_idat = true;
        } else if self.seen_idat {
            self.idat_ended = true;

            if chunk.should_appear_before_idat() {
                return Err(PngDecodeErrors::BadChunkOrder(name, "it must appear before IDAT"));
            }
        }
        if !self.seen_chunks.contains(&chunk) {
            self.seen_chunks.push(chunk);
        }
        Ok(())
    }

    /// Read every chunk up to and including IEND
    ///
    /// Image data is collected for [`decode`](Self::decode), everything
    /// else ends up in [`get_info`](Self::get_info)
    pub fn decode_headers(&mut self) -> Result<(), PngDecodeErrors> {
        if self.seen_headers {
            return Ok(());
        }
        // READ PNG signature
        let signature = self.stream.get_u64_be_err()?;

        if signature != PNG_SIGNATURE {
            return Err(PngDecodeErrors::BadSignature);
        }

        // check if first chunk is ihdr here
        if self.stream.peek_at(4, 4)? != b"IHDR" {
            return Err(PngDecodeErrors::GenericStatic(
                "First chunk not IHDR, Corrupt PNG"
            ));
        }
        loop {
            let header = self.read_chunk_header()?;

            trace!("Chunk {:?}, length {}", header.chunk_type, header.length);

            if header.chunk_type == PngChunkType::unkn {
                // unknown chunks still end a run of IDAT chunks
                if self.seen_idat {
                    self.idat_ended = true;
                }
                default_chunk_handler(header.length, header.chunk, &mut self.stream)?;
                continue;
            }
            self.check_chunk_order(header.chunk_type)?;

            let data = self.stream.get(header.length)?;
            // skip crc
            self.stream.skip(4);

            match header.chunk_type {
                PngChunkType::IHDR => self.parse_ihdr(data)?,
                PngChunkType::PLTE => self.parse_plte(data)?,
                PngChunkType::IDAT => self.idat_chunks.extend_from_slice(data),
                PngChunkType::tRNS => self.parse_trns(data)?,
                PngChunkType::gAMA => self.parse_gama(data)?,
                PngChunkType::cHRM => self.parse_chrm(data)?,
                PngChunkType::sRGB => self.parse_srgb(data)?,
                PngChunkType::iCCP => self.parse_iccp(data)?,
                PngChunkType::tEXt => self.parse_text(data)?,
                PngChunkType::zTXt => self.parse_ztxt(data)?,
                PngChunkType::iTXt => self.parse_itxt(data)?,
                PngChunkType::bKGD => self.parse_bkgd(data)?,
                PngChunkType::pHYs => self.parse_phys(data)?,
                PngChunkType::sBIT => self.parse_sbit(data)?,
                PngChunkType::sPLT => self.parse_splt(data)?,
                PngChunkType::hIST => self.parse_hist(data)?,
                PngChunkType::tIME => self.parse_time(data)?,
                PngChunkType::IEND => break,
                PngChunkType::unkn => unreachable!()
            }
        }
        if !self.seen_idat {
            return Err(PngDecodeErrors::GenericStatic("No IDAT chunks found"));
        }
        if self.png_info.color == PngColor::Palette && self.palette.is_empty() {
            return Err(PngDecodeErrors::EmptyPalette);
        }
        self.seen_headers = true;

        Ok(())
    }

    /// Decode PNG encoded images and return the vector of raw
    /// pixels
    ///
    /// The endianness is big endian for 16 bit images represented as two u8 slices
    pub fn decode_raw(&mut self) -> Result<Vec<u8>, PngDecodeErrors> {
        self.decode_headers()?;

        let info = self.png_info;

        if info.interlace_method == InterlaceMethod::Adam7 {
            return Err(PngDecodeErrors::UnsupportedInterlace);
        }
        // go parse IDAT chunks returning the inflate
        let deflate_data = self.inflate()?;
        // remove idat chunks from memory
        // we are already done with them.
        self.idat_chunks = Vec::new();

        let mut out = self.create_png_image_raw(&deflate_data, info.width, info.height)?;

        if info.depth < 8 {
            out = self.expand_bits_to_byte(&out, info.width, info.height);
        }
        if info.color == PngColor::Palette {
            // if tRNS chunk is present in paletted images, it contains
            // alpha byte values, so that means we create alpha data from
            // raw bytes
            let components = if self.seen_trns { 4 } else { 3 };
            out = self.expand_palette(&out, components);
        }
        Ok(out)
    }
    /// Decode PNG encoded images and return the vector of raw pixels but for 16-bit images
    /// represent them in a `Vec<u16>`
    pub fn decode(&mut self) -> Result<DecodingResult, PngDecodeErrors> {
        let out = self.decode_raw()?;

        if self.png_info.depth == 16 {
            let new_array: Vec<u16> = out
                .chunks_exact(2)
                .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
                .collect();

            return Ok(DecodingResult::U16(new_array));
        }
        Ok(DecodingResult::U8(out))
    }

    /// Undo png filtering on the inflated data
    fn create_png_image_raw(
        &self, deflate_data: &[u8], width: usize, height: usize
    ) -> Result<Vec<u8>, PngDecodeErrors> {
        let info = &self.png_info;
        let bytes = if info.depth == 16 { 2 } else { 1 };

        // number of bytes per every scan line
        let mut width_stride = usize::from(info.component) * width;
        width_stride *= usize::from(info.depth);
        width_stride += 7;
        width_stride /= 8;

        let image_len = width_stride * height;

        // account for filter bytes
        if deflate_data.len() < image_len + height {
            let msg = format!(
                "Not enough pixels, expected {} but found {}",
                image_len + height,
                deflate_data.len()
            );
            return Err(PngDecodeErrors::Generic(msg));
        }
        let mut out = vec![0; image_len];

        let mut components = usize::from(info.component) * bytes;

        if info.depth < 8 {
            // sub-byte pixels use the previous byte
            components = 1;
        }

        for (i, in_stride) in deflate_data
            .chunks_exact(width_stride + 1)
            .take(height)
            .enumerate()
        {
            // Split output into current and previous
            // current points to the start of the row where we are writing de-filtered output to
            // prev is all rows we already wrote output to.
            let (prev, current) = out.split_at_mut(i * width_stride);
            let current = &mut current[..width_stride];

            let prev_row: &[u8] = if i == 0 {
                &[]
            } else {
                &prev[(i - 1) * width_stride..]
            };

            // take filter
            let filter_byte = in_stride[0];
            // raw image bytes
            let raw = &in_stride[1..];

            let mut filter = FilterMethod::from_int(filter_byte)
                .ok_or_else(|| PngDecodeErrors::Generic(format!("Unknown filter {filter_byte}")))?;

            if i == 0 {
                // match our filters to special filters for first row
                // these special filters do not need the previous scanline and treat it
                // as zero
                filter = match filter {
                    FilterMethod::Paeth => FilterMethod::PaethFirst,
                    // up for the first row becomes a memcpy
                    FilterMethod::Up => FilterMethod::None,
                    FilterMethod::Average => FilterMethod::AvgFirst,
                    filter => filter
                };
            }

            match filter {
                FilterMethod::None => current.copy_from_slice(raw),

                FilterMethod::Average => handle_avg(prev_row, raw, current, components),

                FilterMethod::Sub => handle_sub(raw, current, components),

                FilterMethod::Up => handle_up(prev_row, raw, current),

                FilterMethod::Paeth => handle_paeth(prev_row, raw, current, components),

                FilterMethod::PaethFirst => handle_paeth_first(raw, current, components),

                FilterMethod::AvgFirst => handle_avg_first(raw, current, components)
            }
        }
        Ok(out)
    }

    /// Expand bits to bytes expand images with less than 8 bpp
    ///
    /// Greyscale values are scaled to the full byte range, palette
    /// indices are kept as is
    fn expand_bits_to_byte(&self, data: &[u8], width: usize, height: usize) -> Vec<u8> {
        const DEPTH_SCALE_TABLE: [u8; 9] = [0, 0xff, 0x55, 0, 0x11, 0, 0, 0, 0x01];

        let depth = usize::from(self.png_info.depth);
        let scale = if self.png_info.color == PngColor::Palette {
            1
        } else {
            DEPTH_SCALE_TABLE[depth]
        };
        let mask = (1_u8 << depth) - 1;
        let stride = (width * depth + 7) / 8;

        let mut new_out = Vec::with_capacity(width * height);

        for row in data.chunks_exact(stride).take(height) {
            for x in 0..width {
                let bit_offset = x * depth;
                let shift = 8 - depth - (bit_offset % 8);

                new_out.push(scale * ((row[bit_offset / 8] >> shift) & mask));
            }
        }
        new_out
    }

    /// Undo deflate decoding
    fn inflate(&mut self) -> Result<Vec<u8>, PngDecodeErrors> {
        // deflate doesn't store its uncompressed size, so hint
        // the expected size and let the decoder resize at will
        let stride = (self.png_info.width
            * usize::from(self.png_info.component)
            * usize::from(self.png_info.depth)
            + 7)
            / 8;
        let size_hint = (stride + 1) * self.png_info.height;

        let option = DeflateOptions::default()
            .set_size_hint(size_hint)
            .set_limit(self.options.inflate_get_limit())
            .set_confirm_checksum(self.options.inflate_get_confirm_adler());

        let mut decoder = DeflateDecoder::new_with_options(&self.idat_chunks, option);

        decoder.decode_zlib().map_err(PngDecodeErrors::ZlibDecodeErrors)
    }

    /// Expand a palettized image to the number of components
    fn expand_palette(&self, data: &[u8], components: usize) -> Vec<u8> {
        let info = self.png_info;
        let out_size = info.width * info.height * components;
        let mut out = vec![0; out_size];

        // palette always holds 256 entries, see parse_plte
        for (px, entry) in out.chunks_exact_mut(components).zip(data) {
            let entry = self.palette[usize::from(*entry)];

            px[0] = entry.red;
            px[1] = entry.green;
            px[2] = entry.blue;

            if components == 4 {
                px[3] = entry.alpha;
            }
        }
        out
    }
}

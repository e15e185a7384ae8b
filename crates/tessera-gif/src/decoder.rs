/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use log::{info, trace, warn};
use tessera_core::bytestream::ZByteReader;
use tessera_core::info::{ImageInfo, InfoValue};
use tessera_core::mode::{ColorMode, RGB, RGBA};
use tessera_core::options::DecoderOptions;
use tessera_core::result::DecodingResult;

use crate::enums::{block, label, DisposalMethod, GifVersion};
use crate::errors::GifDecoderErrors;

/// Turns the lzw code stream of a frame into colour table indices
///
/// The decoder only splits the stream into blocks, decompression
/// is left to an implementation of this trait
pub trait LzwDecoder {
    /// Decompress the concatenated data sub-blocks of one frame.
    ///
    /// `min_code_size` is the byte preceding the sub-blocks, the
    /// result holds one palette index per pixel of the frame.
    fn decompress(&self, code_stream: &[u8], min_code_size: u8)
        -> Result<Vec<u8>, GifDecoderErrors>;
}

/// Contents of a graphic control extension
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphicControl {
    pub disposal:          DisposalMethod,
    pub user_input:        bool,
    /// Delay before the next frame, in hundredths of a second
    pub delay:             u16,
    pub transparent_index: Option<u8>
}

/// A single image descriptor and the blocks attached to it
#[derive(Clone, Debug)]
pub struct GifFrame {
    pub left:          usize,
    pub top:           usize,
    pub width:         usize,
    pub height:        usize,
    pub interlaced:    bool,
    pub local_table:   Option<Vec<[u8; 3]>>,
    /// The graphic control extension preceding this frame
    pub control:       Option<GraphicControl>,
    pub min_code_size: u8,
    /// Data sub-blocks, concatenated
    pub data:          Vec<u8>
}

/// A gif decoder
///
/// Header and block parsing is self contained, resolving pixels
/// needs an [`LzwDecoder`] set via [`set_lzw_decoder`](Self::set_lzw_decoder),
/// without one [`decode`](Self::decode) fails with
/// [`GifDecoderErrors::LzwUnavailable`]
pub struct GifDecoder<'a> {
    stream:           ZByteReader<'a>,
    options:          DecoderOptions,
    version:          Option<GifVersion>,
    width:            usize,
    height:           usize,
    background_index: u8,
    aspect_ratio:     u8,
    color_resolution: u8,
    global_table:     Option<Vec<[u8; 3]>>,
    frames:           Vec<GifFrame>,
    comments:         Vec<String>,
    plain_text:       Vec<String>,
    loop_count:       Option<u16>,
    pending_control:  Option<GraphicControl>,
    read_headers:     bool,
    lzw:              Option<&'a dyn LzwDecoder>
}

impl<'a> GifDecoder<'a> {
    /// Create a new decoder reading from `data` with default options
    pub fn new(data: &'a [u8]) -> GifDecoder<'a> {
        GifDecoder::new_with_options(data, DecoderOptions::default())
    }

    /// Create a new decoder with the specified options
    pub fn new_with_options(data: &'a [u8], options: DecoderOptions) -> GifDecoder<'a> {
        GifDecoder {
            stream: ZByteReader::new(data),
            options,
            version: None,
            width: 0,
            height: 0,
            background_index: 0,
            aspect_ratio: 0,
            color_resolution: 0,
            global_table: None,
            frames: vec![],
            comments: vec![],
            plain_text: vec![],
            loop_count: None,
            pending_control: None,
            read_headers: false,
            lzw: None
        }
    }

    /// Set the lzw implementation used to decompress frame data
    pub fn set_lzw_decoder(&mut self, lzw: &'a dyn LzwDecoder) {
        self.lzw = Some(lzw);
    }

    /// Parse the header, the logical screen descriptor and every block
    /// up to the trailer
    pub fn decode_headers(&mut self) -> Result<(), GifDecoderErrors> {
        if self.read_headers {
            return Ok(());
        }
        self.version = Some(read_version(&mut self.stream)?);

        self.width = usize::from(self.stream.get_u16_le_err()?);
        self.height = usize::from(self.stream.get_u16_le_err()?);

        let flags = self.stream.get_u8_err()?;
        self.background_index = self.stream.get_u8_err()?;
        self.aspect_ratio = self.stream.get_u8_err()?;
        self.color_resolution = ((flags >> 4) & 7) + 1;

        if self.width > self.options.get_max_width() {
            return Err(GifDecoderErrors::TooLargeDimensions(
                "width",
                self.options.get_max_width(),
                self.width
            ));
        }
        if self.height > self.options.get_max_height() {
            return Err(GifDecoderErrors::TooLargeDimensions(
                "height",
                self.options.get_max_height(),
                self.height
            ));
        }
        if self.width == 0 || self.height == 0 {
            return Err(GifDecoderErrors::Static("Zero sized logical screen"));
        }
        // check if we have a global palette
        if (flags & 0x80) > 0 {
            self.global_table = Some(self.parse_colortable(flags & 7)?);
        }
        info!("Image width  :{}", self.width);
        info!("Image height :{}", self.height);
        trace!("Background index: {}", self.background_index);
        trace!("Ratio: {}", self.aspect_ratio);

        self.parse_blocks()?;

        if self.frames.is_empty() {
            return Err(GifDecoderErrors::NoFrames);
        }
        info!("Frames: {}", self.frames.len());
        self.read_headers = true;

        Ok(())
    }

    fn parse_colortable(&mut self, size: u8) -> Result<Vec<[u8; 3]>, GifDecoderErrors> {
        let num_entries = 2_usize << size;

        let bytes = self
            .stream
            .get(num_entries * 3)
            .map_err(|_| GifDecoderErrors::Static("Not enough bytes for palette"))?;

        Ok(bytes.chunks_exact(3).map(|x| [x[0], x[1], x[2]]).collect())
    }

    fn parse_blocks(&mut self) -> Result<(), GifDecoderErrors> {
        loop {
            let introducer = self
                .stream
                .get_u8_err()
                .map_err(|_| GifDecoderErrors::Static("No trailer before the end of the stream"))?;

            match introducer {
                block::EXTENSION => self.parse_extension()?,
                block::IMAGE_DESCRIPTOR => self.parse_image_descriptor()?,
                block::TRAILER => {
                    trace!("Trailer at offset {}", self.stream.get_position() - 1);
                    return Ok(());
                }
                byte => return Err(GifDecoderErrors::UnknownBlock(byte))
            }
        }
    }

    /// Read data sub-blocks until the zero length terminator
    fn read_sub_blocks(&mut self) -> Result<Vec<u8>, GifDecoderErrors> {
        let mut out = vec![];
        loop {
            let length = usize::from(self.stream.get_u8_err()?);
            if length == 0 {
                return Ok(out);
            }
            out.extend_from_slice(self.stream.get(length)?);
        }
    }

    fn parse_extension(&mut self) -> Result<(), GifDecoderErrors> {
        let ext_label = self.stream.get_u8_err()?;

        match ext_label {
            label::GRAPHIC_CONTROL => {
                let data = self.read_sub_blocks()?;
                if data.len() < 4 {
                    return Err(GifDecoderErrors::TooSmallSize(4, data.len()));
                }
                let flags = data[0];

                let control = GraphicControl {
                    disposal:          DisposalMethod::from_flags((flags >> 2) & 7),
                    user_input:        (flags & 2) != 0,
                    delay:             u16::from_le_bytes([data[1], data[2]]),
                    transparent_index: ((flags & 1) != 0).then_some(data[3])
                };
                if self.pending_control.is_some() {
                    warn!("Two graphic control extensions for one frame, keeping the last");
                }
                self.pending_control = Some(control);
            }
            label::COMMENT => {
                let data = self.read_sub_blocks()?;
                self.comments.push(String::from_utf8_lossy(&data).into_owned());
            }
            label::PLAIN_TEXT => {
                // 12 byte grid description, then the text
                let header_size = usize::from(self.stream.get_u8_err()?);
                self.stream.get(header_size)?;
                let text = self.read_sub_blocks()?;

                self.plain_text.push(String::from_utf8_lossy(&text).into_owned());
                // a graphic control extension may describe plain text instead of an image
                self.pending_control = None;
            }
            label::APPLICATION => {
                let identifier_size = usize::from(self.stream.get_u8_err()?);
                let identifier = self.stream.get(identifier_size)?;
                let data = self.read_sub_blocks()?;

                if (identifier == b"NETSCAPE2.0" || identifier == b"ANIMEXTS1.0")
                    && data.len() >= 3
                    && data[0] == 1
                {
                    self.loop_count = Some(u16::from_le_bytes([data[1], data[2]]));
                } else {
                    trace!(
                        "Skipping application extension {}",
                        String::from_utf8_lossy(identifier)
                    );
                }
            }
            _ => {
                trace!("Skipping unknown extension {ext_label:#04X}");
                self.read_sub_blocks()?;
            }
        }
        Ok(())
    }

    fn parse_image_descriptor(&mut self) -> Result<(), GifDecoderErrors> {
        let left = usize::from(self.stream.get_u16_le_err()?);
        let top = usize::from(self.stream.get_u16_le_err()?);
        let width = usize::from(self.stream.get_u16_le_err()?);
        let height = usize::from(self.stream.get_u16_le_err()?);
        let flags = self.stream.get_u8_err()?;

        if width == 0 || height == 0 {
            return Err(GifDecoderErrors::Static("Zero sized frame"));
        }
        if left + width > self.width || top + height > self.height {
            if self.options.get_strict_mode() {
                return Err(GifDecoderErrors::Static(
                    "Frame extends past the logical screen"
                ));
            }
            warn!("Frame extends past the logical screen, it will be clipped");
        }
        let local_table = if (flags & 0x80) != 0 {
            Some(self.parse_colortable(flags & 7)?)
        } else {
            None
        };
        let min_code_size = self.stream.get_u8_err()?;

        if !(1..=11).contains(&min_code_size) {
            return Err(GifDecoderErrors::Static("Invalid lzw minimum code size"));
        }
        let data = self.read_sub_blocks()?;

        trace!(
            "Frame {}: {width}x{height} at ({left},{top}), {} bytes of lzw data",
            self.frames.len(),
            data.len()
        );

        self.frames.push(GifFrame {
            left,
            top,
            width,
            height,
            interlaced: (flags & 0x40) != 0,
            local_table,
            control: self.pending_control.take(),
            min_code_size,
            data
        });
        Ok(())
    }

    /// Return the logical screen width and height, or `None` if headers
    /// haven't been decoded
    pub const fn get_dimensions(&self) -> Option<(usize, usize)> {
        if !self.read_headers {
            return None;
        }
        Some((self.width, self.height))
    }

    /// The gif version, `None` before headers are decoded
    pub const fn get_version(&self) -> Option<GifVersion> {
        self.version
    }

    /// The colour mode [`decode`](Self::decode) produces
    ///
    /// RGBA when the first frame declares a transparent index, RGB otherwise
    pub fn get_mode(&self) -> Option<&'static ColorMode> {
        if !self.read_headers {
            return None;
        }
        let transparent = self
            .frames
            .first()
            .and_then(|x| x.control)
            .and_then(|x| x.transparent_index)
            .is_some();

        Some(if transparent { &RGBA } else { &RGB })
    }

    /// Image descriptors in stream order
    pub fn frames(&self) -> &[GifFrame] {
        &self.frames
    }

    /// Text of every comment extension
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// Text of every plain text extension
    pub fn plain_text(&self) -> &[String] {
        &self.plain_text
    }

    /// Number of times an animation repeats, 0 is forever
    pub const fn loop_count(&self) -> Option<u16> {
        self.loop_count
    }

    /// The global colour table, if present
    pub fn global_table(&self) -> Option<&[[u8; 3]]> {
        self.global_table.as_deref()
    }

    /// Metadata gathered from the stream, `None` before headers are decoded
    ///
    /// | Key                | Value |
    /// |--------------------|-------|
    /// | `version`          | `87a` or `89a` |
    /// | `background_index` | index into the global table |
    /// | `aspect_ratio`     | raw pixel aspect byte |
    /// | `color_resolution` | bits per primary |
    /// | `palette`          | global table, RGB triples |
    /// | `comments`         | list of comment texts |
    /// | `loop_count`       | application loop count |
    /// | `frames`           | number of image descriptors |
    /// | `delay`            | first frame delay in hundredths of a second |
    pub fn get_info(&self) -> Option<ImageInfo> {
        if !self.read_headers {
            return None;
        }
        let mut info = ImageInfo::new();

        if let Some(version) = self.version {
            info.insert("version", version.name());
        }
        info.insert("background_index", u64::from(self.background_index));
        info.insert("aspect_ratio", u64::from(self.aspect_ratio));
        info.insert("color_resolution", u64::from(self.color_resolution));

        if let Some(table) = &self.global_table {
            info.insert("palette", table.concat());
        }
        if !self.comments.is_empty() {
            let comments: Vec<InfoValue> =
                self.comments.iter().map(|x| InfoValue::from(x.as_str())).collect();
            info.insert("comments", comments);
        }
        if let Some(count) = self.loop_count {
            info.insert("loop_count", u64::from(count));
        }
        info.insert("frames", self.frames.len() as u64);

        if let Some(control) = self.frames.first().and_then(|x| x.control) {
            info.insert("delay", u64::from(control.delay));
        }
        Some(info)
    }

    /// Decode the first frame onto the logical screen
    ///
    /// Pixels outside the frame are the background colour for RGB output,
    /// or fully transparent for RGBA output
    pub fn decode(&mut self) -> Result<DecodingResult, GifDecoderErrors> {
        self.decode_headers()?;

        let lzw = self.lzw.ok_or(GifDecoderErrors::LzwUnavailable)?;
        let frame = self.frames.first().ok_or(GifDecoderErrors::NoFrames)?;

        let table = frame
            .local_table
            .as_deref()
            .or(self.global_table.as_deref())
            .ok_or(GifDecoderErrors::Static("Frame has no colour table"))?;

        let transparent = frame.control.and_then(|x| x.transparent_index);
        let components = if transparent.is_some() { 4 } else { 3 };

        let indices = lzw.decompress(&frame.data, frame.min_code_size)?;
        let frame_size = frame.width * frame.height;

        if indices.len() < frame_size {
            return Err(GifDecoderErrors::TooSmallSize(frame_size, indices.len()));
        }
        if indices.len() > frame_size {
            trace!("Ignoring {} trailing indices", indices.len() - frame_size);
        }

        let mut pixels = vec![0; self.width * self.height * components];

        if transparent.is_none() {
            let background = self
                .global_table
                .as_ref()
                .and_then(|x| x.get(usize::from(self.background_index)))
                .copied()
                .unwrap_or_default();

            for pix in pixels.chunks_exact_mut(3) {
                pix.copy_from_slice(&background);
            }
        }

        let out_stride = self.width * components;

        for (row_index, row) in indices[..frame_size].chunks_exact(frame.width).enumerate() {
            let y = if frame.interlaced {
                deinterlaced_row(row_index, frame.height)
            } else {
                row_index
            } + frame.top;

            if y >= self.height {
                continue;
            }
            let out_row = &mut pixels[y * out_stride..(y + 1) * out_stride];

            for (x, index) in row.iter().enumerate() {
                let x = x + frame.left;

                if x >= self.width || Some(*index) == transparent {
                    continue;
                }
                let color = match table.get(usize::from(*index)) {
                    Some(color) => *color,
                    None if self.options.get_strict_mode() => {
                        return Err(GifDecoderErrors::Static(
                            "Colour index larger than the colour table"
                        ));
                    }
                    None => [0, 0, 0]
                };
                let out = &mut out_row[x * components..(x + 1) * components];

                out[..3].copy_from_slice(&color);
                if components == 4 {
                    out[3] = 255;
                }
            }
        }
        Ok(DecodingResult::U8(pixels))
    }
}

fn read_version(stream: &mut ZByteReader) -> Result<GifVersion, GifDecoderErrors> {
    let magic = stream.get(6).map_err(|_| GifDecoderErrors::NotAGif)?;

    match magic {
        b"GIF87a" => Ok(GifVersion::Gif87a),
        b"GIF89a" => Ok(GifVersion::Gif89a),
        _ => Err(GifDecoderErrors::NotAGif)
    }
}

/// Map the n-th stored row of an interlaced frame to its display row
///
/// Rows are stored in four passes, every 8th row from 0, every 8th
/// from 4, every 4th from 2 and finally every 2nd from 1
pub(crate) fn deinterlaced_row(stored_row: usize, height: usize) -> usize {
    let pass1 = height.div_ceil(8);
    let pass2 = (height + 3) / 8;
    let pass3 = (height + 1) / 4;

    if stored_row < pass1 {
        stored_row * 8
    } else if stored_row < pass1 + pass2 {
        (stored_row - pass1) * 8 + 4
    } else if stored_row < pass1 + pass2 + pass3 {
        (stored_row - pass1 - pass2) * 4 + 2
    } else {
        (stored_row - pass1 - pass2 - pass3) * 2 + 1
    }
}

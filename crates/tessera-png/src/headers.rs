/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Chunk parsers
//!
//! Each parser receives the chunk payload with the length, type
//! and crc already stripped.
use std::collections::BTreeMap;

use log::{info, trace, warn};
use tessera_core::bytestream::ZByteReader;
use tessera_core::info::InfoValue;
use zune_inflate::{DeflateDecoder, DeflateOptions};

use crate::decoder::PLTEEntry;
use crate::enums::{InterlaceMethod, PngColor};
use crate::error::PngDecodeErrors;
use crate::PngDecoder;

pub(crate) mod writers;

/// Skip a chunk the decoder does not understand
///
/// Ancillary chunks (lowercase first letter) are skipped, unknown
/// critical chunks are an error.
pub(crate) fn default_chunk_handler(
    length: usize, chunk_type: [u8; 4], reader: &mut ZByteReader
) -> Result<(), PngDecodeErrors> {
    let chunk_name = std::str::from_utf8(&chunk_type).unwrap_or("XXXX");

    if chunk_type[0] & (1 << 5) == 0 {
        return Err(PngDecodeErrors::UnknownCriticalChunk(chunk_name.to_string()));
    }

    trace!("Encountered unknown chunk {:?}", chunk_name);
    trace!("Length of chunk {}", length);
    trace!("Skipping {} bytes", length + 4);

    reader.skip(length + 4);

    Ok(())
}

/// Split a null terminated keyword from the rest of the chunk
fn split_keyword<'b>(
    data: &'b [u8], chunk: &'static str
) -> Result<(&'b [u8], &'b [u8]), PngDecodeErrors> {
    let position = data
        .iter()
        .position(|x| *x == 0)
        .ok_or_else(|| PngDecodeErrors::Generic(format!("{chunk} keyword not terminated")))?;

    if position == 0 || position > 79 {
        return Err(PngDecodeErrors::Generic(format!(
            "{chunk} keyword length {position} outside 1..=79"
        )));
    }
    Ok((&data[..position], &data[position + 1..]))
}

fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|x| char::from(*x)).collect()
}

impl<'a> PngDecoder<'a> {
    pub(crate) fn parse_ihdr(&mut self, data: &[u8]) -> Result<(), PngDecodeErrors> {
        if data.len() != 13 {
            return Err(PngDecodeErrors::GenericStatic("BAD IHDR length"));
        }
        let mut stream = ZByteReader::new(data);

        self.png_info.width = stream.get_u32_be() as usize;
        self.png_info.height = stream.get_u32_be() as usize;

        if self.png_info.width == 0 || self.png_info.height == 0 {
            return Err(PngDecodeErrors::GenericStatic("Width or height cannot be zero"));
        }

        if self.png_info.width > self.options.get_max_width() {
            return Err(PngDecodeErrors::Generic(format!(
                "Image width {}, larger than maximum configured width {}, aborting",
                self.png_info.width,
                self.options.get_max_width()
            )));
        }

        if self.png_info.height > self.options.get_max_height() {
            return Err(PngDecodeErrors::Generic(format!(
                "Image height {}, larger than maximum configured height {}, aborting",
                self.png_info.height,
                self.options.get_max_height()
            )));
        }

        self.png_info.depth = stream.get_u8();
        let color = stream.get_u8();

        self.png_info.color = PngColor::from_int(color)
            .ok_or_else(|| PngDecodeErrors::Generic(format!("Unknown color value {color}")))?;
        self.png_info.component = self.png_info.color.num_components();

        // verify colors plus bit depths
        match self.png_info.depth {
            1 | 2 | 4 => {
                if !matches!(self.png_info.color, PngColor::Luma | PngColor::Palette) {
                    let err_msg = format!(
                        "Bit depth of {} only allows Greyscale or Indexed color types, but found {:?}",
                        self.png_info.depth, self.png_info.color
                    );
                    return Err(PngDecodeErrors::Generic(err_msg));
                }
            }
            8 => { /*silent pass through since all color types support it */ }
            16 => {
                if self.png_info.color == PngColor::Palette {
                    return Err(PngDecodeErrors::GenericStatic(
                        "Indexed colour cannot have 16 bit depth"
                    ));
                }
            }
            _ => {
                return Err(PngDecodeErrors::Generic(format!(
                    "Unknown bit depth {}",
                    self.png_info.depth
                )))
            }
        }

        if stream.get_u8() != 0 {
            return Err(PngDecodeErrors::GenericStatic("Unknown compression method"));
        }

        let filter_method = stream.get_u8();

        if filter_method != 0 {
            return Err(PngDecodeErrors::Generic(format!(
                "Unknown filter method {filter_method}"
            )));
        }

        let interlace_method = stream.get_u8();

        self.png_info.interlace_method =
            InterlaceMethod::from_int(interlace_method).ok_or_else(|| {
                PngDecodeErrors::Generic(format!("Unknown interlace method {interlace_method}"))
            })?;

        info!("Width: {}", self.png_info.width);
        info!("Height: {}", self.png_info.height);
        info!("Color type: {:?}", self.png_info.color);
        info!("Depth: {:?}", self.png_info.depth);
        info!("Interlace :{:?}", self.png_info.interlace_method);

        self.seen_hdr = true;

        Ok(())
    }

    pub(crate) fn parse_plte(&mut self, data: &[u8]) -> Result<(), PngDecodeErrors> {
        if data.len() % 3 != 0 || data.is_empty() {
            return Err(PngDecodeErrors::GenericStatic("Invalid PLTE length, corrupt PNG"));
        }
        let entries = data.len() / 3;

        if entries > 256 {
            return Err(PngDecodeErrors::Generic(format!(
                "PLTE with {entries} entries, at most 256 are allowed"
            )));
        }
        if self.png_info.color == PngColor::Palette && entries > 1 << self.png_info.depth {
            let msg = format!(
                "PLTE with {entries} entries, bit depth {} allows {}",
                self.png_info.depth,
                1 << self.png_info.depth
            );
            if self.options.get_strict_mode() {
                return Err(PngDecodeErrors::Generic(msg));
            }
            warn!("{msg}");
        }

        // allocate all entries so any index can be looked up
        self.palette = vec![PLTEEntry::default(); 256];
        self.palette_entries = entries;

        for (entry, pal_chunk) in self.palette.iter_mut().zip(data.chunks_exact(3)) {
            entry.red = pal_chunk[0];
            entry.green = pal_chunk[1];
            entry.blue = pal_chunk[2];
        }
        self.info.insert("palette", data.to_vec());

        Ok(())
    }

    pub(crate) fn parse_trns(&mut self, data: &[u8]) -> Result<(), PngDecodeErrors> {
        let mut stream = ZByteReader::new(data);

        match self.png_info.color {
            PngColor::Luma => {
                if data.len() != 2 {
                    return Err(PngDecodeErrors::GenericStatic("Bad tRNS length for greyscale"));
                }
                let grey_sample = stream.get_u16_be();
                self.info.insert("transparency", u64::from(grey_sample));
            }
            PngColor::RGB => {
                if data.len() != 6 {
                    return Err(PngDecodeErrors::GenericStatic("Bad tRNS length for RGB"));
                }
                let samples: Vec<InfoValue> = (0..3)
                    .map(|_| InfoValue::UInt(u64::from(stream.get_u16_be())))
                    .collect();
                self.info.insert("transparency", samples);
            }
            PngColor::Palette => {
                if self.palette.is_empty() {
                    return Err(PngDecodeErrors::GenericStatic("tRNS chunk before PLTE"));
                }
                if data.len() > self.palette_entries {
                    return Err(PngDecodeErrors::GenericStatic(
                        "tRNS chunk with too long entries"
                    ));
                }
                // entries without an alpha value stay opaque
                for (entry, alpha) in self.palette.iter_mut().zip(data) {
                    entry.alpha = *alpha;
                }
                self.info.insert("transparency", data.to_vec());
                self.seen_trns = true;
            }
            _ => {
                let msg = format!(
                    "A tRNS chunk shall not appear for colour type {:?} as it is already transparent",
                    self.png_info.color
                );
                return Err(PngDecodeErrors::Generic(msg));
            }
        }
        Ok(())
    }

    pub(crate) fn parse_gama(&mut self, data: &[u8]) -> Result<(), PngDecodeErrors> {
        if data.len() != 4 {
            let error = format!("Gama chunk length is not 4 but {}", data.len());

            if self.options.get_strict_mode() {
                return Err(PngDecodeErrors::Generic(error));
            }
            warn!("{error}, ignoring");
            return Ok(());
        }
        let gamma = ZByteReader::new(data).get_u32_be();

        self.info.insert("gamma", f64::from(gamma) / 100_000.0);

        Ok(())
    }

    pub(crate) fn parse_chrm(&mut self, data: &[u8]) -> Result<(), PngDecodeErrors> {
        const KEYS: [&str; 8] = [
            "white_x", "white_y", "red_x", "red_y", "green_x", "green_y", "blue_x", "blue_y"
        ];
        if data.len() != 32 {
            return Err(PngDecodeErrors::GenericStatic("Bad cHRM length"));
        }
        let mut stream = ZByteReader::new(data);
        let mut chromaticity = BTreeMap::new();

        for key in KEYS {
            let value = f64::from(stream.get_u32_be()) / 100_000.0;
            chromaticity.insert(key.to_string(), InfoValue::Float(value));
        }
        self.info.insert("chromaticity", chromaticity);

        Ok(())
    }

    pub(crate) fn parse_srgb(&mut self, data: &[u8]) -> Result<(), PngDecodeErrors> {
        match data {
            [intent @ 0..=3] => {
                self.info.insert("srgb_intent", u64::from(*intent));
                Ok(())
            }
            [intent] => Err(PngDecodeErrors::Generic(format!(
                "Unknown sRGB rendering intent {intent}"
            ))),
            _ => Err(PngDecodeErrors::GenericStatic("Bad sRGB length"))
        }
    }

    pub(crate) fn parse_iccp(&mut self, data: &[u8]) -> Result<(), PngDecodeErrors> {
        let (name, rest) = split_keyword(data, "iCCP")?;

        match rest.split_first() {
            Some((0, compressed)) => {
                let profile = self.inflate_chunk(compressed)?;
                let mut icc = BTreeMap::new();

                icc.insert("name".to_string(), InfoValue::Text(latin1_to_string(name)));
                icc.insert("profile".to_string(), InfoValue::Bytes(profile));

                self.info.insert("icc_profile", icc);
                Ok(())
            }
            _ => Err(PngDecodeErrors::GenericStatic("Unknown iCCP compression method"))
        }
    }

    pub(crate) fn parse_text(&mut self, data: &[u8]) -> Result<(), PngDecodeErrors> {
        let (keyword, text) = split_keyword(data, "tEXt")?;

        self.add_text(latin1_to_string(keyword), latin1_to_string(text));
        Ok(())
    }

    pub(crate) fn parse_ztxt(&mut self, data: &[u8]) -> Result<(), PngDecodeErrors> {
        let (keyword, rest) = split_keyword(data, "zTXt")?;

        match rest.split_first() {
            Some((0, compressed)) => {
                let text = self.inflate_chunk(compressed)?;
                self.add_text(latin1_to_string(keyword), latin1_to_string(&text));
                Ok(())
            }
            _ => Err(PngDecodeErrors::GenericStatic("Unknown zTXt compression method"))
        }
    }

    pub(crate) fn parse_itxt(&mut self, data: &[u8]) -> Result<(), PngDecodeErrors> {
        let (keyword, rest) = split_keyword(data, "iTXt")?;

        let [compressed, method, rest @ ..] = rest else {
            return Err(PngDecodeErrors::GenericStatic("Truncated iTXt chunk"));
        };
        // language tag and translated keyword, both null terminated
        let mut parts = rest.splitn(3, |x| *x == 0);
        let (Some(_language), Some(_translated), Some(text)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(PngDecodeErrors::GenericStatic("Truncated iTXt chunk"));
        };

        let text = match (compressed, method) {
            (0, _) => text.to_vec(),
            (1, 0) => self.inflate_chunk(text)?,
            _ => return Err(PngDecodeErrors::GenericStatic("Unknown iTXt compression method"))
        };
        let text = String::from_utf8(text)
            .map_err(|_| PngDecodeErrors::GenericStatic("iTXt text is not valid UTF-8"))?;

        self.add_text(latin1_to_string(keyword), text);
        Ok(())
    }

    pub(crate) fn parse_bkgd(&mut self, data: &[u8]) -> Result<(), PngDecodeErrors> {
        let mut stream = ZByteReader::new(data);

        match (self.png_info.color, data.len()) {
            (PngColor::Palette, 1) => {
                let index = data[0];

                if usize::from(index) >= self.palette_entries {
                    return Err(PngDecodeErrors::GenericStatic(
                        "bKGD palette index outside of palette"
                    ));
                }
                self.info.insert("background", u64::from(index));
            }
            (PngColor::Luma | PngColor::LumaA, 2) => {
                self.info.insert("background", u64::from(stream.get_u16_be()));
            }
            (PngColor::RGB | PngColor::RGBA, 6) => {
                let samples: Vec<InfoValue> = (0..3)
                    .map(|_| InfoValue::UInt(u64::from(stream.get_u16_be())))
                    .collect();
                self.info.insert("background", samples);
            }
            _ => return Err(PngDecodeErrors::GenericStatic("Bad bKGD length"))
        }
        Ok(())
    }

    pub(crate) fn parse_phys(&mut self, data: &[u8]) -> Result<(), PngDecodeErrors> {
        if data.len() != 9 {
            return Err(PngDecodeErrors::GenericStatic("Bad pHYs length"));
        }
        let mut stream = ZByteReader::new(data);
        let mut physical = BTreeMap::new();

        physical.insert("x".to_string(), InfoValue::UInt(u64::from(stream.get_u32_be())));
        physical.insert("y".to_string(), InfoValue::UInt(u64::from(stream.get_u32_be())));
        // 1 is metres, 0 an aspect ratio only
        physical.insert("unit".to_string(), InfoValue::UInt(u64::from(stream.get_u8())));

        self.info.insert("physical", physical);
        Ok(())
    }

    pub(crate) fn parse_sbit(&mut self, data: &[u8]) -> Result<(), PngDecodeErrors> {
        let expected = match self.png_info.color {
            PngColor::Palette => 3,
            color => usize::from(color.num_components())
        };
        if data.len() != expected {
            return Err(PngDecodeErrors::Generic(format!(
                "sBIT length {} but colour type needs {expected}",
                data.len()
            )));
        }
        self.info.insert("significant_bits", data.to_vec());
        Ok(())
    }

    pub(crate) fn parse_splt(&mut self, data: &[u8]) -> Result<(), PngDecodeErrors> {
        let (name, rest) = split_keyword(data, "sPLT")?;

        let Some((depth, entries)) = rest.split_first() else {
            return Err(PngDecodeErrors::GenericStatic("Truncated sPLT chunk"));
        };
        let entry_size = match depth {
            8 => 6,
            16 => 10,
            _ => {
                return Err(PngDecodeErrors::Generic(format!(
                    "Unknown sPLT sample depth {depth}"
                )))
            }
        };
        if entries.len() % entry_size != 0 {
            return Err(PngDecodeErrors::GenericStatic("Bad sPLT length"));
        }
        let mut palette = BTreeMap::new();

        palette.insert("name".to_string(), InfoValue::Text(latin1_to_string(name)));
        palette.insert("depth".to_string(), InfoValue::UInt(u64::from(*depth)));
        palette.insert("entries".to_string(), InfoValue::Bytes(entries.to_vec()));

        match self.info.get_mut("suggested_palettes") {
            Some(InfoValue::List(list)) => list.push(InfoValue::Map(palette)),
            _ => {
                self.info
                    .insert("suggested_palettes", vec![InfoValue::Map(palette)]);
            }
        }
        Ok(())
    }

    pub(crate) fn parse_hist(&mut self, data: &[u8]) -> Result<(), PngDecodeErrors> {
        if self.palette.is_empty() {
            return Err(PngDecodeErrors::GenericStatic("hIST chunk without a PLTE chunk"));
        }
        if data.len() != self.palette_entries * 2 {
            return Err(PngDecodeErrors::GenericStatic(
                "hIST entries do not match palette entries"
            ));
        }
        let histogram: Vec<InfoValue> = data
            .chunks_exact(2)
            .map(|x| InfoValue::UInt(u64::from(u16::from_be_bytes([x[0], x[1]]))))
            .collect();

        self.info.insert("histogram", histogram);
        Ok(())
    }

    pub(crate) fn parse_time(&mut self, data: &[u8]) -> Result<(), PngDecodeErrors> {
        let [y0, y1, month, day, hour, minute, second] = data else {
            return Err(PngDecodeErrors::GenericStatic("Bad tIME length"));
        };
        let year = u16::from_be_bytes([*y0, *y1]);

        if !(1..=12).contains(month)
            || !(1..=31).contains(day)
            || *hour > 23
            || *minute > 59
            || *second > 60
        {
            if self.options.get_strict_mode() {
                return Err(PngDecodeErrors::GenericStatic("tIME values out of range"));
            }
            warn!("tIME values out of range, ignoring chunk");
            return Ok(());
        }
        self.info.insert(
            "time",
            format!("{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}")
        );
        Ok(())
    }

    fn add_text(&mut self, keyword: String, text: String) {
        trace!("Text chunk {keyword}: {text}");

        match self.info.get_mut("text") {
            Some(InfoValue::Map(map)) => {
                map.insert(keyword, InfoValue::Text(text));
            }
            _ => {
                let mut map = BTreeMap::new();
                map.insert(keyword, InfoValue::Text(text));
                self.info.insert("text", map);
            }
        }
    }

    /// Inflate zlib data carried by an ancillary chunk
    fn inflate_chunk(&self, data: &[u8]) -> Result<Vec<u8>, PngDecodeErrors> {
        let options = DeflateOptions::default()
            .set_limit(self.options.inflate_get_limit())
            .set_confirm_checksum(self.options.inflate_get_confirm_adler());

        let mut decoder = DeflateDecoder::new_with_options(data, options);

        Ok(decoder.decode_zlib()?)
    }
}

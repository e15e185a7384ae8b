/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::io::{self, Write};

use tessera_core::bytestream::ZByteWriter;

use crate::crc::{calc_crc, calc_crc_with_bytes};
use crate::enums::PngColor;

pub(crate) fn write_ihdr(
    output: &mut ZByteWriter<&mut Vec<u8>>, width: u32, height: u32, depth: u8, color: PngColor
) -> io::Result<()> {
    // write width and height
    output.write_u32_be(width)?;
    output.write_u32_be(height)?;
    output.write_u8(depth)?;
    output.write_u8(color.to_int())?;
    //compression method
    output.write_u8(0)?;
    // filter method, the only one defined
    output.write_u8(0)?;
    // interlace method, always Standard
    output.write_u8(0)
}

pub(crate) fn write_gamma(writer: &mut ZByteWriter<&mut Vec<u8>>, gamma: f64) -> io::Result<()> {
    // scale by 100000.0
    let gamma_value = (gamma * 100_000.0).round() as u32;
    writer.write_u32_be(gamma_value)
}

/// Write a text chunk body
///
/// Latin-1 text goes into `tEXt`, anything else needs `iTXt`,
/// see [`text_chunk_name`]
pub(crate) fn write_text(
    writer: &mut ZByteWriter<&mut Vec<u8>>, keyword: &str, text: &str
) -> io::Result<()> {
    let latin1: Option<Vec<u8>> = text.chars().map(|c| u8::try_from(c).ok()).collect();

    writer.write_all(keyword.as_bytes())?;
    writer.write_u8(0)?;

    match latin1 {
        Some(bytes) => writer.write_all(&bytes),
        None => {
            // uncompressed, no language tag, no translated keyword
            writer.write_all(&[0, 0, 0, 0])?;
            writer.write_all(text.as_bytes())
        }
    }
}

/// The chunk `write_text` produces for `text`
pub(crate) fn text_chunk_name(text: &str) -> &'static [u8; 4] {
    if text.chars().all(|c| u8::try_from(c).is_ok()) {
        b"tEXt"
    } else {
        b"iTXt"
    }
}

/// Write header writes the boilerplate for each png chunk
///
/// It writes the length, chunk type, calls a function to write the
/// data and then calculates the CRC chunk for that png and writes it.
///
/// This should be called with the appropriate inner function to write data
pub(crate) fn write_header_fn<T: Write, F>(
    writer: &mut ZByteWriter<T>, name: &[u8; 4], func: F
) -> io::Result<()>
where
    F: FnOnce(&mut ZByteWriter<&mut Vec<u8>>) -> io::Result<()>
{
    // the length comes first but is only known after the data
    // is written, so build the chunk in memory

    // format
    // length - chunk type - [data] -  crc chunk
    let mut temp_space = Vec::with_capacity(32);
    // space for length
    temp_space.extend_from_slice(&[0; 4]);
    {
        let mut local_writer = ZByteWriter::new(&mut temp_space);
        // write the type
        local_writer.write_all(name)?;
        // call underlying function
        (func)(&mut local_writer)?;
    }
    // write length less the length field and chunk name
    let data_length = (temp_space.len() - 8) as u32;
    temp_space[0..4].copy_from_slice(&data_length.to_be_bytes());
    // write crc, ignore the length
    let c = calc_crc(&temp_space[4..]);
    temp_space.extend_from_slice(&c.to_be_bytes());

    writer.write_all(&temp_space)
}

/// Write a chunk whose data is already in memory
pub(crate) fn write_chunk<T: Write>(
    name: &[u8; 4], data: &[u8], writer: &mut ZByteWriter<T>
) -> io::Result<()> {
    // write length
    writer.write_u32_be(data.len() as u32)?;
    // write chunk name
    writer.write_all(name)?;
    // write chunk data
    writer.write_all(data)?;
    // crc is a continuous function, so first crc the chunk name
    // and then crc that with the chunk bytes passing in the previous crc

    // equal to crc((chunk.chunk + data) ,u32::MAX))
    let crc = calc_crc_with_bytes(name, u32::MAX);
    let crc = !calc_crc_with_bytes(data, crc);
    writer.write_u32_be(crc)
}

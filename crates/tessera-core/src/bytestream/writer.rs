/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use std::io::Write;

/// Encapsulates a simple byte writer with
/// support for endian aware writes
///
/// The writer keeps a count of bytes that went through it,
/// encoders use it to report how much they wrote
pub struct ZByteWriter<W: Write> {
    sink:          W,
    bytes_written: usize
}

impl<W: Write> ZByteWriter<W> {
    /// Create a new writer for the sink
    pub fn new(sink: W) -> ZByteWriter<W> {
        ZByteWriter {
            sink,
            bytes_written: 0
        }
    }
    /// Return the number of bytes the writer has written
    pub const fn bytes_written(&self) -> usize {
        self.bytes_written
    }
    /// Return the inner sink, consuming the writer
    pub fn into_inner(self) -> W {
        self.sink
    }
    /// Write all bytes or error out
    pub fn write_all(&mut self, buf: &[u8]) -> std::io::Result<()> {
        self.sink.write_all(buf)?;
        self.bytes_written += buf.len();
        Ok(())
    }
    pub fn write_u8(&mut self, byte: u8) -> std::io::Result<()> {
        self.write_all(&[byte])
    }
    pub fn flush(&mut self) -> std::io::Result<()> {
        self.sink.flush()
    }
}

macro_rules! write_single_type {
    ($name_be:tt,$name_le:tt,$int_type:tt) => {
        impl<W: Write> ZByteWriter<W> {
            #[doc = concat!("Write a `", stringify!($int_type), "` in big endian")]
            pub fn $name_be(&mut self, value: $int_type) -> std::io::Result<()> {
                self.write_all(&value.to_be_bytes())
            }

            #[doc = concat!("Write a `", stringify!($int_type), "` in little endian")]
            pub fn $name_le(&mut self, value: $int_type) -> std::io::Result<()> {
                self.write_all(&value.to_le_bytes())
            }
        }
    };
}

write_single_type!(write_u16_be, write_u16_le, u16);
write_single_type!(write_u32_be, write_u32_le, u32);
write_single_type!(write_u64_be, write_u64_le, u64);

#[cfg(test)]
mod tests {
    use crate::bytestream::ZByteWriter;

    #[test]
    fn counts_bytes() {
        let mut out = vec![];
        let mut writer = ZByteWriter::new(&mut out);

        writer.write_u32_be(0x0102_0304).unwrap();
        writer.write_u16_le(0x0506).unwrap();
        writer.write_u8(7).unwrap();

        assert_eq!(writer.bytes_written(), 7);
        assert_eq!(out, [1, 2, 3, 4, 6, 5, 7]);
    }
}

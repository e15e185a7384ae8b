/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

static ERROR_MSG: &str = "No more bytes";

enum Mode {
    // Big endian
    BE,
    // Little Endian
    LE
}

/// An encapsulation of a byte stream reader
///
/// This provides an interface similar to [`std::io::Cursor`] but
/// it provides fine grained options for reading different integer
/// data types from the underlying buffer.
///
/// There are two variants mainly error and non error variants,
/// the error variants are useful for cases where you need bytes
/// from the underlying stream, and cannot do with zero filled bytes
/// while the non error variants return zero when the stream is exhausted.
pub struct ZByteReader<'a> {
    stream:   &'a [u8],
    position: usize
}

impl<'a> ZByteReader<'a> {
    /// Create a new instance of the byte stream
    pub const fn new(buf: &'a [u8]) -> ZByteReader<'a> {
        ZByteReader {
            stream:   buf,
            position: 0
        }
    }
    /// Skip `num` bytes ahead of the stream.
    ///
    /// Skipping past the end is allowed, further reads
    /// will fail or return zero
    pub fn skip(&mut self, num: usize) {
        self.position = self.position.saturating_add(num);
    }
    /// Undo a buffer read by moving the position pointer `num`
    /// bytes behind, saturating at zero
    pub fn rewind(&mut self, num: usize) {
        self.position = self.position.saturating_sub(num);
    }
    /// Return whether the underlying buffer
    /// has `num` bytes available for reading
    pub const fn has(&self, num: usize) -> bool {
        self.position.saturating_add(num) <= self.stream.len()
    }
    /// Get number of bytes available in the stream
    pub const fn get_bytes_left(&self) -> usize {
        // Must be saturating to prevent underflow
        self.stream.len().saturating_sub(self.position)
    }
    /// Get length of the underlying buffer.
    pub const fn len(&self) -> usize {
        self.stream.len()
    }
    /// Return true if the underlying buffer stream is empty
    pub const fn is_empty(&self) -> bool {
        self.stream.is_empty()
    }
    /// Get current position of the buffer.
    pub const fn get_position(&self) -> usize {
        self.position
    }
    /// Move the position to an absolute offset
    pub fn set_position(&mut self, position: usize) {
        self.position = position;
    }
    /// Return true whether or not we read to the end of the
    /// buffer and have no more bytes left.
    pub const fn eof(&self) -> bool {
        self.position >= self.stream.len()
    }
    /// Return the bytes not yet read
    pub fn remaining(&self) -> &'a [u8] {
        self.stream.get(self.position..).unwrap_or(&[])
    }
    /// Get a part of the bytestream as a reference without advancing
    ///
    /// `position` is relative to the current position
    pub fn peek_at(&self, position: usize, num_bytes: usize) -> Result<&'a [u8], &'static str> {
        let start = self.position.saturating_add(position);
        let end = start.saturating_add(num_bytes);

        self.stream.get(start..end).ok_or(ERROR_MSG)
    }
    /// Read `num_bytes` bytes and advance the position past them
    pub fn get(&mut self, num_bytes: usize) -> Result<&'a [u8], &'static str> {
        let bytes = self.peek_at(0, num_bytes)?;
        self.position += num_bytes;
        Ok(bytes)
    }
    /// Read bytes into `buf`, failing without advancing if the
    /// stream cannot fill it
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), &'static str> {
        let bytes = self.get(buf.len())?;
        buf.copy_from_slice(bytes);
        Ok(())
    }
    /// Look at the next byte without advancing
    pub fn peek_u8(&self) -> Option<u8> {
        self.stream.get(self.position).copied()
    }
    /// Retrieve a byte from the underlying stream
    /// returning 0 if there are no more bytes available
    pub fn get_u8(&mut self) -> u8 {
        let byte = self.stream.get(self.position).copied().unwrap_or(0);
        self.position += usize::from(self.position < self.stream.len());
        byte
    }
    /// Retrieve a byte from the underlying stream or an
    /// error if the stream is exhausted
    pub fn get_u8_err(&mut self) -> Result<u8, &'static str> {
        match self.stream.get(self.position) {
            Some(byte) => {
                self.position += 1;
                Ok(*byte)
            }
            None => Err(ERROR_MSG)
        }
    }
}

macro_rules! get_single_type {
    ($name:tt,$name2:tt,$name3:tt,$name4:tt,$name5:tt,$name6:tt,$int_type:tt) => {
        impl<'a> ZByteReader<'a> {
            #[inline(always)]
            fn $name(&mut self, mode: Mode) -> $int_type {
                self.$name2(mode).unwrap_or(0)
            }

            #[inline(always)]
            fn $name2(&mut self, mode: Mode) -> Result<$int_type, &'static str> {
                const SIZE_OF_VAL: usize = core::mem::size_of::<$int_type>();

                let mut space = [0; SIZE_OF_VAL];

                match self.stream.get(self.position..self.position + SIZE_OF_VAL) {
                    Some(position) => {
                        space.copy_from_slice(position);
                        self.position += SIZE_OF_VAL;

                        match mode {
                            Mode::LE => Ok($int_type::from_le_bytes(space)),
                            Mode::BE => Ok($int_type::from_be_bytes(space))
                        }
                    }
                    None => Err(ERROR_MSG)
                }
            }

            #[doc = concat!("Read a big endian `", stringify!($int_type), "` or error out if the stream is exhausted")]
            pub fn $name3(&mut self) -> Result<$int_type, &'static str> {
                self.$name2(Mode::BE)
            }

            #[doc = concat!("Read a little endian `", stringify!($int_type), "` or error out if the stream is exhausted")]
            pub fn $name4(&mut self) -> Result<$int_type, &'static str> {
                self.$name2(Mode::LE)
            }

            #[doc = concat!("Read a big endian `", stringify!($int_type), "`, returning zero if the stream is exhausted")]
            pub fn $name5(&mut self) -> $int_type {
                self.$name(Mode::BE)
            }

            #[doc = concat!("Read a little endian `", stringify!($int_type), "`, returning zero if the stream is exhausted")]
            pub fn $name6(&mut self) -> $int_type {
                self.$name(Mode::LE)
            }
        }
    };
}

get_single_type!(
    get_u16_inner_or_default,
    get_u16_inner_or_die,
    get_u16_be_err,
    get_u16_le_err,
    get_u16_be,
    get_u16_le,
    u16
);
get_single_type!(
    get_u32_inner_or_default,
    get_u32_inner_or_die,
    get_u32_be_err,
    get_u32_le_err,
    get_u32_be,
    get_u32_le,
    u32
);
get_single_type!(
    get_u64_inner_or_default,
    get_u64_inner_or_die,
    get_u64_be_err,
    get_u64_le_err,
    get_u64_be,
    get_u64_le,
    u64
);

#[cfg(test)]
mod tests {
    use crate::bytestream::ZByteReader;

    #[test]
    fn endian_reads() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05];
        let mut reader = ZByteReader::new(&data);

        assert_eq!(reader.get_u16_be(), 0x0102);
        assert_eq!(reader.get_u16_le(), 0x0403);
        assert!(reader.get_u16_be_err().is_err());
        // failed read did not advance
        assert_eq!(reader.get_u8_err(), Ok(5));
        assert!(reader.eof());
        assert_eq!(reader.get_u8(), 0);
    }

    #[test]
    fn peek_does_not_advance() {
        let data = *b"IHDRdata";
        let mut reader = ZByteReader::new(&data);

        assert_eq!(reader.peek_at(0, 4), Ok(&b"IHDR"[..]));
        assert_eq!(reader.get_position(), 0);
        reader.skip(4);
        assert_eq!(reader.get(4), Ok(&b"data"[..]));
        assert!(reader.get(1).is_err());
        reader.rewind(2);
        assert_eq!(reader.remaining(), b"ta");
    }
}

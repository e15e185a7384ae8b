/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! CRC-32 as used by png chunks
//!
//! Polynomial `0xEDB88320` (reversed), one table lookup per byte.

const CRC_TABLE: [u32; 256] = make_crc_table();

const fn make_crc_table() -> [u32; 256] {
    let mut table = [0_u32; 256];
    let mut n = 0;

    while n < 256 {
        let mut c = n as u32;
        let mut k = 0;

        while k < 8 {
            if c & 1 == 1 {
                c = 0xEDB8_8320 ^ (c >> 1);
            } else {
                c >>= 1;
            }
            k += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
}

/// Update a running crc with `bytes`
///
/// The result is not inverted, start with `u32::MAX` and
/// invert after the last call
pub fn calc_crc_with_bytes(bytes: &[u8], crc: u32) -> u32 {
    let mut crc = crc;

    for byte in bytes {
        crc = CRC_TABLE[usize::from((crc as u8) ^ byte)] ^ (crc >> 8);
    }
    crc
}

/// Calculate the crc of a single buffer
pub fn calc_crc(bytes: &[u8]) -> u32 {
    !calc_crc_with_bytes(bytes, u32::MAX)
}

#[cfg(test)]
mod tests {
    use crate::crc::{calc_crc, calc_crc_with_bytes};

    #[test]
    fn known_values() {
        assert_eq!(calc_crc(b"123456789"), 0xCBF4_3926);
        // crc of an empty IEND chunk, found at the end of every png
        assert_eq!(calc_crc(b"IEND"), 0xAE42_6082);
    }

    #[test]
    fn chained_equals_whole() {
        let whole = calc_crc(b"IDATsome data");
        let chained = !calc_crc_with_bytes(b"some data", calc_crc_with_bytes(b"IDAT", u32::MAX));

        assert_eq!(whole, chained);
    }
}

/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// Split packed 1, 2 or 4 bit palette indices into one byte each,
/// most significant bits first
///
/// Expands until either `out` is full or `input` is exhausted
pub(crate) fn expand_bits_to_byte(depth: usize, input: &[u8], out: &mut [u8]) {
    let per_byte = 8 / depth;
    let mask = (1_u8 << depth) - 1;

    for (out_vals, in_val) in out.chunks_mut(per_byte).zip(input) {
        for (pos, out_val) in out_vals.iter_mut().enumerate() {
            let shift = 8 - depth * (pos + 1);
            *out_val = (in_val >> shift) & mask;
        }
    }
}

/// Pulls one channel out of a masked pixel and scales it to 8 bits
#[derive(Copy, Clone, Debug)]
pub(crate) struct ChannelMask {
    mask:  u32,
    shift: i32,
    bits:  u32
}

impl ChannelMask {
    pub fn new(mask: u32) -> ChannelMask {
        ChannelMask {
            mask,
            // position of the top bit relative to an 8 bit value
            shift: (32 - mask.leading_zeros()) as i32 - 8,
            bits: mask.count_ones()
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.mask == 0
    }

    pub fn extract(&self, value: u32) -> u8 {
        shift_signed(value & self.mask, self.shift, self.bits) as u8
    }
}

/// Move the masked bits to the top of a byte then replicate them
/// downwards so that e.g. a full 5 bit value becomes 255
fn shift_signed(mut v: u32, shift: i32, bits: u32) -> u32 {
    const MUL_TABLE: [u32; 9] = [
        0,    /*unused*/
        0xff, /*0b11111111*/
        0x55, /*0b01010101*/
        0x49, /*0b01001001*/
        0x11, /*0b00010001*/
        0x21, /*0b00100001*/
        0x41, /*0b01000001*/
        0x81, /*0b10000001*/
        0x01  /*0b00000001*/
    ];
    const SHIFT_TABLE: [i32; 9] = [0, 0, 0, 1, 0, 2, 4, 6, 0];

    if shift < 0 {
        v <<= -shift;
    } else {
        v >>= shift;
    }
    // masks wider than 8 bits keep their top 8
    let bits = bits.min(8);
    v &= 0xFF;
    v >>= 8 - bits;
    (v * MUL_TABLE[bits as usize]) >> SHIFT_TABLE[bits as usize]
}

#[cfg(test)]
mod tests {
    use super::{expand_bits_to_byte, ChannelMask};

    #[test]
    fn indices_are_split_msb_first() {
        let mut out = [0; 5];
        expand_bits_to_byte(1, &[0b1010_0000], &mut out);
        assert_eq!(out, [1, 0, 1, 0, 0]);

        let mut out = [0; 3];
        expand_bits_to_byte(4, &[0x3A, 0xF0], &mut out);
        assert_eq!(out, [3, 10, 15]);

        let mut out = [0; 4];
        expand_bits_to_byte(2, &[0b11_01_10_00], &mut out);
        assert_eq!(out, [3, 1, 2, 0]);
    }

    #[test]
    fn masks_scale_to_full_range() {
        // 5-6-5
        let red = ChannelMask::new(0xF800);
        let green = ChannelMask::new(0x07E0);
        let blue = ChannelMask::new(0x001F);

        assert_eq!(red.extract(0xFFFF), 255);
        assert_eq!(green.extract(0xFFFF), 255);
        assert_eq!(blue.extract(0xFFFF), 255);
        assert_eq!(red.extract(0x0000), 0);
        // 16 of 31 is a bit above half
        assert_eq!(blue.extract(0x0010), 132);

        let alpha = ChannelMask::new(0xFF00_0000);
        assert_eq!(alpha.extract(0x7F00_0000), 0x7F);

        let none = ChannelMask::new(0);
        assert!(none.is_empty());
        assert_eq!(none.extract(0xFFFF_FFFF), 0);
    }
}

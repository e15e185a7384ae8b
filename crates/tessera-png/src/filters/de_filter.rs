/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Reconstruction of filtered scanlines
//!
//! `components` is the number of bytes in a complete pixel,
//! rounded up to one for sub-byte depths.

pub fn handle_avg(prev_row: &[u8], raw: &[u8], current: &mut [u8], components: usize) {
    if raw.len() < components || current.len() < components || prev_row.len() < components {
        return;
    }
    // handle leftmost byte explicitly
    for i in 0..components {
        current[i] = raw[i].wrapping_add(prev_row[i] >> 1);
    }
    // raw length is one row,so always keep it in check
    let end = current.len().min(raw.len()).min(prev_row.len());

    for i in components..end {
        let a = current[i - components];
        let b = prev_row[i];

        // average without overflow, from the stanford bit-hacks
        let c = (a & b) + ((a ^ b) >> 1);

        current[i] = raw[i].wrapping_add(c);
    }
}

pub fn handle_sub(raw: &[u8], current: &mut [u8], components: usize) {
    if current.len() < components || raw.len() < components {
        return;
    }
    current[..components].copy_from_slice(&raw[..components]);

    let end = current.len().min(raw.len());

    for i in components..end {
        let a = current[i - components];
        current[i] = raw[i].wrapping_add(a);
    }
}

pub fn handle_up(prev_row: &[u8], raw: &[u8], current: &mut [u8]) {
    for ((filt, recon), up) in raw.iter().zip(current).zip(prev_row) {
        *recon = (*filt).wrapping_add(*up)
    }
}

pub fn handle_paeth(prev_row: &[u8], raw: &[u8], current: &mut [u8], components: usize) {
    if raw.len() < components || current.len() < components || prev_row.len() < components {
        return;
    }
    // handle leftmost byte explicitly
    for i in 0..components {
        current[i] = raw[i].wrapping_add(paeth(0, prev_row[i], 0));
    }
    let end = current.len().min(raw.len()).min(prev_row.len());

    for i in components..end {
        let paeth_res = paeth(
            current[i - components],
            prev_row[i],
            prev_row[i - components]
        );
        current[i] = raw[i].wrapping_add(paeth_res)
    }
}

/// Handle images with the first scanline as paeth scanline
///
/// Special in that the above row is treated as zero, which
/// turns the predictor into the left neighbour
pub fn handle_paeth_first(raw: &[u8], current: &mut [u8], components: usize) {
    handle_sub(raw, current, components);
}

/// Handle images with the first scanline as an average scanline
///
/// The above row is treated as zero
pub fn handle_avg_first(raw: &[u8], current: &mut [u8], components: usize) {
    if raw.len() < components || current.len() < components {
        return;
    }
    current[..components].copy_from_slice(&raw[..components]);

    let end = current.len().min(raw.len());

    for i in components..end {
        let avg = current[i - components] >> 1;
        current[i] = raw[i].wrapping_add(avg)
    }
}

/// The paeth predictor
///
/// Picks whichever of left (`a`), above (`b`) and upper left (`c`) is
/// closest to `a + b - c`, ties go to left then above.
#[inline(always)]
pub fn paeth(a: u8, b: u8, c: u8) -> u8 {
    // branch free formulation from stb_image, equivalent
    // to the reference one
    let a = i32::from(a);
    let b = i32::from(b);
    let c = i32::from(c);
    let thresh = c * 3 - (a + b);
    let lo = if a < b { a } else { b };
    let hi = if a < b { b } else { a };

    let t0 = if hi <= thresh { lo } else { c };
    let t1 = if thresh <= lo { hi } else { t0 };
    t1 as u8
}

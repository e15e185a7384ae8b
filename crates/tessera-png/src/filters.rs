/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Scanline filters
//!
//! Decoding filters live in `de_filter`, this module holds the
//! forward transforms used by the encoder.
pub use de_filter::*;

use crate::enums::FilterMethod;

mod de_filter;

/// Filter `current` into `out`, writing the filter type byte first
///
/// An empty `previous` stands for the row above the first row,
/// which is all zeroes
pub fn filter_scanline(
    current: &[u8], previous: &[u8], out: &mut [u8], filter: FilterMethod, components: usize
) {
    let (filter_byte, out) = out.split_at_mut(1);

    filter_byte[0] = filter.to_int();

    let above = |i: usize| previous.get(i).copied().unwrap_or(0);
    let left = |i: usize| {
        if i >= components {
            current[i - components]
        } else {
            0
        }
    };
    let upper_left = |i: usize| {
        if i >= components {
            above(i - components)
        } else {
            0
        }
    };

    for (i, (px, filtered)) in current.iter().zip(out.iter_mut()).enumerate() {
        let prediction = match filter {
            FilterMethod::None => 0,
            FilterMethod::Sub => left(i),
            FilterMethod::Up => above(i),
            FilterMethod::Average | FilterMethod::AvgFirst => {
                ((u16::from(left(i)) + u16::from(above(i))) >> 1) as u8
            }
            FilterMethod::Paeth | FilterMethod::PaethFirst => {
                paeth(left(i), above(i), upper_left(i))
            }
        };
        *filtered = px.wrapping_sub(prediction);
    }
}

/// Pick the filter with the smallest sum of absolute differences
///
/// Filtered bytes are treated as signed, the usual heuristic
/// recommended by the png spec for adaptive filtering.
pub fn choose_compression_filter(
    previous: &[u8], current: &[u8], components: usize, scratch: &mut [u8]
) -> FilterMethod {
    const CANDIDATES: [FilterMethod; 5] = [
        FilterMethod::None,
        FilterMethod::Sub,
        FilterMethod::Up,
        FilterMethod::Average,
        FilterMethod::Paeth
    ];

    let mut best = FilterMethod::None;
    let mut best_sum = u64::MAX;

    for filter in CANDIDATES {
        filter_scanline(current, previous, scratch, filter, components);

        let sum: u64 = scratch[1..]
            .iter()
            .map(|x| u64::from((*x as i8).unsigned_abs()))
            .sum();

        if sum < best_sum {
            best_sum = sum;
            best = filter;
        }
    }
    best
}

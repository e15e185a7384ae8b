/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Decoding of hand built bmp files
use tessera_bmp::{probe_bmp, BmpDecoder, BmpDecoderErrors};
use tessera_core::info::InfoValue;
use tessera_core::mode::{L, RGB, RGBA};
use tessera_core::options::DecoderOptions;

/// A 40 byte `BITMAPINFOHEADER`
fn info_header(width: i32, height: i32, bpp: u16, compression: u32, colors: u32) -> Vec<u8> {
    let mut out = 40_u32.to_le_bytes().to_vec();
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.extend_from_slice(&1_u16.to_le_bytes());
    out.extend_from_slice(&bpp.to_le_bytes());
    out.extend_from_slice(&compression.to_le_bytes());
    // image size
    out.extend_from_slice(&0_u32.to_le_bytes());
    // 72 dpi
    out.extend_from_slice(&2835_i32.to_le_bytes());
    out.extend_from_slice(&2835_i32.to_le_bytes());
    out.extend_from_slice(&colors.to_le_bytes());
    out.extend_from_slice(&0_u32.to_le_bytes());
    out
}

/// A 12 byte `BITMAPCOREHEADER`
fn core_header(width: u16, height: u16, bpp: u16) -> Vec<u8> {
    let mut out = 12_u32.to_le_bytes().to_vec();
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.extend_from_slice(&1_u16.to_le_bytes());
    out.extend_from_slice(&bpp.to_le_bytes());
    out
}

/// File header, then the dib header, colour table or masks and pixels
fn bmp(dib: &[u8], table: &[u8], pixels: &[u8]) -> Vec<u8> {
    let offset = 14 + dib.len() + table.len();
    let size = offset + pixels.len();

    let mut out = b"BM".to_vec();
    out.extend_from_slice(&(size as u32).to_le_bytes());
    out.extend_from_slice(&[0; 4]);
    out.extend_from_slice(&(offset as u32).to_le_bytes());
    out.extend_from_slice(dib);
    out.extend_from_slice(table);
    out.extend_from_slice(pixels);
    out
}

#[rustfmt::skip]
const BGR_ROWS: [u8; 16] = [
    // bottom row, blue and white then padding
    255, 0, 0, 255, 255, 255, 0, 0,
    // top row, red and green
    0, 0, 255, 0, 255, 0, 0, 0
];

#[test]
fn bottom_up_24_bit() {
    let data = bmp(&info_header(2, 2, 24, 0, 0), &[], &BGR_ROWS);
    let mut decoder = BmpDecoder::new(&data);

    let pixels = decoder.decode().unwrap();

    assert_eq!(decoder.get_mode(), Some(&RGB));
    assert_eq!(decoder.get_dimensions(), Some((2, 2)));
    assert_eq!(pixels, [255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255]);

    let info = decoder.get_info().unwrap();
    assert_eq!(info.get("dib_header_size"), Some(&InfoValue::UInt(40)));
    assert_eq!(info.get("resolution"), Some(&InfoValue::Pair(2835, 2835)));
    assert!(info.get("palette").is_none());
}

#[test]
fn top_down_24_bit() {
    let data = bmp(&info_header(2, -2, 24, 0, 0), &[], &BGR_ROWS);
    let pixels = BmpDecoder::new(&data).decode().unwrap();

    assert_eq!(pixels, [0, 0, 255, 255, 255, 255, 255, 0, 0, 0, 255, 0]);
}

#[test]
fn core_header_one_bit() {
    let table = [0, 0, 0, 255, 255, 255];
    let data = bmp(&core_header(10, 1, 1), &table, &[0b1010_0000, 0b1100_0000, 0, 0]);

    let mut decoder = BmpDecoder::new(&data);
    let pixels = decoder.decode().unwrap();

    let expected: Vec<u8> = [1, 0, 1, 0, 0, 0, 0, 0, 1, 1]
        .iter()
        .flat_map(|x| [x * 255; 3])
        .collect();
    assert_eq!(pixels, expected);

    let info = decoder.get_info().unwrap();
    assert_eq!(info.get("dib_header_size"), Some(&InfoValue::UInt(12)));
    assert_eq!(
        info.get("palette").and_then(InfoValue::as_bytes),
        Some(&table[..])
    );
}

#[test]
fn four_bit_with_colour_count() {
    // blue, green, red as BGRX quads
    let table = [255, 0, 0, 0, 0, 255, 0, 0, 0, 0, 255, 0];
    let data = bmp(&info_header(3, 1, 4, 0, 3), &table, &[0x12, 0x00, 0, 0]);

    let pixels = BmpDecoder::new(&data).decode().unwrap();
    assert_eq!(pixels, [0, 255, 0, 255, 0, 0, 0, 0, 255]);
}

#[test]
fn palette_index_out_of_range() {
    let table = [10, 20, 30, 0];
    let data = bmp(&info_header(2, 1, 8, 0, 1), &table, &[0, 7, 0, 0]);

    let pixels = BmpDecoder::new(&data).decode().unwrap();
    assert_eq!(pixels, [30, 20, 10, 0, 0, 0]);

    let options = DecoderOptions::default().set_strict_mode(true);
    assert!(matches!(
        BmpDecoder::new_with_options(&data, options).decode(),
        Err(BmpDecoderErrors::GenericStatic("Palette index larger than the colour table"))
    ));
}

#[test]
fn colour_count_above_the_depth() {
    // five colours claimed for a one bit image, black and white stored
    let table = [0, 0, 0, 0, 255, 255, 255, 0];
    let data = bmp(&info_header(2, 1, 1, 0, 5), &table, &[0b0100_0000, 0, 0, 0]);

    let pixels = BmpDecoder::new(&data).decode().unwrap();
    assert_eq!(pixels, [0, 0, 0, 255, 255, 255]);

    let options = DecoderOptions::default().set_strict_mode(true);
    let err = BmpDecoder::new_with_options(&data, options)
        .decode()
        .unwrap_err();
    assert!(matches!(err, BmpDecoderErrors::Generic(_)), "{err:?}");
}

#[test]
fn eight_bit_without_table_is_grey() {
    let data = bmp(&info_header(3, 1, 8, 0, 0), &[], &[1, 2, 3, 0]);
    let mut decoder = BmpDecoder::new(&data);

    assert_eq!(decoder.decode().unwrap(), [1, 2, 3]);
    assert_eq!(decoder.get_mode(), Some(&L));
}

#[test]
fn sixteen_bit_default_masks() {
    // 5-5-5, white then red
    let data = bmp(&info_header(2, 1, 16, 0, 0), &[], &[0xFF, 0x7F, 0x00, 0x7C]);
    let mut decoder = BmpDecoder::new(&data);

    assert_eq!(decoder.decode().unwrap(), [255, 255, 255, 255, 0, 0]);
    assert_eq!(decoder.get_mode(), Some(&RGB));
}

#[test]
fn sixteen_bit_bitfields_after_header() {
    let mut masks = vec![];
    for mask in [0xF800_u32, 0x07E0, 0x001F] {
        masks.extend_from_slice(&mask.to_le_bytes());
    }
    // green then blue
    let data = bmp(&info_header(2, 1, 16, 3, 0), &masks, &[0xE0, 0x07, 0x1F, 0x00]);

    let pixels = BmpDecoder::new(&data).decode().unwrap();
    assert_eq!(pixels, [0, 255, 0, 0, 0, 255]);
}

#[test]
fn v4_header_with_alpha_mask() {
    let mut dib = info_header(1, 1, 32, 3, 0);
    dib[0] = 108;
    for mask in [0x00FF_0000_u32, 0x0000_FF00, 0x0000_00FF, 0xFF00_0000] {
        dib.extend_from_slice(&mask.to_le_bytes());
    }
    dib.resize(108, 0);

    let data = bmp(&dib, &[], &0x8011_2233_u32.to_le_bytes());
    let mut decoder = BmpDecoder::new(&data);

    assert_eq!(decoder.decode().unwrap(), [0x11, 0x22, 0x33, 0x80]);
    assert_eq!(decoder.get_mode(), Some(&RGBA));
    assert_eq!(
        decoder.get_info().unwrap().get("dib_header_size"),
        Some(&InfoValue::UInt(108))
    );
}

#[test]
fn thirty_two_bit_ignores_padding_byte() {
    let data = bmp(&info_header(1, 1, 32, 0, 0), &[], &[1, 2, 3, 4]);
    let mut decoder = BmpDecoder::new(&data);

    assert_eq!(decoder.decode().unwrap(), [3, 2, 1]);
    assert_eq!(decoder.get_mode(), Some(&RGB));
}

#[test]
fn run_length_encoding_is_unsupported() {
    let table = [0; 8];
    let data = bmp(&info_header(2, 1, 8, 1, 2), &table, &[2, 0, 0, 1]);

    assert!(matches!(
        BmpDecoder::new(&data).decode(),
        Err(BmpDecoderErrors::Unsupported(_))
    ));
}

#[test]
fn malformed_files() {
    let mut data = bmp(&info_header(2, 2, 24, 0, 0), &[], &BGR_ROWS);
    data[1] = b'A';
    assert!(matches!(
        BmpDecoder::new(&data).decode(),
        Err(BmpDecoderErrors::InvalidMagicBytes)
    ));

    // missing a row
    let data = bmp(&info_header(2, 2, 24, 0, 0), &[], &BGR_ROWS[..8]);
    assert!(matches!(
        BmpDecoder::new(&data).decode(),
        Err(BmpDecoderErrors::TooSmallBuffer(16, 8))
    ));

    // unknown header size
    let mut dib = info_header(2, 2, 24, 0, 0);
    dib[0] = 20;
    let data = bmp(&dib, &[], &BGR_ROWS);
    assert!(BmpDecoder::new(&data).decode().is_err());

    // zero width
    let data = bmp(&info_header(0, 2, 24, 0, 0), &[], &BGR_ROWS);
    assert!(BmpDecoder::new(&data).decode().is_err());

    // too large
    let options = DecoderOptions::default().set_max_width(1);
    let data = bmp(&info_header(2, 2, 24, 0, 0), &[], &BGR_ROWS);
    assert!(matches!(
        BmpDecoder::new_with_options(&data, options).decode(),
        Err(BmpDecoderErrors::TooLargeDimensions(..))
    ));
}

#[test]
fn probing() {
    let data = bmp(&info_header(2, 2, 24, 0, 0), &[], &BGR_ROWS);
    assert!(probe_bmp(&data));
    assert!(!probe_bmp(b"BM"));
    assert!(!probe_bmp(b"P6 1 1 255 abc"));
}

/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Decoding of hand built png streams
use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::{Compression, Crc};
use tessera_core::info::InfoValue;
use tessera_core::mode::{L, RGB, RGBA};
use tessera_core::options::DecoderOptions;
use tessera_png::error::PngDecodeErrors;
use tessera_png::PngDecoder;

const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn chunk(name: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut crc = Crc::new();
    crc.update(name);
    crc.update(data);

    let mut out = (data.len() as u32).to_be_bytes().to_vec();
    out.extend_from_slice(name);
    out.extend_from_slice(data);
    out.extend_from_slice(&crc.sum().to_be_bytes());
    out
}

fn ihdr(width: u32, height: u32, depth: u8, color: u8, interlace: u8) -> Vec<u8> {
    let mut data = width.to_be_bytes().to_vec();
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&[depth, color, 0, 0, interlace]);
    chunk(b"IHDR", &data)
}

fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn png(chunks: &[Vec<u8>]) -> Vec<u8> {
    let mut out = SIGNATURE.to_vec();
    for c in chunks {
        out.extend_from_slice(c);
    }
    out.extend_from_slice(&chunk(b"IEND", &[]));
    out
}

/// A 4x1 greyscale image, one scanline with filter type 0
fn minimal_grey() -> Vec<u8> {
    png(&[
        ihdr(4, 1, 8, 0, 0),
        chunk(b"IDAT", &zlib(&[0, 10, 20, 30, 40]))
    ])
}

#[test]
fn minimal_greyscale() {
    let data = minimal_grey();
    let mut decoder = PngDecoder::new(&data);

    decoder.decode_headers().unwrap();
    assert_eq!(decoder.get_dimensions(), Some((4, 1)));
    assert_eq!(decoder.get_mode(), Some(&L));

    let pixels = decoder.decode().unwrap().u8().unwrap();
    assert_eq!(pixels, [10, 20, 30, 40]);
}

#[test]
fn corrupt_crc_is_an_error() {
    let mut data = minimal_grey();
    // last byte of the IHDR crc
    data[8 + 4 + 4 + 13 + 3] ^= 0xFF;

    let mut decoder = PngDecoder::new(&data);
    assert!(matches!(
        decoder.decode(),
        Err(PngDecodeErrors::BadCrc(_, _))
    ));

    // the same file decodes when checksums are ignored
    let options = DecoderOptions::default().png_set_confirm_crc(false);
    let mut decoder = PngDecoder::new_with_options(&data, options);
    assert_eq!(decoder.decode().unwrap().u8().unwrap(), [10, 20, 30, 40]);
}

#[test]
fn bad_signature() {
    let mut data = minimal_grey();
    data[1] = b'X';

    assert!(matches!(
        PngDecoder::new(&data).decode(),
        Err(PngDecodeErrors::BadSignature)
    ));
}

#[test]
fn filtered_rows() {
    // 2x3 RGB, rows use sub, up and paeth
    let rows: [[u8; 6]; 3] = [[10, 20, 30, 15, 25, 35], [11, 21, 31, 16, 26, 36], [
        12, 22, 32, 17, 27, 37
    ]];
    let mut raw = vec![1];
    raw.extend_from_slice(&[10, 20, 30, 5, 5, 5]);
    raw.push(2);
    raw.extend_from_slice(&[1; 6]);
    // paeth picks the pixel above for this smooth gradient
    raw.push(4);
    raw.extend_from_slice(&[1, 1, 1, 1, 1, 1]);

    let data = png(&[ihdr(2, 3, 8, 2, 0), chunk(b"IDAT", &zlib(&raw))]);
    let mut decoder = PngDecoder::new(&data);

    let pixels = decoder.decode().unwrap().u8().unwrap();
    assert_eq!(decoder.get_mode(), Some(&RGB));
    assert_eq!(pixels, rows.concat());
}

#[test]
fn one_bit_greyscale_is_scaled() {
    // 10 pixels, 0b1010_0000 0b11xx_xxxx
    let data = png(&[
        ihdr(10, 1, 1, 0, 0),
        chunk(b"IDAT", &zlib(&[0, 0b1010_0000, 0b1100_0000]))
    ]);
    let pixels = PngDecoder::new(&data).decode().unwrap().u8().unwrap();

    assert_eq!(pixels, [255, 0, 255, 0, 0, 0, 0, 0, 255, 255]);
}

#[test]
fn palette_with_transparency() {
    // 2 bit indices into a 3 entry palette, second entry half transparent
    let data = png(&[
        ihdr(3, 1, 2, 3, 0),
        chunk(b"PLTE", &[255, 0, 0, 0, 255, 0, 0, 0, 255]),
        chunk(b"tRNS", &[255, 128]),
        chunk(b"IDAT", &zlib(&[0, 0b0001_1000]))
    ]);
    let mut decoder = PngDecoder::new(&data);
    let pixels = decoder.decode().unwrap().u8().unwrap();

    assert_eq!(decoder.get_mode(), Some(&RGBA));
    assert_eq!(pixels, [255, 0, 0, 255, 0, 255, 0, 128, 0, 0, 255, 255]);

    let info = decoder.get_info().unwrap();
    assert_eq!(
        info.get("palette").and_then(InfoValue::as_bytes),
        Some(&[255, 0, 0, 0, 255, 0, 0, 0, 255][..])
    );
}

#[test]
fn palette_required_for_indexed() {
    let data = png(&[ihdr(1, 1, 8, 3, 0), chunk(b"IDAT", &zlib(&[0, 0]))]);

    assert!(matches!(
        PngDecoder::new(&data).decode(),
        Err(PngDecodeErrors::EmptyPalette)
    ));
}

#[test]
fn ancillary_chunks_become_info() {
    let mut ztxt = b"Comment\0\0".to_vec();
    ztxt.extend_from_slice(&zlib(b"compressed words"));

    let mut phys = 2835_u32.to_be_bytes().to_vec();
    phys.extend_from_slice(&2835_u32.to_be_bytes());
    phys.push(1);

    let data = png(&[
        ihdr(1, 1, 8, 0, 0),
        chunk(b"gAMA", &45455_u32.to_be_bytes()),
        chunk(b"sRGB", &[0]),
        chunk(b"pHYs", &phys),
        chunk(b"tEXt", b"Title\0A small test"),
        chunk(b"zTXt", &ztxt),
        chunk(b"iTXt", "Author\0\0\0\0\0Zoë".as_bytes()),
        chunk(b"tIME", &[0x07, 0xE7, 5, 17, 8, 30, 0]),
        chunk(b"IDAT", &zlib(&[0, 7]))
    ]);
    let mut decoder = PngDecoder::new(&data);
    decoder.decode().unwrap();

    let info = decoder.get_info().unwrap();

    let gamma = info.get("gamma").and_then(InfoValue::as_float).unwrap();
    assert!((gamma - 0.45455).abs() < 1e-9);
    assert_eq!(info.get("srgb_intent"), Some(&InfoValue::UInt(0)));
    assert_eq!(
        info.get("time").and_then(InfoValue::as_text),
        Some("2023-05-17T08:30:00")
    );

    let physical = info.get("physical").and_then(InfoValue::as_map).unwrap();
    assert_eq!(physical.get("x"), Some(&InfoValue::UInt(2835)));
    assert_eq!(physical.get("unit"), Some(&InfoValue::UInt(1)));

    let text = info.get("text").and_then(InfoValue::as_map).unwrap();
    assert_eq!(text.get("Title").and_then(InfoValue::as_text), Some("A small test"));
    assert_eq!(
        text.get("Comment").and_then(InfoValue::as_text),
        Some("compressed words")
    );
    assert_eq!(text.get("Author").and_then(InfoValue::as_text), Some("Zoë"));
}

#[test]
fn unknown_chunks() {
    // ancillary, skipped
    let data = png(&[
        ihdr(1, 1, 8, 0, 0),
        chunk(b"prIv", &[1, 2, 3]),
        chunk(b"IDAT", &zlib(&[0, 9]))
    ]);
    assert_eq!(PngDecoder::new(&data).decode().unwrap().u8().unwrap(), [9]);

    // critical, fails
    let data = png(&[
        ihdr(1, 1, 8, 0, 0),
        chunk(b"CrIt", &[1, 2, 3]),
        chunk(b"IDAT", &zlib(&[0, 9]))
    ]);
    assert!(matches!(
        PngDecoder::new(&data).decode(),
        Err(PngDecodeErrors::UnknownCriticalChunk(_))
    ));
}

#[test]
fn chunk_ordering() {
    let idat = chunk(b"IDAT", &zlib(&[0, 9, 0, 9]));
    let plte = chunk(b"PLTE", &[0, 0, 0]);

    let cases = [
        // gAMA after image data
        png(&[ihdr(1, 2, 8, 0, 0), idat.clone(), chunk(b"gAMA", &[0, 0, 0, 1])]),
        // palette after image data
        png(&[ihdr(1, 2, 8, 2, 0), idat.clone(), plte.clone()]),
        // gAMA after the palette
        png(&[
            ihdr(1, 2, 8, 2, 0),
            plte.clone(),
            chunk(b"gAMA", &[0, 0, 0, 1]),
            idat.clone()
        ]),
        // tRNS before the palette of an indexed image
        png(&[ihdr(1, 2, 8, 3, 0), chunk(b"tRNS", &[0]), plte, idat.clone()]),
        // split image data
        png(&[
            ihdr(1, 2, 8, 0, 0),
            chunk(b"IDAT", &[]),
            chunk(b"tEXt", b"a\0b"),
            idat.clone()
        ]),
        // two headers
        png(&[ihdr(1, 2, 8, 0, 0), ihdr(1, 2, 8, 0, 0), idat])
    ];
    for (i, data) in cases.iter().enumerate() {
        assert!(
            matches!(
                PngDecoder::new(data).decode(),
                Err(PngDecodeErrors::BadChunkOrder(_, _))
            ),
            "case {i}"
        );
    }
}

#[test]
fn header_validation() {
    let idat = chunk(b"IDAT", &zlib(&[0, 0]));

    for header in [
        // 16 bit palette
        ihdr(1, 1, 16, 3, 0),
        // 4 bit rgb
        ihdr(1, 1, 4, 2, 0),
        // colour type 5
        ihdr(1, 1, 8, 5, 0),
        // zero width
        ihdr(0, 1, 8, 0, 0),
        // interlace method 2
        ihdr(1, 1, 8, 0, 2)
    ] {
        let data = png(&[header, idat.clone()]);
        assert!(PngDecoder::new(&data).decode().is_err());
    }
}

#[test]
fn interlaced_is_not_implemented() {
    let data = png(&[ihdr(1, 1, 8, 0, 1), chunk(b"IDAT", &zlib(&[0, 0]))]);

    assert!(matches!(
        PngDecoder::new(&data).decode(),
        Err(PngDecodeErrors::UnsupportedInterlace)
    ));
}

#[test]
fn truncated_data() {
    let data = png(&[ihdr(4, 4, 8, 0, 0), chunk(b"IDAT", &zlib(&[0, 1, 2, 3, 4]))]);
    assert!(PngDecoder::new(&data).decode().is_err());

    let data = minimal_grey();
    assert!(PngDecoder::new(&data[..data.len() - 16]).decode().is_err());
}

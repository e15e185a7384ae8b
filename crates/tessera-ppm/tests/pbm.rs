/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use tessera_core::mode::L;
use tessera_core::options::{DecoderOptions, EncoderOptions, EncodingFormat};
use tessera_ppm::{PPMDecoder, PPMEncoder, PnmFormat, PnmVersion};

const WIDTH: usize = 23;
const HEIGHT: usize = 7;

#[rustfmt::skip]
const PATTERN: [[u8; WIDTH]; HEIGHT] = [
    [255, 255,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0],
    [255,   0, 255,   0,   0, 255,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0, 255,   0],
    [255,   0, 255,   0, 255, 255, 255,   0, 255, 255, 255,   0, 255,   0, 255,   0, 255, 255, 255,   0, 255, 255, 255],
    [255,   0, 255,   0, 255,   0,   0,   0, 255,   0, 255,   0,   0, 255, 255,   0, 255,   0,   0,   0,   0, 255,   0],
    [255, 255,   0,   0,   0, 255,   0,   0, 255, 255, 255,   0,   0,   0, 255,   0, 255, 255, 255,   0,   0,   0, 255],
    [  0,   0,   0,   0,   0,   0,   0,   0, 255,   0,   0,   0, 255,   0, 255,   0,   0,   0,   0,   0,   0,   0,   0],
    [  0,   0,   0,   0,   0,   0,   0,   0, 255,   0,   0,   0,   0, 255,   0,   0,   0,   0,   0,   0,   0,   0,   0],
];

fn pattern() -> Vec<u8> {
    PATTERN.iter().flatten().copied().collect()
}

fn encode(format: EncodingFormat) -> Vec<u8> {
    let options = EncoderOptions::new(WIDTH, HEIGHT, &L).set_format(format);
    let mut out = vec![];

    PPMEncoder::new(&pattern(), options)
        .encode(PnmFormat::Pbm, &mut out)
        .unwrap();
    out
}

#[test]
fn raw_pbm_layout() {
    let out = encode(EncodingFormat::Raw);
    let header = b"P4\n23 7\n";

    assert_eq!(&out[..header.len()], header);
    // three bytes per row, last byte padded with zeros
    assert_eq!(out.len(), header.len() + 3 * HEIGHT);
    // first row is two white pixels followed by black
    assert_eq!(&out[header.len()..header.len() + 3], &[0x3F, 0xFF, 0xFE]);
}

#[test]
fn raw_pbm_round_trip() {
    let out = encode(EncodingFormat::Raw);
    let mut decoder = PPMDecoder::new(&out);

    let pixels = decoder.decode().unwrap().u8().unwrap();

    assert_eq!(decoder.get_dimensions(), Some((WIDTH, HEIGHT)));
    assert_eq!(decoder.get_version(), Some(PnmVersion::P4));
    assert_eq!(pixels, pattern());
}

#[test]
fn plain_pbm_round_trip() {
    let out = encode(EncodingFormat::Plain);
    let text = String::from_utf8(out.clone()).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "P1");
    assert_eq!(lines[1], "23 7");
    assert_eq!(lines[2], "00111111111111111111111");
    assert_eq!(lines.len(), 2 + HEIGHT);
    assert!(!text.ends_with('\n'));

    let pixels = PPMDecoder::new(&out).decode().unwrap().u8().unwrap();
    assert_eq!(pixels, pattern());
}

#[test]
fn strict_mode_rejects_samples_above_maxval() {
    let data = b"P2 2 1 10 3 11";

    let lenient = PPMDecoder::new(data).decode().unwrap().u8().unwrap();
    assert_eq!(lenient, [77, 255]);

    let options = DecoderOptions::default().set_strict_mode(true);
    assert!(PPMDecoder::new_with_options(options, data).decode().is_err());
}

#[test]
fn plain_data_shorter_than_the_header_claims() {
    for data in [&b"P2 16384 16384 255\n1 2"[..], &b"P1 16384 16384\n0 1"[..]] {
        let err = PPMDecoder::new(data).decode().unwrap_err();
        assert!(
            matches!(err, tessera_ppm::PPMDecodeErrors::TruncatedData(_, 2)),
            "{err:?}"
        );
    }
}

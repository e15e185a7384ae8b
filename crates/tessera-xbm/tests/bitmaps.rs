/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use tessera_core::info::{ImageInfo, InfoValue};
use tessera_core::mode::{L, RGB};
use tessera_core::options::{DecoderOptions, EncoderOptions};
use tessera_xbm::{probe_xbm, XbmDecoder, XbmEncoder, XbmErrors};

const WIDTH: usize = 10;
const HEIGHT: usize = 3;

#[rustfmt::skip]
const PIXELS: [u8; WIDTH * HEIGHT] = [
    255, 0,   0,   0,   0,   0,   0,   0,   255, 0,
    0,   255, 255, 255, 255, 255, 255, 255, 255, 255,
    0,   0,   0,   0,   0,   0,   0,   0,   0,   255
];

#[test]
fn round_trip_with_hotspot() {
    let options = EncoderOptions::new(WIDTH, HEIGHT, &L).set_label("arrow");
    let mut encoder = XbmEncoder::new(&PIXELS, options);
    encoder.set_hotspot(4, 2);

    let mut out = vec![];
    let written = encoder.encode(&mut out).unwrap();
    assert_eq!(written, out.len());

    let text = String::from_utf8(out.clone()).unwrap();
    assert!(text.starts_with("#define arrow_width 10\n#define arrow_height 3\n"));
    assert!(text.contains("#define arrow_x_hot 4\n#define arrow_y_hot 2\n"));
    assert!(text.contains("static char arrow_bits[] = {\n 0x01 0x01\n 0xfe 0x03\n 0x00 0x02\n};\n"));

    let mut decoder = XbmDecoder::new(&out);
    assert_eq!(decoder.decode().unwrap(), PIXELS);
    assert_eq!(decoder.get_dimensions(), Some((WIDTH, HEIGHT)));
    assert_eq!(decoder.get_mode(), Some(&L));
    assert_eq!(decoder.get_hotspot(), Some((4, 2)));

    let info = decoder.get_info().unwrap();
    assert_eq!(info.get("hotspot"), Some(&InfoValue::Pair(4, 2)));
    assert_eq!(info.get("label").and_then(InfoValue::as_text), Some("arrow"));
}

#[test]
fn hotspot_from_info() {
    let mut info = ImageInfo::new();
    info.insert("hotspot", (1_i64, 0_i64));

    let options = EncoderOptions::new(1, 1, &L);
    let mut encoder = XbmEncoder::new(&[255], options);
    encoder.add_info(&info);

    let mut out = vec![];
    encoder.encode(&mut out).unwrap();

    assert_eq!(
        out,
        b"#define _width 1\n#define _height 1\n#define _x_hot 1\n#define _y_hot 0\nstatic char _bits[] = {\n 0x01\n};\n"
    );
}

#[test]
fn comments_commas_and_unsigned() {
    let source = b"/* Created by hand */
#ifndef STAR
#define star_width 9 /* pixels */
#define star_height 2
// comma separated with a trailing comma
static unsigned char star_bits[4] = {
    0xFF, 0x01,
    0x10, 0x00, };
";
    assert!(probe_xbm(source));

    let mut decoder = XbmDecoder::new(source);
    let pixels = decoder.decode().unwrap();

    assert_eq!(&pixels[..9], &[255; 9]);
    assert_eq!(&pixels[9..], &[0, 0, 0, 0, 255, 0, 0, 0, 0]);
    assert_eq!(decoder.get_hotspot(), None);
    assert_eq!(decoder.get_label(), Some("star"));
}

#[test]
fn unrelated_defines_are_skipped() {
    let source = b"#define dot_name \"dot\"
#define dot_width 2
#define DOT_VERSION 3.1
#define dot_height 1
static char dot_bits[] = { 0x02 };
";
    let mut decoder = XbmDecoder::new(source);

    assert_eq!(decoder.decode().unwrap(), [0, 255]);
    assert_eq!(decoder.get_label(), Some("dot"));

    let text_size = b"#define dot_width \"2\"\n#define dot_height 1\nstatic char dot_bits[] = { 0x02 };";
    assert!(matches!(
        XbmDecoder::new(text_size).decode(),
        Err(XbmErrors::InvalidHeader(_))
    ));
}

#[test]
fn short_and_long_data() {
    let short = b"#define a_width 8\n#define a_height 2\nstatic char a_bits[] = { 0x01 };";
    assert!(matches!(
        XbmDecoder::new(short).decode(),
        Err(XbmErrors::TruncatedData(2, 1))
    ));

    let long = b"#define a_width 8\n#define a_height 1\nstatic char a_bits[] = { 0x01, 0x02 };";
    assert_eq!(XbmDecoder::new(long).decode().unwrap()[0], 255);

    let options = DecoderOptions::default().set_strict_mode(true);
    assert!(XbmDecoder::new_with_options(long, options).decode().is_err());
}

#[test]
fn malformed_headers() {
    let no_height = b"#define a_width 8\nstatic char a_bits[] = { 0x01 };";
    assert!(XbmDecoder::new(no_height).decode().is_err());

    let zero = b"#define a_width 0\n#define a_height 1\nstatic char a_bits[] = { };";
    assert!(matches!(
        XbmDecoder::new(zero).decode(),
        Err(XbmErrors::ZeroDimensions)
    ));

    let x10 = b"#define a_width 8\n#define a_height 1\nstatic short a_bits[] = { 0x0001 };";
    assert!(matches!(
        XbmDecoder::new(x10).decode(),
        Err(XbmErrors::Unsupported(_))
    ));

    let bad_byte = b"#define a_width 8\n#define a_height 1\nstatic char a_bits[] = { 1 };";
    assert!(XbmDecoder::new(bad_byte).decode().is_err());

    let large = b"#define a_width 80\n#define a_height 1\nstatic char a_bits[] = { };";
    let options = DecoderOptions::default().set_max_width(10);
    assert!(matches!(
        XbmDecoder::new_with_options(large, options).decode(),
        Err(XbmErrors::LargeDimensions(10, 80))
    ));

    assert!(!probe_xbm(b"P1 1 1 0"));
}

#[test]
fn encoder_rejects_bad_input() {
    let mut out = vec![];

    let options = EncoderOptions::new(2, 1, &RGB);
    assert!(XbmEncoder::new(&[0; 6], options).encode(&mut out).is_err());

    let options = EncoderOptions::new(2, 2, &L);
    assert!(matches!(
        XbmEncoder::new(&[0; 3], options).encode(&mut out),
        Err(XbmErrors::WrongInputSize(4, 3))
    ));
    assert!(out.is_empty());
}

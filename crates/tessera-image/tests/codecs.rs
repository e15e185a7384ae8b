/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Reading and writing images through the registry
use std::path::PathBuf;

use nanorand::Rng;
use tessera_core::mode::{ColorMode, L, L16, RGB, RGBA, YV12};
use tessera_core::options::EncodingFormat;
use tessera_image::codecs::{CodecConfig, ImageFormat, Registry};
use tessera_image::errors::{ErrorKind, ImageErrors};
use tessera_image::image::Image;
use tessera_image::size::ImageSize;

fn random_image(mode: &'static ColorMode, width: usize, height: usize) -> Image {
    let mut pixels = vec![0_u8; mode.get_length(width, height)];
    nanorand::WyRand::new().fill(&mut pixels);

    Image::from_bytes(mode, ImageSize::try_from((width, height)).unwrap(), pixels).unwrap()
}

/// A 23x7 bitmap with a few set pixels per row
fn bitmap() -> Image {
    let size = ImageSize::new(23, 7).unwrap();
    let pixels = (0..23 * 7)
        .map(|i: usize| if i % 5 == 0 || i % 7 == 3 { 0 } else { 255 })
        .collect();

    Image::from_bytes(&L, size, pixels).unwrap()
}

fn temp_file(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("tessera_{}_{name}", std::process::id()))
}

#[test]
fn pbm_raw_and_plain() {
    let image = bitmap();

    for format in [EncodingFormat::Raw, EncodingFormat::Plain] {
        let config = CodecConfig::new().set_format(format);
        let mut out = vec![];

        Registry::with_all_formats()
            .write_with(ImageFormat::Pbm, &image, &mut out, &config)
            .unwrap();

        let magic = if format == EncodingFormat::Raw { b"P4" } else { b"P1" };
        assert_eq!(&out[..2], magic);

        let decoded = Image::read(ImageFormat::Pbm, &out[..]).unwrap();
        assert_eq!(decoded, image, "{format:?}");
    }
}

#[test]
fn pgm_with_small_maxval() {
    let size = ImageSize::new(2, 1).unwrap();
    let image = Image::from_bytes(&L, size, vec![255, 85]).unwrap();

    let config = CodecConfig::new()
        .set_format(EncodingFormat::Plain)
        .set_maxval(15);
    let mut out = vec![];
    Registry::with_all_formats()
        .write_with(ImageFormat::Pgm, &image, &mut out, &config)
        .unwrap();
    assert_eq!(out, b"P2\n2 1\n15\n15 5");

    let decoded = Image::read(ImageFormat::Pnm, &out[..]).unwrap();
    assert_eq!(decoded, image);
    assert_eq!(decoded.info().get("maxval").and_then(|x| x.as_uint()), Some(15));
}

#[test]
fn pnm_family_members_are_not_interchangeable() {
    let out = bitmap().write_to_vec(ImageFormat::Pbm).unwrap();

    let err = Image::read(ImageFormat::Ppm, &out[..]).unwrap_err();
    assert!(matches!(err, ImageErrors::FormatMismatch(_)), "{err:?}");
    // the generic entry accepts every member
    assert!(Image::read(ImageFormat::Pnm, &out[..]).is_ok());
}

#[test]
fn random_images_survive() {
    let cases: [(ImageFormat, &'static ColorMode); 6] = [
        (ImageFormat::Pgm, &L),
        (ImageFormat::Pgm, &L16),
        (ImageFormat::Ppm, &RGB),
        (ImageFormat::Pam, &RGBA),
        (ImageFormat::Png, &RGB),
        (ImageFormat::Png, &L16)
    ];
    for (format, mode) in cases {
        let image = random_image(mode, 13, 5);
        let out = image.write_to_vec(format).unwrap();
        let decoded = Image::read(format, &out[..]).unwrap();

        assert_eq!(decoded.mode(), mode, "{format:?}");
        assert_eq!(decoded.buffer(), image.buffer(), "{format:?} {mode}");
    }
}

#[test]
fn png_checksums_are_confirmed() {
    let image = random_image(&RGB, 2, 2);
    let mut out = image.write_to_vec(ImageFormat::Png).unwrap();

    // signature, IHDR length and type, 13 bytes of IHDR, then its crc
    out[8 + 8 + 13] ^= 0xFF;

    let err = Image::read(ImageFormat::Png, &out[..]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn planar_images_cannot_be_written() {
    let size = ImageSize::new(2, 2).unwrap();
    let image = Image::new(&YV12, size).unwrap();

    for format in [ImageFormat::Pgm, ImageFormat::Png, ImageFormat::Xbm] {
        let err = image.write_to_vec(format).unwrap_err();
        assert!(matches!(err, ImageErrors::PlanarImage(_)), "{format:?}");
    }
}

#[test]
fn files_use_their_extension() {
    let image = random_image(&RGB, 4, 3);
    let path = temp_file("photo.PNG");

    image.save(&path).unwrap();
    let read = Image::open(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(read, image);
}

#[test]
fn file_stem_is_the_default_label() {
    let path = temp_file("cursor.xbm");

    bitmap().save(&path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    let reopened = Image::open(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let stem = path.file_stem().unwrap().to_string_lossy().into_owned();
    assert!(text.starts_with(&format!("#define {stem}_width 23\n")));
    assert_eq!(reopened.mode(), &L);
    assert_eq!(reopened.size(), (23, 7));
}

#[test]
fn unknown_extensions_are_reported() {
    let image = bitmap();
    let err = image.save(temp_file("picture.tiff")).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UnknownExtension);
    assert!(!temp_file("picture.tiff").exists());

    let err = Image::open(temp_file("no-extension")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownExtension);
}

#[test]
fn failed_saves_write_nothing() {
    let path = temp_file("failed.gif");
    let err = bitmap().save(&path).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotImplemented);
    assert!(!path.exists());
}

#[test]
fn registry_defaults_apply_to_saves() {
    let mut registry = Registry::with_all_formats();
    registry.set_defaults(ImageFormat::Pgm, CodecConfig::new().set_format(EncodingFormat::Plain));

    let mut out = vec![];
    registry.write(ImageFormat::Pgm, &bitmap(), &mut out).unwrap();
    assert_eq!(&out[..2], b"P2");

    // explicit options win over the defaults
    let config = CodecConfig::new().set_format(EncodingFormat::Raw);
    let mut out = vec![];
    registry
        .write_with(ImageFormat::Pgm, &bitmap(), &mut out, &config)
        .unwrap();
    assert_eq!(&out[..2], b"P5");
}

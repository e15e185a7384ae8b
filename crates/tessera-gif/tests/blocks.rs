/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Block parsing of hand built gif streams
use tessera_core::info::InfoValue;
use tessera_core::mode::{RGB, RGBA};
use tessera_core::options::DecoderOptions;
use tessera_gif::{DisposalMethod, GifDecoder, GifDecoderErrors, GifVersion, LzwDecoder};

/// Treats the code stream as the index stream
struct Stored;

impl LzwDecoder for Stored {
    fn decompress(&self, code_stream: &[u8], _: u8) -> Result<Vec<u8>, GifDecoderErrors> {
        Ok(code_stream.to_vec())
    }
}

fn sub_blocks(data: &[u8]) -> Vec<u8> {
    let mut out = vec![];
    for chunk in data.chunks(255) {
        out.push(chunk.len() as u8);
        out.extend_from_slice(chunk);
    }
    out.push(0);
    out
}

/// Header and logical screen with a 4 entry global table
fn screen(width: u16, height: u16, background: u8) -> Vec<u8> {
    let mut out = b"GIF89a".to_vec();
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.extend_from_slice(&[0x80 | 0x01, background, 0]);
    // black, red, green, blue
    out.extend_from_slice(&[0, 0, 0, 255, 0, 0, 0, 255, 0, 0, 0, 255]);
    out
}

fn graphic_control(flags: u8, delay: u16, transparent: u8) -> Vec<u8> {
    let mut out = vec![0x21, 0xF9, 4, flags];
    out.extend_from_slice(&delay.to_le_bytes());
    out.extend_from_slice(&[transparent, 0]);
    out
}

fn image(left: u16, top: u16, width: u16, height: u16, flags: u8, indices: &[u8]) -> Vec<u8> {
    let mut out = vec![0x2C];
    for value in [left, top, width, height] {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out.push(flags);
    out.push(2);
    out.extend_from_slice(&sub_blocks(indices));
    out
}

fn gif(parts: &[Vec<u8>]) -> Vec<u8> {
    let mut out = parts.concat();
    out.push(0x3B);
    out
}

#[test]
fn blocks_are_collected() {
    let mut comment = vec![0x21, 0xFE];
    comment.extend_from_slice(&sub_blocks(b"made by hand"));

    let mut netscape = vec![0x21, 0xFF, 11];
    netscape.extend_from_slice(b"NETSCAPE2.0");
    netscape.extend_from_slice(&[3, 1, 5, 0, 0]);

    let data = gif(&[
        screen(2, 2, 0),
        netscape,
        comment,
        graphic_control(0b0000_1000, 7, 0),
        image(0, 0, 2, 2, 0, &[1, 2, 3, 0]),
        image(1, 1, 1, 1, 0, &[2])
    ]);
    let mut decoder = GifDecoder::new(&data);
    decoder.decode_headers().unwrap();

    assert_eq!(decoder.get_version(), Some(GifVersion::Gif89a));
    assert_eq!(decoder.get_dimensions(), Some((2, 2)));
    assert_eq!(decoder.comments(), ["made by hand"]);
    assert_eq!(decoder.loop_count(), Some(5));
    assert_eq!(decoder.global_table().map(<[_]>::len), Some(4));

    let frames = decoder.frames();
    assert_eq!(frames.len(), 2);

    let control = frames[0].control.unwrap();
    assert_eq!(control.disposal, DisposalMethod::Background);
    assert_eq!(control.delay, 7);
    assert_eq!(control.transparent_index, None);
    assert_eq!(frames[0].data, [1, 2, 3, 0]);

    // graphic control applies to the next image only
    assert!(frames[1].control.is_none());
    assert_eq!((frames[1].left, frames[1].top), (1, 1));

    let info = decoder.get_info().unwrap();
    assert_eq!(info.get("frames"), Some(&InfoValue::UInt(2)));
    assert_eq!(info.get("delay"), Some(&InfoValue::UInt(7)));
    assert_eq!(info.get("version").and_then(InfoValue::as_text), Some("89a"));
    assert_eq!(
        info.get("comments").and_then(InfoValue::as_list).map(<[_]>::len),
        Some(1)
    );
}

#[test]
fn pixels_need_an_lzw_decoder() {
    let data = gif(&[screen(2, 1, 0), image(0, 0, 2, 1, 0, &[1, 2])]);
    let mut decoder = GifDecoder::new(&data);

    assert!(matches!(
        decoder.decode(),
        Err(GifDecoderErrors::LzwUnavailable)
    ));
    // headers are still available
    assert_eq!(decoder.frames().len(), 1);
}

#[test]
fn first_frame_is_resolved_through_the_palette() {
    let data = gif(&[screen(2, 2, 3), image(0, 0, 2, 1, 0, &[1, 2])]);
    let mut decoder = GifDecoder::new(&data);
    decoder.set_lzw_decoder(&Stored);

    let pixels = decoder.decode().unwrap().u8().unwrap();

    assert_eq!(decoder.get_mode(), Some(&RGB));
    // second row is the blue background
    assert_eq!(pixels, [255, 0, 0, 0, 255, 0, 0, 0, 255, 0, 0, 255]);
}

#[test]
fn transparency_gives_rgba() {
    let data = gif(&[
        screen(2, 1, 0),
        graphic_control(1, 0, 2),
        image(0, 0, 2, 1, 0, &[1, 2])
    ]);
    let mut decoder = GifDecoder::new(&data);
    decoder.set_lzw_decoder(&Stored);

    let pixels = decoder.decode().unwrap().u8().unwrap();

    assert_eq!(decoder.get_mode(), Some(&RGBA));
    assert_eq!(pixels, [255, 0, 0, 255, 0, 0, 0, 0]);
}

#[test]
fn local_tables_and_interlacing() {
    // 1x4 frame, interlaced, with a two entry local table
    let mut frame = vec![0x2C, 0, 0, 0, 0, 1, 0, 4, 0, 0x80 | 0x40];
    frame.extend_from_slice(&[10, 10, 10, 20, 20, 20]);
    frame.push(2);
    // stored order is rows 0, 2, 1, 3
    frame.extend_from_slice(&sub_blocks(&[0, 0, 1, 1]));

    let mut data = b"GIF87a".to_vec();
    data.extend_from_slice(&[1, 0, 4, 0, 0, 0, 0]);
    data.extend_from_slice(&frame);
    data.push(0x3B);

    let mut decoder = GifDecoder::new(&data);
    decoder.set_lzw_decoder(&Stored);

    let pixels = decoder.decode().unwrap().u8().unwrap();
    assert_eq!(decoder.get_version(), Some(GifVersion::Gif87a));
    assert_eq!(pixels, [10, 10, 10, 20, 20, 20, 10, 10, 10, 20, 20, 20]);
}

#[test]
fn unknown_extensions_are_skipped() {
    let mut unknown = vec![0x21, 0x99];
    unknown.extend_from_slice(&sub_blocks(&[1, 2, 3]));

    let mut plain_text = vec![0x21, 0x01, 12];
    plain_text.extend_from_slice(&[0; 12]);
    plain_text.extend_from_slice(&sub_blocks(b"hello"));

    let data = gif(&[screen(1, 1, 0), unknown, plain_text, image(0, 0, 1, 1, 0, &[0])]);
    let mut decoder = GifDecoder::new(&data);

    decoder.decode_headers().unwrap();
    assert_eq!(decoder.plain_text(), ["hello"]);
}

#[test]
fn malformed_streams() {
    let frame = image(0, 0, 1, 1, 0, &[0]);

    // bad magic
    let mut data = gif(&[screen(1, 1, 0), frame.clone()]);
    data[4] = b'8';
    assert!(matches!(
        GifDecoder::new(&data).decode_headers(),
        Err(GifDecoderErrors::NotAGif)
    ));

    // unknown block
    let data = gif(&[screen(1, 1, 0), vec![0x42], frame.clone()]);
    assert!(matches!(
        GifDecoder::new(&data).decode_headers(),
        Err(GifDecoderErrors::UnknownBlock(0x42))
    ));

    // no trailer
    let data = [screen(1, 1, 0), frame.clone()].concat();
    assert!(GifDecoder::new(&data).decode_headers().is_err());

    // no images
    let data = gif(&[screen(1, 1, 0)]);
    assert!(matches!(
        GifDecoder::new(&data).decode_headers(),
        Err(GifDecoderErrors::NoFrames)
    ));

    // truncated colour table
    let data = screen(1, 1, 0);
    assert!(GifDecoder::new(&data[..16]).decode_headers().is_err());
}

#[test]
fn frames_past_the_screen() {
    let data = gif(&[screen(1, 1, 0), image(0, 0, 2, 1, 0, &[1, 2])]);

    let options = DecoderOptions::default().set_strict_mode(true);
    assert!(GifDecoder::new_with_options(&data, options)
        .decode_headers()
        .is_err());

    // clipped otherwise
    let mut decoder = GifDecoder::new(&data);
    decoder.set_lzw_decoder(&Stored);
    assert_eq!(decoder.decode().unwrap().u8().unwrap(), [255, 0, 0]);
}

#[test]
fn short_index_streams_are_errors() {
    let data = gif(&[screen(2, 2, 0), image(0, 0, 2, 2, 0, &[1, 2, 3])]);
    let mut decoder = GifDecoder::new(&data);
    decoder.set_lzw_decoder(&Stored);

    assert!(matches!(
        decoder.decode(),
        Err(GifDecoderErrors::TooSmallSize(4, 3))
    ));
}

#[test]
fn zero_sized_frames_are_errors() {
    for (width, height) in [(0, 2), (2, 0)] {
        let data = gif(&[screen(2, 2, 0), image(0, 0, width, height, 0, &[])]);
        let mut decoder = GifDecoder::new(&data);
        decoder.set_lzw_decoder(&Stored);

        assert!(matches!(
            decoder.decode(),
            Err(GifDecoderErrors::Static("Zero sized frame"))
        ));
    }
}

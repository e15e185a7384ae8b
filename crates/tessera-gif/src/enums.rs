/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// Different GIF disposal methods
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DisposalMethod {
    /// No disposal specified
    #[default]
    None,
    /// Leave the frame in place
    InPlace,
    /// Restore the frame area to the background colour
    Background,
    /// Restore the frame area to what was there before
    Restore
}

impl DisposalMethod {
    /// Disposal from the 3 bit field of a graphic control extension,
    /// reserved values map to [`DisposalMethod::None`]
    pub fn from_flags(value: u8) -> DisposalMethod {
        match value {
            1 => DisposalMethod::InPlace,
            2 => DisposalMethod::Background,
            3 => DisposalMethod::Restore,
            _ => DisposalMethod::None
        }
    }
}

/// The gif version from the six byte header
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GifVersion {
    Gif87a,
    Gif89a
}

impl GifVersion {
    pub fn name(self) -> &'static str {
        match self {
            GifVersion::Gif87a => "87a",
            GifVersion::Gif89a => "89a"
        }
    }
}

/// Block introducers of the data stream
pub(crate) mod block {
    pub const EXTENSION: u8 = 0x21;
    pub const IMAGE_DESCRIPTOR: u8 = 0x2C;
    pub const TRAILER: u8 = 0x3B;
}

/// Extension labels following an extension introducer
pub(crate) mod label {
    pub const PLAIN_TEXT: u8 = 0x01;
    pub const GRAPHIC_CONTROL: u8 = 0xF9;
    pub const COMMENT: u8 = 0xFE;
    pub const APPLICATION: u8 = 0xFF;
}

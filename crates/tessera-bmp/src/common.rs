/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use tessera_core::mode::{ColorMode, L, RGB, RGBA};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BmpCompression {
    RGB,
    RLE8,
    RLE4,
    BITFIELDS,
    JPEG,
    PNG,
    ALPHABITFIELDS
}

impl BmpCompression {
    pub fn from_u32(num: u32) -> Option<BmpCompression> {
        match num {
            0 => Some(BmpCompression::RGB),
            1 => Some(BmpCompression::RLE8),
            2 => Some(BmpCompression::RLE4),
            3 => Some(BmpCompression::BITFIELDS),
            4 => Some(BmpCompression::JPEG),
            5 => Some(BmpCompression::PNG),
            6 => Some(BmpCompression::ALPHABITFIELDS),
            _ => None
        }
    }

    pub const fn has_masks(self) -> bool {
        matches!(self, BmpCompression::BITFIELDS | BmpCompression::ALPHABITFIELDS)
    }
}

/// The DIB header variants, named by the structure size
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DibHeader {
    /// `BITMAPCOREHEADER`, 12 bytes
    Core,
    /// OS/2 `BITMAPINFOHEADER2`, 16 to 64 bytes
    Os2V2(u32),
    /// `BITMAPINFOHEADER`, 40 bytes
    Info,
    /// `BITMAPV2INFOHEADER`, 52 bytes
    V2,
    /// `BITMAPV3INFOHEADER`, 56 bytes
    V3,
    /// `BITMAPV4HEADER`, 108 bytes
    V4,
    /// `BITMAPV5HEADER`, 124 bytes
    V5
}

impl DibHeader {
    pub fn from_size(size: u32) -> Option<DibHeader> {
        match size {
            12 => Some(DibHeader::Core),
            16 | 64 => Some(DibHeader::Os2V2(size)),
            40 => Some(DibHeader::Info),
            52 => Some(DibHeader::V2),
            56 => Some(DibHeader::V3),
            108 => Some(DibHeader::V4),
            124 => Some(DibHeader::V5),
            _ => None
        }
    }

    pub const fn size(self) -> u32 {
        match self {
            DibHeader::Core => 12,
            DibHeader::Os2V2(size) => size,
            DibHeader::Info => 40,
            DibHeader::V2 => 52,
            DibHeader::V3 => 56,
            DibHeader::V4 => 108,
            DibHeader::V5 => 124
        }
    }

    /// Whether the header carries compression, resolution and colour count fields
    pub const fn is_extended(self) -> bool {
        self.size() >= 40
    }

    /// Colour table entries are BGR triples for core headers, BGRX quads otherwise
    pub const fn palette_entry_size(self) -> usize {
        match self {
            DibHeader::Core => 3,
            _ => 4
        }
    }
}

/// How a row of pixel data is laid out in the file
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BmpPixelFormat {
    /// 1, 2, 4 or 8 bit indices into a colour table
    PAL8,
    /// 8 bit samples without a colour table
    GRAY8,
    /// 24 bit blue, green, red
    BGR,
    /// 32 bit blue, green, red and an unused byte
    BGRX,
    /// 16 or 32 bit words split by channel masks
    MASKED
}

impl BmpPixelFormat {
    pub fn mode(self, has_alpha: bool) -> &'static ColorMode {
        match self {
            BmpPixelFormat::GRAY8 => &L,
            BmpPixelFormat::MASKED if has_alpha => &RGBA,
            _ => &RGB
        }
    }
}

/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![allow(clippy::upper_case_acronyms, non_camel_case_types)]

use tessera_core::options::RowFilter;

/// Chunk types understood by the decoder, see table 5.3 of
/// https://www.w3.org/TR/2003/REC-PNG-20031110/
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PngChunkType {
    IHDR,
    PLTE,
    IDAT,
    IEND,
    cHRM,
    gAMA,
    iCCP,
    sBIT,
    sRGB,
    bKGD,
    hIST,
    tRNS,
    pHYs,
    sPLT,
    tIME,
    iTXt,
    tEXt,
    zTXt,
    unkn
}

impl PngChunkType {
    pub fn from_bytes(name: &[u8; 4]) -> PngChunkType {
        match name {
            b"IHDR" => Self::IHDR,
            b"PLTE" => Self::PLTE,
            b"IDAT" => Self::IDAT,
            b"IEND" => Self::IEND,
            b"cHRM" => Self::cHRM,
            b"gAMA" => Self::gAMA,
            b"iCCP" => Self::iCCP,
            b"sBIT" => Self::sBIT,
            b"sRGB" => Self::sRGB,
            b"bKGD" => Self::bKGD,
            b"hIST" => Self::hIST,
            b"tRNS" => Self::tRNS,
            b"pHYs" => Self::pHYs,
            b"sPLT" => Self::sPLT,
            b"tIME" => Self::tIME,
            b"iTXt" => Self::iTXt,
            b"tEXt" => Self::tEXt,
            b"zTXt" => Self::zTXt,
            _ => Self::unkn
        }
    }
    pub const fn name(self) -> &'static str {
        match self {
            Self::IHDR => "IHDR",
            Self::PLTE => "PLTE",
            Self::IDAT => "IDAT",
            Self::IEND => "IEND",
            Self::cHRM => "cHRM",
            Self::gAMA => "gAMA",
            Self::iCCP => "iCCP",
            Self::sBIT => "sBIT",
            Self::sRGB => "sRGB",
            Self::bKGD => "bKGD",
            Self::hIST => "hIST",
            Self::tRNS => "tRNS",
            Self::pHYs => "pHYs",
            Self::sPLT => "sPLT",
            Self::tIME => "tIME",
            Self::iTXt => "iTXt",
            Self::tEXt => "tEXt",
            Self::zTXt => "zTXt",
            Self::unkn => "unknown"
        }
    }
    /// Return true if a chunk should appear
    /// before the PLTE chunk
    pub const fn should_appear_before_plte(self) -> bool {
        matches!(
            self,
            Self::cHRM | Self::gAMA | Self::iCCP | Self::sBIT | Self::sRGB
        )
    }
    /// Return true if a chunk should appear
    /// after the PLTE chunk
    pub const fn should_appear_after_plte(self) -> bool {
        matches!(self, Self::bKGD | Self::hIST | Self::tRNS)
    }

    /// Return true if a chunk should appear
    /// before the IDAT chunk
    pub const fn should_appear_before_idat(self) -> bool {
        matches!(
            self,
            Self::PLTE
                | Self::cHRM
                | Self::gAMA
                | Self::iCCP
                | Self::sBIT
                | Self::sRGB
                | Self::bKGD
                | Self::hIST
                | Self::tRNS
                | Self::pHYs
                | Self::sPLT
        )
    }
    /// Chunks that may appear at most once
    pub const fn is_unique(self) -> bool {
        matches!(
            self,
            Self::IHDR
                | Self::PLTE
                | Self::cHRM
                | Self::gAMA
                | Self::iCCP
                | Self::sBIT
                | Self::sRGB
                | Self::bKGD
                | Self::hIST
                | Self::tRNS
                | Self::pHYs
                | Self::tIME
        )
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum FilterMethod {
    #[default]
    None,
    Sub,
    Up,
    Average,
    Paeth,
    // First scanline, special
    PaethFirst,
    AvgFirst
}

impl FilterMethod {
    pub fn from_int(int: u8) -> Option<FilterMethod> {
        match int {
            0 => Some(FilterMethod::None),
            1 => Some(FilterMethod::Sub),
            2 => Some(FilterMethod::Up),
            3 => Some(FilterMethod::Average),
            4 => Some(FilterMethod::Paeth),
            _ => None
        }
    }
    pub const fn to_int(self) -> u8 {
        match self {
            FilterMethod::None => 0,
            FilterMethod::Sub => 1,
            FilterMethod::Up => 2,
            FilterMethod::Average | FilterMethod::AvgFirst => 3,
            FilterMethod::Paeth | FilterMethod::PaethFirst => 4
        }
    }
    /// The fixed filter requested by encoder options, `None`
    /// when the encoder should pick one per row
    pub const fn from_row_filter(filter: RowFilter) -> Option<FilterMethod> {
        match filter {
            RowFilter::Adaptive => None,
            RowFilter::None => Some(FilterMethod::None),
            RowFilter::Sub => Some(FilterMethod::Sub),
            RowFilter::Up => Some(FilterMethod::Up),
            RowFilter::Average => Some(FilterMethod::Average),
            RowFilter::Paeth => Some(FilterMethod::Paeth)
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum InterlaceMethod {
    #[default]
    Standard,
    Adam7
}

impl InterlaceMethod {
    pub fn from_int(int: u8) -> Option<InterlaceMethod> {
        match int {
            0 => Some(Self::Standard),
            1 => Some(Self::Adam7),
            _ => None
        }
    }
}

/// Colour types a png can declare in its IHDR
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum PngColor {
    #[default]
    Luma,
    Palette,
    LumaA,
    RGB,
    RGBA
}

impl PngColor {
    pub const fn num_components(self) -> u8 {
        match self {
            PngColor::Luma => 1,
            PngColor::Palette => 1,
            PngColor::LumaA => 2,
            PngColor::RGB => 3,
            PngColor::RGBA => 4
        }
    }
    pub fn from_int(int: u8) -> Option<PngColor> {
        match int {
            0 => Some(Self::Luma),
            2 => Some(Self::RGB),
            3 => Some(Self::Palette),
            4 => Some(Self::LumaA),
            6 => Some(Self::RGBA),
            _ => None
        }
    }
    pub const fn to_int(self) -> u8 {
        match self {
            Self::Luma => 0,
            Self::RGB => 2,
            Self::Palette => 3,
            Self::LumaA => 4,
            Self::RGBA => 6
        }
    }
}

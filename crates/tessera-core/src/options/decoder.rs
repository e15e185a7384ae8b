/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Global Decoder options
use bitflags::bitflags;

bitflags! {
    /// Decoder options that are flags
    #[derive(Copy, Debug, Clone, PartialEq, Eq)]
    struct DecoderFlags: u32 {
        /// Whether decoders should reject recoverable non-conformance
        const STRICT_MODE           = 0b0000_0001;
        /// Whether the PNG decoder should confirm crc
        const PNG_CONFIRM_CRC       = 0b0000_0010;
        /// Whether the inflate decoder should confirm adler checksums
        const INFLATE_CONFIRM_ADLER = 0b0000_0100;
    }
}

impl Default for DecoderFlags {
    fn default() -> Self {
        DecoderFlags::PNG_CONFIRM_CRC | DecoderFlags::INFLATE_CONFIRM_ADLER
    }
}

/// Decoder options
///
/// Not all options are respected by all decoders,
/// each option lists the decoders that respect it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Maximum width for which decoders will
    /// not try to decode images larger than
    /// the specified width.
    ///
    /// - Default value: 16384
    /// - Respected by: `all decoders`
    max_width:     usize,
    /// Maximum height for which decoders will not
    /// try to decode images larger than the
    /// specified height
    ///
    /// - Default value: 16384
    /// - Respected by: `all decoders`
    max_height:    usize,
    /// Maximum size for inflated data.
    ///
    /// - Default value: 1 GiB
    /// - Respected by: `png`
    deflate_limit: usize,
    flags:         DecoderFlags
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            max_width:     1 << 14,
            max_height:    1 << 14,
            deflate_limit: 1 << 30,
            flags:         DecoderFlags::default()
        }
    }
}

/// Global options respected by all decoders
impl DecoderOptions {
    /// Create decoder options that ignore checksums, useful
    /// for recovering data from damaged files
    pub fn new_lenient() -> DecoderOptions {
        DecoderOptions::default()
            .png_set_confirm_crc(false)
            .inflate_set_confirm_adler(false)
    }
    /// Get maximum width configured for which the decoder
    /// should not try to decode images greater than this width
    pub const fn get_max_width(&self) -> usize {
        self.max_width
    }
    /// Get maximum height configured for which the decoder should
    /// not try to decode images greater than this height
    pub const fn get_max_height(&self) -> usize {
        self.max_height
    }
    /// Return true whether the decoder should be in strict mode
    /// and reject recoverable errors
    pub const fn get_strict_mode(&self) -> bool {
        self.flags.contains(DecoderFlags::STRICT_MODE)
    }
    /// Set maximum width for which the decoder should not try
    /// decoding images greater than that width
    #[must_use]
    pub fn set_max_width(mut self, width: usize) -> Self {
        self.max_width = width;
        self
    }
    /// Set maximum height for which the decoder should not try
    /// decoding images greater than that height
    #[must_use]
    pub fn set_max_height(mut self, height: usize) -> Self {
        self.max_height = height;
        self
    }
    /// Set whether the decoder should be in standards conforming/
    /// strict mode
    ///
    /// This reduces the error tolerance level for the decoders, oddities
    /// that are otherwise logged as warnings become errors
    #[must_use]
    pub fn set_strict_mode(mut self, yes: bool) -> Self {
        self.flags.set(DecoderFlags::STRICT_MODE, yes);
        self
    }
}

/// PNG specific options
impl DecoderOptions {
    /// Whether the inflate decoder should confirm
    /// adler checksums
    pub const fn inflate_get_confirm_adler(&self) -> bool {
        self.flags.contains(DecoderFlags::INFLATE_CONFIRM_ADLER)
    }
    /// Set whether the inflate decoder should confirm
    /// adler checksums
    #[must_use]
    pub fn inflate_set_confirm_adler(mut self, yes: bool) -> Self {
        self.flags.set(DecoderFlags::INFLATE_CONFIRM_ADLER, yes);
        self
    }
    /// Get default inflate limit for which the decoder
    /// will not try to decompress further
    pub const fn inflate_get_limit(&self) -> usize {
        self.deflate_limit
    }
    /// Set the default inflate limit for which decompressors
    /// relying on inflate won't surpass this limit
    #[must_use]
    pub fn inflate_set_limit(mut self, limit: usize) -> Self {
        self.deflate_limit = limit;
        self
    }
    /// Whether the png decoder should confirm
    /// CRC 32 checksums
    pub const fn png_get_confirm_crc(&self) -> bool {
        self.flags.contains(DecoderFlags::PNG_CONFIRM_CRC)
    }
    /// Set whether the png decoder should confirm
    /// CRC 32 checksums
    #[must_use]
    pub fn png_set_confirm_crc(mut self, yes: bool) -> Self {
        self.flags.set(DecoderFlags::PNG_CONFIRM_CRC, yes);
        self
    }
}

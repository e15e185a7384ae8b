/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use crate::mode::{ColorMode, RGB};

/// How samples are written by formats that have both a
/// binary and a text representation
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum EncodingFormat {
    /// Binary samples
    #[default]
    Raw,
    /// ASCII decimal samples
    Plain
}

/// Row filter used by the PNG encoder
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RowFilter {
    /// Pick the filter with the smallest sum of absolute
    /// differences for each row
    #[default]
    Adaptive,
    None,
    Sub,
    Up,
    Average,
    Paeth
}

/// Options shared by the encoders in
/// the `tessera` family of image crates
#[derive(Debug, Clone)]
pub struct EncoderOptions {
    width:      usize,
    height:     usize,
    mode:       &'static ColorMode,
    format:     EncodingFormat,
    maxval:     Option<u32>,
    label:      String,
    row_filter: RowFilter
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            width:      0,
            height:     0,
            mode:       &RGB,
            format:     EncodingFormat::Raw,
            maxval:     None,
            label:      String::new(),
            row_filter: RowFilter::Adaptive
        }
    }
}

impl EncoderOptions {
    /// Create options for an image of the given dimensions and mode
    pub fn new(width: usize, height: usize, mode: &'static ColorMode) -> EncoderOptions {
        EncoderOptions {
            width,
            height,
            mode,
            ..Default::default()
        }
    }
    /// Get the width for which the image will be encoded in
    pub const fn get_width(&self) -> usize {
        self.width
    }
    /// Get height for which the image will be encoded in
    pub const fn get_height(&self) -> usize {
        self.height
    }
    /// Get the colour mode of the samples handed to the encoder
    pub const fn get_mode(&self) -> &'static ColorMode {
        self.mode
    }
    /// Whether samples are written as binary or text
    pub const fn get_format(&self) -> EncodingFormat {
        self.format
    }
    /// The largest sample value written, `None` means the full
    /// range of the mode
    pub const fn get_maxval(&self) -> Option<u32> {
        self.maxval
    }
    /// Prefix of the identifiers written by text based formats
    pub fn get_label(&self) -> &str {
        &self.label
    }
    pub const fn get_row_filter(&self) -> RowFilter {
        self.row_filter
    }

    /// Set width for the image to be encoded
    #[must_use]
    pub fn set_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }
    /// Set height for the image to be encoded
    #[must_use]
    pub fn set_height(mut self, height: usize) -> Self {
        self.height = height;
        self
    }
    /// Set the colour mode of the samples
    #[must_use]
    pub fn set_mode(mut self, mode: &'static ColorMode) -> Self {
        self.mode = mode;
        self
    }
    #[must_use]
    pub fn set_format(mut self, format: EncodingFormat) -> Self {
        self.format = format;
        self
    }
    #[must_use]
    pub fn set_maxval(mut self, maxval: Option<u32>) -> Self {
        self.maxval = maxval;
        self
    }
    #[must_use]
    pub fn set_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }
    #[must_use]
    pub fn set_row_filter(mut self, filter: RowFilter) -> Self {
        self.row_filter = filter;
        self
    }
}

/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Traits codecs implement to read into and write from an [`Image`]
use std::io::Write;

use log::trace;
use tessera_core::mode::ColorMode;

use crate::codecs::ImageFormat;
use crate::errors::ImageErrors;
use crate::image::Image;

/// Encapsulates an image decoder
///
/// All supported decoders implement this, the byte level decoders of
/// the codec crates get implementations in [`codecs`](crate::codecs)
pub trait DecoderTrait {
    /// Decode a buffer already in memory into an image
    ///
    /// Metadata the codec understands is stored in [`Image::info`]
    fn decode(&mut self) -> Result<Image, ImageErrors>;

    /// Get width and height of the image
    ///
    /// # Returns
    /// - Some(width,height)
    /// - None -> If the image hasn't been decoded or the decoder
    ///   does not know the dimensions yet
    fn dimensions(&self) -> Option<(usize, usize)>;

    /// Mode the decoder will produce, if headers have been read
    fn mode(&self) -> Option<&'static ColorMode>;

    /// Name of the decoder
    fn name(&self) -> &'static str;
}

/// Encapsulates an image encoder
pub trait EncoderTrait {
    /// Get the name of the encoder
    fn name(&self) -> &'static str;

    /// Encode and write to a sink
    ///
    /// Called after the image has been checked against
    /// [`supports_mode`](Self::supports_mode), implementations should
    /// not call it directly
    fn encode_inner<W: Write>(&mut self, image: &Image, sink: W) -> Result<usize, ImageErrors>;

    /// Whether images of this mode can be written
    fn supports_mode(&self, mode: &ColorMode) -> bool;

    /// Format this encoder produces
    fn format(&self) -> ImageFormat;

    /// Encode the image into a sink returning the number of bytes
    /// written
    ///
    /// Planar images and modes the format cannot store are rejected
    /// before anything is written
    fn encode<W: Write>(&mut self, image: &Image, sink: W) -> Result<usize, ImageErrors> {
        let mode = image.mode();

        if mode.is_planar() {
            return Err(ImageErrors::PlanarImage(self.name()));
        }
        if !self.supports_mode(mode) {
            return Err(ImageErrors::FormatMismatch(format!(
                "{} cannot write {} images",
                self.name(),
                mode.name()
            )));
        }
        trace!("Encoding {} image with {}", image.size(), self.name());

        self.encode_inner(image, sink)
    }
}

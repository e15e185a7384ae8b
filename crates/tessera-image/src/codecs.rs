/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Entry point for all supported codecs the library understands
//!
//! The codecs here can be enabled and disabled at will depending on the
//! configured features, it is recommended that you enable only the codecs
//! you use.
//!
//! Codecs are picked by file extension through a [`Registry`], a format
//! is never guessed from file contents. The one exception is the generic
//! `pnm` format which reads the magic number to find out which member of
//! the Netpbm family it is holding.
//!
//! [`Image::open`] and [`Image::save`] use a process wide registry with
//! every format registered under its usual extensions, build your own
//! [`Registry`] to change the mapping.
use std::collections::{BTreeMap, HashMap};
use std::fmt::{Debug, Formatter};
use std::io::{Read, Write};
use std::path::Path;
use std::sync::{Arc, OnceLock};

use log::{trace, warn};
use tessera_core::options::{DecoderOptions, EncoderOptions, EncodingFormat};
#[cfg(any(feature = "ppm", feature = "png", feature = "gif"))]
use tessera_core::result::DecodingResult;

use crate::errors::ImageErrors;
use crate::image::Image;
use crate::pixel::PixelView;
use crate::traits::DecoderTrait;

pub mod bmp;
pub mod gif;
pub mod png;
pub mod ppm;
pub mod xbm;

/// All supported image formats
///
/// This enum contains every format the registry can map an extension
/// to, whether or not its codec was compiled in
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ImageFormat {
    /// Portable Bitmap, bilevel
    Pbm,
    /// Portable Graymap
    Pgm,
    /// Portable Pixmap
    Ppm,
    /// Portable Arbitrary Map
    Pam,
    /// Any member of the Netpbm family, chosen by magic number on
    /// reading and by mode on writing
    Pnm,
    /// Portable Network Graphics
    Png,
    /// Graphics Interchange Format
    Gif,
    /// Windows Bitmap Files
    Bmp,
    /// X11 bitmap
    Xbm
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 9] = [
        ImageFormat::Pbm,
        ImageFormat::Pgm,
        ImageFormat::Ppm,
        ImageFormat::Pam,
        ImageFormat::Pnm,
        ImageFormat::Png,
        ImageFormat::Gif,
        ImageFormat::Bmp,
        ImageFormat::Xbm
    ];

    /// Extensions the default registry maps to this format
    pub const fn extensions(self) -> &'static [&'static str] {
        match self {
            ImageFormat::Pbm => &["pbm"],
            ImageFormat::Pgm => &["pgm"],
            ImageFormat::Ppm => &["ppm"],
            ImageFormat::Pam => &["pam"],
            ImageFormat::Pnm => &["pnm"],
            ImageFormat::Png => &["png"],
            ImageFormat::Gif => &["gif", "gfa", "giff"],
            ImageFormat::Bmp => &["bmp", "dib"],
            ImageFormat::Xbm => &["xbm", "bm", "bitmap"]
        }
    }

    /// Return true if the codec for this format was compiled in
    pub const fn is_included(self) -> bool {
        match self {
            ImageFormat::Pbm
            | ImageFormat::Pgm
            | ImageFormat::Ppm
            | ImageFormat::Pam
            | ImageFormat::Pnm => cfg!(feature = "ppm"),
            ImageFormat::Png => cfg!(feature = "png"),
            ImageFormat::Gif => cfg!(feature = "gif"),
            ImageFormat::Bmp => cfg!(feature = "bmp"),
            ImageFormat::Xbm => cfg!(feature = "xbm")
        }
    }

    /// Return true if images can be written in this format
    pub const fn has_encoder(self) -> bool {
        match self {
            ImageFormat::Gif | ImageFormat::Bmp => false,
            _ => self.is_included()
        }
    }

    /// Decode an in memory file of this format
    #[allow(unused_variables)]
    pub fn decode(self, data: &[u8], config: &CodecConfig) -> Result<Image, ImageErrors> {
        match self {
            ImageFormat::Pbm
            | ImageFormat::Pgm
            | ImageFormat::Ppm
            | ImageFormat::Pam
            | ImageFormat::Pnm => {
                #[cfg(feature = "ppm")]
                {
                    ppm::decode_pnm(self, data, config)
                }
                #[cfg(not(feature = "ppm"))]
                {
                    Err(ImageErrors::FormatNotIncluded(self))
                }
            }
            ImageFormat::Png => {
                #[cfg(feature = "png")]
                {
                    let mut decoder =
                        tessera_png::PngDecoder::new_with_options(data, config.decoder_options());
                    DecoderTrait::decode(&mut decoder)
                }
                #[cfg(not(feature = "png"))]
                {
                    Err(ImageErrors::FormatNotIncluded(self))
                }
            }
            ImageFormat::Gif => {
                #[cfg(feature = "gif")]
                {
                    gif::decode_gif(data, config)
                }
                #[cfg(not(feature = "gif"))]
                {
                    Err(ImageErrors::FormatNotIncluded(self))
                }
            }
            ImageFormat::Bmp => {
                #[cfg(feature = "bmp")]
                {
                    let mut decoder =
                        tessera_bmp::BmpDecoder::new_with_options(data, config.decoder_options());
                    DecoderTrait::decode(&mut decoder)
                }
                #[cfg(not(feature = "bmp"))]
                {
                    Err(ImageErrors::FormatNotIncluded(self))
                }
            }
            ImageFormat::Xbm => {
                #[cfg(feature = "xbm")]
                {
                    let mut decoder =
                        tessera_xbm::XbmDecoder::new_with_options(data, config.decoder_options());
                    DecoderTrait::decode(&mut decoder)
                }
                #[cfg(not(feature = "xbm"))]
                {
                    Err(ImageErrors::FormatNotIncluded(self))
                }
            }
        }
    }

    /// Encode an image in this format into `sink`, returning the number
    /// of bytes written
    #[allow(unused_variables)]
    pub fn encode<W: Write>(
        self, image: &Image, config: &CodecConfig, sink: W
    ) -> Result<usize, ImageErrors> {
        match self {
            ImageFormat::Pbm
            | ImageFormat::Pgm
            | ImageFormat::Ppm
            | ImageFormat::Pam
            | ImageFormat::Pnm => {
                #[cfg(feature = "ppm")]
                {
                    use crate::traits::EncoderTrait;

                    let mut encoder = ppm::PPMEncoder::new(self, config.clone());
                    encoder.encode(image, sink)
                }
                #[cfg(not(feature = "ppm"))]
                {
                    Err(ImageErrors::FormatNotIncluded(self))
                }
            }
            ImageFormat::Png => {
                #[cfg(feature = "png")]
                {
                    use crate::traits::EncoderTrait;

                    let mut encoder = png::PngEncoder::new(config.clone());
                    encoder.encode(image, sink)
                }
                #[cfg(not(feature = "png"))]
                {
                    Err(ImageErrors::FormatNotIncluded(self))
                }
            }
            ImageFormat::Xbm => {
                #[cfg(feature = "xbm")]
                {
                    use crate::traits::EncoderTrait;

                    let mut encoder = xbm::XbmEncoder::new(config.clone());
                    encoder.encode(image, sink)
                }
                #[cfg(not(feature = "xbm"))]
                {
                    Err(ImageErrors::FormatNotIncluded(self))
                }
            }
            ImageFormat::Gif => Err(ImageErrors::NotImplemented("gif encoding")),
            ImageFormat::Bmp => Err(ImageErrors::NotImplemented("bmp encoding"))
        }
    }
}

/// Wrap a decoded sample buffer in an image
#[cfg(any(feature = "ppm", feature = "png", feature = "gif"))]
pub(crate) fn image_from_samples(
    mode: &'static tessera_core::mode::ColorMode, (width, height): (usize, usize),
    pixels: DecodingResult
) -> Result<Image, ImageErrors> {
    let bytes = match pixels {
        DecodingResult::U8(data) => data,
        DecodingResult::U16(data) => bytemuck::cast_slice::<u16, u8>(&data).to_vec()
    };
    let size = crate::size::ImageSize::try_from((width, height))?;

    Image::from_bytes(mode, size, bytes)
}

/// Decides whether a pixel is set when writing bilevel formats
pub type ClipFn = Arc<dyn Fn(&PixelView<'_>, &Image) -> bool + Send + Sync>;

/// Codec configuration
///
/// Every field is optional, codecs ignore the ones they do not
/// understand.
///
/// | field    | used by      | effect                                      |
/// |----------|--------------|---------------------------------------------|
/// | `format` | pnm family   | raw (binary) or plain (text) samples        |
/// | `maxval` | pnm family   | maximum sample value written                |
/// | `clip`   | xbm          | whether a pixel becomes a set bit           |
/// | `label`  | xbm          | prefix of the `#define`s and the bits array |
/// | `strict` | all decoders | fail on oddities instead of warning         |
/// | `lzw`    | gif          | decompressor for frame data                 |
///
/// Configuration registered with a format acts as defaults, the
/// configuration passed to a single read or write overrides it field
/// by field, see [`merge`](Self::merge).
#[derive(Clone, Default)]
pub struct CodecConfig {
    pub format: Option<EncodingFormat>,
    pub maxval: Option<u32>,
    pub clip:   Option<ClipFn>,
    pub label:  Option<String>,
    pub strict: Option<bool>,
    #[cfg(feature = "gif")]
    pub lzw:    Option<Arc<dyn tessera_gif::LzwDecoder + Send + Sync>>
}

impl CodecConfig {
    pub fn new() -> CodecConfig {
        CodecConfig::default()
    }
    pub fn set_format(mut self, format: EncodingFormat) -> Self {
        self.format = Some(format);
        self
    }
    pub fn set_maxval(mut self, maxval: u32) -> Self {
        self.maxval = Some(maxval);
        self
    }
    pub fn set_clip<F>(mut self, clip: F) -> Self
    where
        F: Fn(&PixelView<'_>, &Image) -> bool + Send + Sync + 'static
    {
        self.clip = Some(Arc::new(clip));
        self
    }
    pub fn set_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }
    pub fn set_strict(mut self, strict: bool) -> Self {
        self.strict = Some(strict);
        self
    }
    #[cfg(feature = "gif")]
    pub fn set_lzw_decoder<L>(mut self, lzw: L) -> Self
    where
        L: tessera_gif::LzwDecoder + Send + Sync + 'static
    {
        self.lzw = Some(Arc::new(lzw));
        self
    }

    /// Combine two configurations, fields set in `overrides` win
    pub fn merge(&self, overrides: &CodecConfig) -> CodecConfig {
        CodecConfig {
            format: overrides.format.or(self.format),
            maxval: overrides.maxval.or(self.maxval),
            clip:   overrides.clip.clone().or_else(|| self.clip.clone()),
            label:  overrides.label.clone().or_else(|| self.label.clone()),
            strict: overrides.strict.or(self.strict),
            #[cfg(feature = "gif")]
            lzw:    overrides.lzw.clone().or_else(|| self.lzw.clone())
        }
    }

    pub(crate) fn decoder_options(&self) -> DecoderOptions {
        let options = DecoderOptions::default();

        match self.strict {
            Some(strict) => options.set_strict_mode(strict),
            None => options
        }
    }

    pub(crate) fn encoder_options(&self, image: &Image) -> EncoderOptions {
        let (width, height) = image.dimensions();

        EncoderOptions::new(width, height, image.mode())
            .set_format(self.format.unwrap_or_default())
            .set_maxval(self.maxval)
            .set_label(self.label.as_deref().unwrap_or(""))
    }
}

impl Debug for CodecConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("CodecConfig");

        debug
            .field("format", &self.format)
            .field("maxval", &self.maxval)
            .field("clip", &self.clip.as_ref().map(|_| "fn"))
            .field("label", &self.label)
            .field("strict", &self.strict);

        #[cfg(feature = "gif")]
        debug.field("lzw", &self.lzw.as_ref().map(|_| "dyn LzwDecoder"));

        debug.finish()
    }
}

/// Lowercase, without surrounding whitespace or leading dots
fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_lowercase()
}

/// A mapping from file extensions to formats
///
/// # Example
/// ```
/// use tessera_image::codecs::{ImageFormat, Registry};
///
/// let mut registry = Registry::new();
/// registry.register(ImageFormat::Xbm, &["icon"], &[]);
///
/// assert_eq!(registry.lookup(".ICON"), Some(ImageFormat::Xbm));
/// assert_eq!(registry.lookup("bitmap"), Some(ImageFormat::Xbm));
///
/// registry.unregister(ImageFormat::Xbm, &["xbm"], &[]);
/// assert_eq!(registry.extensions().collect::<Vec<_>>(), ["xbm"]);
/// ```
#[derive(Clone, Debug)]
pub struct Registry {
    extensions: BTreeMap<String, ImageFormat>,
    defaults:   HashMap<ImageFormat, CodecConfig>
}

impl Registry {
    /// An empty registry
    pub fn new() -> Registry {
        Registry {
            extensions: BTreeMap::new(),
            defaults:   HashMap::new()
        }
    }

    /// A registry with every format mapped to its usual extensions
    pub fn with_all_formats() -> Registry {
        let mut registry = Registry::new();

        for format in ImageFormat::ALL {
            registry.register(format, &[], &[]);
        }
        registry
    }

    /// Map extensions to a format
    ///
    /// If `only` is not empty exactly those extensions are mapped,
    /// otherwise the format's usual extensions plus `also`. An extension
    /// already mapped to another format is taken over.
    pub fn register(&mut self, format: ImageFormat, also: &[&str], only: &[&str]) {
        let extensions: Vec<&str> = if only.is_empty() {
            format.extensions().iter().chain(also).copied().collect()
        } else {
            if !also.is_empty() {
                warn!("Both also and only given when registering {format:?}, ignoring also");
            }
            only.to_vec()
        };
        for extension in extensions {
            let extension = normalize_extension(extension);

            if let Some(previous) = self.extensions.insert(extension.clone(), format) {
                if previous != format {
                    trace!("Extension {extension:?} moved from {previous:?} to {format:?}");
                }
            }
        }
    }

    /// Map extensions to a format with default configuration for it
    pub fn register_with(
        &mut self, format: ImageFormat, also: &[&str], only: &[&str], config: CodecConfig
    ) {
        self.register(format, also, only);
        self.set_defaults(format, config);
    }

    /// Configuration used for every read and write of `format`
    pub fn set_defaults(&mut self, format: ImageFormat, config: CodecConfig) {
        self.defaults.insert(format, config);
    }

    /// Remove extensions of a format
    ///
    /// If `discard` is not empty exactly those extensions are removed,
    /// even ones also listed in `keep`. Otherwise every extension of the
    /// format except those in `keep` is removed. Extensions mapped to
    /// other formats are never touched.
    pub fn unregister(&mut self, format: ImageFormat, keep: &[&str], discard: &[&str]) {
        let keep: Vec<String> = keep.iter().map(|x| normalize_extension(x)).collect();
        let discard: Vec<String> = discard.iter().map(|x| normalize_extension(x)).collect();

        self.extensions.retain(|extension, mapped| {
            if *mapped != format {
                return true;
            }
            if discard.is_empty() {
                keep.contains(extension)
            } else {
                !discard.contains(extension)
            }
        });
    }

    /// The format an extension is mapped to
    pub fn lookup(&self, extension: &str) -> Option<ImageFormat> {
        self.extensions
            .get(&normalize_extension(extension))
            .copied()
    }
    pub fn contains(&self, extension: &str) -> bool {
        self.lookup(extension).is_some()
    }
    /// Number of mapped extensions
    pub fn len(&self) -> usize {
        self.extensions.len()
    }
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
    /// Mapped extensions in sorted order
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.extensions.keys().map(String::as_str)
    }

    /// Resolve the format of a path from its extension
    pub fn format_for_path<P: AsRef<Path>>(&self, path: P) -> Result<ImageFormat, ImageErrors> {
        let extension = path
            .as_ref()
            .extension()
            .map(|x| x.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.lookup(&extension)
            .ok_or(ImageErrors::UnknownExtension(extension))
    }

    /// Registered defaults for `format` overridden by `config`
    pub fn config_for(&self, format: ImageFormat, config: &CodecConfig) -> CodecConfig {
        match self.defaults.get(&format) {
            Some(defaults) => defaults.merge(config),
            None => config.clone()
        }
    }

    /// Read an image from a file, picking the codec by extension
    pub fn open<P: AsRef<Path>>(&self, path: P, config: &CodecConfig) -> Result<Image, ImageErrors> {
        let format = self.format_for_path(&path)?;
        trace!("Opening {:?} as {format:?}", path.as_ref());

        let data = std::fs::read(path)?;
        format.decode(&data, &self.config_for(format, config))
    }

    /// Write an image to a file, picking the codec by extension
    ///
    /// Unless configured otherwise the file stem is used as the label of
    /// formats that store one. Nothing is written if encoding fails.
    pub fn save<P: AsRef<Path>>(
        &self, image: &Image, path: P, config: &CodecConfig
    ) -> Result<(), ImageErrors> {
        let path = path.as_ref();
        let format = self.format_for_path(path)?;
        let mut config = self.config_for(format, config);

        if config.label.is_none() {
            config.label = path.file_stem().map(|x| x.to_string_lossy().into_owned());
        }
        trace!("Saving {path:?} as {format:?}");

        let mut encoded = vec![];
        format.encode(image, &config, &mut encoded)?;

        let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
        file.write_all(&encoded)?;
        file.flush()?;

        Ok(())
    }

    /// Read an image of a known format from a stream, the stream is
    /// read to its end but not closed
    pub fn read<R: Read>(&self, format: ImageFormat, reader: R) -> Result<Image, ImageErrors> {
        self.read_with(format, reader, &CodecConfig::default())
    }
    pub fn read_with<R: Read>(
        &self, format: ImageFormat, mut reader: R, config: &CodecConfig
    ) -> Result<Image, ImageErrors> {
        let mut data = vec![];
        reader.read_to_end(&mut data)?;

        format.decode(&data, &self.config_for(format, config))
    }

    /// Write an image in a known format to a stream, returning the
    /// number of bytes written
    pub fn write<W: Write>(
        &self, format: ImageFormat, image: &Image, writer: W
    ) -> Result<usize, ImageErrors> {
        self.write_with(format, image, writer, &CodecConfig::default())
    }
    pub fn write_with<W: Write>(
        &self, format: ImageFormat, image: &Image, writer: W, config: &CodecConfig
    ) -> Result<usize, ImageErrors> {
        format.encode(image, &self.config_for(format, config), writer)
    }
}

/// Same as [`Registry::with_all_formats`]
impl Default for Registry {
    fn default() -> Self {
        Registry::with_all_formats()
    }
}

/// The registry used by [`Image::open`] and friends
///
/// Built once on first use with every format registered
pub fn default_registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();

    REGISTRY.get_or_init(Registry::with_all_formats)
}

// file and stream I/O
impl Image {
    /// Open an encoded file, the format is picked from the extension
    ///
    /// See [`read`](Self::read) for reading from memory or other streams
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Image, ImageErrors> {
        Image::open_with(path, &CodecConfig::default())
    }
    /// Open an encoded file with custom codec configuration
    ///
    /// # Example
    /// ```no_run
    /// use tessera_image::codecs::CodecConfig;
    /// use tessera_image::image::Image;
    ///
    /// let config = CodecConfig::new().set_strict(true);
    /// let image = Image::open_with("/a/file.png", &config).unwrap();
    /// ```
    pub fn open_with<P: AsRef<Path>>(path: P, config: &CodecConfig) -> Result<Image, ImageErrors> {
        default_registry().open(path, config)
    }

    /// Save the image to a file and use the extension to
    /// determine the format
    ///
    /// If the extension cannot be determined from the path, it's an error.
    ///
    /// # Example
    /// ```no_run
    /// use tessera_core::mode::L;
    /// use tessera_image::image::Image;
    /// use tessera_image::size::ImageSize;
    ///
    /// let image = Image::new(&L, ImageSize::new(100, 100).unwrap()).unwrap();
    /// image.save("black.pgm").unwrap();
    /// ```
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ImageErrors> {
        self.save_with(path, &CodecConfig::default())
    }
    /// Save the image with custom codec configuration
    pub fn save_with<P: AsRef<Path>>(&self, path: P, config: &CodecConfig) -> Result<(), ImageErrors> {
        default_registry().save(self, path, config)
    }

    /// Decode an image of a known format from a stream
    ///
    /// # Example
    /// ```
    /// use tessera_image::codecs::ImageFormat;
    /// use tessera_image::image::Image;
    ///
    /// let image = Image::read(ImageFormat::Pgm, &b"P5 2 1 255 \x01\x02"[..]).unwrap();
    /// assert_eq!(image.buffer(), [1, 2]);
    /// ```
    pub fn read<R: Read>(format: ImageFormat, reader: R) -> Result<Image, ImageErrors> {
        default_registry().read(format, reader)
    }

    /// Encode the image into a stream, returning the number of bytes
    /// written
    pub fn write<W: Write>(&self, format: ImageFormat, writer: W) -> Result<usize, ImageErrors> {
        default_registry().write(format, self, writer)
    }

    /// Encode an image returning a vector containing the result
    /// of the encoding
    pub fn write_to_vec(&self, format: ImageFormat) -> Result<Vec<u8>, ImageErrors> {
        let mut sink = vec![];
        self.write(format, &mut sink)?;
        Ok(sink)
    }

    /// Decode an image with an already configured decoder
    pub fn from_decoder(mut decoder: impl DecoderTrait) -> Result<Image, ImageErrors> {
        decoder.decode()
    }
}

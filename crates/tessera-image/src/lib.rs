/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A raster image model and the codecs to read and write it
//!
//! An [`Image`](image::Image) is a colour mode from the
//! [`tessera_core::mode`] catalog, a size and one buffer of samples.
//! Rows and pixels are exposed through views that read and write
//! the buffer in place, anything selected with a slice is copied.
//!
//! # Example
//! ```
//! use tessera_core::mode::RGB;
//! use tessera_core::sample::Sample;
//! use tessera_image::image::Image;
//! use tessera_image::size::ImageSize;
//!
//! let mut image = Image::new(&RGB, ImageSize::new(4, 4).unwrap()).unwrap();
//!
//! for mut line in image.lines_mut().unwrap() {
//!     line.pixel_mut(0).unwrap().set_component("r", Sample::Int(255)).unwrap();
//! }
//! image.map(&[], &[("b", &|_| Sample::Int(64))]).unwrap();
//!
//! let rotated = image.rotate90().unwrap();
//! assert_eq!(rotated.pixel(0, 0).unwrap().value(), [Sample::Int(255), Sample::Int(0), Sample::Int(64)]);
//! ```
//!
//! # Features
//! - `ppm`, `png`, `gif`, `bmp`, `xbm`: Include the codec for that format
//! - `serde-support`: Serialize image descriptions and metadata
pub use tessera_core;

pub mod codecs;
pub mod errors;
pub mod image;
pub mod index;
pub mod line;
pub mod pixel;
mod serde;
pub mod size;
pub mod traits;

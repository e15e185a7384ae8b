/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Core routines shared by all libraries
//!
//! This crate provides a set of core routines shared
//! by the decoders and encoders under the `tessera` umbrella
//!
//! It currently contains
//!
//! - The colour mode catalog, describing every pixel layout an image can have
//! - A sample type that can hold any component value of any mode
//! - Parsing of textual colour notation
//! - A string keyed metadata map codecs use to hand sidecar information to images
//! - A bytestream reader and writer with endian aware reads and writes
//! - Image decoder and encoder options
//! - The sample buffer type decoders return
//!
//! # Features
//!  - `serde`: Enables serializing of colour modes and image metadata
#![allow(clippy::upper_case_acronyms)]

pub mod bytestream;
pub mod color;
pub mod errors;
pub mod info;
pub mod mode;
pub mod options;
pub mod result;
pub mod sample;
mod serde;

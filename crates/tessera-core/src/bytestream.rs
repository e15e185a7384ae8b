/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A simple implementation of a bytestream reader
//! and writer.
//!
//! The reader works over an in memory slice, decoders read the whole
//! file before parsing. The writer wraps anything implementing
//! [`std::io::Write`] and keeps count of what went through it.
pub use reader::ZByteReader;
pub use writer::ZByteWriter;

mod reader;
mod writer;

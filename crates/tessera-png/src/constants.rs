/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// The 8 bytes every png file starts with, `\x89PNG\r\n\x1a\n`
pub const PNG_SIGNATURE: u64 = 0x89504E470D0A1A0A;

/// Size of the IDAT chunks written by the encoder
pub const IDAT_CHUNK_SIZE: usize = 8192;

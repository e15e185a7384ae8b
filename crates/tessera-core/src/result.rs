/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// A simple enum that can hold either
/// u8's or u16's used for decoding pixels
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodingResult {
    U8(Vec<u8>),
    U16(Vec<u16>)
}

impl DecodingResult {
    /// Return the contents if the enum stores `Vec<u8>` or otherwise
    /// return None.
    ///
    /// # Example
    /// ```
    /// use tessera_core::result::DecodingResult;
    /// let data = DecodingResult::U8(vec![0;100]);
    /// assert!(data.u8().is_some());
    ///
    /// let data = DecodingResult::U16(vec![0;100]);
    /// assert!(data.u8().is_none());
    /// ```
    pub fn u8(self) -> Option<Vec<u8>> {
        match self {
            DecodingResult::U8(data) => Some(data),
            _ => None
        }
    }
    /// Return the contents if the enum stores `Vec<u16>` or otherwise
    /// return None.
    pub fn u16(self) -> Option<Vec<u16>> {
        match self {
            DecodingResult::U16(data) => Some(data),
            _ => None
        }
    }
    /// Flatten the samples into native endian bytes
    pub fn into_ne_bytes(self) -> Vec<u8> {
        match self {
            DecodingResult::U8(data) => data,
            DecodingResult::U16(data) => data.iter().flat_map(|x| x.to_ne_bytes()).collect()
        }
    }
}

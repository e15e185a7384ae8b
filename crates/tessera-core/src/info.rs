/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Sidecar metadata attached to images
//!
//! Decoders record whatever extra information a file carries
//! (palettes, gamma, text chunks, hotspots ...) here, encoders
//! may read it back when writing.
use std::collections::BTreeMap;

/// A single metadata value
#[derive(Clone, Debug, PartialEq)]
pub enum InfoValue {
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Pair(i64, i64),
    List(Vec<InfoValue>),
    Map(BTreeMap<String, InfoValue>)
}

impl InfoValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            InfoValue::Text(text) => Some(text),
            _ => None
        }
    }
    pub fn as_float(&self) -> Option<f64> {
        match self {
            InfoValue::Float(value) => Some(*value),
            InfoValue::Int(value) => Some(*value as f64),
            InfoValue::UInt(value) => Some(*value as f64),
            _ => None
        }
    }
    pub fn as_pair(&self) -> Option<(i64, i64)> {
        match self {
            InfoValue::Pair(a, b) => Some((*a, *b)),
            _ => None
        }
    }
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            InfoValue::Bytes(bytes) => Some(bytes),
            _ => None
        }
    }
    pub fn as_map(&self) -> Option<&BTreeMap<String, InfoValue>> {
        match self {
            InfoValue::Map(map) => Some(map),
            _ => None
        }
    }
    pub fn as_list(&self) -> Option<&[InfoValue]> {
        match self {
            InfoValue::List(list) => Some(list),
            _ => None
        }
    }
    /// The value as an unsigned integer, signed values
    /// are accepted when non-negative
    pub fn as_uint(&self) -> Option<u64> {
        match self {
            InfoValue::UInt(value) => Some(*value),
            InfoValue::Int(value) => u64::try_from(*value).ok(),
            _ => None
        }
    }
}

impl From<&str> for InfoValue {
    fn from(value: &str) -> Self {
        InfoValue::Text(value.to_string())
    }
}

impl From<String> for InfoValue {
    fn from(value: String) -> Self {
        InfoValue::Text(value)
    }
}

impl From<i64> for InfoValue {
    fn from(value: i64) -> Self {
        InfoValue::Int(value)
    }
}

impl From<u64> for InfoValue {
    fn from(value: u64) -> Self {
        InfoValue::UInt(value)
    }
}

impl From<f64> for InfoValue {
    fn from(value: f64) -> Self {
        InfoValue::Float(value)
    }
}

impl From<Vec<u8>> for InfoValue {
    fn from(value: Vec<u8>) -> Self {
        InfoValue::Bytes(value)
    }
}

impl From<(i64, i64)> for InfoValue {
    fn from(value: (i64, i64)) -> Self {
        InfoValue::Pair(value.0, value.1)
    }
}

impl From<Vec<InfoValue>> for InfoValue {
    fn from(value: Vec<InfoValue>) -> Self {
        InfoValue::List(value)
    }
}

impl From<BTreeMap<String, InfoValue>> for InfoValue {
    fn from(value: BTreeMap<String, InfoValue>) -> Self {
        InfoValue::Map(value)
    }
}

/// A string keyed map of metadata
///
/// Keys are kept in sorted order so iteration is deterministic
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImageInfo {
    entries: BTreeMap<String, InfoValue>
}

impl ImageInfo {
    pub fn new() -> ImageInfo {
        ImageInfo::default()
    }
    /// Insert a value, returning the previous value stored
    /// under `key` if any
    pub fn insert<K: Into<String>, V: Into<InfoValue>>(
        &mut self, key: K, value: V
    ) -> Option<InfoValue> {
        self.entries.insert(key.into(), value.into())
    }
    pub fn get(&self, key: &str) -> Option<&InfoValue> {
        self.entries.get(key)
    }
    pub fn get_mut(&mut self, key: &str) -> Option<&mut InfoValue> {
        self.entries.get_mut(key)
    }
    pub fn remove(&mut self, key: &str) -> Option<InfoValue> {
        self.entries.remove(key)
    }
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
    pub fn iter(&self) -> impl Iterator<Item = (&String, &InfoValue)> {
        self.entries.iter()
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    /// Copy every entry of `other` into self, overwriting
    /// entries with the same key
    pub fn extend(&mut self, other: &ImageInfo) {
        for (key, value) in other.iter() {
            self.entries.insert(key.clone(), value.clone());
        }
    }
}

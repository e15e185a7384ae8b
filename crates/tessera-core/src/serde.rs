/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![cfg(feature = "serde")]

use serde::ser::*;

use crate::info::{ImageInfo, InfoValue};
use crate::mode::ColorMode;
use crate::sample::Sample;

impl Serialize for ColorMode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        // modes are catalog members, their name identifies them
        serializer.serialize_str(self.name())
    }
}

impl Serialize for Sample {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        match self {
            Sample::Int(value) => serializer.serialize_u64(*value),
            Sample::Float(value) => serializer.serialize_f64(*value)
        }
    }
}

impl Serialize for InfoValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        match self {
            InfoValue::Int(value) => serializer.serialize_i64(*value),
            InfoValue::UInt(value) => serializer.serialize_u64(*value),
            InfoValue::Float(value) => serializer.serialize_f64(*value),
            InfoValue::Text(value) => serializer.serialize_str(value),
            InfoValue::Bytes(value) => serializer.serialize_bytes(value),
            InfoValue::Pair(a, b) => {
                let mut tuple = serializer.serialize_tuple(2)?;
                tuple.serialize_element(a)?;
                tuple.serialize_element(b)?;
                tuple.end()
            }
            InfoValue::List(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            InfoValue::Map(values) => {
                let mut map = serializer.serialize_map(Some(values.len()))?;
                for (key, value) in values {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl Serialize for ImageInfo {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![cfg(feature = "serde-support")]
//! Serializes image descriptions, pixel data is never serialized

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::codecs::ImageFormat;
use crate::image::Image;
use crate::size::ImageSize;

impl Serialize for ImageSize {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        let mut state = serializer.serialize_struct("ImageSize", 2)?;

        state.serialize_field("width", &self.width())?;
        state.serialize_field("height", &self.height())?;

        state.end()
    }
}

impl Serialize for Image {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        const STRUCT_FIELDS: usize = 5;
        let mut state = serializer.serialize_struct("Image", STRUCT_FIELDS)?;

        state.serialize_field("mode", self.mode())?;
        state.serialize_field("width", &self.size().width())?;
        state.serialize_field("height", &self.size().height())?;
        state.serialize_field("planar", &self.is_planar())?;

        if self.info().is_empty() {
            state.serialize_field::<Option<()>>("info", &None)?;
        } else {
            state.serialize_field("info", self.info())?;
        }
        state.end()
    }
}

impl Serialize for ImageFormat {
    #[allow(clippy::uninlined_format_args)]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer
    {
        serializer.serialize_str(&format!("{:?}", self))
    }
}

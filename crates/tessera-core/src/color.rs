/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Textual colour notation
//!
//! Colours can be written in a functional notation naming the
//! components, or as web style hex triplets
//!
//! ```text
//! l(1)
//! la(1, 2)
//! rgb(1, 2, 3)
//! hsv(1, 2, 3)
//! hsl(1, 2, 3)
//! rgba(1, 2, 3, 4)
//! cmyk(1, 2, 3, 4)
//! #abc
//! #aabbcc
//! ```
//!
//! Functional components are unsigned decimal integers, whitespace
//! around them is ignored. Short hex triplets repeat each digit, so
//! `#abc` is the same as `#aabbcc`.
use core::fmt::{Display, Formatter};

use crate::errors::ModeErrors;
use crate::mode::{ColorMode, CMYK, HSL96, HSV96, L, LA, RGB, RGBA};
use crate::sample::Sample;

/// The notation a colour was written in
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColorNotation {
    L,
    LA,
    RGB,
    HSV,
    HSL,
    RGBA,
    CMYK,
    /// `#abc` or `#aabbcc`
    Web
}

impl ColorNotation {
    const FUNCTIONAL: [ColorNotation; 7] = [
        ColorNotation::L,
        ColorNotation::LA,
        ColorNotation::RGB,
        ColorNotation::HSV,
        ColorNotation::HSL,
        ColorNotation::RGBA,
        ColorNotation::CMYK
    ];

    /// Function name of the notation, `web` for hex triplets
    pub const fn name(self) -> &'static str {
        match self {
            ColorNotation::L => "l",
            ColorNotation::LA => "la",
            ColorNotation::RGB => "rgb",
            ColorNotation::HSV => "hsv",
            ColorNotation::HSL => "hsl",
            ColorNotation::RGBA => "rgba",
            ColorNotation::CMYK => "cmyk",
            ColorNotation::Web => "web"
        }
    }

    /// Number of components the notation takes
    pub const fn num_components(self) -> usize {
        match self {
            ColorNotation::L => 1,
            ColorNotation::LA => 2,
            ColorNotation::RGB | ColorNotation::HSV | ColorNotation::HSL | ColorNotation::Web => 3,
            ColorNotation::RGBA | ColorNotation::CMYK => 4
        }
    }

    /// The catalog mode whose components the notation names
    pub fn mode(self) -> &'static ColorMode {
        match self {
            ColorNotation::L => &L,
            ColorNotation::LA => &LA,
            ColorNotation::RGB | ColorNotation::Web => &RGB,
            ColorNotation::HSV => &HSV96,
            ColorNotation::HSL => &HSL96,
            ColorNotation::RGBA => &RGBA,
            ColorNotation::CMYK => &CMYK
        }
    }
}

impl Display for ColorNotation {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse a colour string into its notation and component values
///
/// # Example
/// ```
/// use tessera_core::color::{parse_color, ColorNotation};
/// use tessera_core::sample::Sample;
///
/// let (notation, values) = parse_color("rgba(10, 20, 30, 40)").unwrap();
/// assert_eq!(notation, ColorNotation::RGBA);
/// assert_eq!(values, [Sample::Int(10), Sample::Int(20), Sample::Int(30), Sample::Int(40)]);
///
/// let (notation, values) = parse_color("#341").unwrap();
/// assert_eq!(notation, ColorNotation::Web);
/// assert_eq!(values, [Sample::Int(0x33), Sample::Int(0x44), Sample::Int(0x11)]);
///
/// assert!(parse_color("rgb(1, 2)").is_err());
/// ```
pub fn parse_color(text: &str) -> Result<(ColorNotation, Vec<Sample>), ModeErrors> {
    let invalid = || ModeErrors::InvalidColor(text.to_string());

    if let Some(digits) = text.strip_prefix('#') {
        return parse_hex(digits)
            .map(|values| (ColorNotation::Web, values))
            .ok_or_else(invalid);
    }

    let (name, rest) = text.split_once('(').ok_or_else(invalid)?;
    let arguments = rest.strip_suffix(')').ok_or_else(invalid)?;

    let notation = ColorNotation::FUNCTIONAL
        .into_iter()
        .find(|x| x.name() == name)
        .ok_or_else(invalid)?;

    let values = arguments
        .split(',')
        .map(|x| parse_decimal(x.trim()))
        .collect::<Option<Vec<Sample>>>()
        .ok_or_else(invalid)?;

    if values.len() != notation.num_components() {
        return Err(invalid());
    }
    Ok((notation, values))
}

fn parse_decimal(text: &str) -> Option<Sample> {
    if text.is_empty() || !text.bytes().all(|x| x.is_ascii_digit()) {
        return None;
    }
    text.parse::<u64>().ok().map(Sample::Int)
}

fn parse_hex(digits: &str) -> Option<Vec<Sample>> {
    if !digits.bytes().all(|x| x.is_ascii_hexdigit()) {
        return None;
    }
    let values: Vec<u64> = match digits.len() {
        3 => digits
            .bytes()
            .map(|x| u64::from(hex_value(x)) * 0x11)
            .collect(),
        6 => digits
            .as_bytes()
            .chunks_exact(2)
            .map(|x| u64::from((hex_value(x[0]) << 4) | hex_value(x[1])))
            .collect(),
        _ => return None
    };
    Some(values.into_iter().map(Sample::Int).collect())
}

/// Value of an ascii hex digit already known to be valid
const fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10
    }
}

#[cfg(test)]
mod tests {
    use crate::color::{parse_color, ColorNotation};
    use crate::errors::ModeErrors;
    use crate::mode::{CMYK, L};
    use crate::sample::Sample;

    fn ints(values: &[u64]) -> Vec<Sample> {
        values.iter().copied().map(Sample::Int).collect()
    }

    #[test]
    fn functional_notations() {
        let cases = [
            ("l(10)", ColorNotation::L, ints(&[10])),
            ("la(10,100)", ColorNotation::LA, ints(&[10, 100])),
            ("rgb(10,20,30)", ColorNotation::RGB, ints(&[10, 20, 30])),
            ("hsv(10,20,30)", ColorNotation::HSV, ints(&[10, 20, 30])),
            ("hsl(10, 20, 30)", ColorNotation::HSL, ints(&[10, 20, 30])),
            ("rgba(10,20,30,40)", ColorNotation::RGBA, ints(&[10, 20, 30, 40])),
            ("cmyk(10,20,30,40)", ColorNotation::CMYK, ints(&[10, 20, 30, 40]))
        ];
        for (text, notation, values) in cases {
            let parsed = parse_color(text).unwrap();
            assert_eq!(parsed.0, notation, "{text}");
            assert_eq!(parsed.1, values, "{text}");
        }
        assert_eq!(ColorNotation::L.mode(), &L);
        assert_eq!(ColorNotation::CMYK.mode(), &CMYK);
    }

    #[test]
    fn web_notations() {
        assert_eq!(
            parse_color("#a7882d").unwrap(),
            (ColorNotation::Web, ints(&[0xa7, 0x88, 0x2d]))
        );
        assert_eq!(
            parse_color("#A7882D").unwrap(),
            (ColorNotation::Web, ints(&[0xa7, 0x88, 0x2d]))
        );
        assert_eq!(
            parse_color("#341").unwrap(),
            (ColorNotation::Web, ints(&[0x33, 0x44, 0x11]))
        );
    }

    #[test]
    fn malformed_colors() {
        for text in [
            "",
            "rgb",
            "rgb(1,2,3",
            "rgb(1,2)",
            "rgb(1,2,3,4)",
            "rgb(1,,3)",
            "rgb(-1,2,3)",
            "rgb(1.5,2,3)",
            "xyz(1,2,3)",
            "RGB(1,2,3)",
            "l(99999999999999999999999)",
            "#12",
            "#1234",
            "#ggg",
            "#+1234a"
        ] {
            assert!(
                matches!(parse_color(text), Err(ModeErrors::InvalidColor(_))),
                "{text:?}"
            );
        }
    }
}

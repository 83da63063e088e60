//! Continuous color scales built from ColorBrewer schemes.
use std::{convert::TryFrom, fmt, str::FromStr};

use plotters::style::RGBColor;
use serde::Deserialize;
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::{AnalysisError, Result};

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Mix two colors, `frac` of the way from `self` to `other`.
    fn lerp(self, other: Rgb, frac: f64) -> Rgb {
        let mix = |a: u8, b: u8| -> u8 {
            (f64::from(a) + (f64::from(b) - f64::from(a)) * frac)
                .round()
                .max(0.0)
                .min(255.0) as u8
        };

        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

impl FromStr for Rgb {
    type Err = AnalysisError;

    /// Parse a color of the form `#rrggbb`.
    fn from_str(s: &str) -> Result<Self> {
        let bad = || AnalysisError::InvalidColor(s.to_owned());

        let hex = s.trim().strip_prefix('#').ok_or_else(bad)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(bad());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());

        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = AnalysisError;

    fn try_from(s: String) -> Result<Self> {
        Rgb::from_str(&s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl From<Rgb> for RGBColor {
    fn from(c: Rgb) -> Self {
        RGBColor(c.0, c.1, c.2)
    }
}

/// Named color schemes. The diverging schemes go from red (low) to blue (high), the sequential
/// ones from light (low) to dark (high), when used in the `Forward` direction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Palette {
    /// Diverging, red - yellow - blue through green.
    Spectral,
    /// Diverging, red - yellow - blue.
    RdYlBu,
    /// Diverging, red - white - blue.
    RdBu,
    /// Sequential, yellow - green - blue.
    YlGnBu,
    /// Sequential blues.
    Blues,
    /// Sequential greens.
    Greens,
    /// Sequential, yellow - orange - red.
    YlOrRd,
}

/// Which end of the palette the lowest value maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ColorDirection {
    /// Low values get the first color of the palette.
    Forward,
    /// Low values get the last color of the palette, e.g. blue for cold water with `Spectral`.
    Reverse,
}

impl Palette {
    /// Parse a palette from its snake_case name, e.g. `"rd_yl_bu"`.
    pub fn from_name(name: &str) -> Result<Self> {
        Palette::from_str(name.trim()).map_err(|_| AnalysisError::InvalidPalette(name.to_owned()))
    }

    /// The anchor colors of the scheme, in forward order.
    pub fn anchors(self) -> &'static [Rgb] {
        use self::Palette::*;

        match self {
            Spectral => &SPECTRAL,
            RdYlBu => &RD_YL_BU,
            RdBu => &RD_BU,
            YlGnBu => &YL_GN_BU,
            Blues => &BLUES,
            Greens => &GREENS,
            YlOrRd => &YL_OR_RD,
        }
    }

    /// The color a fraction `t` of the way along the palette. `t` is clamped to `[0, 1]`.
    pub fn color_at(self, t: f64, direction: ColorDirection) -> Rgb {
        let anchors = self.anchors();
        debug_assert!(anchors.len() >= 2);

        let t = if t.is_nan() { 0.5 } else { t.max(0.0).min(1.0) };
        let t = match direction {
            ColorDirection::Forward => t,
            ColorDirection::Reverse => 1.0 - t,
        };

        let pos = t * (anchors.len() - 1) as f64;
        let idx = (pos.floor() as usize).min(anchors.len() - 2);

        anchors[idx].lerp(anchors[idx + 1], pos - idx as f64)
    }
}

/// Maps values from a domain onto a palette.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    palette: Palette,
    direction: ColorDirection,
    domain: (f64, f64),
}

impl ColorScale {
    /// Create a scale. The domain may be given in either order.
    pub fn new(palette: Palette, direction: ColorDirection, domain: (f64, f64)) -> Self {
        let (a, b) = domain;
        ColorScale {
            palette,
            direction,
            domain: (a.min(b), a.max(b)),
        }
    }

    /// The `(min, max)` of values this scale distinguishes.
    #[inline]
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Color for a value. Values outside the domain get the color of the nearest end, a degenerate
    /// domain maps everything to the middle of the palette.
    pub fn color(&self, value: f64) -> Rgb {
        let (lo, hi) = self.domain;
        let t = if hi - lo > 0.0 {
            (value - lo) / (hi - lo)
        } else {
            0.5
        };

        self.palette.color_at(t, self.direction)
    }
}

const SPECTRAL: [Rgb; 11] = [
    Rgb(0x9e, 0x01, 0x42),
    Rgb(0xd5, 0x3e, 0x4f),
    Rgb(0xf4, 0x6d, 0x43),
    Rgb(0xfd, 0xae, 0x61),
    Rgb(0xfe, 0xe0, 0x8b),
    Rgb(0xff, 0xff, 0xbf),
    Rgb(0xe6, 0xf5, 0x98),
    Rgb(0xab, 0xdd, 0xa4),
    Rgb(0x66, 0xc2, 0xa5),
    Rgb(0x32, 0x88, 0xbd),
    Rgb(0x5e, 0x4f, 0xa2),
];

const RD_YL_BU: [Rgb; 11] = [
    Rgb(0xa5, 0x00, 0x26),
    Rgb(0xd7, 0x30, 0x27),
    Rgb(0xf4, 0x6d, 0x43),
    Rgb(0xfd, 0xae, 0x61),
    Rgb(0xfe, 0xe0, 0x90),
    Rgb(0xff, 0xff, 0xbf),
    Rgb(0xe0, 0xf3, 0xf8),
    Rgb(0xab, 0xd9, 0xe9),
    Rgb(0x74, 0xad, 0xd1),
    Rgb(0x45, 0x75, 0xb4),
    Rgb(0x31, 0x36, 0x95),
];

const RD_BU: [Rgb; 11] = [
    Rgb(0x67, 0x00, 0x1f),
    Rgb(0xb2, 0x18, 0x2b),
    Rgb(0xd6, 0x60, 0x4d),
    Rgb(0xf4, 0xa5, 0x82),
    Rgb(0xfd, 0xdb, 0xc7),
    Rgb(0xf7, 0xf7, 0xf7),
    Rgb(0xd1, 0xe5, 0xf0),
    Rgb(0x92, 0xc5, 0xde),
    Rgb(0x43, 0x93, 0xc3),
    Rgb(0x21, 0x66, 0xac),
    Rgb(0x05, 0x30, 0x61),
];

const YL_GN_BU: [Rgb; 9] = [
    Rgb(0xff, 0xff, 0xd9),
    Rgb(0xed, 0xf8, 0xb1),
    Rgb(0xc7, 0xe9, 0xb4),
    Rgb(0x7f, 0xcd, 0xbb),
    Rgb(0x41, 0xb6, 0xc4),
    Rgb(0x1d, 0x91, 0xc0),
    Rgb(0x22, 0x5e, 0xa8),
    Rgb(0x25, 0x34, 0x94),
    Rgb(0x08, 0x1d, 0x58),
];

const BLUES: [Rgb; 9] = [
    Rgb(0xf7, 0xfb, 0xff),
    Rgb(0xde, 0xeb, 0xf7),
    Rgb(0xc6, 0xdb, 0xef),
    Rgb(0x9e, 0xca, 0xe1),
    Rgb(0x6b, 0xae, 0xd6),
    Rgb(0x42, 0x92, 0xc6),
    Rgb(0x21, 0x71, 0xb5),
    Rgb(0x08, 0x51, 0x9c),
    Rgb(0x08, 0x30, 0x6b),
];

const GREENS: [Rgb; 9] = [
    Rgb(0xf7, 0xfc, 0xf5),
    Rgb(0xe5, 0xf5, 0xe0),
    Rgb(0xc7, 0xe9, 0xc0),
    Rgb(0xa1, 0xd9, 0x9b),
    Rgb(0x74, 0xc4, 0x76),
    Rgb(0x41, 0xab, 0x5d),
    Rgb(0x23, 0x8b, 0x45),
    Rgb(0x00, 0x6d, 0x2c),
    Rgb(0x00, 0x44, 0x1b),
];

const YL_OR_RD: [Rgb; 9] = [
    Rgb(0xff, 0xff, 0xcc),
    Rgb(0xff, 0xed, 0xa0),
    Rgb(0xfe, 0xd9, 0x76),
    Rgb(0xfe, 0xb2, 0x4c),
    Rgb(0xfd, 0x8d, 0x3c),
    Rgb(0xfc, 0x4e, 0x2a),
    Rgb(0xe3, 0x1a, 0x1c),
    Rgb(0xbd, 0x00, 0x26),
    Rgb(0x80, 0x00, 0x26),
];

use crate::BillboardError;
use image::Rgb;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An opaque 8-bit sRGB colour, as used for text fills, shadows, and fallback
/// backgrounds. Serialized as a `#rrggbb` hex string.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    /// Create a new colour from byte components ranging from 0 to 255
    pub const fn new_rgb_bytes(r: u8, g: u8, b: u8) -> Colour {
        Colour { r, g, b }
    }

    /// Create a new colour from float components ranging from 0.0 to 1.0.
    /// Out-of-range components are clamped
    pub fn new_rgb(r: f32, g: f32, b: f32) -> Colour {
        let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Colour {
            r: byte(r),
            g: byte(g),
            b: byte(b),
        }
    }

    /// Create a grey colour, g ranges from 0 to 255
    pub const fn new_grey_bytes(g: u8) -> Colour {
        Colour { r: g, g, b: g }
    }

    /// Parse `#rrggbb`, `#rgb` (the leading `#` is optional) or one of the
    /// names in [colours::by_name]
    pub fn parse(s: &str) -> Result<Colour, BillboardError> {
        let trimmed = s.trim();
        if let Some(named) = colours::by_name(trimmed) {
            return Ok(named);
        }

        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(BillboardError::InvalidColour(s.to_string()));
        }
        let component = |digits: &str| {
            u8::from_str_radix(digits, 16).map_err(|_| BillboardError::InvalidColour(s.to_string()))
        };

        match hex.len() {
            6 => Ok(Colour {
                r: component(&hex[0..2])?,
                g: component(&hex[2..4])?,
                b: component(&hex[4..6])?,
            }),
            3 => {
                // #abc is shorthand for #aabbcc
                let nibble = |i: usize| component(&hex[i..i + 1]).map(|v| v * 17);
                Ok(Colour {
                    r: nibble(0)?,
                    g: nibble(1)?,
                    b: nibble(2)?,
                })
            }
            _ => Err(BillboardError::InvalidColour(s.to_string())),
        }
    }
}

impl FromStr for Colour {
    type Err = BillboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Colour::parse(s)
    }
}

impl TryFrom<String> for Colour {
    type Error = BillboardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Colour::parse(&value)
    }
}

impl From<Colour> for String {
    fn from(c: Colour) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for Colour {
    fn from(c: (u8, u8, u8)) -> Self {
        Colour {
            r: c.0,
            g: c.1,
            b: c.2,
        }
    }
}

impl From<[u8; 3]> for Colour {
    fn from(c: [u8; 3]) -> Self {
        let [r, g, b] = c;
        Colour { r, g, b }
    }
}

impl From<Colour> for Rgb<u8> {
    fn from(c: Colour) -> Self {
        Rgb([c.r, c.g, c.b])
    }
}

impl From<Rgb<u8>> for Colour {
    fn from(p: Rgb<u8>) -> Self {
        let [r, g, b] = p.0;
        Colour { r, g, b }
    }
}

/// A list of pre-defined colour constants
pub mod colours {
    use super::*;

    pub const BLACK: Colour = Colour::new_rgb_bytes(0x00, 0x00, 0x00);
    pub const WHITE: Colour = Colour::new_rgb_bytes(0xff, 0xff, 0xff);
    pub const RED: Colour = Colour::new_rgb_bytes(0xff, 0x00, 0x00);
    pub const GREEN: Colour = Colour::new_rgb_bytes(0x00, 0x80, 0x00);
    pub const BLUE: Colour = Colour::new_rgb_bytes(0x00, 0x00, 0xff);
    pub const YELLOW: Colour = Colour::new_rgb_bytes(0xff, 0xff, 0x00);
    /// Deep blue painted when the billboard background can't be loaded
    pub const BILLBOARD_BLUE: Colour = Colour::new_rgb_bytes(0x1e, 0x3a, 0x8a);

    /// Look up a colour by its (case-insensitive) name
    pub fn by_name(name: &str) -> Option<Colour> {
        match name.to_ascii_lowercase().as_str() {
            "black" => Some(BLACK),
            "white" => Some(WHITE),
            "red" => Some(RED),
            "green" => Some(GREEN),
            "blue" => Some(BLUE),
            "yellow" => Some(YELLOW),
            _ => None,
        }
    }
}

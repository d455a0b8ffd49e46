//! Colour type and parsing.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{TintError, Result};

/// An RGBA colour value.
///
/// Filters only touch the RGB channels; alpha passes through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    /// Create a new colour from RGBA components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a new opaque colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const BLACK: Self = Self::rgb(0, 0, 0);

    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Apply `f` to each RGB channel, keeping alpha.
    pub fn map_rgb(self, f: impl Fn(u8) -> u8) -> Self {
        Self::new(f(self.r), f(self.g), f(self.b), self.a)
    }

    /// Add `amount` to each channel, clamping at 255.
    pub fn brighten(self, amount: u8) -> Self {
        self.map_rgb(|c| c.saturating_add(amount))
    }

    /// Subtract `amount` from each channel, clamping at 0.
    pub fn darken(self, amount: u8) -> Self {
        self.map_rgb(|c| c.saturating_sub(amount))
    }

    pub fn invert(self) -> Self {
        self.map_rgb(|c| 255 - c)
    }

    /// Replace each channel with the Rec. 601 luma.
    pub fn grayscale(self) -> Self {
        let luma = 0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32;
        let y = luma.round().clamp(0.0, 255.0) as u8;
        Self::new(y, y, y, self.a)
    }

    /// The RGB channels as a tuple.
    pub fn to_rgb_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Parse a hex colour string.
    ///
    /// Supports `#RGB`, `#RGBA`, `#RRGGBB` and `#RRGGBBAA`. The leading `#`
    /// is optional.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);

        let channels: Vec<u8> = match hex.len() {
            // Short forms repeat each digit: F -> FF
            3 | 4 => hex
                .chars()
                .map(|c| parse_hex_digit(c).map(|d| d << 4 | d))
                .collect::<Result<_>>()?,
            6 | 8 => (0..hex.len())
                .step_by(2)
                .map(|i| parse_hex_byte(hex.get(i..i + 2).unwrap_or(""), s))
                .collect::<Result<_>>()?,
            _ => Vec::new(),
        };

        Self::from_channels(&channels).ok_or_else(|| TintError::Parse {
            message: format!("Invalid hex colour: {}", s),
            help: Some("Use #RGB, #RGBA, #RRGGBB, or #RRGGBBAA format".to_string()),
        })
    }

    /// Parse a decimal `r,g,b` or `r,g,b,a` triple. Parentheses are allowed.
    pub fn from_triple(s: &str) -> Result<Self> {
        let inner = s.trim().trim_start_matches('(').trim_end_matches(')');

        let channels = inner
            .split(',')
            .map(|part| {
                part.trim().parse::<u8>().map_err(|_| TintError::Parse {
                    message: format!("Invalid channel value '{}' in {}", part.trim(), s.trim()),
                    help: Some("Channels are integers from 0 to 255".to_string()),
                })
            })
            .collect::<Result<Vec<u8>>>()?;

        Self::from_channels(&channels).ok_or_else(|| TintError::Parse {
            message: format!("Expected 3 or 4 channels, got {}: {}", channels.len(), s.trim()),
            help: Some("Use r,g,b or r,g,b,a".to_string()),
        })
    }

    fn from_channels(channels: &[u8]) -> Option<Self> {
        match *channels {
            [r, g, b] => Some(Self::rgb(r, g, b)),
            [r, g, b, a] => Some(Self::new(r, g, b, a)),
            _ => None,
        }
    }
}

impl FromStr for Colour {
    type Err = TintError;

    /// Decimal when the input contains a comma, hex otherwise.
    fn from_str(s: &str) -> Result<Self> {
        if s.contains(',') {
            Self::from_triple(s)
        } else {
            Self::from_hex(s)
        }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Serialize for Colour {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn parse_hex_digit(c: char) -> Result<u8> {
    c.to_digit(16)
        .map(|d| d as u8)
        .ok_or_else(|| TintError::Parse {
            message: format!("Invalid hex digit: {}", c),
            help: None,
        })
}

fn parse_hex_byte(pair: &str, whole: &str) -> Result<u8> {
    u8::from_str_radix(pair, 16).map_err(|_| TintError::Parse {
        message: format!("Invalid hex byte '{}' in {}", pair, whole),
        help: None,
    })
}

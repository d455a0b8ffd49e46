//! Named colour filters.
//!
//! Filters are written as `name` or `name:arg`, the same form used on the
//! command line and in preset files:
//!
//! ```yaml
//! presets:
//!   night: ["darken:80", "desaturate:40%"]
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::chain::{transform, FilterChain, Transform};
use crate::error::{Result, TintError};
use crate::types::Colour;

/// Channel step used by `brighten` and `darken` when no amount is given.
pub const DEFAULT_STEP: u8 = 50;

const AVAILABLE: &str =
    "Available filters: identity, brighten[:N], darken[:N], lighten:P%, dim:P%, \
     saturate:P%, desaturate:P%, invert, grayscale";

/// A named colour filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Filter {
    /// Returns the colour unchanged.
    Identity,
    /// Adds to each channel, clamping at 255.
    Brighten(u8),
    /// Subtracts from each channel, clamping at 0.
    Darken(u8),
    /// Moves HSL lightness toward white by a percentage (0 - 100).
    Lighten(f32),
    /// Moves HSL lightness toward black by a percentage (0 - 100).
    Dim(f32),
    /// Moves HSL saturation toward full by a percentage (0 - 100).
    Saturate(f32),
    /// Moves HSL saturation toward grey by a percentage (0 - 100).
    Desaturate(f32),
    Invert,
    Grayscale,
}

impl Filter {
    /// Get the filter name as written in specs.
    pub fn name(&self) -> &'static str {
        match self {
            Filter::Identity => "identity",
            Filter::Brighten(_) => "brighten",
            Filter::Darken(_) => "darken",
            Filter::Lighten(_) => "lighten",
            Filter::Dim(_) => "dim",
            Filter::Saturate(_) => "saturate",
            Filter::Desaturate(_) => "desaturate",
            Filter::Invert => "invert",
            Filter::Grayscale => "grayscale",
        }
    }

    /// Apply this filter to a single colour.
    pub fn apply(&self, colour: Colour) -> Colour {
        match *self {
            Filter::Identity => colour,
            Filter::Brighten(n) => colour.brighten(n),
            Filter::Darken(n) => colour.darken(n),
            Filter::Lighten(p) => adjust_hsl(colour, HslChannel::Lightness, p),
            Filter::Dim(p) => adjust_hsl(colour, HslChannel::Lightness, -p),
            Filter::Saturate(p) => adjust_hsl(colour, HslChannel::Saturation, p),
            Filter::Desaturate(p) => adjust_hsl(colour, HslChannel::Saturation, -p),
            Filter::Invert => colour.invert(),
            Filter::Grayscale => colour.grayscale(),
        }
    }

    /// Turn this filter into a chain transform.
    pub fn transform(&self) -> Transform<Colour> {
        let filter = *self;
        transform(move |c| filter.apply(c))
    }

    /// Build a chain that applies `filters` in order.
    pub fn chain(filters: &[Filter]) -> FilterChain<Colour> {
        filters.iter().map(Filter::transform).collect()
    }
}

impl FromStr for Filter {
    type Err = TintError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name.trim(), Some(arg.trim())),
            None => (s, None),
        };

        let filter = match name.to_ascii_lowercase().as_str() {
            "identity" | "none" => no_arg(name, arg, Filter::Identity)?,
            "brighten" => Filter::Brighten(parse_step(name, arg)?),
            "darken" => Filter::Darken(parse_step(name, arg)?),
            "lighten" => Filter::Lighten(parse_percent(name, arg)?),
            "dim" => Filter::Dim(parse_percent(name, arg)?),
            "saturate" => Filter::Saturate(parse_percent(name, arg)?),
            "desaturate" => Filter::Desaturate(parse_percent(name, arg)?),
            "invert" => no_arg(name, arg, Filter::Invert)?,
            "grayscale" | "greyscale" => no_arg(name, arg, Filter::Grayscale)?,
            _ => {
                return Err(TintError::Parse {
                    message: format!("Unknown filter: {}", s),
                    help: Some(AVAILABLE.to_string()),
                })
            }
        };

        Ok(filter)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Brighten(n) | Filter::Darken(n) => write!(f, "{}:{}", self.name(), n),
            Filter::Lighten(p) | Filter::Dim(p) | Filter::Saturate(p) | Filter::Desaturate(p) => {
                write!(f, "{}:{}%", self.name(), p)
            }
            Filter::Identity | Filter::Invert | Filter::Grayscale => f.write_str(self.name()),
        }
    }
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Filter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let spec = String::deserialize(deserializer)?;
        spec.parse().map_err(serde::de::Error::custom)
    }
}

fn no_arg(name: &str, arg: Option<&str>, filter: Filter) -> Result<Filter> {
    match arg {
        None => Ok(filter),
        Some(arg) => Err(TintError::Parse {
            message: format!("{} takes no argument, got '{}'", name, arg),
            help: Some(format!("Use {}", name)),
        }),
    }
}

fn parse_step(name: &str, arg: Option<&str>) -> Result<u8> {
    match arg {
        None => Ok(DEFAULT_STEP),
        Some(arg) => arg.parse().map_err(|_| TintError::Parse {
            message: format!("Invalid {} amount: {}", name, arg),
            help: Some(format!("Use {}:N with N from 0 to 255", name)),
        }),
    }
}

fn parse_percent(name: &str, arg: Option<&str>) -> Result<f32> {
    let usage = || Some(format!("Use {}:P% with P from 0 to 100, like {}:20%", name, name));

    let arg = arg.ok_or_else(|| TintError::Parse {
        message: format!("{} requires a percentage", name),
        help: usage(),
    })?;

    let value: f32 = arg
        .trim_end_matches('%')
        .parse()
        .map_err(|_| TintError::Parse {
            message: format!("Invalid percentage for {}: {}", name, arg),
            help: usage(),
        })?;

    if !value.is_finite() {
        return Err(TintError::Parse {
            message: format!("Invalid percentage for {}: {}", name, arg),
            help: usage(),
        });
    }

    Ok(value.clamp(0.0, 100.0))
}

#[derive(Clone, Copy)]
enum HslChannel {
    Lightness,
    Saturation,
}

/// Move one HSL component toward its bound by `percent` of the remaining range.
///
/// Positive percentages move toward 1.0, negative toward 0.0.
fn adjust_hsl(colour: Colour, channel: HslChannel, percent: f32) -> Colour {
    use palette::{Hsl, IntoColor, Srgb};

    let rgb: Srgb<f32> = Srgb::new(
        colour.r as f32 / 255.0,
        colour.g as f32 / 255.0,
        colour.b as f32 / 255.0,
    );
    let mut hsl: Hsl = rgb.into_color();

    let value = match channel {
        HslChannel::Lightness => &mut hsl.lightness,
        HslChannel::Saturation => &mut hsl.saturation,
    };
    let delta = percent / 100.0;
    if delta > 0.0 {
        *value += (1.0 - *value) * delta;
    } else {
        *value += *value * delta;
    }
    *value = (*value).clamp(0.0, 1.0);

    let out: Srgb<f32> = hsl.into_color();
    let to_u8 = |v: f32| (v * 255.0).round().clamp(0.0, 255.0) as u8;
    Colour::new(to_u8(out.red), to_u8(out.green), to_u8(out.blue), colour.a)
}

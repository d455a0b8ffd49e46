//! Apply command implementation.
//!
//! Runs one colour through a chain built from a preset and `--filter` flags.

use std::path::Path;

use clap::{Args, ValueEnum};
use serde::Serialize;

use crate::config::Presets;
use crate::error::{Result, TintError};
use crate::output::{plural, Printer};
use crate::types::{Colour, Filter};

/// Run a colour through a chain of filters
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Colour to filter, as hex (#C864C8) or decimal (200,100,200)
    #[arg(required = true)]
    pub colour: Colour,

    /// Filter to apply, repeatable and applied in order (e.g. brighten, darken:30)
    #[arg(long = "filter", short = 'f')]
    pub filters: Vec<Filter>,

    /// Preset whose filters run before any --filter flags
    #[arg(long, short)]
    pub preset: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// `#RRGGBB (r, g, b)`
    Text,
    /// JSON object with input, filters and output
    Json,
}

/// Result of one apply run.
#[derive(Debug, Serialize)]
pub struct Applied<'a> {
    pub input: Colour,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<&'a str>,
    pub filters: Vec<Filter>,
    pub output: Colour,
}

impl Applied<'_> {
    pub fn to_text(&self) -> String {
        format!("{} {:?}", self.output, self.output.to_rgb_tuple())
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| TintError::Output {
            message: format!("Failed to serialize result: {}", e),
            help: None,
        })
    }
}

/// Filter a colour through the preset (if any) followed by the flag filters.
///
/// The default preset is used only when neither a preset nor any filters
/// were given.
pub fn filter_colour<'a>(args: &ApplyArgs, presets: &'a Presets) -> Result<Applied<'a>> {
    let preset = if args.preset.is_some() || args.filters.is_empty() {
        presets.resolve(args.preset.as_deref())?
    } else {
        None
    };

    let mut filters: Vec<Filter> = preset.map(|(_, f)| f.to_vec()).unwrap_or_default();
    filters.extend_from_slice(&args.filters);

    let chain = Filter::chain(&filters);

    Ok(Applied {
        input: args.colour,
        preset: preset.map(|(name, _)| name),
        output: chain.apply(args.colour),
        filters,
    })
}

pub fn run(args: ApplyArgs, config: Option<&Path>, printer: &Printer) -> Result<()> {
    let presets = Presets::discover(config)?;
    let applied = filter_colour(&args, &presets)?;

    let via = match applied.preset {
        Some(name) => format!(" via preset {}", name),
        None => String::new(),
    };
    printer.status(
        "Applied",
        &format!(
            "{} to {}{}",
            plural(applied.filters.len(), "filter", "filters"),
            applied.input,
            via
        ),
    );

    match args.format {
        Format::Text => println!("{}", applied.to_text()),
        Format::Json => println!("{}", applied.to_json()?),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(colour: &str, filters: &[&str], preset: Option<&str>) -> ApplyArgs {
        ApplyArgs {
            colour: colour.parse().unwrap(),
            filters: filters.iter().map(|f| f.parse().unwrap()).collect(),
            preset: preset.map(str::to_string),
            format: Format::Text,
        }
    }

    fn sample_presets() -> Presets {
        Presets::parse("default: warm\npresets:\n  warm: [brighten]\n  cold: [invert]\n").unwrap()
    }

    #[test]
    fn test_filters_apply_in_order() {
        let presets = Presets::default();
        let applied =
            filter_colour(&args("250,100,0", &["brighten", "darken"], None), &presets).unwrap();
        assert_eq!(applied.output, Colour::rgb(205, 100, 0));
        assert_eq!(applied.to_text(), "#CD6400 (205, 100, 0)");
    }

    #[test]
    fn test_no_filters_is_identity() {
        let presets = Presets::default();
        let applied = filter_colour(&args("#C864C8", &[], None), &presets).unwrap();
        assert_eq!(applied.output, Colour::rgb(200, 100, 200));
        assert!(applied.filters.is_empty());
    }

    #[test]
    fn test_preset_runs_before_flags() {
        let presets = sample_presets();
        let applied = filter_colour(&args("250,0,0", &["darken"], Some("warm")), &presets).unwrap();
        assert_eq!(applied.preset, Some("warm"));
        assert_eq!(applied.filters, vec![Filter::Brighten(50), Filter::Darken(50)]);
        assert_eq!(applied.output, Colour::rgb(205, 0, 0));
    }

    #[test]
    fn test_default_preset_only_without_filters() {
        let presets = sample_presets();
        let applied = filter_colour(&args("0,0,0", &[], None), &presets).unwrap();
        assert_eq!(applied.preset, Some("warm"));
        assert_eq!(applied.output, Colour::rgb(50, 50, 50));

        let applied = filter_colour(&args("0,0,0", &["invert"], None), &presets).unwrap();
        assert_eq!(applied.preset, None);
        assert_eq!(applied.output, Colour::WHITE);
    }

    #[test]
    fn test_unknown_preset() {
        let presets = sample_presets();
        let err = filter_colour(&args("0,0,0", &[], Some("nope")), &presets).unwrap_err();
        assert!(matches!(err, TintError::UnknownPreset { .. }));
    }

    #[test]
    fn test_json_output() {
        let presets = Presets::default();
        let applied =
            filter_colour(&args("#C864C8", &["brighten", "darken"], None), &presets).unwrap();

        insta::assert_snapshot!(applied.to_json().unwrap(), @r###"
        {
          "input": "#C864C8",
          "filters": [
            "brighten:50",
            "darken:50"
          ],
          "output": "#C864C8"
        }
        "###);
    }
}

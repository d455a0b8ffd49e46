//! Presets command implementation.

use std::path::Path;

use clap::Args;

use crate::config::Presets;
use crate::error::Result;
use crate::output::{plural, Printer};

/// List the presets defined in tint.yaml
#[derive(Args, Debug)]
pub struct PresetsArgs {}

/// One line per preset: `name: filter, filter`, with the default marked.
pub fn render(presets: &Presets) -> Vec<String> {
    presets
        .presets
        .iter()
        .map(|(name, filters)| {
            let list = if filters.is_empty() {
                "identity".to_string()
            } else {
                filters
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            let marker = if presets.default.as_deref() == Some(name.as_str()) {
                " (default)"
            } else {
                ""
            };
            format!("{}{}: {}", name, marker, list)
        })
        .collect()
}

pub fn run(_args: PresetsArgs, config: Option<&Path>, printer: &Printer) -> Result<()> {
    let presets = Presets::discover(config)?;

    if presets.is_empty() {
        printer.info("Empty", "no presets defined");
        return Ok(());
    }

    printer.status("Found", &plural(presets.presets.len(), "preset", "presets"));
    for line in render(&presets) {
        println!("{}", line);
    }

    Ok(())
}

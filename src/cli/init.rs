//! Init command implementation.
//!
//! Writes a starter `tint.yaml` with a couple of example presets.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::config::{Presets, DEFAULT_PRESET_FILE};
use crate::error::{Result, TintError};
use crate::output::{display_path, plural, Printer};

/// Starter preset file contents.
pub const STARTER: &str = "\
# Filters run first to last.
default: round-trip
presets:
  round-trip: [brighten, darken]
  night: [\"darken:80\", \"desaturate:40%\"]
  negative: [invert]
";

/// Create a tint.yaml preset file
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to write tint.yaml into (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite an existing tint.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let path = args.path.join(DEFAULT_PRESET_FILE);

    if path.exists() && !args.force {
        return Err(TintError::Config {
            message: format!("{} already exists", display_path(&path)),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    let count = Presets::parse(STARTER)?.presets.len();

    fs::write(&path, STARTER).map_err(|e| TintError::Io {
        path: path.clone(),
        message: format!("Failed to write presets: {}", e),
    })?;

    printer.status(
        "Created",
        &format!("{} with {}", display_path(&path), plural(count, "preset", "presets")),
    );

    Ok(())
}

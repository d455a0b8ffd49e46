pub mod apply;
pub mod completions;
pub mod init;
pub mod presets;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// tint - Chain colour filters in order
#[derive(Parser, Debug)]
#[command(name = "tint")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Preset file (default: ./tint.yaml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Suppress status output on stderr
    #[arg(long, short, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a colour through a chain of filters
    Apply(apply::ApplyArgs),

    /// List presets from the preset file
    Presets(presets::PresetsArgs),

    /// Create a starter tint.yaml
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

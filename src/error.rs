use miette::Diagnostic;
use thiserror::Error;

/// Main error type for tint operations.
///
/// Filter chains themselves never fail; these errors come from the edges:
/// parsing colours and filter specs, and loading presets.
#[derive(Error, Diagnostic, Debug)]
pub enum TintError {
    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(tint::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(tint::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Config error: {message}")]
    #[diagnostic(code(tint::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Output error: {message}")]
    #[diagnostic(code(tint::output))]
    Output {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Unknown preset: {name}")]
    #[diagnostic(code(tint::preset))]
    UnknownPreset {
        name: String,
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, TintError>;

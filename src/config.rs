//! Preset file (tint.yaml) parsing.
//!
//! A preset names a reusable list of filters:
//!
//! ```yaml
//! default: round-trip
//! presets:
//!   round-trip: [brighten, darken]
//!   night: ["darken:80", "desaturate:40%"]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::chain::FilterChain;
use crate::error::{Result, TintError};
use crate::types::{Colour, Filter};

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_PRESET_FILE: &str = "tint.yaml";

/// Named filter lists loaded from tint.yaml.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Presets {
    /// Preset used when none is named explicitly.
    pub default: Option<String>,

    /// Filter lists by name, applied first to last.
    pub presets: BTreeMap<String, Vec<Filter>>,
}

impl Presets {
    /// Load presets from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| TintError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read presets: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Load presets from `path`, or from ./tint.yaml when no path is given.
    ///
    /// A missing default file yields no presets; a missing explicit file is an error.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        Self::discover_in(Path::new("."), path)
    }

    /// Like [`discover`](Self::discover), looking for tint.yaml in `dir`.
    pub fn discover_in(dir: &Path, path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        let fallback = dir.join(DEFAULT_PRESET_FILE);
        if fallback.is_file() {
            Self::load(&fallback)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse presets from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        let presets: Self = serde_yaml::from_str(content).map_err(|e| TintError::Config {
            message: format!("Invalid preset file: {}", e),
            help: Some("Check tint.yaml syntax and filter names".to_string()),
        })?;

        if let Some(name) = &presets.default {
            if !presets.presets.contains_key(name) {
                return Err(TintError::Config {
                    message: format!("Default preset '{}' is not defined", name),
                    help: presets.known_names_help(),
                });
            }
        }

        Ok(presets)
    }

    /// Look up a preset by name.
    pub fn get(&self, name: &str) -> Option<&[Filter]> {
        self.presets.get(name).map(Vec::as_slice)
    }

    /// Resolve an explicit preset name, falling back to the default.
    ///
    /// Returns `Ok(None)` when no name is given and there is no default.
    pub fn resolve(&self, name: Option<&str>) -> Result<Option<(&str, &[Filter])>> {
        let Some(name) = name.or(self.default.as_deref()) else {
            return Ok(None);
        };

        match self.presets.get_key_value(name) {
            Some((key, filters)) => Ok(Some((key.as_str(), filters.as_slice()))),
            None => Err(TintError::UnknownPreset {
                name: name.to_string(),
                help: self.known_names_help(),
            }),
        }
    }

    /// Build a chain from a named preset.
    pub fn chain(&self, name: &str) -> Result<FilterChain<Colour>> {
        let filters = self.get(name).ok_or_else(|| TintError::UnknownPreset {
            name: name.to_string(),
            help: self.known_names_help(),
        })?;

        Ok(Filter::chain(filters))
    }

    /// Preset names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    fn known_names_help(&self) -> Option<String> {
        if self.presets.is_empty() {
            Some(format!("No presets are defined; add them to {}", DEFAULT_PRESET_FILE))
        } else {
            Some(format!("Known presets: {}", self.names().collect::<Vec<_>>().join(", ")))
        }
    }
}

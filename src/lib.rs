//! tint - Ordered colour filter chains
//!
//! A library for folding a list of colour transforms into one function that
//! applies them first to last, plus named filters and presets for the CLI.

pub mod chain;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod types;

pub use chain::{compose, identity, transform, ChainBuilder, FilterChain, SharedFilterChain, Transform};
pub use config::Presets;
pub use error::{Result, TintError};
pub use types::{Colour, Filter, DEFAULT_STEP};

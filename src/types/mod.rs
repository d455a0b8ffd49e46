//! Core domain types for tint.
//!
//! - `Colour` - RGBA colour values and per-channel operations
//! - `Filter` - named filters parsed from `name[:arg]` specs

mod colour;
mod filter;

pub use colour::Colour;
pub use filter::{Filter, DEFAULT_STEP};

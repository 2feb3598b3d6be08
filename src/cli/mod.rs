//! Command-line interface definitions.
//!
//! This module contains argument parsing and the resolution tier enum.

mod args;
mod enums;

pub use args::{Args, TOKEN_ENV};
pub use enums::ResolutionTier;

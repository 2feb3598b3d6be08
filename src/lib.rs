//! dc-download library crate.
//!
//! Lists the image captures of a Digital Collections item and downloads each
//! one. The modules are exposed for integration testing.

pub mod api;
pub mod capture;
pub mod cli;
pub mod config;
pub mod downloader;
pub mod enumerator;
pub mod filename;
pub mod runner;

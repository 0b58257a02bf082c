//! Host binary library for the SY50 updater.
//!
//! Stands in for the host framework: loads the updater configuration, wires
//! the platform adapters into an `UpdaterComponent` and exposes its
//! operations as subcommands.

#![deny(unused_crate_dependencies)]

// Used by main.rs only
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap, load_config};
pub use commands::Commands;
pub use error::CliError;
pub use parser::Cli;

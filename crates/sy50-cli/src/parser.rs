//! Main CLI parser and top-level argument handling.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Check the installed Simrad SY50 version and offer updates to the desktop user.
#[derive(Parser)]
#[command(name = "sy50-updater")]
#[command(about = "Check the installed SY50 version and ask the desktop user before updating")]
#[command(version)]
pub struct Cli {
    /// JSON file with the updater attributes
    #[arg(short = 'c', long = "config", env = "SY50_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Override the target version for this invocation
    #[arg(long = "target", global = true)]
    pub target: Option<String>,

    /// Never launch the consent helper; post a notification instead
    #[arg(long = "no-prompt", global = true)]
    pub no_prompt: bool,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

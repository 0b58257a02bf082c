//! Available subcommands.

use clap::Subcommand;

/// Operations of the updater component.
#[derive(Subcommand)]
pub enum Commands {
    /// Show the installed version
    Status,

    /// Run one update check, asking the desktop user if an update is available
    Check {
        /// Print the full decision report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare two version strings
    Compare {
        /// Installed version
        current: String,
        /// Target version
        target: String,
    },

    /// Run update checks periodically until Ctrl+C
    Watch {
        /// Seconds between checks
        #[arg(long, default_value_t = 3600)]
        interval_secs: u64,
    },
}

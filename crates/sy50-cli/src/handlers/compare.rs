//! Compare command handler.

use anyhow::Result;
use sy50_core::VersionComparison;

/// One-line verdict for `current` vs `target`.
pub fn verdict(current: &str, target: &str) -> String {
    match VersionComparison::of(current, target) {
        VersionComparison::TargetGreater => {
            format!("{target} is newer than {current}: update available")
        }
        VersionComparison::TargetNotGreater => {
            format!("{target} is not newer than {current}: no update required")
        }
    }
}

pub fn execute(current: &str, target: &str) -> Result<()> {
    println!("{}", verdict(current, target));
    Ok(())
}

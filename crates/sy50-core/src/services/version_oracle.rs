//! Installed-version lookup over the software inventory.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::ports::{InventoryError, SoftwareInventoryPort};

/// Result of looking a program up by display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionLookup {
    Installed(String),
    NotFound,
}

/// Finds a program's installed version by display-name substring.
#[derive(Clone)]
pub struct VersionOracle {
    inventory: Arc<dyn SoftwareInventoryPort>,
}

impl VersionOracle {
    pub fn new(inventory: Arc<dyn SoftwareInventoryPort>) -> Self {
        Self { inventory }
    }

    /// Return the version of the first entry whose display name contains
    /// `program_name`.
    ///
    /// Unreadable entries, and matching entries without a version, are
    /// skipped. Only a failure of the inventory store itself is an error.
    pub fn lookup(&self, program_name: &str) -> Result<VersionLookup, InventoryError> {
        if program_name.is_empty() {
            return Ok(VersionLookup::NotFound);
        }

        for entry in self.inventory.entries()? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(error = %e, "Skipping unreadable inventory entry");
                    continue;
                }
            };

            let Some(display_name) = entry.display_name.as_deref() else {
                continue;
            };
            if !display_name.contains(program_name) {
                continue;
            }

            match entry.display_version {
                Some(version) => {
                    debug!(key = %entry.key, %display_name, %version, "Found installed program");
                    return Ok(VersionLookup::Installed(version));
                }
                None => {
                    warn!(key = %entry.key, %display_name, "Matching entry has no version, skipping");
                }
            }
        }

        Ok(VersionLookup::NotFound)
    }
}

//! Software inventory port.
//!
//! Abstracts the platform's list of installed programs (the "Uninstall"
//! registry keys on Windows). The core only needs each entry's display name
//! and reported version; implementations live in sy50-runtime.

use thiserror::Error;

/// One installed-program entry as exposed by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryEntry {
    /// Platform identifier of the entry (registry subkey name on Windows).
    pub key: String,
    /// Human-readable program name, if the entry has one.
    pub display_name: Option<String>,
    /// Reported version string, if the entry has one.
    pub display_version: Option<String>,
}

impl InventoryEntry {
    /// Create an entry with both name and version present.
    pub fn new(
        key: impl Into<String>,
        display_name: impl Into<String>,
        display_version: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            display_name: Some(display_name.into()),
            display_version: Some(display_version.into()),
        }
    }
}

/// Errors raised while reading the inventory.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InventoryError {
    /// The inventory store itself could not be opened or enumerated.
    #[error("Inventory access failed: {0}")]
    Access(String),

    /// A single entry could not be read. Scans skip these.
    #[error("Unreadable inventory entry {key}: {reason}")]
    UnreadableEntry { key: String, reason: String },

    /// This platform has no software inventory.
    #[error("Software inventory is not supported on this platform")]
    Unsupported,
}

impl InventoryError {
    /// Create an `Access` error from any displayable error.
    pub fn access(err: impl std::fmt::Display) -> Self {
        Self::Access(err.to_string())
    }
}

/// Result type for inventory operations.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// Outcome of reading one entry: partially unreadable entries surface as
/// `Err` items instead of aborting the scan.
pub type EntryRead = InventoryResult<InventoryEntry>;

/// Port for enumerating installed programs.
///
/// Implementations are synchronous and may block on platform I/O; callers on
/// an async runtime should run them on a blocking thread.
pub trait SoftwareInventoryPort: Send + Sync {
    /// Enumerate all entries in platform order.
    ///
    /// Returns `Err` only when the store itself is unreadable.
    fn entries(&self) -> InventoryResult<Vec<EntryRead>>;
}

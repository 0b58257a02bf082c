//! Inventory for platforms without an installed-program registry.

use sy50_core::{EntryRead, InventoryError, InventoryResult, SoftwareInventoryPort};

/// Always fails with [`InventoryError::Unsupported`].
#[derive(Debug, Default)]
pub struct UnsupportedInventory;

impl SoftwareInventoryPort for UnsupportedInventory {
    fn entries(&self) -> InventoryResult<Vec<EntryRead>> {
        Err(InventoryError::Unsupported)
    }
}

//! Software inventory adapters.

#[cfg(windows)]
mod registry;
mod unsupported;

use std::sync::Arc;

use sy50_core::SoftwareInventoryPort;

#[cfg(windows)]
pub use registry::RegistryInventory;
pub use unsupported::UnsupportedInventory;

/// Inventory for the current platform.
pub fn default_inventory() -> Arc<dyn SoftwareInventoryPort> {
    #[cfg(windows)]
    {
        Arc::new(RegistryInventory::new())
    }

    #[cfg(not(windows))]
    {
        Arc::new(UnsupportedInventory)
    }
}

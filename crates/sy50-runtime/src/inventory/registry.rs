//! Installed-program inventory from the Windows "Uninstall" registry keys.

use std::io;

use sy50_core::{EntryRead, InventoryEntry, InventoryError, InventoryResult, SoftwareInventoryPort};
use tracing::debug;
use winreg::RegKey;
use winreg::enums::{HKEY_LOCAL_MACHINE, KEY_ENUMERATE_SUB_KEYS, KEY_QUERY_VALUE};

/// Uninstall keys, 32-bit view first.
const UNINSTALL_VIEWS: [&str; 2] = [
    r"SOFTWARE\WOW6432Node\Microsoft\Windows\CurrentVersion\Uninstall",
    r"SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall",
];

/// Reads `DisplayName` / `DisplayVersion` from every uninstall subkey under
/// `HKEY_LOCAL_MACHINE`.
#[derive(Debug, Default)]
pub struct RegistryInventory;

impl RegistryInventory {
    pub const fn new() -> Self {
        Self
    }

    fn scan_view(view: &str, entries: &mut Vec<EntryRead>) -> InventoryResult<()> {
        let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
        let uninstall = match hklm.open_subkey_with_flags(view, KEY_QUERY_VALUE | KEY_ENUMERATE_SUB_KEYS)
        {
            Ok(key) => key,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(%view, "Uninstall view not present");
                return Ok(());
            }
            Err(e) => return Err(InventoryError::Access(format!("{view}: {e}"))),
        };

        for name in uninstall.enum_keys() {
            let name = match name {
                Ok(name) => name,
                Err(e) => {
                    entries.push(Err(InventoryError::UnreadableEntry {
                        key: view.to_string(),
                        reason: e.to_string(),
                    }));
                    continue;
                }
            };
            let key = format!(r"{view}\{name}");

            match uninstall.open_subkey_with_flags(&name, KEY_QUERY_VALUE) {
                Ok(subkey) => entries.push(Ok(InventoryEntry {
                    key,
                    display_name: subkey.get_value::<String, _>("DisplayName").ok(),
                    display_version: subkey.get_value::<String, _>("DisplayVersion").ok(),
                })),
                Err(e) => entries.push(Err(InventoryError::UnreadableEntry {
                    key,
                    reason: e.to_string(),
                })),
            }
        }
        Ok(())
    }
}

impl SoftwareInventoryPort for RegistryInventory {
    fn entries(&self) -> InventoryResult<Vec<EntryRead>> {
        let mut entries = Vec::new();
        for view in UNINSTALL_VIEWS {
            Self::scan_view(view, &mut entries)?;
        }
        debug!(count = entries.len(), "Scanned uninstall registry keys");
        Ok(entries)
    }
}

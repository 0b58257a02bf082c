//! Platform adapters for the SY50 updater.
//!
//! Implements the `sy50-core` ports on top of the Windows registry, WTS
//! session tokens, `CreateProcessAsUserW`, named pipes and session messages.
//! On other platforms the adapters report that no inventory or interactive
//! session exists, so the core degrades to notifications and
//! `InventoryUnavailable` instead of failing.

#![deny(unused_crate_dependencies)]

pub mod consent;
pub mod inventory;
pub mod notify;
pub mod updater;

pub use consent::{ConsentOptions, HeadlessPlatform, default_consent_port};
#[cfg(windows)]
pub use consent::WindowsConsentPlatform;
pub use inventory::{UnsupportedInventory, default_inventory};
#[cfg(windows)]
pub use inventory::RegistryInventory;
pub use notify::{LogNotifier, default_notifier};
#[cfg(windows)]
pub use notify::SessionMessageNotifier;
pub use updater::LoggingUpdater;

// Named pipes are the only direct tokio use outside tests
#[cfg(not(windows))]
use tokio as _;

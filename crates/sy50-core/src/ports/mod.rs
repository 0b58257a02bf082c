//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from the
//! platform. They contain no implementation details and use only domain
//! types.
//!
//! # Design Rules
//!
//! - No registry, token or pipe types in any signature
//! - Every platform resource is an owned value released on drop
//! - Blocking ports are synchronous; waiting ports are async

pub mod consent;
pub mod inventory;
pub mod notification;
pub mod updater;

pub use consent::{ConsentError, ConsentPlatform, ConsentPort, RendezvousEndpoint};
pub use inventory::{
    EntryRead, InventoryEntry, InventoryError, InventoryResult, SoftwareInventoryPort,
};
pub use notification::{NotificationError, NotificationPort};
pub use updater::{UpdaterError, UpdaterPort};

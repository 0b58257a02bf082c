//! Core of the SY50 updater.
//!
//! Decides whether the Simrad SY50 software on a machine should be updated
//! and, from a background service context, asks the desktop user before
//! anything is installed. All OS access goes through the traits in
//! [`ports`]; the Windows adapters live in `sy50-runtime`.
//!
//! - [`version`]: dotted version comparison
//! - [`services::VersionOracle`]: installed-version lookup
//! - [`services::ConsentChannel`]: cross-session consent helper + rendezvous
//! - [`services::NotificationFallback`]: passive notification
//! - [`services::UpdateDecisionEngine`]: one decision cycle per trigger
//! - [`services::UpdaterComponent`]: status / check / close surface

#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod ports;
pub mod services;
pub mod settings;
pub mod version;

pub use domain::{
    ConsentRequest, ConsentResponse, ConsentStrategy, CycleState, DecisionOutcome, DecisionReport,
    UpdateNotice, UpdatePlan,
};
pub use ports::{
    ConsentError, ConsentPlatform, ConsentPort, EntryRead, InventoryEntry, InventoryError,
    InventoryResult, NotificationError, NotificationPort, RendezvousEndpoint,
    SoftwareInventoryPort, UpdaterError, UpdaterPort,
};
pub use services::{
    CheckPolicy, CheckResult, ConsentChannel, InteractiveSession, NotificationFallback,
    StatusReading, UpdateDecisionEngine, UpdaterComponent, VersionLookup, VersionOracle,
};
pub use settings::{
    ConfigError, DEFAULT_CONSENT_TIMEOUT_SECS, DEFAULT_DESKTOP, DEFAULT_PIPE_NAME,
    DEFAULT_PROGRAM_NAME, NOT_INSTALLED, UpdaterConfig, validate_config,
};
pub use version::{VersionComparison, is_target_greater};

// Only used by the integration tests
#[cfg(test)]
use tokio_test as _;

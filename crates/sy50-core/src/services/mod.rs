//! Services that orchestrate ports into the update workflow.

mod consent_channel;
mod decision_engine;
mod notification_fallback;
mod updater_component;
mod version_oracle;

pub use consent_channel::{ConsentChannel, InteractiveSession};
pub use decision_engine::{CheckPolicy, UpdateDecisionEngine};
pub use notification_fallback::NotificationFallback;
pub use updater_component::{CheckResult, StatusReading, UpdaterComponent};
pub use version_oracle::{VersionLookup, VersionOracle};

//! Decision cycle states and outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::consent::{ConsentRequest, ConsentResponse, ConsentStrategy};

/// States of one decision cycle.
///
/// `UpToDate`, `Resolved`, `InventoryUnavailable` and `Busy` are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleState {
    Start,
    DetectVersion,
    NotInstalled,
    Installed(String),
    UpToDate(String),
    UpdateAvailable(String),
    RequestingConsent(ConsentRequest),
    Resolved {
        request: ConsentRequest,
        strategy: ConsentStrategy,
        response: ConsentResponse,
    },
    InventoryUnavailable(String),
    Busy,
}

impl CycleState {
    /// Name used in logs and in the cycle trace.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::DetectVersion => "DetectVersion",
            Self::NotInstalled => "NotInstalled",
            Self::Installed(_) => "Installed",
            Self::UpToDate(_) => "UpToDate",
            Self::UpdateAvailable(_) => "UpdateAvailable",
            Self::RequestingConsent(_) => "RequestingConsent",
            Self::Resolved { .. } => "Resolved",
            Self::InventoryUnavailable(_) => "InventoryUnavailable",
            Self::Busy => "Busy",
        }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::UpToDate(_) | Self::Resolved { .. } | Self::InventoryUnavailable(_) | Self::Busy
        )
    }
}

/// Terminal result of a decision cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DecisionOutcome {
    /// Installed version is at or above the target; nothing to do.
    UpToDate { installed: String, target: String },
    /// An update or install was offered and the consent step finished.
    Resolved {
        request: ConsentRequest,
        strategy: ConsentStrategy,
        response: ConsentResponse,
    },
    /// The software inventory could not be read; no action taken.
    InventoryUnavailable { reason: String },
    /// Another cycle holds the consent gate; this trigger was rejected.
    Busy,
}

impl DecisionOutcome {
    /// True only for `Resolved(Accepted)`: the caller should hand off to the updater.
    pub const fn should_install(&self) -> bool {
        matches!(
            self,
            Self::Resolved {
                response: ConsentResponse::Accepted,
                ..
            }
        )
    }

    /// The consent response, if the cycle reached the consent step.
    pub const fn response(&self) -> Option<ConsentResponse> {
        match self {
            Self::Resolved { response, .. } => Some(*response),
            _ => None,
        }
    }

    /// Human-readable outcome for `program`.
    pub fn describe(&self, program: &str) -> String {
        match self {
            Self::UpToDate { installed, .. } => format!(
                "{program} {installed} is installed and is the current version. No upgrade is required."
            ),
            Self::Resolved {
                request,
                strategy,
                response,
            } => {
                let offer = match &request.current_version {
                    Some(current) => format!(
                        "{program} {current} is installed but a {} update is available.",
                        request.target_version
                    ),
                    None => format!(
                        "{program} is not installed. Version {} is available.",
                        request.target_version
                    ),
                };
                let decision = match (strategy, response) {
                    (_, ConsentResponse::Accepted) => "The user accepted the update.",
                    (_, ConsentResponse::Declined) => "The user declined the update.",
                    (_, ConsentResponse::Cancelled) => "The user cancelled the prompt.",
                    (ConsentStrategy::Notification, ConsentResponse::Unavailable) => {
                        "A notification was posted; no action taken."
                    }
                    (ConsentStrategy::Interactive, ConsentResponse::Unavailable) => {
                        "The user could not be asked; no action taken."
                    }
                    (_, ConsentResponse::TimedOut) => {
                        "No answer arrived before the deadline; no action taken."
                    }
                    (_, ConsentResponse::Malformed) => {
                        "The answer could not be understood; no action taken."
                    }
                };
                format!("{offer} {decision}")
            }
            Self::InventoryUnavailable { reason } => {
                format!("Unable to read the installed programs ({reason}); no action taken.")
            }
            Self::Busy => {
                "busy: another update check is awaiting a user response; try again later."
                    .to_string()
            }
        }
    }
}

/// Full record of one decision cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionReport {
    pub outcome: DecisionOutcome,
    /// State names visited, in order, starting at `Start`.
    pub trace: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl DecisionReport {
    /// Whether the cycle passed through the named state.
    pub fn visited(&self, state: &str) -> bool {
        self.trace.iter().any(|s| s == state)
    }
}

/// What the external updater is asked to install after consent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePlan {
    pub program: String,
    pub current_version: Option<String>,
    pub target_version: String,
    pub download_url: Option<String>,
}

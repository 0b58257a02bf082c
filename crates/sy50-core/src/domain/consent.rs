//! Consent request/response types exchanged with the interactive helper.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the user is being asked to approve.
///
/// Built fresh for every decision cycle and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentRequest {
    /// Installed version, or `None` when the program is not installed.
    pub current_version: Option<String>,
    /// Version the update would install.
    pub target_version: String,
}

impl ConsentRequest {
    /// Create a request for the given installed/target pair.
    pub fn new(current_version: Option<String>, target_version: impl Into<String>) -> Self {
        Self {
            current_version,
            target_version: target_version.into(),
        }
    }

    /// Positional arguments handed to the helper executable.
    ///
    /// The current version is always passed, as an empty string when the
    /// program is absent, so the helper can rely on argument positions.
    pub fn helper_args(&self) -> [String; 2] {
        [
            self.current_version.clone().unwrap_or_default(),
            self.target_version.clone(),
        ]
    }

    /// True when the program is not installed at all.
    pub const fn is_fresh_install(&self) -> bool {
        self.current_version.is_none()
    }
}

/// The user's decision, or the reason no decision was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsentResponse {
    /// The user answered "Yes".
    Accepted,
    /// The user answered "No".
    Declined,
    /// The user dismissed the prompt with "Cancel".
    Cancelled,
    /// No interactive answer could be requested (prompting disabled,
    /// no desktop session, or the channel failed before the helper ran).
    Unavailable,
    /// The helper did not answer before the deadline.
    TimedOut,
    /// The helper answered with something other than a known token.
    Malformed,
}

impl ConsentResponse {
    /// Map one line received from the helper to a response.
    ///
    /// Trailing line terminators are ignored; everything else must match
    /// exactly.
    pub fn from_token(line: &str) -> Self {
        match line.trim_end_matches(['\r', '\n']) {
            "Yes" => Self::Accepted,
            "No" => Self::Declined,
            "Cancel" => Self::Cancelled,
            _ => Self::Malformed,
        }
    }

    /// Whether installation should proceed.
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Short label used in logs and result text.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Cancelled => "cancelled",
            Self::Unavailable => "unavailable",
            Self::TimedOut => "timed out",
            Self::Malformed => "malformed",
        }
    }
}

impl fmt::Display for ConsentResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which consent strategy a cycle ended up using.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsentStrategy {
    /// A helper was (or was attempted to be) launched on the user's desktop.
    Interactive,
    /// A passive notification was posted instead.
    Notification,
}

/// Text of the passive notification posted by the fallback strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateNotice {
    pub title: String,
    pub body: String,
}

impl UpdateNotice {
    /// Build the notice for `program` from a consent request.
    pub fn for_request(program: &str, request: &ConsentRequest) -> Self {
        match &request.current_version {
            Some(current) => Self {
                title: format!("{program} update available"),
                body: format!(
                    "{program} {current} is installed but a {} update is available.",
                    request.target_version
                ),
            },
            None => Self {
                title: format!("{program} is not installed"),
                body: format!(
                    "{program} is not installed. Version {} is available to download and install.",
                    request.target_version
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_token() {
        assert_eq!(ConsentResponse::from_token("Yes\n"), ConsentResponse::Accepted);
        assert_eq!(ConsentResponse::from_token("Yes\r\n"), ConsentResponse::Accepted);
        assert_eq!(ConsentResponse::from_token("No"), ConsentResponse::Declined);
        assert_eq!(ConsentResponse::from_token("Cancel\n"), ConsentResponse::Cancelled);
    }

    #[test]
    fn test_from_token_rejects_near_misses() {
        for token in ["", "\n", "yes", "YES", " Yes", "Yes please", "Ok"] {
            assert_eq!(
                ConsentResponse::from_token(token),
                ConsentResponse::Malformed,
                "token {token:?}"
            );
        }
    }

    #[test]
    fn test_helper_args_keep_positions() {
        let absent = ConsentRequest::new(None, "2.0.0");
        assert_eq!(absent.helper_args(), [String::new(), "2.0.0".to_string()]);
        assert!(absent.is_fresh_install());

        let present = ConsentRequest::new(Some("1.0.0".to_string()), "1.5.0");
        assert_eq!(
            present.helper_args(),
            ["1.0.0".to_string(), "1.5.0".to_string()]
        );
    }

    #[test]
    fn test_notice_text() {
        let upgrade = UpdateNotice::for_request(
            "Simrad SY50",
            &ConsentRequest::new(Some("1.0".to_string()), "1.5"),
        );
        assert_eq!(
            upgrade.body,
            "Simrad SY50 1.0 is installed but a 1.5 update is available."
        );

        let fresh = UpdateNotice::for_request("Simrad SY50", &ConsentRequest::new(None, "2.0"));
        assert!(fresh.title.contains("not installed"));
        assert!(fresh.body.contains("2.0"));
    }
}

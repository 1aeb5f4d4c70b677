//! Cross-window OAuth outcome wire type.
//!
//! The popup posts exactly one of these per lifetime; the opener's listener
//! accepts it only after checking the sender origin.

use serde::{Deserialize, Serialize};

/// Outcome of the popup exchange, in the exact wire shape the browser
/// variant uses: `{"type":"oauth-success",...}` / `{"type":"oauth-fail",...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OAuthOutcome {
    /// The code exchange succeeded and produced credentials.
    #[serde(rename = "oauth-success", rename_all = "camelCase")]
    Success {
        /// The issued access token.
        access_token: String,
        /// The issued refresh token, when client-stored.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        refresh_token: Option<String>,
    },
    /// The exchange failed; `reason` is surfaced to the user.
    #[serde(rename = "oauth-fail")]
    Fail {
        /// Failure reason (provider error code or exchange error).
        reason: String,
    },
}

impl OAuthOutcome {
    /// Builds a success outcome.
    #[must_use]
    pub fn success(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self::Success {
            access_token: access_token.into(),
            refresh_token,
        }
    }

    /// Builds a failure outcome.
    #[must_use]
    pub fn fail(reason: impl Into<String>) -> Self {
        Self::Fail {
            reason: reason.into(),
        }
    }
}

/// An outcome together with the origin it was posted from.
///
/// Carrying the origin explicitly keeps the listener's trust boundary
/// testable in isolation instead of being an inline check at the window API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeEnvelope {
    /// Origin of the sending window.
    pub origin: String,
    /// The posted outcome.
    pub outcome: OAuthOutcome,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn success_serializes_to_browser_payload() {
        let outcome = OAuthOutcome::success("X", Some("Y".to_string()));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type":"oauth-success","accessToken":"X","refreshToken":"Y"})
        );
    }

    #[test]
    fn success_omits_absent_refresh_token() {
        let outcome = OAuthOutcome::success("X", None);
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(!json.contains("refreshToken"));
    }

    #[test]
    fn fail_round_trips() {
        let outcome = OAuthOutcome::fail("access_denied");
        let json = serde_json::to_string(&outcome).unwrap();
        assert_eq!(json, r#"{"type":"oauth-fail","reason":"access_denied"}"#);
        let back: OAuthOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(back, outcome);
    }
}

//! Session error taxonomy.

use serde::Deserialize;
use thiserror::Error;

/// Failures surfaced by the session client.
///
/// Refresh-and-retry recovery is handled inside the pipeline; callers only
/// see these once recovery is impossible or not applicable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// 401 that could not be (or was not allowed to be) recovered.
    #[error("unauthorized")]
    Unauthorized,

    /// 403: the credential is valid but insufficient. Never refreshed.
    #[error("forbidden")]
    Forbidden,

    /// A token-issuing endpoint itself failed. Terminal for the session.
    #[error("auth endpoint failed with status {status}")]
    AuthEndpoint {
        /// HTTP status returned by the auth endpoint.
        status: u16,
    },

    /// Network or protocol failure below the HTTP status level.
    #[error("transport error: {0}")]
    Transport(String),

    /// The popup-side code exchange failed.
    #[error("exchange failed: {0}")]
    Exchange(String),

    /// Any other non-success HTTP status, normalized into one shape.
    #[error("request failed with status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, best-effort decoded as text.
        body: String,
    },

    /// A request target could not be resolved to a URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Error body shape used by the backend on auth failures.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    #[serde(default)]
    pub error: Option<String>,
    /// Human-readable detail.
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Parses an error body from raw response bytes; malformed bodies yield
    /// an empty value rather than an error.
    #[must_use]
    pub fn from_bytes(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    /// Returns true if the body signals the credential was explicitly
    /// invalidated (revoked or refresh reuse detected). Such a 401 skips the
    /// refresh attempt entirely: the credential is known to be dead.
    #[must_use]
    pub fn signals_revocation(&self) -> bool {
        if self.error.as_deref() == Some("TOKEN_REVOKED") {
            return true;
        }
        self.message
            .as_deref()
            .is_some_and(|m| m.contains("reuse detected") || m.contains("revoked"))
    }
}

//! Credential types for the session client.

use serde::{Deserialize, Serialize};

/// Storage key under which the access token is persisted.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Storage key under which the client-held refresh token is persisted.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// The credential pair held by the client.
///
/// The access token is short-lived and attached as a bearer header to every
/// non-auth request. The refresh token is either held here (client-stored
/// mode) or lives exclusively in an HTTP-only cookie (cookie mode), in which
/// case `refresh` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Short-lived bearer token authorizing API calls.
    pub access: String,
    /// Longer-lived token used solely to obtain a new access token.
    pub refresh: Option<String>,
}

impl Credential {
    /// Creates a credential with both tokens.
    #[must_use]
    pub fn new(access: impl Into<String>, refresh: Option<String>) -> Self {
        Self {
            access: access.into(),
            refresh,
        }
    }

    /// Creates an access-only credential (cookie-mode refresh).
    #[must_use]
    pub fn access_only(access: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: None,
        }
    }

    /// Returns the `Authorization` header value for the access token.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.access)
    }
}

/// Token pair as issued by the backend's exchange and refresh endpoints.
///
/// The refresh endpoint may respond access-only when the rotated refresh
/// token travels as a cookie instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// The newly issued access token.
    pub access_token: String,
    /// The rotated refresh token, when the backend returns one in the body.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl TokenPair {
    /// Converts the pair into a stored credential.
    ///
    /// When the backend did not rotate the refresh token in the body, the
    /// previously held one is carried over so a client-stored refresh token
    /// is not lost across refreshes.
    #[must_use]
    pub fn into_credential(self, previous_refresh: Option<String>) -> Credential {
        Credential {
            access: self.access_token,
            refresh: self.refresh_token.or(previous_refresh),
        }
    }
}

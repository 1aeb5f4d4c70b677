//! Session client configuration.

use serde::{Deserialize, Serialize};
use url::Url;

/// Where the refresh token lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshMode {
    /// Refresh token is held by the client and sent as an explicit bearer
    /// header on the refresh call (legacy variant).
    #[default]
    ClientStored,
    /// Refresh token lives exclusively in an HTTP-only cookie scoped to the
    /// refresh/logout paths; the client sends no refresh header.
    Cookie,
}

/// Configuration for the session client.
///
/// Constructed once at application start and threaded through the pipeline,
/// coordinator and popup flow by dependency injection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Backend API base URL, e.g. `http://localhost:8080`.
    pub api_base: String,
    /// The application's own origin, e.g. `http://localhost:3000`. Sole
    /// trust anchor for the cross-window channel.
    pub own_origin: String,
    /// Login entry point. Target of the one-time unrecoverable-failure
    /// redirect; no refresh is attempted while this is the current location.
    pub login_path: String,
    /// Public entry point, target of logout.
    pub public_entry: String,
    /// Authenticated entry point, target of a completed login.
    pub authenticated_entry: String,
    /// Path of the popup success page, appended to `own_origin` to form the
    /// `front` redirect parameter.
    pub popup_success_path: String,
    /// Where the refresh token lives.
    pub refresh_mode: RefreshMode,
    /// Delay before the popup closes itself after posting success, so the
    /// message flushes first.
    pub popup_close_delay_ms: u64,
    /// Debug flag: keep the popup open instead of auto-closing.
    pub popup_keep_open: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            own_origin: String::new(),
            login_path: "/login".to_string(),
            public_entry: "/".to_string(),
            authenticated_entry: "/".to_string(),
            popup_success_path: "/oauth/success-popup".to_string(),
            refresh_mode: RefreshMode::ClientStored,
            popup_close_delay_ms: 400,
            popup_keep_open: false,
        }
    }
}

impl SessionConfig {
    /// Creates a configuration for the given API base and own origin,
    /// with default paths.
    #[must_use]
    pub fn new(api_base: impl Into<String>, own_origin: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            own_origin: own_origin.into(),
            ..Self::default()
        }
    }

    /// Sets the refresh mode (builder style).
    #[must_use]
    pub const fn with_refresh_mode(mut self, mode: RefreshMode) -> Self {
        self.refresh_mode = mode;
        self
    }

    /// Sets the popup keep-open debug flag (builder style).
    #[must_use]
    pub const fn with_popup_keep_open(mut self, keep_open: bool) -> Self {
        self.popup_keep_open = keep_open;
        self
    }

    /// Returns true for screens that are reachable while logged out. Used by
    /// the computed authenticated state to avoid a "logged out" flash while
    /// identity resolution is still in flight.
    #[must_use]
    pub fn is_public_path(&self, path: &str) -> bool {
        path == self.login_path || path == self.popup_success_path
    }

    /// Builds the provider authorization URL opened in the popup, carrying
    /// the popup success page as the `front` redirect and a `state=popup`
    /// marker.
    #[must_use]
    pub fn authorization_url(&self, provider: &str) -> String {
        let front = format!("{}{}", self.own_origin, self.popup_success_path);
        let base = format!("{}/oauth2/authorization/{provider}", self.api_base);
        Url::parse(&base).map_or_else(
            |_| base.clone(),
            |mut url| {
                url.query_pairs_mut()
                    .append_pair("front", &front)
                    .append_pair("state", "popup");
                url.into()
            },
        )
    }
}

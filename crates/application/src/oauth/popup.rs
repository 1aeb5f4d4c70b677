//! Popup-side half of the OAuth handshake.
//!
//! The popup lands on the success page with a one-time code in its URL,
//! exchanges it for credentials, posts the outcome to the opener window and
//! closes itself. When no opener exists (link opened in a plain tab) the
//! credentials are stored locally and the tab navigates into the app.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use aegis_domain::{OAuthOutcome, SessionConfig, SessionError};
use tracing::{debug, info, warn};
use url::{form_urlencoded, Url};

use crate::auth::AuthGateway;
use crate::ports::{CredentialStore, Navigator, PopupWindow};

/// How a popup exchange run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupResult {
    /// Outcome delivered to the opener; the popup closed (or stayed open
    /// under the keep-open flag).
    Posted,
    /// No opener window: credentials were stored in this context and the
    /// tab navigated into the application.
    StoredLocally,
    /// The exchange failed; a failure outcome was posted where possible.
    Failed(String),
    /// A previous run already consumed this popup's code.
    AlreadyRan,
}

/// Drives the success page: parse the landing URL, exchange the code,
/// deliver the outcome.
pub struct PopupExchange {
    gateway: AuthGateway,
    store: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
    window: Arc<dyn PopupWindow>,
    config: Arc<SessionConfig>,
    ran: AtomicBool,
}

impl PopupExchange {
    /// Creates the exchange driver for one popup lifetime.
    #[must_use]
    pub fn new(
        gateway: AuthGateway,
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
        window: Arc<dyn PopupWindow>,
        config: Arc<SessionConfig>,
    ) -> Self {
        Self {
            gateway,
            store,
            navigator,
            window,
            config,
            ran: AtomicBool::new(false),
        }
    }

    /// Runs the exchange for the popup's landing URL.
    ///
    /// Idempotent per instance: the authorization code is single-use, so a
    /// second invocation (remount, double event) is a no-op.
    pub async fn run(&self, popup_href: &str) -> PopupResult {
        if self.ran.swap(true, Ordering::SeqCst) {
            debug!("exchange already ran for this popup");
            return PopupResult::AlreadyRan;
        }

        if let Some(error) = query_param(popup_href, "error") {
            warn!(%error, "provider returned an error");
            return self.deliver_failure(error);
        }

        let Some(code) = query_param(popup_href, "code") else {
            warn!("popup landed without an authorization code");
            return self.deliver_failure("missing code".to_string());
        };

        match self.gateway.exchange(&code).await {
            Ok(pair) => {
                let refresh = pair.refresh_token.clone();
                let outcome = OAuthOutcome::success(pair.access_token.clone(), refresh);
                if self.window.post_to_opener(&self.config.own_origin, &outcome) {
                    info!("outcome posted to opener");
                    if self.config.popup_keep_open {
                        debug!("keep-open flag set, popup stays up");
                    } else {
                        // Give the message a beat to flush before the window
                        // goes away.
                        tokio::time::sleep(Duration::from_millis(
                            self.config.popup_close_delay_ms,
                        ))
                        .await;
                        self.window.close();
                    }
                    PopupResult::Posted
                } else {
                    // Plain-tab fallback: no opener to hand off to.
                    info!("no opener window, storing credentials locally");
                    self.store
                        .set(&pair.into_credential(None));
                    self.navigator.assign(&self.config.authenticated_entry);
                    PopupResult::StoredLocally
                }
            }
            Err(error) => {
                warn!(%error, "code exchange failed");
                let reason = match error {
                    SessionError::Exchange(reason) => reason,
                    other => other.to_string(),
                };
                self.deliver_failure(reason)
            }
        }
    }

    /// Posts a failure outcome and keeps the popup open so the user can see
    /// what happened.
    fn deliver_failure(&self, reason: String) -> PopupResult {
        let outcome = OAuthOutcome::fail(reason.clone());
        self.window.post_to_opener(&self.config.own_origin, &outcome);
        PopupResult::Failed(reason)
    }
}

/// Extracts a query parameter from a full URL, tolerating bare
/// path-plus-query strings.
fn query_param(href: &str, name: &str) -> Option<String> {
    let query = match Url::parse(href) {
        Ok(url) => url.query().map(str::to_string),
        Err(_) => href.split_once('?').map(|(_, q)| {
            q.split_once('#').map_or(q, |(q, _)| q).to_string()
        }),
    }?;
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

//! Opener-side half of the OAuth handshake.
//!
//! The opener receives posted outcomes over a channel and accepts only those
//! originating from its own origin; everything else is a different window on
//! a foreign page and is dropped.

use std::sync::Arc;
use std::time::Duration;

use aegis_domain::{Credential, OAuthOutcome, OutcomeEnvelope, SessionConfig};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

use crate::ports::{CredentialStore, Navigator, PopupHandle};

/// What the listener observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerEvent {
    /// Credentials were stored and the app navigated to its entry point.
    SignedIn,
    /// The popup reported a failure, carrying the reason to surface.
    Failed(String),
}

/// Accepts OAuth outcomes posted by the popup.
pub struct OutcomeListener {
    store: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
    config: Arc<SessionConfig>,
}

impl OutcomeListener {
    /// Creates a listener bound to the application's own origin.
    #[must_use]
    pub fn new(
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
        config: Arc<SessionConfig>,
    ) -> Self {
        Self {
            store,
            navigator,
            config,
        }
    }

    /// Handles one posted envelope.
    ///
    /// Returns `None` for envelopes from any origin other than our own; the
    /// origin check is the sole trust boundary of this channel.
    pub fn handle(&self, envelope: &OutcomeEnvelope) -> Option<ListenerEvent> {
        if envelope.origin != self.config.own_origin {
            warn!(origin = %envelope.origin, "dropping message from foreign origin");
            return None;
        }
        match &envelope.outcome {
            OAuthOutcome::Success {
                access_token,
                refresh_token,
            } => {
                self.store
                    .set(&Credential::new(access_token, refresh_token.clone()));
                info!("signed in via popup");
                self.navigator.assign(&self.config.authenticated_entry);
                Some(ListenerEvent::SignedIn)
            }
            OAuthOutcome::Fail { reason } => {
                warn!(%reason, "popup reported a failure");
                Some(ListenerEvent::Failed(reason.clone()))
            }
        }
    }

    /// Drains the channel until a handled event or channel close.
    pub async fn recv(&self, rx: &mut UnboundedReceiver<OutcomeEnvelope>) -> Option<ListenerEvent> {
        while let Some(envelope) = rx.recv().await {
            if let Some(event) = self.handle(&envelope) {
                return Some(event);
            }
        }
        None
    }
}

/// Resolves once the popup window is closed, polling at `poll` intervals.
///
/// Lets the opener stop the "signing in" state when the user dismisses the
/// popup without completing the flow.
pub async fn watch_popup(handle: &dyn PopupHandle, poll: Duration) {
    while !handle.is_closed() {
        tokio::time::sleep(poll).await;
    }
}

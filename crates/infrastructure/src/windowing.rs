//! Channel-backed cross-window adapters.
//!
//! The popup and its opener are bridged by an unbounded channel carrying
//! [`OutcomeEnvelope`]s, mirroring the post-message hand-off: the poster
//! names a target origin, the envelope carries the sender origin, and the
//! listener enforces trust on its side.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use aegis_application::ports::{PopupHandle, PopupWindow};
use aegis_domain::{OAuthOutcome, OutcomeEnvelope};
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

/// The popup's side of the bridge.
pub struct ChannelPopupWindow {
    origin: String,
    opener: Option<UnboundedSender<OutcomeEnvelope>>,
    closed: Arc<AtomicBool>,
}

impl ChannelPopupWindow {
    /// Creates a popup window connected to an opener listening on `opener`.
    #[must_use]
    pub fn connected(origin: &str, opener: UnboundedSender<OutcomeEnvelope>) -> Self {
        Self {
            origin: origin.to_string(),
            opener: Some(opener),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Creates a window with no opener, as when the success page is loaded
    /// in a plain tab.
    #[must_use]
    pub fn detached(origin: &str) -> Self {
        Self {
            origin: origin.to_string(),
            opener: None,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns the opener-side handle observing this window.
    #[must_use]
    pub fn handle(&self) -> ChannelPopupHandle {
        ChannelPopupHandle {
            closed: self.closed.clone(),
        }
    }
}

impl PopupWindow for ChannelPopupWindow {
    fn post_to_opener(&self, target_origin: &str, outcome: &OAuthOutcome) -> bool {
        let Some(opener) = &self.opener else {
            return false;
        };
        if target_origin != self.origin {
            // Same semantics as a post-message with a mismatched target:
            // the opener exists but never sees the message.
            warn!(%target_origin, "dropping outcome for foreign target origin");
            return true;
        }
        let envelope = OutcomeEnvelope {
            origin: self.origin.clone(),
            outcome: outcome.clone(),
        };
        if opener.send(envelope).is_err() {
            warn!("opener side of the channel is gone");
        }
        true
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// The opener's view of a popup it spawned.
pub struct ChannelPopupHandle {
    closed: Arc<AtomicBool>,
}

impl PopupHandle for ChannelPopupHandle {
    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

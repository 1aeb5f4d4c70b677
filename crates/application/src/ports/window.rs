//! Cross-window ports for the popup flow.

use aegis_domain::OAuthOutcome;

/// Port for the popup's own window: post back to the opener and close.
pub trait PopupWindow: Send + Sync {
    /// Posts an outcome to the opener, restricted to `target_origin`.
    ///
    /// Returns false when no opener is available (the page was opened
    /// directly rather than as a popup); the caller then falls back to
    /// storing the credential locally and navigating.
    fn post_to_opener(&self, target_origin: &str, outcome: &OAuthOutcome) -> bool;

    /// Closes the window.
    fn close(&self);
}

/// Port for the opener's view of a popup it spawned.
pub trait PopupHandle: Send + Sync {
    /// Returns true once the popup window has been closed.
    fn is_closed(&self) -> bool;
}

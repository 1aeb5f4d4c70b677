//! Navigation port.

/// Port for full-page navigation and location inspection.
///
/// A full navigation (as opposed to a soft state update) is chosen
/// deliberately at the login hand-off so session state re-initializes
/// cleanly.
pub trait Navigator: Send + Sync {
    /// Navigates to the given location.
    fn assign(&self, location: &str);

    /// Returns the current location path.
    fn current_path(&self) -> String;
}

//! In-memory navigator.

use std::sync::{PoisonError, RwLock};

use aegis_application::ports::Navigator;
use tracing::debug;

/// Navigator tracking the current location in memory.
///
/// Stands in for a browser location in host environments without one; a
/// shell embedding the session client swaps in its own implementation.
pub struct MemoryNavigator {
    current: RwLock<String>,
}

impl MemoryNavigator {
    /// Creates a navigator positioned at `initial`.
    #[must_use]
    pub fn new(initial: &str) -> Self {
        Self {
            current: RwLock::new(initial.to_string()),
        }
    }
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for MemoryNavigator {
    fn assign(&self, location: &str) {
        debug!(%location, "navigating");
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = location.to_string();
    }

    fn current_path(&self) -> String {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

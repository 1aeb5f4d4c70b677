//! Application-facing session state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use aegis_domain::{Identity, SessionConfig};
use tracing::{info, warn};

use crate::auth::{AuthGateway, SessionPipeline};
use crate::ports::{CredentialStore, Navigator};

#[derive(Default)]
struct SessionState {
    identity: Option<Identity>,
    loading: bool,
}

/// The UI layer's view of "who is logged in".
///
/// Identity is resolved through the pipeline, so an expired access token is
/// refreshed transparently before the profile lookup fails.
pub struct SessionContext {
    pipeline: Arc<SessionPipeline>,
    gateway: AuthGateway,
    store: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
    config: Arc<SessionConfig>,
    state: Mutex<SessionState>,
}

impl SessionContext {
    /// Creates a session context.
    #[must_use]
    pub fn new(
        pipeline: Arc<SessionPipeline>,
        gateway: AuthGateway,
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
        config: Arc<SessionConfig>,
    ) -> Self {
        Self {
            pipeline,
            gateway,
            store,
            navigator,
            config,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// The resolved identity, if any.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.lock_state().identity.clone()
    }

    /// True while an identity lookup is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.lock_state().loading
    }

    /// Computed authenticated state: an access token is held and either the
    /// identity has resolved or the user is on a public/auth screen.
    ///
    /// The public-screen alternative deliberately trusts the unvalidated
    /// local token so the UI does not flash "logged out" while the identity
    /// lookup is still in flight.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        if self.store.access_token().is_none() {
            return false;
        }
        self.lock_state().identity.is_some()
            || self.config.is_public_path(&self.navigator.current_path())
    }

    /// Resolves the identity via `GET /api/users/me`.
    ///
    /// Failures clear the identity and are swallowed; the pipeline already
    /// handled any recoverable 401 and the unrecoverable redirect.
    pub async fn refresh_identity(&self) {
        self.lock_state().loading = true;
        let resolved = match self.pipeline.get_json::<Identity>("/api/users/me").await {
            Ok(identity) => Some(identity),
            Err(error) => {
                warn!(%error, "identity lookup failed");
                None
            }
        };
        let mut state = self.lock_state();
        state.identity = resolved;
        state.loading = false;
    }

    /// Logs out: best-effort backend invalidation, then local teardown and
    /// navigation to the public entry point. Never fails.
    pub async fn logout(&self, all_sessions: bool) {
        let access = self.store.access_token();
        self.store.clear();

        if let Some(access) = access {
            if let Err(error) = self.gateway.logout(Some(&access), all_sessions).await {
                warn!(%error, "logout call failed, continuing local teardown");
            }
        }

        self.lock_state().identity = None;
        info!("session closed");
        self.navigator.assign(&self.config.public_entry);
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

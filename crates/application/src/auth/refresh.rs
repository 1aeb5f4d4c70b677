//! Single-flight credential refresh.
//!
//! At most one refresh call is ever outstanding, no matter how many requests
//! fail with a 401 concurrently. The first failure becomes the leader and
//! performs the call; everyone else joins a FIFO waiter queue appended to
//! under the same lock acquisition that observes the in-flight state, and
//! every waiter sees the leader's single outcome.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use aegis_domain::{Credential, RefreshMode, SessionConfig};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::auth::AuthGateway;
use crate::ports::{CredentialStore, Navigator};

enum RefreshState {
    Idle,
    Refreshing {
        waiters: Vec<oneshot::Sender<Option<Credential>>>,
    },
}

enum Role {
    Leader,
    Waiter(oneshot::Receiver<Option<Credential>>),
}

/// Owner of the single-flight refresh operation and the session teardown
/// path it shares with the pipeline.
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
    redirected: AtomicBool,
    gateway: AuthGateway,
    store: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
    config: Arc<SessionConfig>,
}

impl RefreshCoordinator {
    /// Creates a coordinator.
    #[must_use]
    pub fn new(
        gateway: AuthGateway,
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
        config: Arc<SessionConfig>,
    ) -> Self {
        Self {
            state: Mutex::new(RefreshState::Idle),
            redirected: AtomicBool::new(false),
            gateway,
            store,
            navigator,
            config,
        }
    }

    /// Obtains a fresh credential, joining the in-flight refresh if one is
    /// already running.
    ///
    /// Returns `None` when the refresh failed; the store has then been
    /// cleared and the one-time login redirect issued.
    pub async fn obtain(&self) -> Option<Credential> {
        let role = {
            let mut state = self.lock_state();
            match &mut *state {
                RefreshState::Idle => {
                    *state = RefreshState::Refreshing {
                        waiters: Vec::new(),
                    };
                    Role::Leader
                }
                RefreshState::Refreshing { waiters } => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    debug!("joining in-flight refresh");
                    Role::Waiter(rx)
                }
            }
        };

        match role {
            Role::Leader => {
                debug!("starting credential refresh");
                let outcome = self.lead().await;
                let waiters = {
                    let mut state = self.lock_state();
                    match std::mem::replace(&mut *state, RefreshState::Idle) {
                        RefreshState::Refreshing { waiters } => waiters,
                        RefreshState::Idle => Vec::new(),
                    }
                };
                // FIFO release; each waiter re-issues its own request.
                for waiter in waiters {
                    let _ = waiter.send(outcome.clone());
                }
                outcome
            }
            Role::Waiter(rx) => rx.await.unwrap_or(None),
        }
    }

    async fn lead(&self) -> Option<Credential> {
        let previous_refresh = match self.config.refresh_mode {
            RefreshMode::ClientStored => match self.store.refresh_token() {
                Some(token) => Some(token),
                None => {
                    warn!("no refresh token held, tearing session down");
                    self.teardown();
                    return None;
                }
            },
            RefreshMode::Cookie => None,
        };

        match self.gateway.refresh(previous_refresh.as_deref()).await {
            Ok(pair) => {
                let credential = pair.into_credential(previous_refresh);
                self.store.set(&credential);
                info!("credential refreshed");
                Some(credential)
            }
            Err(error) => {
                warn!(%error, "credential refresh failed");
                self.teardown();
                None
            }
        }
    }

    /// Clears the credential store and navigates to the login entry point.
    ///
    /// The navigation happens at most once per coordinator lifetime, however
    /// many failures race into it.
    pub fn teardown(&self) {
        self.store.clear();
        if !self.redirected.swap(true, Ordering::SeqCst) {
            self.navigator.assign(&self.config.login_path);
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

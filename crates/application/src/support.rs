//! In-memory test doubles for the ports.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use aegis_domain::{path_of, ApiRequest, ApiResponse, Credential, OAuthOutcome, SessionResult};
use tokio::sync::Notify;

use crate::ports::{CredentialStore, HttpTransport, Navigator, PopupHandle, PopupWindow};

type Responder = dyn Fn(&ApiRequest, usize) -> SessionResult<ApiResponse> + Send + Sync;

/// Scripted transport. The responder receives each request together with the
/// 1-based count of requests seen so far for that request's path, so a test
/// can answer 401 on the first hit and 200 on the retry.
pub struct FakeTransport {
    responder: Box<Responder>,
    requests: Mutex<Vec<ApiRequest>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
}

impl FakeTransport {
    pub fn new<F>(responder: F) -> Arc<Self>
    where
        F: Fn(&ApiRequest, usize) -> SessionResult<ApiResponse> + Send + Sync + 'static,
    {
        Arc::new(Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
            gates: Mutex::new(HashMap::new()),
        })
    }

    /// Registers a gate on `path`: every request to it is recorded, then
    /// held until the returned handle is notified.
    pub fn gate(&self, path: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(path.to_string(), notify.clone());
        notify
    }

    pub fn requests_to(&self, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| path_of(&r.url) == path)
            .count()
    }

    pub fn recorded(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpTransport for FakeTransport {
    fn execute(
        &self,
        request: ApiRequest,
    ) -> Pin<Box<dyn Future<Output = SessionResult<ApiResponse>> + Send + '_>> {
        Box::pin(async move {
            let path = path_of(&request.url);
            let nth = {
                let mut requests = self.requests.lock().unwrap();
                requests.push(request.clone());
                requests
                    .iter()
                    .filter(|r| path_of(&r.url) == path)
                    .count()
            };
            let gate = self.gates.lock().unwrap().get(&path).cloned();
            if let Some(gate) = gate {
                gate.notified().await;
            }
            (self.responder)(&request, nth)
        })
    }
}

/// Credential store over a plain mutex.
#[derive(Default)]
pub struct FakeStore {
    credential: Mutex<Option<Credential>>,
}

impl FakeStore {
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            credential: Mutex::new(Some(credential)),
        }
    }
}

impl CredentialStore for FakeStore {
    fn get(&self) -> Option<Credential> {
        self.credential.lock().unwrap().clone()
    }

    fn set(&self, credential: &Credential) {
        *self.credential.lock().unwrap() = Some(credential.clone());
    }

    fn clear(&self) {
        *self.credential.lock().unwrap() = None;
    }
}

/// Navigator that records every assignment.
pub struct FakeNavigator {
    current: RwLock<String>,
    history: Mutex<Vec<String>>,
}

impl FakeNavigator {
    pub fn at(path: &str) -> Self {
        Self {
            current: RwLock::new(path.to_string()),
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn assigned(&self) -> Vec<String> {
        self.history.lock().unwrap().clone()
    }

    pub fn reset_history(&self) {
        self.history.lock().unwrap().clear();
    }
}

impl Navigator for FakeNavigator {
    fn assign(&self, target: &str) {
        *self.current.write().unwrap() = target.to_string();
        self.history.lock().unwrap().push(target.to_string());
    }

    fn current_path(&self) -> String {
        self.current.read().unwrap().clone()
    }
}

/// Popup window double: records posted outcomes, flips a closed flag.
pub struct FakeWindow {
    has_opener: bool,
    posted: Mutex<Vec<(String, OAuthOutcome)>>,
    closed: AtomicBool,
}

impl FakeWindow {
    pub fn with_opener() -> Arc<Self> {
        Arc::new(Self {
            has_opener: true,
            posted: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        })
    }

    pub fn detached() -> Arc<Self> {
        Arc::new(Self {
            has_opener: false,
            posted: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        })
    }

    pub fn posted(&self) -> Vec<(String, OAuthOutcome)> {
        self.posted.lock().unwrap().clone()
    }
}

impl PopupWindow for FakeWindow {
    fn post_to_opener(&self, target_origin: &str, outcome: &OAuthOutcome) -> bool {
        if !self.has_opener {
            return false;
        }
        self.posted
            .lock()
            .unwrap()
            .push((target_origin.to_string(), outcome.clone()));
        true
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

impl PopupHandle for FakeWindow {
    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

//! Request-authentication pipeline.
//!
//! Every outbound call passes through here: the attach phase puts the
//! stored access token on ordinary requests (and strips stray credentials
//! from auth requests), the recovery phase classifies failures and drives
//! the refresh-and-retry cycle. Callers only ever see a [`SessionError`];
//! recovery that succeeds is invisible to them.

use std::sync::Arc;

use aegis_domain::{
    is_auth_endpoint, ApiRequest, ApiResponse, SessionConfig, SessionError, SessionResult,
    AUTHORIZATION,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::RefreshCoordinator;
use crate::ports::{CredentialStore, HttpTransport, Navigator};

/// The authenticated request pipeline.
pub struct SessionPipeline {
    transport: Arc<dyn HttpTransport>,
    store: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
    coordinator: Arc<RefreshCoordinator>,
    config: Arc<SessionConfig>,
}

impl SessionPipeline {
    /// Creates a pipeline.
    #[must_use]
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
        coordinator: Arc<RefreshCoordinator>,
        config: Arc<SessionConfig>,
    ) -> Self {
        Self {
            transport,
            store,
            navigator,
            coordinator,
            config,
        }
    }

    /// Sends a request with credential attachment and 401 recovery.
    ///
    /// A request is retried at most once, with the credential produced by
    /// the single-flight refresh. 403 is surfaced as [`SessionError::Forbidden`]
    /// without touching the refresh path: the credential is valid but
    /// insufficient.
    ///
    /// # Errors
    ///
    /// See [`SessionError`] for the full taxonomy.
    pub async fn send(&self, request: ApiRequest) -> SessionResult<ApiResponse> {
        let mut request = request;
        let auth_endpoint = is_auth_endpoint(&request.url);
        if auth_endpoint {
            // Stale access tokens never reach token-issuing endpoints.
            request.remove_header(AUTHORIZATION);
        } else if let Some(access) = self.store.access_token() {
            request.set_header(AUTHORIZATION, format!("Bearer {access}"));
        }

        let mut retried = false;
        loop {
            let response = self.transport.execute(request.clone()).await?;
            if response.is_success() {
                return Ok(response);
            }
            match response.status {
                401 if auth_endpoint => {
                    warn!(url = %request.url, "auth endpoint rejected the call");
                    self.coordinator.teardown();
                    return Err(SessionError::AuthEndpoint { status: 401 });
                }
                401 if retried => {
                    // Retries are bounded to exactly one per original request.
                    self.coordinator.teardown();
                    return Err(SessionError::Unauthorized);
                }
                401 if response.signals_revocation() => {
                    debug!(url = %request.url, "credential revoked, skipping refresh");
                    self.coordinator.teardown();
                    return Err(SessionError::Unauthorized);
                }
                401 if self.on_login_screen() => {
                    // No refresh storms while sitting on the login screen.
                    return Err(SessionError::Unauthorized);
                }
                401 => match self.coordinator.obtain().await {
                    Some(credential) => {
                        retried = true;
                        request.set_header(AUTHORIZATION, credential.authorization_header());
                    }
                    None => return Err(SessionError::Unauthorized),
                },
                403 => return Err(SessionError::Forbidden),
                status => {
                    return Err(SessionError::Status {
                        status,
                        body: response.text(),
                    });
                }
            }
        }
    }

    /// GET a JSON resource through the pipeline.
    ///
    /// # Errors
    ///
    /// See [`Self::send`]; additionally fails on a body that does not decode
    /// as `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> SessionResult<T> {
        self.send(ApiRequest::get(path)).await?.json()
    }

    /// POST a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// See [`Self::send`]; additionally fails on a body that does not decode
    /// as `T`.
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Value,
    ) -> SessionResult<T> {
        self.send(ApiRequest::post(path).with_json_body(body))
            .await?
            .json()
    }

    fn on_login_screen(&self) -> bool {
        self.navigator.current_path() == self.config.login_path
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use aegis_domain::Credential;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::auth::AuthGateway;
    use crate::support::{FakeNavigator, FakeStore, FakeTransport};

    struct Harness {
        pipeline: SessionPipeline,
        transport: Arc<FakeTransport>,
        store: Arc<FakeStore>,
        navigator: Arc<FakeNavigator>,
    }

    fn harness(transport: Arc<FakeTransport>) -> Harness {
        let store = Arc::new(FakeStore::with_credential(Credential::new(
            "T1",
            Some("R1".to_string()),
        )));
        let navigator = Arc::new(FakeNavigator::at("/chat"));
        let config = Arc::new(SessionConfig::new(
            "http://localhost:8080",
            "http://localhost:3000",
        ));
        let coordinator = Arc::new(RefreshCoordinator::new(
            AuthGateway::new(transport.clone()),
            store.clone(),
            navigator.clone(),
            config.clone(),
        ));
        let pipeline = SessionPipeline::new(
            transport.clone(),
            store.clone(),
            navigator.clone(),
            coordinator,
            config,
        );
        Harness {
            pipeline,
            transport,
            store,
            navigator,
        }
    }

    fn ok(body: &str) -> aegis_domain::SessionResult<ApiResponse> {
        Ok(ApiResponse::new(200, Vec::new(), body.as_bytes().to_vec()))
    }

    fn status(code: u16, body: &str) -> aegis_domain::SessionResult<ApiResponse> {
        Ok(ApiResponse::new(code, Vec::new(), body.as_bytes().to_vec()))
    }

    #[tokio::test]
    async fn attaches_bearer_to_ordinary_requests() {
        let h = harness(FakeTransport::new(|_, _| ok("{}")));
        h.pipeline.send(ApiRequest::get("/api/users/me")).await.unwrap();
        assert_eq!(
            h.transport.recorded()[0].header(AUTHORIZATION),
            Some("Bearer T1")
        );
    }

    #[tokio::test]
    async fn strips_stray_bearer_from_auth_requests() {
        let h = harness(FakeTransport::new(|_, _| ok("{}")));
        let request =
            ApiRequest::post("/api/auth/logout").with_header(AUTHORIZATION, "Bearer stale");
        h.pipeline.send(request).await.unwrap();
        assert_eq!(h.transport.recorded()[0].header(AUTHORIZATION), None);
    }

    #[tokio::test]
    async fn retries_once_with_refreshed_credential() {
        let h = harness(FakeTransport::new(|request, nth| {
            match aegis_domain::path_of(&request.url).as_str() {
                "/api/auth/refresh" => ok(r#"{"accessToken":"T2","refreshToken":"R2"}"#),
                _ if nth == 1 => status(401, ""),
                _ => ok(r#"{"data":1}"#),
            }
        }));

        let response = h.pipeline.send(ApiRequest::get("/api/data")).await.unwrap();
        assert!(response.is_success());

        let data_requests: Vec<_> = h
            .transport
            .recorded()
            .into_iter()
            .filter(|r| r.url == "/api/data")
            .collect();
        assert_eq!(data_requests.len(), 2);
        assert_eq!(data_requests[0].header(AUTHORIZATION), Some("Bearer T1"));
        assert_eq!(data_requests[1].header(AUTHORIZATION), Some("Bearer T2"));
    }

    #[tokio::test]
    async fn concurrent_failures_share_one_refresh_and_all_retry() {
        let transport = FakeTransport::new(|request, nth| {
            match aegis_domain::path_of(&request.url).as_str() {
                "/api/auth/refresh" => ok(r#"{"accessToken":"T2"}"#),
                _ if nth == 1 => status(401, ""),
                _ => ok("{}"),
            }
        });
        let gate = transport.gate("/api/auth/refresh");
        let h = harness(transport.clone());

        let (a, b, ()) = tokio::join!(
            h.pipeline.send(ApiRequest::get("/api/a")),
            h.pipeline.send(ApiRequest::get("/api/b")),
            async {
                while transport.requests_to("/api/auth/refresh") < 1 {
                    tokio::task::yield_now().await;
                }
                tokio::task::yield_now().await;
                gate.notify_one();
            }
        );
        assert!(a.is_ok() && b.is_ok());

        assert_eq!(transport.requests_to("/api/auth/refresh"), 1);
        let retried: Vec<_> = h
            .transport
            .recorded()
            .into_iter()
            .filter(|r| r.header(AUTHORIZATION) == Some("Bearer T2"))
            .collect();
        assert_eq!(retried.len(), 2);
    }

    #[tokio::test]
    async fn second_401_after_retry_is_terminal() {
        let h = harness(FakeTransport::new(|request, _| {
            match aegis_domain::path_of(&request.url).as_str() {
                "/api/auth/refresh" => ok(r#"{"accessToken":"T2"}"#),
                _ => status(401, ""),
            }
        }));

        let result = h.pipeline.send(ApiRequest::get("/api/data")).await;
        assert_eq!(result, Err(SessionError::Unauthorized));
        // One original attempt, one retry, no second refresh.
        assert_eq!(h.transport.requests_to("/api/data"), 2);
        assert_eq!(h.transport.requests_to("/api/auth/refresh"), 1);
        assert_eq!(h.store.get(), None);
        assert_eq!(h.navigator.assigned(), vec!["/login".to_string()]);
    }

    #[tokio::test]
    async fn auth_endpoint_401_never_triggers_refresh() {
        let h = harness(FakeTransport::new(|_, _| status(401, "")));

        let result = h.pipeline.send(ApiRequest::post("/api/auth/logout")).await;
        assert_eq!(result, Err(SessionError::AuthEndpoint { status: 401 }));
        assert_eq!(h.transport.requests_to("/api/auth/refresh"), 0);
        assert_eq!(h.store.get(), None);
    }

    #[tokio::test]
    async fn revocation_signal_skips_refresh() {
        let h = harness(FakeTransport::new(|_, _| {
            status(401, r#"{"error":"UNAUTHORIZED","message":"refresh reuse detected"}"#)
        }));

        let result = h.pipeline.send(ApiRequest::get("/api/data")).await;
        assert_eq!(result, Err(SessionError::Unauthorized));
        assert_eq!(h.transport.requests_to("/api/auth/refresh"), 0);
        assert_eq!(h.navigator.assigned(), vec!["/login".to_string()]);
    }

    #[tokio::test]
    async fn no_refresh_while_on_login_screen() {
        let h = harness(FakeTransport::new(|_, _| status(401, "")));
        h.navigator.assign("/login");
        h.navigator.reset_history();

        let result = h.pipeline.send(ApiRequest::get("/api/data")).await;
        assert_eq!(result, Err(SessionError::Unauthorized));
        assert_eq!(h.transport.requests_to("/api/auth/refresh"), 0);
        assert_eq!(h.navigator.assigned().len(), 0);
    }

    #[tokio::test]
    async fn forbidden_is_distinct_and_never_refreshed() {
        let h = harness(FakeTransport::new(|_, _| status(403, "")));

        let result = h.pipeline.send(ApiRequest::get("/api/admin")).await;
        assert_eq!(result, Err(SessionError::Forbidden));
        assert_eq!(h.transport.requests_to("/api/auth/refresh"), 0);
    }

    #[tokio::test]
    async fn other_statuses_are_normalized() {
        let h = harness(FakeTransport::new(|_, _| status(500, "boom")));

        let result = h.pipeline.send(ApiRequest::get("/api/data")).await;
        assert_eq!(
            result,
            Err(SessionError::Status {
                status: 500,
                body: "boom".to_string()
            })
        );
    }

    #[tokio::test]
    async fn requests_without_stored_credential_go_out_bare() {
        let h = harness(FakeTransport::new(|_, _| ok("{}")));
        h.store.clear();

        h.pipeline.send(ApiRequest::get("/api/public")).await.unwrap();
        assert_eq!(h.transport.recorded()[0].header(AUTHORIZATION), None);
    }
}

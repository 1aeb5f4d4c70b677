//! Raw client for the token-issuing endpoints.
//!
//! Calls here go straight to the transport, never through the pipeline:
//! auth endpoints are exempt from credential attachment and from refresh
//! recovery, which is what prevents infinite refresh recursion.

use std::sync::Arc;

use aegis_domain::{ApiRequest, SessionError, SessionResult, TokenPair, AUTHORIZATION};
use url::form_urlencoded;

use crate::ports::HttpTransport;

/// Client for the backend's exchange, refresh and logout endpoints.
#[derive(Clone)]
pub struct AuthGateway {
    transport: Arc<dyn HttpTransport>,
}

impl AuthGateway {
    /// Creates a gateway over the given transport.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// `POST /api/auth/refresh`.
    ///
    /// In client-stored mode the refresh token travels as an explicit bearer
    /// header; in cookie mode no header is sent and the browser-managed
    /// cookie authenticates the call. The access token is never sent here.
    ///
    /// # Errors
    ///
    /// [`SessionError::AuthEndpoint`] on any non-success status,
    /// [`SessionError::Transport`] on network or decode failure.
    pub async fn refresh(&self, refresh_token: Option<&str>) -> SessionResult<TokenPair> {
        let mut request = ApiRequest::post("/api/auth/refresh");
        if let Some(token) = refresh_token {
            request.set_header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let response = self.transport.execute(request).await?;
        if response.is_success() {
            return response.json();
        }
        Err(SessionError::AuthEndpoint {
            status: response.status,
        })
    }

    /// `GET /api/auth/exchange?code=..`: converts a one-time authorization
    /// code into a token pair. Sent without credentials.
    ///
    /// # Errors
    ///
    /// [`SessionError::Exchange`] on any failure, including a response body
    /// that lacks an access token.
    pub async fn exchange(&self, code: &str) -> SessionResult<TokenPair> {
        let encoded: String = form_urlencoded::byte_serialize(code.as_bytes()).collect();
        let request = ApiRequest::get(format!("/api/auth/exchange?code={encoded}"))
            .with_header("Accept", "application/json");
        let response = self
            .transport
            .execute(request)
            .await
            .map_err(|e| SessionError::Exchange(e.to_string()))?;
        if !response.is_success() {
            return Err(SessionError::Exchange(format!(
                "exchange {}",
                response.status
            )));
        }
        let pair: TokenPair = response
            .json()
            .map_err(|_| SessionError::Exchange("invalid exchange response".to_string()))?;
        if pair.access_token.is_empty() {
            return Err(SessionError::Exchange(
                "invalid exchange response".to_string(),
            ));
        }
        Ok(pair)
    }

    /// `POST /api/auth/logout[?all=true]`: best-effort invalidation.
    /// Callers swallow the error; it is returned so they can log it.
    ///
    /// # Errors
    ///
    /// [`SessionError::AuthEndpoint`] on any non-success status,
    /// [`SessionError::Transport`] on network failure.
    pub async fn logout(&self, access_token: Option<&str>, all: bool) -> SessionResult<()> {
        let url = if all {
            "/api/auth/logout?all=true"
        } else {
            "/api/auth/logout"
        };
        let mut request = ApiRequest::post(url);
        if let Some(token) = access_token {
            request.set_header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let response = self.transport.execute(request).await?;
        if response.is_success() {
            Ok(())
        } else {
            Err(SessionError::AuthEndpoint {
                status: response.status,
            })
        }
    }
}

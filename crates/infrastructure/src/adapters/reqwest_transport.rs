//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `HttpTransport` port. It resolves relative
//! request targets against the configured API base and performs the raw
//! call; it never interprets authentication failures.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use aegis_application::ports::HttpTransport;
use aegis_domain::{ApiRequest, ApiResponse, Header, HttpMethod, SessionError, SessionResult};
use reqwest::{Client, Method, Url};
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP transport backed by `reqwest::Client`.
pub struct ReqwestTransport {
    client: Client,
    base: Url,
}

impl ReqwestTransport {
    /// Creates a transport resolving relative targets against `api_base`.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidUrl`] when the base does not parse,
    /// [`SessionError::Transport`] when the client cannot be built.
    pub fn new(api_base: &str) -> SessionResult<Self> {
        let base = Url::parse(api_base)
            .map_err(|e| SessionError::InvalidUrl(format!("{e}: {api_base}")))?;
        let client = Client::builder()
            .user_agent(concat!("Aegis/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| SessionError::Transport(e.to_string()))?;
        Ok(Self { client, base })
    }

    /// Creates a transport with a preconfigured reqwest client.
    #[must_use]
    pub const fn with_client(client: Client, base: Url) -> Self {
        Self { client, base }
    }

    fn resolve(&self, target: &str) -> SessionResult<Url> {
        if target.starts_with("http://") || target.starts_with("https://") {
            return Url::parse(target)
                .map_err(|e| SessionError::InvalidUrl(format!("{e}: {target}")));
        }
        self.base
            .join(target)
            .map_err(|e| SessionError::InvalidUrl(format!("{e}: {target}")))
    }

    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    fn map_error(error: &reqwest::Error) -> SessionError {
        if error.is_timeout() {
            return SessionError::Transport(format!(
                "request timed out after {}ms",
                REQUEST_TIMEOUT.as_millis()
            ));
        }
        SessionError::Transport(error.to_string())
    }
}

impl HttpTransport for ReqwestTransport {
    fn execute(
        &self,
        request: ApiRequest,
    ) -> Pin<Box<dyn Future<Output = SessionResult<ApiResponse>> + Send + '_>> {
        Box::pin(async move {
            let url = self.resolve(&request.url)?;
            debug!(method = ?request.method, %url, "executing request");

            let mut builder = self
                .client
                .request(Self::to_reqwest_method(request.method), url)
                .timeout(REQUEST_TIMEOUT);
            for header in &request.headers {
                builder = builder.header(&header.name, &header.value);
            }
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }

            let response = builder.send().await.map_err(|e| Self::map_error(&e))?;

            let status = response.status().as_u16();
            let headers: Vec<Header> = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value.to_str().ok().map(|value| Header {
                        name: name.to_string(),
                        value: value.to_string(),
                    })
                })
                .collect();
            let body = response
                .bytes()
                .await
                .map_err(|e| SessionError::Transport(format!("failed to read body: {e}")))?
                .to_vec();

            Ok(ApiResponse::new(status, headers, body))
        })
    }
}

//! HTTP transport port.

use std::future::Future;
use std::pin::Pin;

use aegis_domain::{ApiRequest, ApiResponse, SessionResult};

/// Port for executing HTTP requests.
///
/// The transport performs the raw call and returns whatever status the
/// backend answered with; it never interprets authentication failures.
/// Network-level problems surface as [`aegis_domain::SessionError::Transport`].
pub trait HttpTransport: Send + Sync {
    /// Executes a request and returns the response.
    fn execute(
        &self,
        request: ApiRequest,
    ) -> Pin<Box<dyn Future<Output = SessionResult<ApiResponse>> + Send + '_>>;
}

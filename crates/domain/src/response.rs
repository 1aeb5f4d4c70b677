//! Transport-level response shape.

use serde::de::DeserializeOwned;

use crate::error::{ErrorBody, SessionError, SessionResult};
use crate::request::Header;

/// An inbound API response as seen by the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: Vec<Header>,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Creates a response.
    #[must_use]
    pub const fn new(status: u16, headers: Vec<Header>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Body decoded as UTF-8 text, lossily.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserializes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Transport`] when the body is not valid JSON
    /// for the expected type.
    pub fn json<T: DeserializeOwned>(&self) -> SessionResult<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| SessionError::Transport(format!("invalid response body: {e}")))
    }

    /// Returns true if a 401 body carries an explicit revocation signal.
    #[must_use]
    pub fn signals_revocation(&self) -> bool {
        ErrorBody::from_bytes(&self.body).signals_revocation()
    }
}

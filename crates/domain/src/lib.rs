//! Aegis Domain - Core session types
//!
//! This crate defines the domain model for the Aegis session client.
//! All types here are pure Rust with no I/O dependencies.

pub mod config;
pub mod credential;
pub mod endpoint;
pub mod error;
pub mod identity;
pub mod outcome;
pub mod request;
pub mod response;

pub use config::{RefreshMode, SessionConfig};
pub use credential::{Credential, TokenPair, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
pub use endpoint::{is_auth_endpoint, path_of, AUTH_PATH_PREFIXES};
pub use error::{ErrorBody, SessionError, SessionResult};
pub use identity::Identity;
pub use outcome::{OAuthOutcome, OutcomeEnvelope};
pub use request::{ApiRequest, Header, HttpMethod, AUTHORIZATION};
pub use response::ApiResponse;

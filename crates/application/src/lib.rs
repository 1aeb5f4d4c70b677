//! Aegis Application - Session coordination core
//!
//! This crate owns the concurrency-sensitive heart of the session client:
//! the single-flight refresh coordinator, the request-authentication
//! pipeline built on it, the application-facing session context, and the
//! popup OAuth exchange with its cross-window listener. External effects
//! (HTTP, storage, navigation, windowing) are reached through ports
//! implemented by the infrastructure layer.

pub mod auth;
pub mod oauth;
pub mod ports;

#[cfg(test)]
pub(crate) mod support;

pub use auth::{AuthGateway, RefreshCoordinator, SessionContext, SessionPipeline};
pub use oauth::{watch_popup, ListenerEvent, OutcomeListener, PopupExchange, PopupResult};

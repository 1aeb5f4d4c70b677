//! Session authority core.
//!
//! This module provides:
//! - A raw gateway for the token-issuing endpoints
//! - The single-flight refresh coordinator
//! - The request-authentication pipeline built on both
//! - The application-facing session context

mod gateway;
mod pipeline;
mod refresh;
mod session;

pub use gateway::AuthGateway;
pub use pipeline::SessionPipeline;
pub use refresh::RefreshCoordinator;
pub use session::SessionContext;

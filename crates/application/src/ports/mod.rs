//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the session core and its host
//! environment. Each port is a trait implemented by an adapter in the
//! infrastructure layer (or by a test double).

mod navigator;
mod store;
mod transport;
mod window;

pub use navigator::Navigator;
pub use store::CredentialStore;
pub use transport::HttpTransport;
pub use window::{PopupHandle, PopupWindow};

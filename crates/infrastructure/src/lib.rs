//! Aegis Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer.

pub mod adapters;
pub mod navigation;
pub mod persistence;
pub mod windowing;

pub use adapters::ReqwestTransport;
pub use navigation::MemoryNavigator;
pub use persistence::MemoryCredentialStore;
pub use windowing::{ChannelPopupHandle, ChannelPopupWindow};

//! Popup OAuth exchange and the opener-side outcome listener.

mod listener;
mod popup;

pub use listener::{watch_popup, ListenerEvent, OutcomeListener};
pub use popup::{PopupExchange, PopupResult};

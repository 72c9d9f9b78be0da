//! Domain models for the web layer.

pub mod session;

pub use session::{CurrentUser, Flash, FlashKind, session_keys};

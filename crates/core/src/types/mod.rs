//! Core types for Adlist.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod notification;
pub mod role;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use notification::NotificationKind;
pub use role::{Role, RoleParseError};
pub use status::SubscriptionStatus;

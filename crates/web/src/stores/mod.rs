//! In-memory stores layered over the backend API.

pub mod notifications;

pub use notifications::{NotificationState, NotificationStore, NotificationsApi};

//! Admin area route handlers (require the admin role).
//!
//! Every handler extracts [`crate::middleware::auth::RequireAdmin`]; the
//! backend additionally authorizes each call with the admin's token.

pub mod categories;
pub mod coupons;
pub mod dashboard;
pub mod users;

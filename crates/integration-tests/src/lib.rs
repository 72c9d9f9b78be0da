//! Integration tests for Adlist.
//!
//! # Running Tests
//!
//! The tests drive a live instance and are `#[ignore]`d by default:
//!
//! ```bash
//! # Start the web app (and a backend it can reach)
//! cargo run -p adlist-web
//!
//! # Run the integration tests against it
//! WEB_BASE_URL=http://localhost:3000 cargo test -p adlist-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `public_pages` - Marketing pages render without a session
//! - `auth_guards` - Guarded routes redirect or reject without a session

/// Base URL for the web instance (configurable via environment).
#[must_use]
pub fn web_base_url() -> String {
    std::env::var("WEB_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Create an HTTP client with a cookie store and no redirect following,
/// so guard redirects stay observable.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

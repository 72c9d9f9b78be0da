//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home page
//! GET  /health                  - Health check
//!
//! # Browsing
//! GET  /categories              - Category listing
//! GET  /categories/{id}         - Companies in a category
//! GET  /companies/{id}          - Company profile + active coupons
//! GET  /plans                   - Subscription plans
//!
//! # Auth
//! GET  /auth/login              - Login page (redirects home when signed in)
//! GET  /auth/signup             - Signup page (redirects home when signed in)
//! GET  /auth/forgot-password    - Forgot-password page (redirects home when signed in)
//! GET  /auth/callback           - External-token login handoff (?token= / ?error=)
//! POST /auth/federated          - Federated ID-token validation + backend exchange
//! POST /auth/logout             - Sign out
//! GET  /dashboard               - Role landing (admin -> /admin, else /account)
//!
//! # Account (requires auth)
//! GET  /account                 - Profile + subscription overview
//! POST /account/profile         - Update profile
//! POST /account/company         - Update the advertiser's company listing
//! POST /account/subscribe       - Start a plan subscription
//! POST /account/cancel          - Cancel the subscription
//!
//! # Notifications (requires auth)
//! GET  /notifications           - Notification list
//! POST /notifications/{id}/read - Mark one read
//! POST /notifications/read-all  - Mark all read
//! POST /notifications/{id}/delete - Delete one
//!
//! # Admin (requires admin)
//! GET  /admin                   - Analytics dashboard
//! GET  /admin/users             - User management
//! POST /admin/users/{id}/role   - Change a user's role
//! POST /admin/users/{id}/delete - Delete a user
//! GET  /admin/categories        - Category management
//! POST /admin/categories        - Create category
//! POST /admin/categories/{id}   - Update category
//! POST /admin/categories/{id}/delete - Delete category
//! GET  /admin/coupons           - Coupon management
//! POST /admin/coupons           - Create coupon
//! POST /admin/coupons/{id}/delete - Delete coupon
//!
//! # Preferences
//! POST /preferences             - Persist locale/theme cookies
//! ```

pub mod account;
pub mod admin;
pub mod auth;
pub mod categories;
pub mod companies;
pub mod home;
pub mod notifications;
pub mod plans;
pub mod prefs;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::i18n::{Lang, t};
use crate::middleware::auth::redirect_authenticated;
use crate::middleware::prefs::Prefs;
use crate::models::{CurrentUser, Flash};
use crate::state::AppState;

/// Shared context rendered by the base template: language, theme, the
/// signed-in user's chrome, and the pending flash message.
pub struct PageChrome {
    pub lang: &'static str,
    pub dir: &'static str,
    pub theme: &'static str,
    pub signed_in: bool,
    pub is_admin: bool,
    pub user_name: Option<String>,
    pub flash: Option<Flash>,
    pub nav_categories: &'static str,
    pub nav_plans: &'static str,
    pub nav_account: &'static str,
    pub nav_admin: &'static str,
    pub nav_sign_in: &'static str,
    pub nav_sign_out: &'static str,
    pub nav_notifications: &'static str,
}

impl PageChrome {
    /// Build the chrome for a request.
    #[must_use]
    pub fn new(prefs: Prefs, user: Option<&CurrentUser>, flash: Option<Flash>) -> Self {
        let lang: Lang = prefs.lang;
        Self {
            lang: lang.code(),
            dir: lang.dir(),
            theme: prefs.theme.code(),
            signed_in: user.is_some(),
            is_admin: user.is_some_and(|u| u.role.is_admin()),
            user_name: user.map(|u| u.name.clone()),
            flash,
            nav_categories: t(lang, "nav_categories"),
            nav_plans: t(lang, "nav_plans"),
            nav_account: t(lang, "nav_account"),
            nav_admin: t(lang, "nav_admin"),
            nav_sign_in: t(lang, "nav_sign_in"),
            nav_sign_out: t(lang, "nav_sign_out"),
            nav_notifications: t(lang, "notifications"),
        }
    }
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    // The form pages are auth-only surfaces: a signed-in user is sent home
    let pages = Router::new()
        .route("/login", get(auth::login_page))
        .route("/signup", get(auth::signup_page))
        .route("/forgot-password", get(auth::forgot_password_page))
        .route_layer(axum_middleware::from_fn(redirect_authenticated));

    Router::new()
        .merge(pages)
        .route("/callback", get(auth::callback))
        .route("/federated", post(auth::federated))
        .route("/logout", post(auth::logout))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::index))
        .route("/profile", post(account::update_profile))
        .route("/company", post(account::update_company))
        .route("/subscribe", post(account::subscribe))
        .route("/cancel", post(account::cancel_subscription))
}

/// Create the notification routes router.
pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(notifications::index))
        .route("/{id}/read", post(notifications::mark_read))
        .route("/read-all", post(notifications::mark_all_read))
        .route("/{id}/delete", post(notifications::remove))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::dashboard::index))
        .route("/users", get(admin::users::index))
        .route("/users/{id}/role", post(admin::users::update_role))
        .route("/users/{id}/delete", post(admin::users::remove))
        .route(
            "/categories",
            get(admin::categories::index).post(admin::categories::create),
        )
        .route("/categories/{id}", post(admin::categories::update))
        .route("/categories/{id}/delete", post(admin::categories::remove))
        .route(
            "/coupons",
            get(admin::coupons::index).post(admin::coupons::create),
        )
        .route("/coupons/{id}/delete", post(admin::coupons::remove))
}

/// Create all routes for the application.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Browsing
        .route("/categories", get(categories::index))
        .route("/categories/{id}", get(categories::show))
        .route("/companies/{id}", get(companies::show))
        .route("/plans", get(plans::index))
        // Role landing after login
        .route("/dashboard", get(auth::dashboard))
        // Auth flows
        .nest("/auth", auth_routes())
        // Account area
        .nest("/account", account_routes())
        // Notifications
        .nest("/notifications", notification_routes())
        // Admin area
        .nest("/admin", admin_routes())
        // UI preferences
        .route("/preferences", post(prefs::save))
}

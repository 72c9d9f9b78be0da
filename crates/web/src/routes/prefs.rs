//! UI preference persistence.
//!
//! Locale and theme are written back as long-lived cookies under fixed
//! keys, independent of the session.

use axum::{
    Form,
    http::header::{REFERER, SET_COOKIE},
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::i18n::Lang;
use crate::middleware::prefs::{LOCALE_COOKIE, THEME_COOKIE, Theme};

/// One year, the lifetime of a preference cookie.
const PREFS_MAX_AGE_SECS: u32 = 365 * 24 * 60 * 60;

/// Preference form.
#[derive(Debug, Deserialize)]
pub struct PrefsForm {
    pub locale: Option<String>,
    pub theme: Option<String>,
}

/// Persist locale/theme preferences and return to the referring page.
///
/// # Route
///
/// `POST /preferences`
pub async fn save(headers: HeaderMap, Form(form): Form<PrefsForm>) -> Response {
    let mut response_headers = HeaderMap::new();

    if let Some(locale) = form.locale {
        let lang = Lang::from_cookie(&locale);
        append_cookie(&mut response_headers, LOCALE_COOKIE, lang.code());
    }
    if let Some(theme) = form.theme {
        let theme = Theme::from_cookie(&theme);
        append_cookie(&mut response_headers, THEME_COOKIE, theme.code());
    }

    // Send the user back where they came from
    let target = headers
        .get(REFERER)
        .and_then(|value| value.to_str().ok())
        .filter(|referer| referer.starts_with('/') || referer.contains("://"))
        .unwrap_or("/")
        .to_string();

    (response_headers, Redirect::to(&target)).into_response()
}

fn append_cookie(headers: &mut HeaderMap, name: &str, value: &str) {
    let cookie = format!("{name}={value}; Path=/; Max-Age={PREFS_MAX_AGE_SECS}; SameSite=Lax");
    if let Ok(header_value) = HeaderValue::from_str(&cookie) {
        headers.append(SET_COOKIE, header_value);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_sets_both_cookies() {
        let response = save(
            HeaderMap::new(),
            Form(PrefsForm {
                locale: Some("ar".to_string()),
                theme: Some("dark".to_string()),
            }),
        )
        .await;

        let cookies: Vec<_> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();

        assert!(cookies.iter().any(|c| c.starts_with("adlist_locale=ar")));
        assert!(cookies.iter().any(|c| c.starts_with("adlist_theme=dark")));
    }

    #[tokio::test]
    async fn test_save_unknown_values_fall_back() {
        let response = save(
            HeaderMap::new(),
            Form(PrefsForm {
                locale: Some("fr".to_string()),
                theme: Some("neon".to_string()),
            }),
        )
        .await;

        let cookies: Vec<_> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();

        assert!(cookies.iter().any(|c| c.starts_with("adlist_locale=en")));
        assert!(cookies.iter().any(|c| c.starts_with("adlist_theme=light")));
    }

    #[tokio::test]
    async fn test_save_redirects_to_referer() {
        let mut headers = HeaderMap::new();
        headers.insert(REFERER, HeaderValue::from_static("/plans"));

        let response = save(
            headers,
            Form(PrefsForm {
                locale: None,
                theme: None,
            }),
        )
        .await;

        let location = response
            .headers()
            .get(axum::http::header::LOCATION)
            .unwrap();
        assert_eq!(location, "/plans");
    }
}

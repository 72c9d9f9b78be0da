//! Locale and theme preferences.
//!
//! Both are persisted client-side under fixed cookie keys, independent of
//! the session: a visitor who never signs in still keeps their language.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use serde::{Deserialize, Serialize};

use crate::i18n::Lang;

/// Cookie holding the UI language.
pub const LOCALE_COOKIE: &str = "adlist_locale";

/// Cookie holding the UI theme.
pub const THEME_COOKIE: &str = "adlist_theme";

/// UI color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Parse the cookie value, falling back to light.
    #[must_use]
    pub fn from_cookie(value: &str) -> Self {
        match value {
            "dark" => Self::Dark,
            _ => Self::Light,
        }
    }

    /// Cookie / css-class value.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// Per-request UI preferences, read from cookies with defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct Prefs {
    pub lang: Lang,
    pub theme: Theme,
}

impl<S> FromRequestParts<S> for Prefs
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let cookies = parts
            .headers
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        let lang = cookie_value(cookies, LOCALE_COOKIE).map_or_else(Lang::default, Lang::from_cookie);
        let theme =
            cookie_value(cookies, THEME_COOKIE).map_or_else(Theme::default, Theme::from_cookie);

        Ok(Self { lang, theme })
    }
}

/// Pull one value out of a `Cookie` header.
fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Request;

    use super::*;

    async fn prefs_for(cookie_header: Option<&str>) -> Prefs {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = cookie_header {
            builder = builder.header(header::COOKIE, value);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        Prefs::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_defaults_without_cookies() {
        let prefs = prefs_for(None).await;
        assert_eq!(prefs.lang, Lang::En);
        assert_eq!(prefs.theme, Theme::Light);
    }

    #[tokio::test]
    async fn test_reads_both_cookies() {
        let prefs = prefs_for(Some("adlist_locale=ar; adlist_theme=dark")).await;
        assert_eq!(prefs.lang, Lang::Ar);
        assert_eq!(prefs.theme, Theme::Dark);
    }

    #[tokio::test]
    async fn test_ignores_unrelated_cookies() {
        let prefs = prefs_for(Some("adlist_session=abc; adlist_theme=dark")).await;
        assert_eq!(prefs.lang, Lang::En);
        assert_eq!(prefs.theme, Theme::Dark);
    }

    #[test]
    fn test_cookie_value_parsing() {
        assert_eq!(cookie_value("a=1; b=2", "b"), Some("2"));
        assert_eq!(cookie_value("a=1; b=2", "c"), None);
        assert_eq!(cookie_value("", "a"), None);
    }
}

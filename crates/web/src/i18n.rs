//! UI language support.
//!
//! Two locales are served: English (LTR) and Arabic (RTL). The dictionary
//! covers flash messages and page chrome; listing content comes from the
//! backend already localized.

use serde::{Deserialize, Serialize};

/// Supported UI languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Ar,
}

impl Lang {
    /// Parse the cookie value, falling back to English.
    #[must_use]
    pub fn from_cookie(value: &str) -> Self {
        match value {
            "ar" => Self::Ar,
            _ => Self::En,
        }
    }

    /// Cookie / html-lang value.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }

    /// Text direction for the `dir` attribute.
    #[must_use]
    pub const fn dir(self) -> &'static str {
        match self {
            Self::En => "ltr",
            Self::Ar => "rtl",
        }
    }
}

/// Look up a UI string.
///
/// Unknown keys fall back to the key itself so a missing entry is visible
/// in the page rather than a panic.
#[must_use]
pub fn t(lang: Lang, key: &str) -> &'static str {
    match lang {
        Lang::En => translate_en(key),
        Lang::Ar => translate_ar(key),
    }
}

fn translate_en(key: &str) -> &'static str {
    match key {
        "login_success" => "Signed in successfully",
        "login_failed" => "Sign-in failed, please try again",
        "login_no_token" => "No sign-in token found",
        "signed_out" => "Signed out",
        "profile_updated" => "Profile updated",
        "subscription_started" => "Subscription started",
        "subscription_canceled" => "Subscription canceled",
        "saved" => "Saved",
        "deleted" => "Deleted",
        "action_failed" => "Something went wrong, please try again",
        "nav_categories" => "Categories",
        "nav_companies" => "Companies",
        "nav_plans" => "Plans",
        "nav_account" => "My account",
        "nav_admin" => "Admin",
        "nav_sign_in" => "Sign in",
        "nav_sign_out" => "Sign out",
        "notifications" => "Notifications",
        _ => missing(key),
    }
}

fn translate_ar(key: &str) -> &'static str {
    match key {
        "login_success" => "تم تسجيل الدخول بنجاح",
        "login_failed" => "فشل تسجيل الدخول، حاول مرة أخرى",
        "login_no_token" => "لم يتم العثور على رمز الدخول",
        "signed_out" => "تم تسجيل الخروج",
        "profile_updated" => "تم تحديث الملف الشخصي",
        "subscription_started" => "تم بدء الاشتراك",
        "subscription_canceled" => "تم إلغاء الاشتراك",
        "saved" => "تم الحفظ",
        "deleted" => "تم الحذف",
        "action_failed" => "حدث خطأ ما، حاول مرة أخرى",
        "nav_categories" => "الفئات",
        "nav_companies" => "الشركات",
        "nav_plans" => "الباقات",
        "nav_account" => "حسابي",
        "nav_admin" => "الإدارة",
        "nav_sign_in" => "تسجيل الدخول",
        "nav_sign_out" => "تسجيل الخروج",
        "notifications" => "الإشعارات",
        _ => missing(key),
    }
}

/// Placeholder for a key missing from the dictionary.
const fn missing(_key: &str) -> &'static str {
    "…"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_from_cookie() {
        assert_eq!(Lang::from_cookie("ar"), Lang::Ar);
        assert_eq!(Lang::from_cookie("en"), Lang::En);
        assert_eq!(Lang::from_cookie("fr"), Lang::En);
    }

    #[test]
    fn test_dir() {
        assert_eq!(Lang::En.dir(), "ltr");
        assert_eq!(Lang::Ar.dir(), "rtl");
    }

    #[test]
    fn test_translations_present_in_both_languages() {
        for key in ["login_success", "login_failed", "login_no_token", "nav_account"] {
            assert_ne!(t(Lang::En, key), "…", "missing en: {key}");
            assert_ne!(t(Lang::Ar, key), "…", "missing ar: {key}");
        }
    }

    #[test]
    fn test_unknown_key_falls_back() {
        assert_eq!(t(Lang::En, "definitely_not_a_key"), "…");
    }
}

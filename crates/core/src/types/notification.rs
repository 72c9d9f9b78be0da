//! Notification severity kinds.

use serde::{Deserialize, Serialize};

/// Kind of an in-app notification, used for styling and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl NotificationKind {
    /// CSS class suffix used by the templates.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_form() {
        let kind: NotificationKind = serde_json::from_str("\"warning\"").unwrap();
        assert_eq!(kind, NotificationKind::Warning);
        assert_eq!(
            serde_json::to_string(&NotificationKind::Success).unwrap(),
            "\"success\""
        );
    }
}

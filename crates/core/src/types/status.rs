//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Subscription state of an advertiser account.
///
/// Maps to the backend's subscription status values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    /// No subscription was ever started.
    #[default]
    None,
    /// Inside the trial window of a plan.
    Trialing,
    /// Paid and current.
    Active,
    /// Ran past its end date without renewal.
    Expired,
    /// Canceled by the advertiser or an admin.
    Canceled,
}

impl SubscriptionStatus {
    /// Whether the subscription currently grants advertiser features.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Trialing | Self::Active)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_is_active() {
        assert!(SubscriptionStatus::Active.is_active());
        assert!(SubscriptionStatus::Trialing.is_active());
        assert!(!SubscriptionStatus::Expired.is_active());
        assert!(!SubscriptionStatus::Canceled.is_active());
        assert!(!SubscriptionStatus::None.is_active());
    }

    #[test]
    fn test_wire_form() {
        let status: SubscriptionStatus = serde_json::from_str("\"ACTIVE\"").unwrap();
        assert_eq!(status, SubscriptionStatus::Active);
        assert_eq!(
            serde_json::to_string(&SubscriptionStatus::Trialing).unwrap(),
            "\"TRIALING\""
        );
    }
}

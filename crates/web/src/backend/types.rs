//! Wire types for the backend API.
//!
//! These mirror the JSON shapes the backend serves. Conversions into view
//! structs live next to the templates that render them.

use adlist_core::{
    CategoryId, CompanyId, CouponId, Email, NotificationId, NotificationKind, PlanId, Role,
    SubscriptionStatus, UserId,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A page of results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl<T> Paginated<T> {
    /// Whether a page follows this one.
    #[must_use]
    pub fn has_next(&self) -> bool {
        u64::from(self.page) * u64::from(self.per_page) < self.total
    }
}

/// An advertising category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    /// Number of companies listed under this category.
    #[serde(default)]
    pub company_count: u64,
    pub created_at: DateTime<Utc>,
}

/// A company listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub category_id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    /// Featured listings are pinned on the home page.
    #[serde(default)]
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

/// A discount coupon attached to a company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    pub id: CouponId,
    pub company_id: CompanyId,
    pub code: String,
    pub description: Option<String>,
    pub discount_percent: Option<u8>,
    pub expires_at: Option<DateTime<Utc>>,
    pub active: bool,
}

/// A subscription plan offered to advertisers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub currency: String,
    pub duration_days: u32,
    #[serde(default)]
    pub features: Vec<String>,
}

/// A platform user as served by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendUser {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
    #[serde(default)]
    pub subscription: SubscriptionStatus,
    /// The company listing this advertiser manages, when they have one.
    #[serde(default)]
    pub company_id: Option<CompanyId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An in-app notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Aggregate counters for the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub total_users: u64,
    pub total_companies: u64,
    pub total_coupons: u64,
    pub active_subscriptions: u64,
    /// Sign-ups per day over the trailing month, oldest first.
    #[serde(default)]
    pub signups: Vec<DailyCount>,
}

/// A dated counter in an analytics series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: chrono::NaiveDate,
    pub count: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_paginated_has_next() {
        let page = Paginated::<Category> {
            items: vec![],
            page: 1,
            per_page: 20,
            total: 45,
        };
        assert!(page.has_next());

        let last = Paginated::<Category> {
            items: vec![],
            page: 3,
            per_page: 20,
            total: 45,
        };
        assert!(!last.has_next());
    }

    #[test]
    fn test_notification_kind_field_named_type() {
        let json = r#"{
            "id": 4,
            "message": "Your subscription is about to expire",
            "type": "warning",
            "read": false,
            "created_at": "2026-07-01T10:00:00Z"
        }"#;
        let notification: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(notification.kind, NotificationKind::Warning);
        assert!(!notification.read);
    }

    #[test]
    fn test_plan_price_decimal_string() {
        let json = r#"{
            "id": 1,
            "name": "Gold",
            "description": null,
            "price": "49.99",
            "currency": "USD",
            "duration_days": 30,
            "features": ["Featured listing"]
        }"#;
        let plan: Plan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.price.to_string(), "49.99");
    }
}

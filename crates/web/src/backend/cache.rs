//! Tag-aware cache for backend read responses.
//!
//! Every cached read registers itself under one or more [`CacheTag`]s.
//! Mutations declare the tags they dirty; invalidating a tag drops every
//! key registered under it, so the next render of a dependent page
//! refetches. That is the whole consistency contract - an in-flight read
//! racing a mutation may still observe the pre-mutation value.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use adlist_core::{CategoryId, CompanyId, CouponId};
use moka::future::Cache;

use super::types::{AnalyticsSummary, BackendUser, Category, Company, Coupon, Paginated, Plan};

/// Cache key, one variant per cached query.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Categories,
    Category(CategoryId),
    Companies {
        category: Option<CategoryId>,
        page: u32,
    },
    Company(CompanyId),
    Coupons {
        page: u32,
    },
    Plans,
    Users {
        page: u32,
    },
    AnalyticsSummary,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Categories(Vec<Category>),
    Category(Box<Category>),
    Companies(Paginated<Company>),
    Company(Box<Company>),
    Coupons(Paginated<Coupon>),
    Plans(Vec<Plan>),
    Users(Paginated<BackendUser>),
    Analytics(Box<AnalyticsSummary>),
}

/// Invalidation tag attached to cached reads and declared by mutations.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheTag {
    Categories,
    Category(CategoryId),
    Companies,
    Company(CompanyId),
    Coupons,
    Coupon(CouponId),
    Plans,
    Users,
    Profile,
    Analytics,
}

/// Cache capacity (entries).
const CACHE_CAPACITY: u64 = 1000;

/// Time-to-live for cached reads.
const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// Tag-aware response cache.
///
/// `moka` handles capacity and TTL; the tag registry maps each tag to the
/// keys currently registered under it.
pub struct ResponseCache {
    cache: Cache<CacheKey, CacheValue>,
    tags: Mutex<HashMap<CacheTag, HashSet<CacheKey>>>,
}

impl ResponseCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(CACHE_TTL)
                .build(),
            tags: Mutex::new(HashMap::new()),
        }
    }

    /// Look up a cached read.
    pub async fn get(&self, key: &CacheKey) -> Option<CacheValue> {
        self.cache.get(key).await
    }

    /// Cache a read result, registering it under every given tag.
    pub async fn insert(&self, key: CacheKey, tags: &[CacheTag], value: CacheValue) {
        if let Ok(mut registry) = self.tags.lock() {
            for tag in tags {
                registry.entry(*tag).or_default().insert(key.clone());
            }
        }
        self.cache.insert(key, value).await;
    }

    /// Drop every cached read registered under any of the given tags.
    pub async fn invalidate(&self, tags: &[CacheTag]) {
        let keys: Vec<CacheKey> = {
            let Ok(mut registry) = self.tags.lock() else {
                return;
            };
            tags.iter()
                .filter_map(|tag| registry.remove(tag))
                .flatten()
                .collect()
        };

        for key in keys {
            self.cache.invalidate(&key).await;
        }
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn category(id: i64, name: &str) -> Category {
        Category {
            id: CategoryId::new(id),
            name: name.to_string(),
            slug: name.to_lowercase(),
            description: None,
            company_count: 0,
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let cache = ResponseCache::new();
        cache
            .insert(
                CacheKey::Categories,
                &[CacheTag::Categories],
                CacheValue::Categories(vec![category(1, "Food")]),
            )
            .await;

        assert!(cache.get(&CacheKey::Categories).await.is_some());
        assert!(cache.get(&CacheKey::Plans).await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_drops_only_tagged_keys() {
        let cache = ResponseCache::new();
        cache
            .insert(
                CacheKey::Categories,
                &[CacheTag::Categories],
                CacheValue::Categories(vec![category(1, "Food")]),
            )
            .await;
        cache
            .insert(
                CacheKey::Plans,
                &[CacheTag::Plans],
                CacheValue::Plans(vec![]),
            )
            .await;

        cache.invalidate(&[CacheTag::Categories]).await;

        assert!(cache.get(&CacheKey::Categories).await.is_none());
        assert!(cache.get(&CacheKey::Plans).await.is_some());
    }

    #[tokio::test]
    async fn test_key_registered_under_multiple_tags() {
        let cache = ResponseCache::new();
        // A category page is dirtied by both its own tag and the collection tag
        cache
            .insert(
                CacheKey::Category(CategoryId::new(3)),
                &[CacheTag::Categories, CacheTag::Category(CategoryId::new(3))],
                CacheValue::Category(Box::new(category(3, "Travel"))),
            )
            .await;

        cache
            .invalidate(&[CacheTag::Category(CategoryId::new(3))])
            .await;
        assert!(cache.get(&CacheKey::Category(CategoryId::new(3))).await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_unknown_tag_is_noop() {
        let cache = ResponseCache::new();
        cache
            .insert(
                CacheKey::Categories,
                &[CacheTag::Categories],
                CacheValue::Categories(vec![]),
            )
            .await;

        cache.invalidate(&[CacheTag::Coupons]).await;
        assert!(cache.get(&CacheKey::Categories).await.is_some());
    }
}

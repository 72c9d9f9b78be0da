//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::backend::BackendApi;
use crate::config::AppConfig;
use crate::stores::NotificationStore;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; provides access to configuration, the
/// session-store pool, the backend API client, and the notification store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    pool: PgPool,
    backend: BackendApi,
    notifications: NotificationStore<BackendApi>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration
    /// * `pool` - `PostgreSQL` connection pool (session store)
    #[must_use]
    pub fn new(config: AppConfig, pool: PgPool) -> Self {
        let backend = BackendApi::new(&config.backend);
        let notifications = NotificationStore::new(backend.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                backend,
                notifications,
            }),
        }
    }

    /// Get a reference to the application configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the session-store connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the backend API client.
    #[must_use]
    pub fn backend(&self) -> &BackendApi {
        &self.inner.backend
    }

    /// Get a reference to the notification store.
    #[must_use]
    pub fn notifications(&self) -> &NotificationStore<BackendApi> {
        &self.inner.notifications
    }
}

//! Per-user notification state.
//!
//! Holds the last-fetched notification list and unread count for each
//! signed-in user. Mutations are confirm-then-commit: the backend call
//! happens first and local state changes only on success, so no rollback
//! is ever needed. Mutations are NOT serialized against fetches or each
//! other - whichever fetch completes last overwrites the list (the server
//! copy wins).

use std::collections::HashMap;
use std::sync::Mutex;

use adlist_core::{NotificationId, UserId};

use crate::backend::types::Notification;
use crate::backend::{ApiError, BackendApi};

/// Backend operations the store depends on.
///
/// A seam so the store's synchronization contract can be tested against an
/// in-memory fake; [`BackendApi`] is the production implementation.
pub trait NotificationsApi: Send + Sync {
    /// Fetch the caller's notifications, newest first.
    fn list(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Vec<Notification>, ApiError>> + Send;

    /// Mark one notification read.
    fn mark_read(
        &self,
        token: &str,
        id: NotificationId,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Mark every notification read.
    fn mark_all_read(&self, token: &str) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Delete one notification.
    fn delete(
        &self,
        token: &str,
        id: NotificationId,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

impl NotificationsApi for BackendApi {
    async fn list(&self, token: &str) -> Result<Vec<Notification>, ApiError> {
        self.list_notifications(token).await
    }

    async fn mark_read(&self, token: &str, id: NotificationId) -> Result<(), ApiError> {
        self.mark_notification_read(token, id).await
    }

    async fn mark_all_read(&self, token: &str) -> Result<(), ApiError> {
        self.mark_all_notifications_read(token).await
    }

    async fn delete(&self, token: &str, id: NotificationId) -> Result<(), ApiError> {
        self.delete_notification(token, id).await
    }
}

/// Snapshot of one user's notification state.
#[derive(Debug, Clone, Default)]
pub struct NotificationState {
    /// Last-fetched list, newest first.
    pub items: Vec<Notification>,
    /// Count of unread entries, recomputed on fetch and patched by
    /// mutations.
    pub unread_count: u32,
    /// Whether a fetch is in flight.
    pub loading: bool,
    /// Message of the last failed operation, cleared by the next
    /// successful fetch.
    pub error: Option<String>,
}

/// Per-user notification cache.
///
/// The lock is never held across a backend call: state is read, the call
/// awaited, and the result applied in a second critical section. That is
/// deliberate - it reproduces the unserialized behavior of the stores this
/// mirrors, where a stale fetch landing after a local mutation overwrites
/// it.
pub struct NotificationStore<A> {
    api: A,
    states: Mutex<HashMap<UserId, NotificationState>>,
}

impl<A: NotificationsApi> NotificationStore<A> {
    /// Create an empty store over the given backend.
    pub fn new(api: A) -> Self {
        Self {
            api,
            states: Mutex::new(HashMap::new()),
        }
    }

    /// Current snapshot for a user (empty state if never fetched).
    pub fn snapshot(&self, user: UserId) -> NotificationState {
        self.states
            .lock()
            .map(|states| states.get(&user).cloned())
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    /// Drop a user's cached state (sign-out).
    pub fn clear(&self, user: UserId) {
        if let Ok(mut states) = self.states.lock() {
            states.remove(&user);
        }
    }

    /// Fetch the list from the backend, replacing local state.
    ///
    /// On failure the previous list stays visible and only the error
    /// message changes.
    pub async fn fetch(&self, user: UserId, token: &str) -> NotificationState {
        self.update(user, |state| {
            state.loading = true;
        });

        match self.api.list(token).await {
            Ok(items) => self.update(user, |state| {
                #[allow(clippy::cast_possible_truncation)] // list is bounded by the backend page size
                let unread = items.iter().filter(|n| !n.read).count() as u32;
                state.items = items;
                state.unread_count = unread;
                state.loading = false;
                state.error = None;
            }),
            Err(e) => self.update(user, |state| {
                state.loading = false;
                state.error = Some(e.to_string());
            }),
        }
    }

    /// Mark one notification read.
    ///
    /// Local state changes only after the backend confirms; an unknown id
    /// leaves the list untouched.
    pub async fn mark_read(
        &self,
        user: UserId,
        token: &str,
        id: NotificationId,
    ) -> NotificationState {
        match self.api.mark_read(token, id).await {
            Ok(()) => self.update(user, |state| {
                if let Some(entry) = state.items.iter_mut().find(|n| n.id == id)
                    && !entry.read
                {
                    entry.read = true;
                    state.unread_count = state.unread_count.saturating_sub(1);
                }
            }),
            Err(e) => self.record_error(user, &e),
        }
    }

    /// Mark every notification read.
    pub async fn mark_all_read(&self, user: UserId, token: &str) -> NotificationState {
        match self.api.mark_all_read(token).await {
            Ok(()) => self.update(user, |state| {
                for entry in &mut state.items {
                    entry.read = true;
                }
                state.unread_count = 0;
            }),
            Err(e) => self.record_error(user, &e),
        }
    }

    /// Delete one notification.
    ///
    /// The unread count drops only when the removed entry was unread.
    pub async fn remove(
        &self,
        user: UserId,
        token: &str,
        id: NotificationId,
    ) -> NotificationState {
        match self.api.delete(token, id).await {
            Ok(()) => self.update(user, |state| {
                if let Some(pos) = state.items.iter().position(|n| n.id == id) {
                    let removed = state.items.remove(pos);
                    if !removed.read {
                        state.unread_count = state.unread_count.saturating_sub(1);
                    }
                }
            }),
            Err(e) => self.record_error(user, &e),
        }
    }

    /// Apply a closure to a user's state, returning the new snapshot.
    fn update(&self, user: UserId, apply: impl FnOnce(&mut NotificationState)) -> NotificationState {
        self.states.lock().map_or_else(
            |_| NotificationState::default(),
            |mut states| {
                let state = states.entry(user).or_default();
                apply(state);
                state.clone()
            },
        )
    }

    fn record_error(&self, user: UserId, error: &ApiError) -> NotificationState {
        self.update(user, |state| {
            state.error = Some(error.to_string());
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use adlist_core::NotificationKind;
    use chrono::Utc;

    use super::*;

    /// In-memory backend double. `fail` poisons every call; the call log
    /// records which operations reached the "backend".
    #[derive(Default)]
    struct FakeApi {
        server_items: StdMutex<Vec<Notification>>,
        fail: StdMutex<bool>,
        calls: StdMutex<Vec<String>>,
    }

    impl FakeApi {
        fn with_items(items: Vec<Notification>) -> Self {
            Self {
                server_items: StdMutex::new(items),
                ..Self::default()
            }
        }

        fn set_fail(&self, fail: bool) {
            *self.fail.lock().unwrap() = fail;
        }

        fn set_items(&self, items: Vec<Notification>) {
            *self.server_items.lock().unwrap() = items;
        }

        fn check(&self, op: &str) -> Result<(), ApiError> {
            self.calls.lock().unwrap().push(op.to_string());
            if *self.fail.lock().unwrap() {
                Err(ApiError::Status {
                    status: 500,
                    message: "backend down".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    impl NotificationsApi for FakeApi {
        async fn list(&self, _token: &str) -> Result<Vec<Notification>, ApiError> {
            self.check("list")?;
            Ok(self.server_items.lock().unwrap().clone())
        }

        async fn mark_read(&self, _token: &str, _id: NotificationId) -> Result<(), ApiError> {
            self.check("mark_read")
        }

        async fn mark_all_read(&self, _token: &str) -> Result<(), ApiError> {
            self.check("mark_all_read")
        }

        async fn delete(&self, _token: &str, _id: NotificationId) -> Result<(), ApiError> {
            self.check("delete")
        }
    }

    fn notification(id: i64, read: bool) -> Notification {
        Notification {
            id: NotificationId::new(id),
            message: format!("notification {id}"),
            kind: NotificationKind::Info,
            read,
            created_at: Utc::now(),
        }
    }

    const USER: UserId = UserId::new(1);

    #[tokio::test]
    async fn test_fetch_replaces_list_and_recomputes_unread() {
        let store = NotificationStore::new(FakeApi::with_items(vec![
            notification(1, false),
            notification(2, true),
            notification(3, false),
        ]));

        let state = store.fetch(USER, "tok").await;

        assert_eq!(state.items.len(), 3);
        assert_eq!(state.unread_count, 2);
        assert!(!state.loading);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_previous_list() {
        let store = NotificationStore::new(FakeApi::with_items(vec![notification(1, false)]));
        store.fetch(USER, "tok").await;

        store.api.set_fail(true);
        let state = store.fetch(USER, "tok").await;

        assert_eq!(state.items.len(), 1);
        assert_eq!(state.unread_count, 1);
        assert!(!state.loading);
        assert!(state.error.is_some());
    }

    #[tokio::test]
    async fn test_mark_read_decrements_once() {
        let store = NotificationStore::new(FakeApi::with_items(vec![
            notification(1, false),
            notification(2, false),
        ]));
        store.fetch(USER, "tok").await;

        let state = store.mark_read(USER, "tok", NotificationId::new(1)).await;
        assert_eq!(state.unread_count, 1);
        assert!(state.items.iter().find(|n| n.id == NotificationId::new(1)).unwrap().read);

        // Marking the same entry again must not decrement further
        let state = store.mark_read(USER, "tok", NotificationId::new(1)).await;
        assert_eq!(state.unread_count, 1);
    }

    #[tokio::test]
    async fn test_mark_read_failure_leaves_state_unchanged() {
        let store = NotificationStore::new(FakeApi::with_items(vec![notification(1, false)]));
        store.fetch(USER, "tok").await;

        store.api.set_fail(true);
        let state = store.mark_read(USER, "tok", NotificationId::new(1)).await;

        assert_eq!(state.unread_count, 1);
        assert!(!state.items.first().unwrap().read);
        assert!(state.error.is_some());
    }

    #[tokio::test]
    async fn test_server_fetch_wins_over_local_mark_read() {
        // The store does not serialize mutations against fetches: a fetch
        // completing after mark_read with a stale server copy overwrites
        // the local patch.
        let store = NotificationStore::new(FakeApi::with_items(vec![notification(1, false)]));
        store.fetch(USER, "tok").await;

        store.mark_read(USER, "tok", NotificationId::new(1)).await;
        assert_eq!(store.snapshot(USER).unread_count, 0);

        // Server still reports the entry unread
        let state = store.fetch(USER, "tok").await;
        assert_eq!(state.unread_count, 1);
        assert!(!state.items.first().unwrap().read);
    }

    #[tokio::test]
    async fn test_remove_read_entry_keeps_unread_count() {
        let store = NotificationStore::new(FakeApi::with_items(vec![
            notification(1, true),
            notification(2, false),
        ]));
        store.fetch(USER, "tok").await;

        let state = store.remove(USER, "tok", NotificationId::new(1)).await;
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.unread_count, 1);
    }

    #[tokio::test]
    async fn test_remove_unread_entry_decrements_exactly_one() {
        let store = NotificationStore::new(FakeApi::with_items(vec![notification(1, false)]));
        store.fetch(USER, "tok").await;

        let state = store.remove(USER, "tok", NotificationId::new(1)).await;
        assert_eq!(state.unread_count, 0);

        // Removing an id that no longer exists never goes below zero
        let state = store.remove(USER, "tok", NotificationId::new(1)).await;
        assert_eq!(state.unread_count, 0);
    }

    #[tokio::test]
    async fn test_mark_all_read_is_idempotent() {
        let store = NotificationStore::new(FakeApi::with_items(vec![
            notification(1, false),
            notification(2, false),
        ]));
        store.fetch(USER, "tok").await;

        let state = store.mark_all_read(USER, "tok").await;
        assert_eq!(state.unread_count, 0);
        assert!(state.error.is_none());

        let state = store.mark_all_read(USER, "tok").await;
        assert_eq!(state.unread_count, 0);
        assert!(state.error.is_none());
        assert!(state.items.iter().all(|n| n.read));
    }

    #[tokio::test]
    async fn test_mutations_commit_only_after_backend_confirms() {
        let store = NotificationStore::new(FakeApi::with_items(vec![notification(1, false)]));
        store.fetch(USER, "tok").await;
        store.mark_read(USER, "tok", NotificationId::new(1)).await;

        let calls = store.api.calls.lock().unwrap().clone();
        assert_eq!(calls, ["list", "mark_read"]);
    }

    #[tokio::test]
    async fn test_clear_drops_state() {
        let store = NotificationStore::new(FakeApi::with_items(vec![notification(1, false)]));
        store.fetch(USER, "tok").await;
        store.clear(USER);

        let state = store.snapshot(USER);
        assert!(state.items.is_empty());
        assert_eq!(state.unread_count, 0);
    }

    #[tokio::test]
    async fn test_fetch_after_server_change_converges() {
        let store = NotificationStore::new(FakeApi::with_items(vec![notification(1, false)]));
        store.fetch(USER, "tok").await;

        store
            .api
            .set_items(vec![notification(1, true), notification(2, false)]);
        let state = store.fetch(USER, "tok").await;

        assert_eq!(state.items.len(), 2);
        assert_eq!(state.unread_count, 1);
    }
}

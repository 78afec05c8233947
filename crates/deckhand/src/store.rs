//! Optimistic in-memory collection with rollback.
//!
//! The store owns an ordered list of stacks or cards and applies deletions
//! optimistically: the item leaves the list synchronously, before the remote
//! call suspends, so no reader ever observes a half-removed state. If the
//! remote call fails, the captured snapshot is reinserted at its old index
//! (clamped to the current length) and the mapped error is recorded.
//!
//! The store has one logical writer: all mutation goes through `&mut self`,
//! which makes concurrent mutation a compile error rather than a runtime
//! hazard. Wrap a store in its own task or actor if multiple flows need it.

use std::future::Future;

use crate::error::ApiError;
pub use crate::models::Keyed;

/// An ordered list of server-owned entities, mutated optimistically.
#[derive(Debug, Default)]
pub struct CollectionStore<T> {
    items: Vec<T>,
    last_error: Option<String>,
}

impl<T: Keyed + Clone> CollectionStore<T> {
    #[must_use]
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            last_error: None,
        }
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, unique_id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.unique_id() == unique_id)
    }

    /// The user message recorded by the most recent failed mutation.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Replace the whole list, e.g. after a fresh fetch.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.last_error = None;
    }

    /// Append a server-confirmed entity. Creation is never optimistic:
    /// identity is server-assigned, so nothing enters the list before the
    /// create call has succeeded.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Swap in the server's edited entity at its current index.
    ///
    /// Returns false when the entity is no longer present (concurrently
    /// deleted); the edit result is silently dropped in that case.
    pub fn replace(&mut self, item: T) -> bool {
        match self
            .items
            .iter()
            .position(|existing| existing.unique_id() == item.unique_id())
        {
            Some(index) => {
                self.items[index] = item;
                true
            }
            None => false,
        }
    }

    /// Optimistically remove the entity with `unique_id`, then run the
    /// remote delete.
    ///
    /// - Absent id: no-op, no network call.
    /// - Remote success: the list stays as-is, no error recorded.
    /// - Remote failure: the snapshot is reinserted at
    ///   `min(captured_index, len)` and the mapped message is recorded.
    pub async fn remove<F, Fut>(&mut self, unique_id: &str, delete: F) -> Result<(), ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), ApiError>>,
    {
        self.last_error = None;

        let Some(index) = self
            .items
            .iter()
            .position(|item| item.unique_id() == unique_id)
        else {
            return Ok(());
        };

        // Capture before the suspension point; the removal itself is
        // synchronous so readers only ever see the list with or without
        // the item, never in between.
        let snapshot = self.items.remove(index);

        match delete().await {
            Ok(()) => Ok(()),
            Err(err) => {
                let reinsert_at = index.min(self.items.len());
                self.items.insert(reinsert_at, snapshot);
                self.last_error = Some(err.user_message().to_string());
                tracing::warn!(unique_id, %err, "delete failed, rolled back");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::error::messages;
    use crate::models::fixtures;
    use crate::models::Stack;

    fn store() -> CollectionStore<Stack> {
        CollectionStore::new(vec![
            fixtures::stack("s1", "Biology"),
            fixtures::stack("s2", "History"),
            fixtures::stack("s3", "Latin"),
        ])
    }

    fn ids(store: &CollectionStore<Stack>) -> Vec<&str> {
        store.items().iter().map(|s| s.unique_id.as_str()).collect()
    }

    #[tokio::test]
    async fn successful_delete_leaves_item_absent_and_no_error() {
        let mut store = store();

        store
            .remove("s2", || async { Ok(()) })
            .await
            .expect("remote delete succeeds");

        assert_eq!(ids(&store), vec!["s1", "s3"]);
        assert!(store.last_error().is_none());
    }

    #[tokio::test]
    async fn failed_delete_rolls_back_to_the_captured_index() {
        let mut store = store();

        let err = store
            .remove("s2", || async {
                Err(ApiError::HttpStatus {
                    status: 500,
                    message: None,
                })
            })
            .await
            .expect_err("remote delete fails");

        assert!(matches!(err, ApiError::HttpStatus { status: 500, .. }));
        assert_eq!(ids(&store), vec!["s1", "s2", "s3"]);
        assert_eq!(store.last_error(), Some(messages::UNKNOWN));
    }

    #[tokio::test]
    async fn delete_shrinks_the_list_by_exactly_one() {
        for id in ["s1", "s2", "s3"] {
            let mut store = store();
            store.remove(id, || async { Ok(()) }).await.unwrap();
            assert_eq!(store.len(), 2);
            assert!(store.get(id).is_none());
        }
    }

    #[tokio::test]
    async fn failed_delete_of_last_item_reinserts_at_the_end() {
        let mut store = store();

        store
            .remove("s3", || async { Err(ApiError::MalformedResponse) })
            .await
            .expect_err("fails");

        assert_eq!(ids(&store), vec!["s1", "s2", "s3"]);
    }

    #[tokio::test]
    async fn removing_an_absent_id_is_a_no_op() {
        let mut store = store();
        let mut called = false;

        store
            .remove("missing", || {
                called = true;
                async { Ok(()) }
            })
            .await
            .expect("no-op");

        assert!(!called, "remote delete must not run for an absent id");
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn push_appends_confirmed_entities_only() {
        let mut store = store();
        store.push(fixtures::stack("s4", "Chemistry"));
        assert_eq!(ids(&store), vec!["s1", "s2", "s3", "s4"]);
    }

    #[test]
    fn replace_swaps_by_identity_and_drops_stale_results() {
        let mut store = store();

        let mut edited = fixtures::stack("s2", "Modern History");
        edited.color = "#DC2626".to_string();
        assert!(store.replace(edited));
        assert_eq!(store.items()[1].name, "Modern History");
        assert_eq!(ids(&store), vec!["s1", "s2", "s3"]);

        // Concurrently deleted entity: the edit result is dropped.
        assert!(!store.replace(fixtures::stack("gone", "Ghost")));
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn delete_through_the_stack_facade_rolls_back_on_server_failure() {
        use std::sync::Arc;

        use crate::client::ApiClient;
        use crate::http::{HttpMethod, MockTransport};
        use crate::stacks::StackClient;
        use crate::token::MemoryTokenStore;

        let transport = MockTransport::new();
        transport.respond_json(HttpMethod::Delete, "https://api.test/stack/s2", 500, "");
        transport.respond_json(HttpMethod::Delete, "https://api.test/stack/s2", 200, "");

        let stacks = StackClient::new(
            ApiClient::new("https://api.test", Arc::new(transport.clone())),
            Arc::new(MemoryTokenStore::with_token("tok")),
        );
        let mut store = store();

        // First attempt: the server refuses, the stack reappears in place.
        store
            .remove("s2", || async { stacks.delete_stack("s2").await })
            .await
            .expect_err("server failure");
        assert_eq!(ids(&store), vec!["s1", "s2", "s3"]);
        assert!(store.last_error().is_some());

        // Second attempt: accepted, the stack stays gone.
        store
            .remove("s2", || async { stacks.delete_stack("s2").await })
            .await
            .expect("server accepts");
        assert_eq!(ids(&store), vec!["s1", "s3"]);
        assert!(store.last_error().is_none());
    }

    #[test]
    fn set_items_refreshes_and_clears_the_error() {
        let mut store = store();
        store.last_error = Some("stale".to_string());

        store.set_items(vec![fixtures::stack("s9", "New")]);
        assert_eq!(ids(&store), vec!["s9"]);
        assert!(store.last_error().is_none());
    }
}

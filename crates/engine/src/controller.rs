//! Owner of the authoritative collection.
//!
//! Every mutation intent goes to the remote first; the local collection only
//! ever changes to reflect a confirmed response. A failed call leaves the
//! collection untouched and records a [`Notice`].
//!
//! Intents may be in flight concurrently. Each one takes a sequence number
//! when it is dispatched, and a response is applied to an id only if no
//! response from a later-dispatched intent has already been applied to that
//! id. Stale responses are dropped and still reported as success.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
};

use api_types::todo::{Todo, TodoId, TodoNew, TodoQuery, TodoUpdate};
use tokio::sync::Mutex;

use crate::{
    draft::normalize_title,
    error::{RemoteError, SyncError},
    remote::TodoRemote,
    view::Counts,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Load,
    Create,
    Update,
    Delete,
    Toggle,
}

impl Intent {
    /// User-facing message shown when the intent fails remotely.
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Load => "Failed to load todos. Please try again.",
            Self::Create => "Failed to create todo. Please try again.",
            Self::Update => "Failed to update todo. Please try again.",
            Self::Delete => "Failed to delete todo. Please try again.",
            Self::Toggle => "Failed to toggle todo. Please try again.",
        }
    }
}

/// The most recent remote failure. Never blocks later intents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub intent: Intent,
    pub error: RemoteError,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        self.intent.failure_message()
    }
}

/// Consistent copy of the controller state at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub todos: Vec<Todo>,
    pub notice: Option<Notice>,
}

#[derive(Debug, Default)]
struct Store {
    todos: Vec<Todo>,
    /// Sequence number of the last response applied per held id.
    applied: HashMap<TodoId, u64>,
    /// Confirmed deletes, keyed by the highest sequence number dispatched
    /// when the delete was confirmed. A list dispatched after that point
    /// cannot contain the id, so the entry is dropped once one is applied.
    deleted: HashMap<TodoId, u64>,
    last_load: u64,
    notice: Option<Notice>,
}

impl Store {
    fn position(&self, id: TodoId) -> Option<usize> {
        self.todos.iter().position(|todo| todo.id == id)
    }

    fn is_stale(&self, id: TodoId, seq: u64) -> bool {
        self.applied.get(&id).is_some_and(|&last| last > seq)
    }

    /// Inserts a created record at the front, or replaces it in place when a
    /// racing load already delivered it.
    fn insert(&mut self, todo: Todo, seq: u64) -> bool {
        if self.deleted.contains_key(&todo.id) || self.is_stale(todo.id, seq) {
            return false;
        }
        self.applied.insert(todo.id, seq);
        match self.position(todo.id) {
            Some(index) => self.todos[index] = todo,
            None => self.todos.insert(0, todo),
        }
        true
    }

    fn replace(&mut self, todo: Todo, seq: u64) -> bool {
        if self.deleted.contains_key(&todo.id) || self.is_stale(todo.id, seq) {
            return false;
        }
        let Some(index) = self.position(todo.id) else {
            return false;
        };
        self.applied.insert(todo.id, seq);
        self.todos[index] = todo;
        true
    }

    /// A confirmed delete is final whatever its sequence number: no later
    /// response for that id is applied, not even a list.
    fn remove(&mut self, id: TodoId, horizon: u64) -> bool {
        let before = self.todos.len();
        self.todos.retain(|todo| todo.id != id);
        self.applied.remove(&id);
        self.deleted.insert(id, horizon);
        self.todos.len() != before
    }

    fn reset(&mut self, todos: Vec<Todo>, seq: u64) -> bool {
        if seq < self.last_load {
            return false;
        }
        self.last_load = seq;

        let mut loaded = Vec::with_capacity(todos.len());
        for todo in todos {
            if self.deleted.contains_key(&todo.id) {
                continue;
            }
            if self.is_stale(todo.id, seq) {
                // A newer response already landed for this id; keep it.
                if let Some(index) = self.position(todo.id) {
                    loaded.push(self.todos[index].clone());
                }
                continue;
            }
            self.applied.insert(todo.id, seq);
            loaded.push(todo);
        }

        // Records confirmed after the list was requested are missing from it.
        let mut merged: Vec<Todo> = self
            .todos
            .iter()
            .filter(|todo| {
                self.is_stale(todo.id, seq) && !loaded.iter().any(|other| other.id == todo.id)
            })
            .cloned()
            .collect();
        merged.extend(loaded);
        self.todos = merged;

        let todos = &self.todos;
        self.applied
            .retain(|id, _| todos.iter().any(|todo| todo.id == *id));
        self.deleted.retain(|_, horizon| *horizon >= seq);
        true
    }
}

pub struct Controller<R> {
    remote: R,
    store: Mutex<Store>,
    seq: AtomicU64,
}

impl<R: TodoRemote> Controller<R> {
    pub fn new(remote: R) -> Self {
        Self {
            remote,
            store: Mutex::new(Store::default()),
            seq: AtomicU64::new(0),
        }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub async fn snapshot(&self) -> Snapshot {
        let store = self.store.lock().await;
        Snapshot {
            todos: store.todos.clone(),
            notice: store.notice.clone(),
        }
    }

    pub async fn todos(&self) -> Vec<Todo> {
        self.store.lock().await.todos.clone()
    }

    pub async fn counts(&self) -> Counts {
        Counts::of(&self.store.lock().await.todos)
    }

    pub async fn notice(&self) -> Option<Notice> {
        self.store.lock().await.notice.clone()
    }

    pub async fn dismiss_notice(&self) {
        self.store.lock().await.notice = None;
    }

    /// Records a remote failure as the current notice and hands it back.
    async fn settle<T>(&self, intent: Intent, result: Result<T, RemoteError>) -> Result<T, SyncError> {
        match result {
            Ok(value) => Ok(value),
            Err(error) => {
                tracing::warn!(?intent, "remote call failed: {error}");
                self.store.lock().await.notice = Some(Notice {
                    intent,
                    error: error.clone(),
                });
                Err(error.into())
            }
        }
    }

    /// Replaces the collection with the server's list.
    ///
    /// Returns the number of records held afterwards.
    pub async fn load(&self, query: &TodoQuery) -> Result<usize, SyncError> {
        let seq = self.next_seq();
        let result = self.remote.list(query).await;
        let todos = self.settle(Intent::Load, result).await?;

        let mut store = self.store.lock().await;
        if !store.reset(todos, seq) {
            tracing::debug!(seq, "dropping stale list response");
        }
        Ok(store.todos.len())
    }

    pub async fn add(&self, draft: TodoNew) -> Result<Todo, SyncError> {
        let draft = TodoNew {
            title: normalize_title(&draft.title)?,
            ..draft
        };
        let seq = self.next_seq();
        let result = self.remote.create(&draft).await;
        let todo = self.settle(Intent::Create, result).await?;

        tracing::info!(id = %todo.id, "todo created");
        if !self.store.lock().await.insert(todo.clone(), seq) {
            tracing::debug!(id = %todo.id, seq, "dropping stale create response");
        }
        Ok(todo)
    }

    pub async fn apply(&self, id: TodoId, mut patch: TodoUpdate) -> Result<Todo, SyncError> {
        if let Some(title) = patch.title.as_deref() {
            patch.title = Some(normalize_title(title)?);
        }
        let seq = self.next_seq();
        let result = self.remote.update(id, &patch).await;
        let todo = self.settle(Intent::Update, result).await?;

        if !self.store.lock().await.replace(todo.clone(), seq) {
            tracing::debug!(%id, seq, "update response not applied");
        }
        Ok(todo)
    }

    pub async fn remove(&self, id: TodoId) -> Result<(), SyncError> {
        let seq = self.next_seq();
        let result = self.remote.delete(id).await;
        self.settle(Intent::Delete, result).await?;

        tracing::info!(%id, seq, "todo deleted");
        let horizon = self.seq.load(Ordering::Relaxed);
        if !self.store.lock().await.remove(id, horizon) {
            tracing::debug!(%id, "deleted todo was not held locally");
        }
        Ok(())
    }

    pub async fn toggle(&self, id: TodoId) -> Result<Todo, SyncError> {
        let seq = self.next_seq();
        let result = self.remote.toggle_complete(id).await;
        let todo = self.settle(Intent::Toggle, result).await?;

        if !self.store.lock().await.replace(todo.clone(), seq) {
            tracing::debug!(%id, seq, "toggle response not applied");
        }
        Ok(todo)
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::VecDeque, sync::Arc, time::Duration};

    use api_types::{health::Health, todo::Priority};
    use tokio::sync::{mpsc, oneshot};

    use super::*;
    use crate::{error::ValidationError, testing::FakeRemote};

    fn seeded() -> Controller<FakeRemote> {
        Controller::new(FakeRemote::with(vec![
            FakeRemote::todo(1, "A", Priority::Low, false),
        ]))
    }

    async fn loaded() -> Controller<FakeRemote> {
        let controller = seeded();
        controller.load(&TodoQuery::default()).await.unwrap();
        controller
    }

    fn offline() -> RemoteError {
        RemoteError::NetworkUnavailable("connection refused".to_string())
    }

    #[tokio::test]
    async fn add_prepends_new_record_and_updates_counts() {
        let controller = loaded().await;

        let created = controller
            .add(TodoNew::new("B").priority(Priority::High))
            .await
            .unwrap();

        let todos = controller.todos().await;
        assert_eq!(todos.len(), 2);
        assert_eq!(todos[0], created);
        assert_eq!(todos[0].id, TodoId(2));
        assert_eq!(todos[0].priority, Priority::High);
        assert!(!todos[0].completed);
        assert_eq!(todos[1].title, "A");
        assert_eq!(
            controller.counts().await,
            Counts {
                total: 2,
                active: 2,
                completed: 0
            }
        );
    }

    #[tokio::test]
    async fn add_keeps_other_records_in_order() {
        let controller = Controller::new(FakeRemote::with(vec![
            FakeRemote::todo(3, "C", Priority::Low, false),
            FakeRemote::todo(2, "B", Priority::Low, true),
            FakeRemote::todo(1, "A", Priority::Low, false),
        ]));
        controller.load(&TodoQuery::default()).await.unwrap();
        let before = controller.todos().await;

        let created = controller.add(TodoNew::new("D")).await.unwrap();

        let after = controller.todos().await;
        assert_eq!(after.iter().filter(|todo| todo.id == created.id).count(), 1);
        let rest: Vec<_> = after.into_iter().filter(|todo| todo.id != created.id).collect();
        assert_eq!(rest, before);
    }

    #[tokio::test]
    async fn failed_add_leaves_collection_and_records_notice() {
        let controller = loaded().await;
        let before = controller.todos().await;
        controller.remote().fail_next(offline()).await;

        let err = controller.add(TodoNew::new("B")).await.unwrap_err();

        assert_eq!(err, SyncError::Remote(offline()));
        assert_eq!(controller.todos().await, before);
        let notice = controller.notice().await.unwrap();
        assert_eq!(notice.intent, Intent::Create);
        assert_eq!(notice.message(), "Failed to create todo. Please try again.");
    }

    #[tokio::test]
    async fn blank_title_never_reaches_the_remote() {
        let controller = loaded().await;
        let calls = controller.remote().calls().await;

        let err = controller.add(TodoNew::new("   ")).await.unwrap_err();

        assert_eq!(err, SyncError::Validation(ValidationError::EmptyTitle));
        assert_eq!(controller.remote().calls().await, calls);
        assert!(controller.notice().await.is_none());
    }

    #[tokio::test]
    async fn apply_replaces_matching_record() {
        let controller = loaded().await;
        let patch = TodoUpdate {
            title: Some("  A2 ".to_string()),
            priority: Some(Priority::High),
            ..TodoUpdate::default()
        };

        let updated = controller.apply(TodoId(1), patch).await.unwrap();

        assert_eq!(updated.title, "A2");
        assert_eq!(controller.todos().await, vec![updated]);
    }

    #[tokio::test]
    async fn failed_apply_keeps_previous_record() {
        let controller = loaded().await;
        let before = controller.todos().await;
        controller
            .remote()
            .fail_next(RemoteError::ServerRejected {
                status: 500,
                message: "boom".to_string(),
            })
            .await;

        let patch = TodoUpdate {
            completed: Some(true),
            ..TodoUpdate::default()
        };
        assert!(controller.apply(TodoId(1), patch).await.is_err());
        assert_eq!(controller.todos().await, before);
    }

    #[tokio::test]
    async fn double_delete_is_a_local_no_op() {
        let controller = loaded().await;
        controller.add(TodoNew::new("B")).await.unwrap();

        controller.remove(TodoId(1)).await.unwrap();
        let after_first = controller.todos().await;
        assert!(after_first.iter().all(|todo| todo.id != TodoId(1)));

        let err = controller.remove(TodoId(1)).await.unwrap_err();
        assert!(matches!(err, SyncError::Remote(ref remote) if remote.is_not_found()));
        assert_eq!(controller.todos().await, after_first);
        assert_eq!(controller.notice().await.unwrap().intent, Intent::Delete);
    }

    #[tokio::test]
    async fn toggling_twice_restores_the_flag() {
        let controller = loaded().await;

        let once = controller.toggle(TodoId(1)).await.unwrap();
        assert!(once.completed);
        let twice = controller.toggle(TodoId(1)).await.unwrap();
        assert!(!twice.completed);
        assert_eq!(controller.todos().await, vec![twice]);
    }

    #[tokio::test]
    async fn notice_does_not_block_and_can_be_dismissed() {
        let controller = loaded().await;
        controller.remote().fail_next(offline()).await;
        assert!(controller.toggle(TodoId(1)).await.is_err());
        assert!(controller.notice().await.is_some());

        // a later success does not clear it
        controller.toggle(TodoId(1)).await.unwrap();
        assert_eq!(controller.notice().await.unwrap().intent, Intent::Toggle);

        controller.dismiss_notice().await;
        assert!(controller.notice().await.is_none());
    }

    #[tokio::test]
    async fn newer_error_replaces_older_one() {
        let controller = loaded().await;
        controller.remote().fail_next(offline()).await;
        let _ = controller.toggle(TodoId(1)).await;
        controller
            .remote()
            .fail_next(RemoteError::Timeout(Duration::from_secs(10)))
            .await;
        let _ = controller.remove(TodoId(1)).await;

        let notice = controller.notice().await.unwrap();
        assert_eq!(notice.intent, Intent::Delete);
        assert_eq!(notice.error, RemoteError::Timeout(Duration::from_secs(10)));
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_collection() {
        let controller = loaded().await;
        let before = controller.todos().await;
        controller.remote().fail_next(offline()).await;

        assert!(controller.load(&TodoQuery::default()).await.is_err());
        assert_eq!(controller.todos().await, before);
        assert_eq!(
            controller.notice().await.unwrap().message(),
            "Failed to load todos. Please try again."
        );
    }

    #[tokio::test]
    async fn independent_toggles_apply_by_id() {
        let controller = Controller::new(FakeRemote::with(vec![
            FakeRemote::todo(2, "B", Priority::Medium, false),
            FakeRemote::todo(1, "A", Priority::Medium, false),
        ]));
        controller.load(&TodoQuery::default()).await.unwrap();

        let (a, b) = tokio::join!(controller.toggle(TodoId(1)), controller.toggle(TodoId(2)));
        a.unwrap();
        b.unwrap();

        assert!(controller.todos().await.iter().all(|todo| todo.completed));
    }

    /// Processes updates immediately but holds each response until released.
    struct Delayed {
        inner: FakeRemote,
        gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
        arrived: mpsc::UnboundedSender<()>,
    }

    impl TodoRemote for Delayed {
        async fn list(&self, query: &TodoQuery) -> Result<Vec<Todo>, RemoteError> {
            self.inner.list(query).await
        }

        async fn get(&self, id: TodoId) -> Result<Todo, RemoteError> {
            self.inner.get(id).await
        }

        async fn create(&self, draft: &TodoNew) -> Result<Todo, RemoteError> {
            self.inner.create(draft).await
        }

        async fn update(&self, id: TodoId, patch: &TodoUpdate) -> Result<Todo, RemoteError> {
            let result = self.inner.update(id, patch).await;
            let gate = self.gates.lock().await.pop_front();
            let _ = self.arrived.send(());
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            result
        }

        async fn delete(&self, id: TodoId) -> Result<(), RemoteError> {
            self.inner.delete(id).await
        }

        async fn toggle_complete(&self, id: TodoId) -> Result<Todo, RemoteError> {
            self.inner.toggle_complete(id).await
        }

        async fn health(&self) -> Result<Health, RemoteError> {
            self.inner.health().await
        }
    }

    #[tokio::test]
    async fn out_of_order_responses_keep_the_later_intent() {
        let (first_tx, first_rx) = oneshot::channel();
        let (second_tx, second_rx) = oneshot::channel();
        let (arrived_tx, mut arrived_rx) = mpsc::unbounded_channel();
        let controller = Arc::new(Controller::new(Delayed {
            inner: FakeRemote::with(vec![FakeRemote::todo(1, "A", Priority::Low, false)]),
            gates: Mutex::new(VecDeque::from([first_rx, second_rx])),
            arrived: arrived_tx,
        }));
        controller.load(&TodoQuery::default()).await.unwrap();

        let rename = |title: &str| TodoUpdate {
            title: Some(title.to_string()),
            ..TodoUpdate::default()
        };

        let first = tokio::spawn({
            let controller = controller.clone();
            let patch = rename("first");
            async move { controller.apply(TodoId(1), patch).await }
        });
        arrived_rx.recv().await.unwrap();
        let second = tokio::spawn({
            let controller = controller.clone();
            let patch = rename("second");
            async move { controller.apply(TodoId(1), patch).await }
        });
        arrived_rx.recv().await.unwrap();

        second_tx.send(()).unwrap();
        assert_eq!(second.await.unwrap().unwrap().title, "second");
        first_tx.send(()).unwrap();
        assert_eq!(first.await.unwrap().unwrap().title, "first");

        let todos = controller.todos().await;
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].title, "second");
        assert_eq!(controller.remote().inner.get(TodoId(1)).await.unwrap().title, "second");
    }

    #[test]
    fn reset_keeps_records_confirmed_after_the_list_was_requested() {
        let mut store = Store::default();
        let older = FakeRemote::todo(1, "A", Priority::Low, false);
        let created = FakeRemote::todo(2, "B", Priority::Low, false);

        // list dispatched as #1, create dispatched as #2 and applied first
        assert!(store.insert(created.clone(), 2));
        assert!(store.reset(vec![older.clone()], 1));
        assert_eq!(store.todos, vec![created, older]);

        // an even older list response is ignored entirely
        assert!(!store.reset(Vec::new(), 0));
        assert_eq!(store.todos.len(), 2);
    }

    #[test]
    fn reset_does_not_resurrect_deleted_records() {
        let mut store = Store::default();
        let todo = FakeRemote::todo(1, "A", Priority::Low, false);
        assert!(store.reset(vec![todo.clone()], 1));
        assert!(store.remove(todo.id, 3));

        assert!(store.reset(vec![todo.clone()], 2));
        assert!(store.todos.is_empty());
    }

    #[test]
    fn list_answered_after_a_delete_keeps_it_deleted() {
        let mut store = Store::default();
        let todo = FakeRemote::todo(1, "A", Priority::Low, false);
        assert!(store.reset(vec![todo.clone()], 1));

        // delete #2 and list #3 both in flight; the delete is confirmed first
        assert!(store.remove(todo.id, 3));
        assert!(store.reset(vec![todo.clone()], 3));
        assert!(store.todos.is_empty());

        // late responses for the id are dropped as well
        assert!(!store.replace(todo.clone(), 4));
        assert!(!store.insert(todo, 4));
        assert!(store.todos.is_empty());
    }

    #[test]
    fn tombstones_retire_once_a_later_list_is_applied() {
        let mut store = Store::default();
        let kept = FakeRemote::todo(1, "A", Priority::Low, false);
        let gone = FakeRemote::todo(2, "B", Priority::Low, false);
        assert!(store.reset(vec![kept.clone(), gone.clone()], 1));
        assert!(store.remove(gone.id, 2));

        assert!(store.reset(vec![kept.clone()], 3));
        assert!(store.deleted.is_empty());
        assert_eq!(store.applied.len(), 1);
        assert_eq!(store.todos, vec![kept]);
    }

    #[test]
    fn create_racing_a_load_replaces_in_place() {
        let mut store = Store::default();
        let newer = FakeRemote::todo(2, "B", Priority::Low, false);
        let older = FakeRemote::todo(1, "A", Priority::Low, false);
        assert!(store.reset(vec![newer.clone(), older.clone()], 1));

        let created = Todo {
            title: "B (confirmed)".to_string(),
            ..newer
        };
        assert!(store.insert(created.clone(), 2));

        assert_eq!(store.todos, vec![created, older]);
    }
}

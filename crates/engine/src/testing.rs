//! In-memory [`TodoRemote`] for unit tests.

use api_types::{
    health::Health,
    todo::{Priority, Todo, TodoId, TodoNew, TodoQuery, TodoUpdate},
};
use tokio::sync::Mutex;

use crate::{error::RemoteError, remote::TodoRemote};

#[derive(Debug, Default)]
struct State {
    todos: Vec<Todo>,
    next_id: i64,
    fail_next: Option<RemoteError>,
    calls: usize,
}

#[derive(Debug, Default)]
pub(crate) struct FakeRemote {
    state: Mutex<State>,
}

impl FakeRemote {
    /// Seeds the server with `todos`, newest first.
    pub(crate) fn with(todos: Vec<Todo>) -> Self {
        let next_id = todos.iter().map(|todo| todo.id.0).max().unwrap_or(0) + 1;
        Self {
            state: Mutex::new(State {
                todos,
                next_id,
                ..State::default()
            }),
        }
    }

    pub(crate) fn todo(id: i64, title: &str, priority: Priority, completed: bool) -> Todo {
        Todo {
            id: TodoId(id),
            title: title.to_string(),
            description: None,
            priority,
            due_date: None,
            completed,
            created_at: None,
            updated_at: None,
        }
    }

    /// Makes the next call fail with `err`, whatever it is.
    pub(crate) async fn fail_next(&self, err: RemoteError) {
        self.state.lock().await.fail_next = Some(err);
    }

    pub(crate) async fn calls(&self) -> usize {
        self.state.lock().await.calls
    }

    async fn call<T>(&self, f: impl FnOnce(&mut State) -> Result<T, RemoteError>) -> Result<T, RemoteError> {
        let mut state = self.state.lock().await;
        state.calls += 1;
        if let Some(err) = state.fail_next.take() {
            return Err(err);
        }
        f(&mut state)
    }
}

fn not_found() -> RemoteError {
    RemoteError::ServerRejected {
        status: 404,
        message: "Todo not found".to_string(),
    }
}

fn find(state: &mut State, id: TodoId) -> Result<&mut Todo, RemoteError> {
    state
        .todos
        .iter_mut()
        .find(|todo| todo.id == id)
        .ok_or_else(not_found)
}

impl TodoRemote for FakeRemote {
    async fn list(&self, query: &TodoQuery) -> Result<Vec<Todo>, RemoteError> {
        let query = *query;
        self.call(move |state| {
            Ok(state
                .todos
                .iter()
                .filter(|todo| query.completed.is_none_or(|done| todo.completed == done))
                .filter(|todo| query.priority.is_none_or(|p| todo.priority == p))
                .cloned()
                .collect())
        })
        .await
    }

    async fn get(&self, id: TodoId) -> Result<Todo, RemoteError> {
        self.call(|state| find(state, id).map(|todo| todo.clone()))
            .await
    }

    async fn create(&self, draft: &TodoNew) -> Result<Todo, RemoteError> {
        self.call(|state| {
            let todo = Todo {
                id: TodoId(state.next_id),
                title: draft.title.clone(),
                description: draft.description.clone(),
                priority: draft.priority,
                due_date: draft.due_date,
                completed: false,
                created_at: None,
                updated_at: None,
            };
            state.next_id += 1;
            state.todos.insert(0, todo.clone());
            Ok(todo)
        })
        .await
    }

    async fn update(&self, id: TodoId, patch: &TodoUpdate) -> Result<Todo, RemoteError> {
        self.call(|state| {
            let todo = find(state, id)?;
            if let Some(title) = &patch.title {
                todo.title = title.clone();
            }
            if let Some(description) = &patch.description {
                todo.description = description.clone();
            }
            if let Some(completed) = patch.completed {
                todo.completed = completed;
            }
            if let Some(priority) = patch.priority {
                todo.priority = priority;
            }
            if let Some(due_date) = patch.due_date {
                todo.due_date = due_date;
            }
            Ok(todo.clone())
        })
        .await
    }

    async fn delete(&self, id: TodoId) -> Result<(), RemoteError> {
        self.call(|state| {
            find(state, id)?;
            state.todos.retain(|todo| todo.id != id);
            Ok(())
        })
        .await
    }

    async fn toggle_complete(&self, id: TodoId) -> Result<Todo, RemoteError> {
        self.call(|state| {
            let todo = find(state, id)?;
            todo.completed = !todo.completed;
            Ok(todo.clone())
        })
        .await
    }

    async fn health(&self) -> Result<Health, RemoteError> {
        self.call(|_| Ok(Health::healthy())).await
    }
}

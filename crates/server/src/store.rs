//! In-memory todo table.

use std::collections::BTreeMap;

use api_types::{
    TITLE_MAX_LEN,
    todo::{Todo, TodoId, TodoNew, TodoQuery, TodoUpdate},
};
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Todo not found")]
    NotFound(TodoId),
    #[error("{0}")]
    Validation(String),
}

#[derive(Debug)]
pub struct TodoStore {
    todos: BTreeMap<TodoId, Todo>,
    next_id: i64,
}

impl Default for TodoStore {
    fn default() -> Self {
        Self {
            todos: BTreeMap::new(),
            next_id: 1,
        }
    }
}

fn check_title(title: &str) -> Result<(), StoreError> {
    if title.is_empty() {
        return Err(StoreError::Validation(
            "title must contain at least 1 character".to_string(),
        ));
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(StoreError::Validation(format!(
            "title must contain at most {TITLE_MAX_LEN} characters"
        )));
    }
    Ok(())
}

impl TodoStore {
    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// Matching todos, newest first.
    pub fn list(&self, query: &TodoQuery) -> Vec<Todo> {
        let mut todos: Vec<Todo> = self
            .todos
            .values()
            .filter(|todo| query.completed.is_none_or(|done| todo.completed == done))
            .filter(|todo| query.priority.is_none_or(|p| todo.priority == p))
            .cloned()
            .collect();
        todos.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        todos
    }

    pub fn get(&self, id: TodoId) -> Result<Todo, StoreError> {
        self.todos.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    pub fn create(&mut self, payload: TodoNew, now: DateTime<Utc>) -> Result<Todo, StoreError> {
        check_title(&payload.title)?;

        let id = TodoId(self.next_id);
        self.next_id += 1;
        let todo = Todo {
            id,
            title: payload.title,
            description: payload.description,
            priority: payload.priority,
            due_date: payload.due_date,
            completed: false,
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.todos.insert(id, todo.clone());
        Ok(todo)
    }

    pub fn update(
        &mut self,
        id: TodoId,
        payload: TodoUpdate,
        now: DateTime<Utc>,
    ) -> Result<Todo, StoreError> {
        if let Some(title) = &payload.title {
            check_title(title)?;
        }
        let todo = self.todos.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        if let Some(title) = payload.title {
            todo.title = title;
        }
        if let Some(description) = payload.description {
            todo.description = description;
        }
        if let Some(completed) = payload.completed {
            todo.completed = completed;
        }
        if let Some(priority) = payload.priority {
            todo.priority = priority;
        }
        if let Some(due_date) = payload.due_date {
            todo.due_date = due_date;
        }
        todo.updated_at = Some(now);
        Ok(todo.clone())
    }

    pub fn delete(&mut self, id: TodoId) -> Result<(), StoreError> {
        self.todos
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    pub fn toggle(&mut self, id: TodoId, now: DateTime<Utc>) -> Result<Todo, StoreError> {
        let todo = self.todos.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        todo.completed = !todo.completed;
        todo.updated_at = Some(now);
        Ok(todo.clone())
    }
}

#[cfg(test)]
mod tests {
    use api_types::todo::Priority;
    use chrono::TimeZone;

    use super::*;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, minute, 0).unwrap()
    }

    #[test]
    fn create_assigns_ids_and_defaults() {
        let mut store = TodoStore::default();
        let first = store.create(TodoNew::new("A"), at(0)).unwrap();
        let second = store.create(TodoNew::new("B"), at(1)).unwrap();

        assert_eq!(first.id, TodoId(1));
        assert_eq!(second.id, TodoId(2));
        assert_eq!(first.priority, Priority::Medium);
        assert!(!first.completed);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn list_is_newest_first_and_filtered() {
        let mut store = TodoStore::default();
        store.create(TodoNew::new("A").priority(Priority::High), at(0)).unwrap();
        store.create(TodoNew::new("B").priority(Priority::Low), at(1)).unwrap();
        store.create(TodoNew::new("C").priority(Priority::High), at(1)).unwrap();
        store.toggle(TodoId(1), at(2)).unwrap();

        let all: Vec<_> = store
            .list(&TodoQuery::default())
            .into_iter()
            .map(|todo| todo.title)
            .collect();
        assert_eq!(all, vec!["C", "B", "A"]);

        let open_high = store.list(&TodoQuery {
            completed: Some(false),
            priority: Some(Priority::High),
        });
        assert_eq!(open_high.len(), 1);
        assert_eq!(open_high[0].title, "C");
    }

    #[test]
    fn update_applies_only_present_fields() {
        let mut store = TodoStore::default();
        let todo = store
            .create(TodoNew::new("A").description("notes"), at(0))
            .unwrap();

        let updated = store
            .update(
                todo.id,
                TodoUpdate {
                    priority: Some(Priority::High),
                    ..TodoUpdate::default()
                },
                at(5),
            )
            .unwrap();
        assert_eq!(updated.title, "A");
        assert_eq!(updated.description.as_deref(), Some("notes"));
        assert_eq!(updated.updated_at, Some(at(5)));

        let cleared = store
            .update(
                todo.id,
                TodoUpdate {
                    description: Some(None),
                    ..TodoUpdate::default()
                },
                at(6),
            )
            .unwrap();
        assert_eq!(cleared.description, None);
    }

    #[test]
    fn rejects_empty_titles() {
        let mut store = TodoStore::default();
        assert!(matches!(
            store.create(TodoNew::new(""), at(0)),
            Err(StoreError::Validation(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn second_delete_is_not_found() {
        let mut store = TodoStore::default();
        let todo = store.create(TodoNew::new("A"), at(0)).unwrap();
        store.delete(todo.id).unwrap();
        assert_eq!(store.delete(todo.id), Err(StoreError::NotFound(todo.id)));
    }
}

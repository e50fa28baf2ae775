//! Per-item edit sessions.

use std::collections::HashMap;

use api_types::todo::{Priority, Todo, TodoId, TodoUpdate};

use crate::{
    controller::Controller,
    draft::{normalize_description, normalize_title},
    error::{SyncError, ValidationError},
    remote::TodoRemote,
};

/// Uncommitted copy of the editable fields of one todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

impl EditBuffer {
    pub fn from_todo(todo: &Todo) -> Self {
        Self {
            title: todo.title.clone(),
            description: todo.description.clone().unwrap_or_default(),
            priority: todo.priority,
        }
    }

    /// Partial update carrying the trimmed title, the trimmed description
    /// (`null` when blank) and the selected priority.
    pub fn to_update(&self) -> Result<TodoUpdate, ValidationError> {
        Ok(TodoUpdate {
            title: Some(normalize_title(&self.title)?),
            description: Some(normalize_description(&self.description)),
            priority: Some(self.priority),
            ..TodoUpdate::default()
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditSession {
    #[default]
    Viewing,
    Editing(EditBuffer),
}

impl EditSession {
    /// Starts (or restarts) editing from the current authoritative record.
    pub fn begin(&mut self, todo: &Todo) {
        *self = Self::Editing(EditBuffer::from_todo(todo));
    }

    /// Drops the buffer. No request is sent.
    pub fn cancel(&mut self) {
        *self = Self::Viewing;
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing(_))
    }

    pub fn buffer(&self) -> Option<&EditBuffer> {
        match self {
            Self::Editing(buffer) => Some(buffer),
            Self::Viewing => None,
        }
    }

    pub fn buffer_mut(&mut self) -> Option<&mut EditBuffer> {
        match self {
            Self::Editing(buffer) => Some(buffer),
            Self::Viewing => None,
        }
    }

    /// Sends the buffer through [`Controller::apply`].
    ///
    /// Goes back to `Viewing` only when the controller reports success; on
    /// any error the session stays in `Editing` with the buffer intact.
    /// Returns `Ok(None)` when there was nothing to commit.
    pub async fn commit<R: TodoRemote>(
        &mut self,
        id: TodoId,
        controller: &Controller<R>,
    ) -> Result<Option<Todo>, SyncError> {
        let Self::Editing(buffer) = self else {
            return Ok(None);
        };
        let update = buffer.to_update()?;
        let todo = controller.apply(id, update).await?;
        *self = Self::Viewing;
        Ok(Some(todo))
    }
}

/// Edit sessions keyed by todo id. Sessions are independent of each other.
#[derive(Debug, Clone, Default)]
pub struct EditSessions {
    sessions: HashMap<TodoId, EditSession>,
}

impl EditSessions {
    pub fn session(&self, id: TodoId) -> Option<&EditSession> {
        self.sessions.get(&id)
    }

    pub fn session_mut(&mut self, id: TodoId) -> &mut EditSession {
        self.sessions.entry(id).or_default()
    }

    pub fn is_editing(&self, id: TodoId) -> bool {
        self.session(id).is_some_and(EditSession::is_editing)
    }

    pub fn buffer(&self, id: TodoId) -> Option<&EditBuffer> {
        self.session(id).and_then(EditSession::buffer)
    }

    /// Forgets sessions for ids that are no longer in `todos`, along with
    /// sessions that are back to `Viewing`.
    pub fn retain_known(&mut self, todos: &[Todo]) {
        self.sessions.retain(|id, session| {
            session.is_editing() && todos.iter().any(|todo| todo.id == *id)
        });
    }

    pub fn editing(&self) -> usize {
        self.sessions.values().filter(|s| s.is_editing()).count()
    }
}

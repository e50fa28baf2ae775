use api_types::{
    TITLE_MAX_LEN,
    todo::{Priority, Todo, TodoNew},
};
use chrono::{DateTime, Utc};

use crate::{
    controller::Controller,
    error::{SyncError, ValidationError},
    remote::TodoRemote,
};

/// Trims `raw` and checks it is a usable title.
pub fn normalize_title(raw: &str) -> Result<String, ValidationError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    let len = title.chars().count();
    if len > TITLE_MAX_LEN {
        return Err(ValidationError::TitleTooLong {
            len,
            max: TITLE_MAX_LEN,
        });
    }
    Ok(title.to_string())
}

/// Trims `raw`; blank descriptions are sent as `null`.
pub fn normalize_description(raw: &str) -> Option<String> {
    let description = raw.trim();
    (!description.is_empty()).then(|| description.to_string())
}

/// Parses a user-typed due date; blank input means no due date.
pub fn parse_due_date(raw: &str) -> Result<Option<DateTime<Utc>>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    api_types::timestamp::parse(raw)
        .map(Some)
        .map_err(|_| ValidationError::InvalidDueDate(raw.to_string()))
}

/// The "new todo" form.
///
/// Holds raw user input; [`DraftForm::submit`] validates it, hands it to the
/// controller and clears the form only when the server accepted it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftForm {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
}

impl DraftForm {
    pub fn can_submit(&self) -> bool {
        !self.title.trim().is_empty()
    }

    pub fn to_new(&self) -> Result<TodoNew, ValidationError> {
        Ok(TodoNew {
            title: normalize_title(&self.title)?,
            description: normalize_description(&self.description),
            priority: self.priority,
            due_date: self.due_date,
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub async fn submit<R: TodoRemote>(
        &mut self,
        controller: &Controller<R>,
    ) -> Result<Todo, SyncError> {
        let draft = self.to_new()?;
        let todo = controller.add(draft).await?;
        self.reset();
        Ok(todo)
    }
}

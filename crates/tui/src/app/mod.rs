use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::event::{self, Event, KeyEvent};
use engine::{
    Controller, DraftForm, EditSessions, Filters, HttpRemote, Notice, Priority, Snapshot,
    SyncError, Todo, TodoId, TodoQuery, TodoRemote, parse_due_date,
    view::{self, TodoView},
};

use crate::{
    config::AppConfig,
    error::{AppError, Result},
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Priority,
    DueDate,
}

impl FormField {
    const ADD: [FormField; 4] = [
        FormField::Title,
        FormField::Description,
        FormField::Priority,
        FormField::DueDate,
    ];
    // Due dates are only set when creating.
    const EDIT: [FormField; 3] = [FormField::Title, FormField::Description, FormField::Priority];

    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Description => "Description",
            Self::Priority => "Priority",
            Self::DueDate => "Due date",
        }
    }

    fn cycle(self, fields: &[FormField], forward: bool) -> Self {
        let len = fields.len();
        let idx = fields.iter().position(|field| *field == self).unwrap_or(0);
        let next = if forward {
            (idx + 1) % len
        } else {
            (idx + len - 1) % len
        };
        fields[next]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Browse,
    Adding(FormField),
    Editing {
        id: TodoId,
        field: FormField,
    },
    ConfirmDelete(TodoId),
}

impl Mode {
    pub fn is_typing(self) -> bool {
        matches!(self, Self::Adding(_) | Self::Editing { .. })
    }
}

#[derive(Debug, Default)]
pub struct AppState {
    pub mode: Mode,
    /// Mirror of the controller collection, refreshed after every intent.
    pub todos: Vec<Todo>,
    pub notice: Option<Notice>,
    pub filters: Filters,
    /// Index into the visible list.
    pub selected: usize,
    pub draft: DraftForm,
    /// Raw due date text; parsed on submit.
    pub due_input: String,
    pub edits: EditSessions,
    /// Local validation failure of the open form. Not a remote notice.
    pub validation: Option<String>,
    pub base_url: String,
    pub connected: Option<bool>,
    pub last_refresh: Option<DateTime<Local>>,
}

impl AppState {
    pub fn visible(&self) -> TodoView<'_> {
        view::view(&self.todos, &self.filters)
    }

    pub fn selected_todo(&self) -> Option<&Todo> {
        self.visible().items.get(self.selected).copied()
    }

    fn selected_id(&self) -> Option<TodoId> {
        self.selected_todo().map(|todo| todo.id)
    }

    fn select_next(&mut self) {
        let len = self.visible().items.len();
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn select_id(&mut self, id: TodoId) {
        let position = self.visible().items.iter().position(|todo| todo.id == id);
        if let Some(position) = position {
            self.selected = position;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().items.len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.todos = snapshot.todos;
        self.notice = snapshot.notice;
        self.edits.retain_known(&self.todos);

        let mode = self.mode;
        match mode {
            Mode::Editing { id, .. } if !self.edits.is_editing(id) => self.mode = Mode::Browse,
            Mode::ConfirmDelete(id) if !self.todos.iter().any(|todo| todo.id == id) => {
                self.mode = Mode::Browse;
            }
            _ => {}
        }
        self.clamp_selection();
    }

    /// Text field under the cursor, if the focused field takes text.
    fn active_input(&mut self) -> Option<&mut String> {
        match self.mode {
            Mode::Adding(FormField::Title) => Some(&mut self.draft.title),
            Mode::Adding(FormField::Description) => Some(&mut self.draft.description),
            Mode::Adding(FormField::DueDate) => Some(&mut self.due_input),
            Mode::Editing { id, field } => {
                let buffer = self.edits.session_mut(id).buffer_mut()?;
                match field {
                    FormField::Title => Some(&mut buffer.title),
                    FormField::Description => Some(&mut buffer.description),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn active_priority(&mut self) -> Option<&mut Priority> {
        match self.mode {
            Mode::Adding(FormField::Priority) => Some(&mut self.draft.priority),
            Mode::Editing {
                id,
                field: FormField::Priority,
            } => self
                .edits
                .session_mut(id)
                .buffer_mut()
                .map(|buffer| &mut buffer.priority),
            _ => None,
        }
    }
}

fn cycle_priority(priority: Priority, forward: bool) -> Priority {
    let all = Priority::ALL;
    let idx = all.iter().position(|p| *p == priority).unwrap_or(0);
    let next = if forward {
        (idx + 1) % all.len()
    } else {
        (idx + all.len() - 1) % all.len()
    };
    all[next]
}

pub struct App {
    controller: Controller<HttpRemote>,
    pub state: AppState,
    should_quit: bool,
}

impl App {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let remote = HttpRemote::with_timeout(&config.base_url, config.timeout())?;
        let state = AppState {
            base_url: config.base_url.clone(),
            ..AppState::default()
        };

        Ok(Self {
            controller: Controller::new(remote),
            state,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        self.refresh().await;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit {
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key).await;
                }
            }
        }

        Ok(())
    }

    async fn handle_key(&mut self, key: KeyEvent) {
        let action = map_key(key, self.state.mode.is_typing());
        if action == AppAction::Quit {
            self.should_quit = true;
            return;
        }

        let mode = self.state.mode;
        match mode {
            Mode::Browse => self.browse(action).await,
            Mode::ConfirmDelete(id) => self.confirm_delete(id, action).await,
            Mode::Adding(field) => self.adding(field, action).await,
            Mode::Editing { id, field } => self.editing(id, field, action).await,
        }
    }

    async fn browse(&mut self, action: AppAction) {
        match action {
            AppAction::Up | AppAction::Input('k') => self.state.select_prev(),
            AppAction::Down | AppAction::Input('j') => self.state.select_next(),
            AppAction::Input(' ') => {
                if let Some(id) = self.state.selected_id() {
                    self.toggle(id).await;
                }
            }
            AppAction::Input('a') => {
                self.state.validation = None;
                self.state.mode = Mode::Adding(FormField::Title);
            }
            AppAction::Submit | AppAction::Input('e') => {
                if let Some(todo) = self.state.selected_todo().cloned() {
                    // Resume a session left open by a failed commit.
                    if !self.state.edits.is_editing(todo.id) {
                        self.state.edits.session_mut(todo.id).begin(&todo);
                    }
                    self.state.validation = None;
                    self.state.mode = Mode::Editing {
                        id: todo.id,
                        field: FormField::Title,
                    };
                }
            }
            AppAction::Input('d') => {
                if let Some(id) = self.state.selected_id() {
                    self.state.mode = Mode::ConfirmDelete(id);
                }
            }
            AppAction::Input('s') => {
                self.state.filters.status = self.state.filters.status.next();
                self.state.clamp_selection();
            }
            AppAction::Input('p') => {
                self.state.filters.priority = self.state.filters.priority.next();
                self.state.clamp_selection();
            }
            AppAction::Input('o') => {
                self.state.filters.sort = self.state.filters.sort.next();
            }
            AppAction::Input('r') => self.refresh().await,
            AppAction::Input('x') | AppAction::Cancel => {
                self.controller.dismiss_notice().await;
                self.sync().await;
            }
            _ => {}
        }
    }

    async fn confirm_delete(&mut self, id: TodoId, action: AppAction) {
        match action {
            AppAction::Input('y') | AppAction::Submit => {
                self.state.mode = Mode::Browse;
                if let Err(err) = self.controller.remove(id).await {
                    tracing::warn!(%id, "delete failed: {err}");
                }
                self.sync().await;
            }
            AppAction::Input('n') | AppAction::Cancel => self.state.mode = Mode::Browse,
            _ => {}
        }
    }

    async fn adding(&mut self, field: FormField, action: AppAction) {
        match action {
            AppAction::Cancel => {
                self.state.validation = None;
                self.state.mode = Mode::Browse;
            }
            AppAction::NextField | AppAction::Down => {
                self.state.mode = Mode::Adding(field.cycle(&FormField::ADD, true));
            }
            AppAction::PrevField | AppAction::Up => {
                self.state.mode = Mode::Adding(field.cycle(&FormField::ADD, false));
            }
            AppAction::Submit => self.submit_draft().await,
            other => self.edit_field(other),
        }
    }

    async fn editing(&mut self, id: TodoId, field: FormField, action: AppAction) {
        match action {
            AppAction::Cancel => {
                self.state.edits.session_mut(id).cancel();
                self.state.validation = None;
                self.state.mode = Mode::Browse;
            }
            AppAction::NextField | AppAction::Down => {
                let field = field.cycle(&FormField::EDIT, true);
                self.state.mode = Mode::Editing { id, field };
            }
            AppAction::PrevField | AppAction::Up => {
                let field = field.cycle(&FormField::EDIT, false);
                self.state.mode = Mode::Editing { id, field };
            }
            AppAction::Submit => self.commit_edit(id).await,
            other => self.edit_field(other),
        }
    }

    /// Text and priority input shared by the add and edit forms.
    fn edit_field(&mut self, action: AppAction) {
        match action {
            AppAction::Left | AppAction::Right => {
                if let Some(priority) = self.state.active_priority() {
                    *priority = cycle_priority(*priority, action == AppAction::Right);
                }
            }
            AppAction::Input(ch) => {
                if let Some(input) = self.state.active_input() {
                    input.push(ch);
                }
            }
            AppAction::Backspace => {
                if let Some(input) = self.state.active_input() {
                    input.pop();
                }
            }
            _ => {}
        }
    }

    async fn submit_draft(&mut self) {
        match parse_due_date(&self.state.due_input) {
            Ok(due_date) => self.state.draft.due_date = due_date,
            Err(err) => {
                self.state.validation = Some(err.to_string());
                return;
            }
        }

        match self.state.draft.submit(&self.controller).await {
            Ok(todo) => {
                self.state.due_input.clear();
                self.state.validation = None;
                self.state.mode = Mode::Browse;
                self.sync().await;
                self.state.select_id(todo.id);
                return;
            }
            Err(SyncError::Validation(err)) => self.state.validation = Some(err.to_string()),
            Err(SyncError::Remote(err)) => tracing::warn!("create failed: {err}"),
        }
        self.sync().await;
    }

    async fn commit_edit(&mut self, id: TodoId) {
        let session = self.state.edits.session_mut(id);
        match session.commit(id, &self.controller).await {
            Ok(_) => {
                self.state.validation = None;
                self.state.mode = Mode::Browse;
            }
            Err(SyncError::Validation(err)) => self.state.validation = Some(err.to_string()),
            Err(SyncError::Remote(err)) => tracing::warn!(%id, "update failed: {err}"),
        }
        self.sync().await;
    }

    async fn toggle(&mut self, id: TodoId) {
        if let Err(err) = self.controller.toggle(id).await {
            tracing::warn!(%id, "toggle failed: {err}");
        }
        self.sync().await;
    }

    async fn refresh(&mut self) {
        self.state.connected = Some(self.controller.remote().health().await.is_ok());
        match self.controller.load(&TodoQuery::default()).await {
            Ok(count) => {
                tracing::debug!(count, "todos loaded");
                self.state.last_refresh = Some(Local::now());
            }
            Err(err) => tracing::warn!("load failed: {err}"),
        }
        self.sync().await;
    }

    async fn sync(&mut self) {
        let snapshot = self.controller.snapshot().await;
        self.state.apply_snapshot(snapshot);
    }
}

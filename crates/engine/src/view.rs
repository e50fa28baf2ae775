//! Derived view over the authoritative collection.
//!
//! Everything here is a pure function of `(collection, filters)`: callers
//! re-run [`view`] whenever either input changes. Nothing is cached and the
//! inputs are never mutated.

use std::{cmp::Ordering, fmt, str::FromStr};

use api_types::todo::{Priority, Todo};
use chrono::{DateTime, Days, TimeZone, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown filter \"{0}\"")]
pub struct UnknownFilter(pub String);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] = [Self::All, Self::Active, Self::Completed];

    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            Self::All => true,
            Self::Active => !todo.completed,
            Self::Completed => todo.completed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }

    /// Next filter in display order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Active,
            Self::Active => Self::Completed,
            Self::Completed => Self::All,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            _ => Err(UnknownFilter(s.to_string())),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            Self::All => true,
            Self::Only(priority) => todo.priority == priority,
        }
    }

    /// Cycles all → high → medium → low → all, the order of the filter bar.
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Only(Priority::High),
            Self::Only(Priority::High) => Self::Only(Priority::Medium),
            Self::Only(Priority::Medium) => Self::Only(Priority::Low),
            Self::Only(Priority::Low) => Self::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All Priorities",
            Self::Only(Priority::High) => "High Priority",
            Self::Only(Priority::Medium) => "Medium Priority",
            Self::Only(Priority::Low) => "Low Priority",
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<Priority>()
            .map(Self::Only)
            .map_err(|_| UnknownFilter(s.to_string()))
    }
}

impl fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(priority) => f.write_str(priority.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Collection order, i.e. newest first as delivered by the controller.
    #[default]
    Insertion,
    /// Earliest due date first; undated items last.
    DueDate,
    /// High before medium before low.
    Priority,
    /// Case-insensitive title.
    Title,
}

impl SortOrder {
    pub fn next(self) -> Self {
        match self {
            Self::Insertion => Self::DueDate,
            Self::DueDate => Self::Priority,
            Self::Priority => Self::Title,
            Self::Title => Self::Insertion,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Insertion => "Newest",
            Self::DueDate => "Due date",
            Self::Priority => "Priority",
            Self::Title => "Title",
        }
    }

    fn compare(self, a: &Todo, b: &Todo) -> Ordering {
        match self {
            Self::Insertion => Ordering::Equal,
            Self::DueDate => match (a.due_date, b.due_date) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            Self::Priority => b.priority.cmp(&a.priority),
            Self::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        }
    }
}

/// The two independent selectors plus the display ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Filters {
    pub status: StatusFilter,
    pub priority: PriorityFilter,
    pub sort: SortOrder,
}

impl Filters {
    pub fn matches(&self, todo: &Todo) -> bool {
        self.status.matches(todo) && self.priority.matches(todo)
    }
}

/// Aggregate counters, always over the unfiltered collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

impl Counts {
    pub fn of(todos: &[Todo]) -> Self {
        let completed = todos.iter().filter(|todo| todo.completed).count();
        Self {
            total: todos.len(),
            active: todos.len() - completed,
            completed,
        }
    }

    pub fn for_status(&self, status: StatusFilter) -> usize {
        match status {
            StatusFilter::All => self.total,
            StatusFilter::Active => self.active,
            StatusFilter::Completed => self.completed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoView<'a> {
    pub items: Vec<&'a Todo>,
    pub counts: Counts,
}

impl TodoView<'_> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Visible subset of `todos` under `filters`, plus the aggregate counters.
pub fn view<'a>(todos: &'a [Todo], filters: &Filters) -> TodoView<'a> {
    let mut items: Vec<&Todo> = todos.iter().filter(|todo| filters.matches(todo)).collect();
    // `sort_by` is stable: equal keys keep collection order.
    items.sort_by(|a, b| filters.sort.compare(a, b));

    TodoView {
        items,
        counts: Counts::of(todos),
    }
}

/// Placeholder shown when the visible subset is empty.
pub fn empty_message(status: StatusFilter) -> String {
    match status {
        StatusFilter::All => "No todos yet. Create your first todo above!".to_string(),
        other => format!("No {} todos found.", other.as_str()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    Today,
    Tomorrow,
    Overdue,
    Upcoming,
}

/// Classifies a due date against `now`, by calendar day in `now`'s timezone.
///
/// Anything due today counts as [`DueStatus::Today`] even if the instant has
/// already passed.
pub fn due_status<Tz: TimeZone>(due: &DateTime<Utc>, now: &DateTime<Tz>) -> DueStatus {
    let due_day = due.with_timezone(&now.timezone()).date_naive();
    let today = now.date_naive();

    if due_day == today {
        DueStatus::Today
    } else if today.checked_add_days(Days::new(1)) == Some(due_day) {
        DueStatus::Tomorrow
    } else if *due < now.with_timezone(&Utc) {
        DueStatus::Overdue
    } else {
        DueStatus::Upcoming
    }
}

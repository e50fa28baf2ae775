//! Client-side state synchronization for a remote todo collection.
//!
//! The crate is split in four parts:
//!
//! - [`TodoRemote`] and its HTTP implementation [`HttpRemote`]: one call per
//!   REST verb, failures normalized into [`RemoteError`].
//! - [`Controller`]: owns the authoritative collection and applies the
//!   create/update/delete/toggle intents once the server has confirmed them.
//! - [`view`]: pure filtering, sorting and counting over the collection.
//! - [`EditSession`] and [`DraftForm`]: transient, per-item and per-form
//!   input state that talks to the controller only.

mod client;
mod controller;
mod draft;
mod error;
mod remote;
mod session;
#[cfg(test)]
mod testing;
pub mod view;

pub use api_types::{
    health::Health,
    todo::{Priority, Todo, TodoId, TodoNew, TodoQuery, TodoUpdate},
};
pub use client::{DEFAULT_TIMEOUT, HttpRemote};
pub use controller::{Controller, Intent, Notice, Snapshot};
pub use draft::{DraftForm, normalize_description, normalize_title, parse_due_date};
pub use error::{RemoteError, SyncError, ValidationError};
pub use remote::TodoRemote;
pub use session::{EditBuffer, EditSession, EditSessions};
pub use view::{Counts, DueStatus, Filters, PriorityFilter, SortOrder, StatusFilter, TodoView};

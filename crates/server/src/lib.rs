use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;

pub use server::{ServerState, router, run, run_with_listener, spawn_with_listener};
pub use store::{StoreError, TodoStore};

mod server;
mod store;
mod todos;

pub mod types {
    pub mod todo {
        pub use api_types::todo::{Priority, Todo, TodoId, TodoNew, TodoQuery, TodoUpdate};
    }

    pub mod health {
        pub use api_types::health::{Banner, Health};
    }
}

pub enum ServerError {
    Store(StoreError),
}

/// Error payload, same shape FastAPI uses.
#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

fn status_for_store_error(err: &StoreError) -> StatusCode {
    match err {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, detail) = match self {
            ServerError::Store(err) => (status_for_store_error(&err), err.to_string()),
        };

        (status, Json(ErrorBody { detail })).into_response()
    }
}

impl From<StoreError> for ServerError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

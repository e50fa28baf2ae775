use axum::{
    Router,
    routing::{get, patch},
};
use tokio::sync::Mutex;

use std::sync::Arc;

use crate::{store::TodoStore, todos};

#[derive(Clone, Default)]
pub struct ServerState {
    pub store: Arc<Mutex<TodoStore>>,
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(todos::root))
        .route("/health", get(todos::health))
        .route("/api/todos", get(todos::list).post(todos::create))
        .route(
            "/api/todos/{id}",
            get(todos::get).put(todos::update).delete(todos::delete),
        )
        .route("/api/todos/{id}/toggle", patch(todos::toggle))
        .with_state(state)
}

pub async fn run(bind: &str, port: u16) {
    let addr = format!("{bind}:{port}");
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {addr}: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(listener: tokio::net::TcpListener) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(ServerState::default())).await
}

pub fn spawn_with_listener(
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

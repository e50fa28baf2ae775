use std::time::Duration;

use api_types::{
    health::Health,
    todo::{Todo, TodoId, TodoNew, TodoQuery, TodoUpdate},
};
use reqwest::{RequestBuilder, Url};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{error::RemoteError, remote::TodoRemote};

/// Upper bound for a single request, connect and body included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

const TODOS_PATH: &str = "/api/todos";
const HEALTH_PATH: &str = "/health";

/// Error payload of the API. FastAPI-style servers use `detail`, which may be
/// a string or a list of validation issues.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<serde_json::Value>,
    detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// `error` wins when both are present.
    fn message(self) -> Option<String> {
        match self.error.or(self.detail)? {
            serde_json::Value::Null => None,
            serde_json::Value::String(message) => Some(message),
            other => Some(other.to_string()),
        }
    }
}

/// [`TodoRemote`] over HTTP/JSON.
///
/// No authentication header is sent.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    base_url: String,
    http: reqwest::Client,
    timeout: Duration,
}

impl HttpRemote {
    pub fn new(base_url: &str) -> Result<Self, RemoteError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, RemoteError> {
        Url::parse(base_url).map_err(|err| RemoteError::InvalidBaseUrl(format!("{base_url}: {err}")))?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| RemoteError::NetworkUnavailable(err.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn todo_url(&self, id: TodoId) -> String {
        self.url(&format!("{TODOS_PATH}/{id}"))
    }

    fn classify(&self, err: reqwest::Error) -> RemoteError {
        if err.is_timeout() {
            RemoteError::Timeout(self.timeout)
        } else if err.is_decode() {
            RemoteError::Decode(err.to_string())
        } else {
            RemoteError::NetworkUnavailable(err.to_string())
        }
    }

    async fn dispatch(&self, req: RequestBuilder) -> Result<reqwest::Response, RemoteError> {
        let req = req.build().map_err(|err| self.classify(err))?;
        let method = req.method().clone();
        let url = req.url().clone();
        tracing::debug!(%method, %url, "sending request");

        let res = match self.http.execute(req).await {
            Ok(res) => res,
            Err(err) => {
                let err = self.classify(err);
                tracing::warn!(%method, %url, "request failed: {err}");
                return Err(err);
            }
        };

        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        let message = match res.text().await {
            Ok(body) => serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(ErrorBody::message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .to_string()
                }),
            Err(_) => "unknown error".to_string(),
        };
        tracing::warn!(%method, %url, status = status.as_u16(), "server rejected request: {message}");

        Err(RemoteError::ServerRejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, RemoteError> {
        let res = self.dispatch(req).await?;
        res.json::<T>().await.map_err(|err| self.classify(err))
    }
}

impl TodoRemote for HttpRemote {
    async fn list(&self, query: &TodoQuery) -> Result<Vec<Todo>, RemoteError> {
        self.send_json(self.http.get(self.url(TODOS_PATH)).query(query))
            .await
    }

    async fn get(&self, id: TodoId) -> Result<Todo, RemoteError> {
        self.send_json(self.http.get(self.todo_url(id))).await
    }

    async fn create(&self, draft: &TodoNew) -> Result<Todo, RemoteError> {
        self.send_json(self.http.post(self.url(TODOS_PATH)).json(draft))
            .await
    }

    async fn update(&self, id: TodoId, patch: &TodoUpdate) -> Result<Todo, RemoteError> {
        self.send_json(self.http.put(self.todo_url(id)).json(patch))
            .await
    }

    async fn delete(&self, id: TodoId) -> Result<(), RemoteError> {
        // The confirmation body is discarded.
        self.dispatch(self.http.delete(self.todo_url(id)))
            .await
            .map(|_| ())
    }

    async fn toggle_complete(&self, id: TodoId) -> Result<Todo, RemoteError> {
        let url = self.url(&format!("{TODOS_PATH}/{id}/toggle"));
        self.send_json(self.http.patch(url)).await
    }

    async fn health(&self) -> Result<Health, RemoteError> {
        self.send_json(self.http.get(self.url(HEALTH_PATH))).await
    }
}

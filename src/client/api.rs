use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

use crate::domain::todo::{Todo, TodoId, TodoPatch};

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3001/api";

#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-success response carrying a server-provided message.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("request failed with status code {0}")]
    Status(u16),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The task carrying the request went away before it answered.
    #[error("request was cancelled")]
    Cancelled,
}

impl ClientError {
    /// Text to show the user: the server's message when it sent one, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// Client view of the todo endpoints.
#[async_trait]
pub trait TodoApi: Send + Sync {
    async fn fetch_todos(&self) -> Result<Vec<Todo>, ClientError>;
    async fn add_todo(&self, text: &str) -> Result<Todo, ClientError>;
    async fn update_todo(&self, id: &TodoId, patch: &TodoPatch) -> Result<Todo, ClientError>;
    async fn delete_todo(&self, id: &TodoId) -> Result<(), ClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpTodoApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTodoApi {
    /// `base_url` includes the mount prefix, e.g. `http://127.0.0.1:3001/api`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string() })
    }

    fn todos_url(&self) -> String { format!("{}/todos", self.base_url) }

    fn todo_url(&self, id: &TodoId) -> String { format!("{}/todos/{}", self.base_url, id) }
}

#[async_trait]
impl TodoApi for HttpTodoApi {
    async fn fetch_todos(&self) -> Result<Vec<Todo>, ClientError> {
        let res = check(self.client.get(self.todos_url()).send().await?).await?;
        Ok(res.json().await?)
    }

    async fn add_todo(&self, text: &str) -> Result<Todo, ClientError> {
        let res = self.client.post(self.todos_url()).json(&json!({ "text": text })).send().await?;
        Ok(check(res).await?.json().await?)
    }

    async fn update_todo(&self, id: &TodoId, patch: &TodoPatch) -> Result<Todo, ClientError> {
        let res = self.client.put(self.todo_url(id)).json(patch).send().await?;
        Ok(check(res).await?.json().await?)
    }

    async fn delete_todo(&self, id: &TodoId) -> Result<(), ClientError> {
        check(self.client.delete(self.todo_url(id)).send().await?).await?;
        Ok(())
    }
}

async fn check(res: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.json::<Value>().await.ok();
    match body.as_ref().and_then(error_message) {
        Some(message) => Err(ClientError::Api { status: status.as_u16(), message }),
        None => Err(ClientError::Status(status.as_u16())),
    }
}

// Accepts both `{"error": "msg"}` and `{"error": {"message": "msg"}}`.
fn error_message(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::String(message) => Some(message.clone()),
        Value::Object(detail) => detail.get("message")?.as_str().map(str::to_string),
        _ => None,
    }
}

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::models::{NewTask, Task, TaskPatch};

pub const DEFAULT_API_URL: &str = "https://63c44317a90856357534792c.mockapi.io/todos";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("failed to build http client: {0}")]
    Client(reqwest::Error),
    #[error("request failed: {0}")]
    Transport(reqwest::Error),
    #[error("http error: status {status}")]
    Status { status: u16, body: String },
    #[error("invalid response json: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The remote task collection. Implementations talk plain REST verbs.
pub trait TaskService {
    /// Lists tasks, narrowed server-side to titles containing `title` when given.
    fn list(&self, title: Option<&str>)
        -> impl Future<Output = Result<Vec<Task>, RemoteError>> + Send;

    fn create(&self, task: &NewTask) -> impl Future<Output = Result<Task, RemoteError>> + Send;

    fn update(
        &self,
        id: &str,
        patch: &TaskPatch,
    ) -> impl Future<Output = Result<Task, RemoteError>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = Result<(), RemoteError>> + Send;
}

pub struct HttpTaskService {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTaskService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(RemoteError::Client)?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, id)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, RemoteError> {
        let resp = request.send().await.map_err(RemoteError::Transport)?;
        let status = resp.status();
        let text = resp.text().await.map_err(RemoteError::Transport)?;
        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, RemoteError> {
        let text = self.send(request).await?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl TaskService for HttpTaskService {
    async fn list(&self, title: Option<&str>) -> Result<Vec<Task>, RemoteError> {
        let mut request = self.client.get(&self.base_url);
        if let Some(title) = title.filter(|term| !term.is_empty()) {
            request = request.query(&[("title", title)]);
        }
        self.send_json(request).await
    }

    async fn create(&self, task: &NewTask) -> Result<Task, RemoteError> {
        self.send_json(self.client.post(&self.base_url).json(task))
            .await
    }

    async fn update(&self, id: &str, patch: &TaskPatch) -> Result<Task, RemoteError> {
        self.send_json(self.client.put(self.item_url(id)).json(patch))
            .await
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        self.send(self.client.delete(self.item_url(id))).await?;
        Ok(())
    }
}

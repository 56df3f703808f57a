//! REST transport for the hosted agent service.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ConvertConfig;
use crate::error::ConvertError;
use crate::types::{
    AgentThread, CreateMessageRequest, CreateRunRequest, ListOrder, MessageList, ThreadDeletion,
    ThreadMessage, ThreadRun,
};

use super::http::{bearer_headers, build_client, status_to_error};
use super::AgentService;

pub const DEFAULT_API_VERSION: &str = "v1";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Agent service reached over HTTPS at a project endpoint.
pub struct HttpAgentService {
    client: reqwest::Client,
    endpoint: String,
    token: String,
    api_version: String,
}

impl std::fmt::Debug for HttpAgentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAgentService")
            .field("endpoint", &self.endpoint)
            .field("api_version", &self.api_version)
            .field("token", &"..")
            .finish()
    }
}

impl HttpAgentService {
    /// `endpoint` is the project URL, e.g.
    /// `https://<resource>.services.ai.azure.com/api/projects/<project>`.
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Result<Self, ConvertError> {
        Ok(Self::with_client(
            build_client(DEFAULT_REQUEST_TIMEOUT)?,
            endpoint,
            token,
        ))
    }

    pub fn with_client(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            token: token.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Build from resolved configuration; endpoint and token must be set.
    pub fn from_config(config: &ConvertConfig) -> Result<Self, ConvertError> {
        let endpoint = config
            .endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| ConvertError::Configuration("Missing service endpoint".into()))?;
        let token = config
            .api_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ConvertError::Authentication("Missing CODEPORT_API_TOKEN".into()))?;
        let client = build_client(config.request_timeout)?;
        Ok(Self::with_client(client, endpoint, token).with_api_version(config.api_version.clone()))
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path.trim_start_matches('/'))
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, ConvertError> {
        let resp = request
            .headers(bearer_headers(&self.token))
            .query(&[("api-version", self.api_version.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status.as_u16(), &body_text));
        }

        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl AgentService for HttpAgentService {
    async fn create_thread(&self) -> Result<AgentThread, ConvertError> {
        debug!(endpoint = %self.endpoint, "create thread");
        self.send(
            self.client
                .post(self.url("threads"))
                .json(&serde_json::json!({})),
        )
        .await
    }

    async fn delete_thread(&self, thread_id: &str) -> Result<(), ConvertError> {
        debug!(thread_id, "delete thread");
        let deletion: ThreadDeletion = self
            .send(self.client.delete(self.url(&format!("threads/{thread_id}"))))
            .await?;
        if deletion.deleted {
            Ok(())
        } else {
            Err(ConvertError::InvalidState(format!(
                "Service did not delete thread {}",
                deletion.id
            )))
        }
    }

    async fn create_message(
        &self,
        thread_id: &str,
        content: &str,
    ) -> Result<ThreadMessage, ConvertError> {
        debug!(thread_id, bytes = content.len(), "create message");
        self.send(
            self.client
                .post(self.url(&format!("threads/{thread_id}/messages")))
                .json(&CreateMessageRequest::user(content)),
        )
        .await
    }

    async fn create_run(
        &self,
        thread_id: &str,
        request: &CreateRunRequest,
    ) -> Result<ThreadRun, ConvertError> {
        debug!(thread_id, agent_id = %request.assistant_id, "create run");
        self.send(
            self.client
                .post(self.url(&format!("threads/{thread_id}/runs")))
                .json(request),
        )
        .await
    }

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<ThreadRun, ConvertError> {
        debug!(thread_id, run_id, "cancel run");
        self.send(
            self.client
                .post(self.url(&format!("threads/{thread_id}/runs/{run_id}/cancel")))
                .json(&serde_json::json!({})),
        )
        .await
    }

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<ThreadRun, ConvertError> {
        self.send(
            self.client
                .get(self.url(&format!("threads/{thread_id}/runs/{run_id}"))),
        )
        .await
    }

    async fn list_messages(
        &self,
        thread_id: &str,
        order: ListOrder,
    ) -> Result<Vec<ThreadMessage>, ConvertError> {
        debug!(thread_id, %order, "list messages");
        let page: MessageList = self
            .send(
                self.client
                    .get(self.url(&format!("threads/{thread_id}/messages")))
                    .query(&[("order", order.as_ref())]),
            )
            .await?;
        Ok(page.data)
    }
}

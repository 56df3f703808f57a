//! The hosted agent service: the trait every caller goes through, and its HTTP transport.

pub mod client;
pub mod http;

pub use client::HttpAgentService;

use async_trait::async_trait;

use crate::error::ConvertError;
use crate::types::{AgentThread, CreateRunRequest, ListOrder, ThreadMessage, ThreadRun};

/// Operations consumed from the remote agent service.
///
/// The service owns the agent, its model and its instructions; this crate
/// only drives threads, messages and runs against an existing agent id.
#[async_trait]
pub trait AgentService: Send + Sync {
    /// Create an empty conversation thread.
    async fn create_thread(&self) -> Result<AgentThread, ConvertError>;

    /// Delete a thread and its messages.
    async fn delete_thread(&self, thread_id: &str) -> Result<(), ConvertError>;

    /// Append a user message to a thread.
    async fn create_message(
        &self,
        thread_id: &str,
        content: &str,
    ) -> Result<ThreadMessage, ConvertError>;

    /// Start a run of an agent against a thread.
    async fn create_run(
        &self,
        thread_id: &str,
        request: &CreateRunRequest,
    ) -> Result<ThreadRun, ConvertError>;

    /// Ask the service to stop a run. The returned run is usually
    /// `cancelling`; poll [`get_run`](Self::get_run) until it settles.
    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<ThreadRun, ConvertError>;

    /// Fetch the current state of a run.
    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<ThreadRun, ConvertError>;

    /// List a thread's messages in the given order.
    async fn list_messages(
        &self,
        thread_id: &str,
        order: ListOrder,
    ) -> Result<Vec<ThreadMessage>, ConvertError>;
}

//! Conversation session: one remote thread bound to one agent for a whole batch.

use tracing::{debug, warn};

use crate::agent::AgentService;
use crate::error::{ConvertError, Result};

/// A thread on the agent service plus the agent that runs against it.
///
/// Every file of a batch is converted inside the same session, so the thread's
/// history grows with each file. The session is consumed by [`close`](Self::close).
#[derive(Debug, PartialEq, Eq)]
pub struct ConversationSession {
    thread_id: String,
    agent_id: String,
}

impl ConversationSession {
    /// Create a thread for `agent_id`. The agent must already exist; it is
    /// neither created nor validated here.
    pub async fn open<S>(service: &S, agent_id: &str) -> Result<Self>
    where
        S: AgentService + ?Sized,
    {
        if agent_id.trim().is_empty() {
            return Err(ConvertError::Configuration("Agent id must not be empty".into()));
        }
        let thread = service.create_thread().await?;
        debug!(thread_id = %thread.id, agent_id, "session opened");
        Ok(Self {
            thread_id: thread.id,
            agent_id: agent_id.to_string(),
        })
    }

    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// Delete the thread. Best-effort: a failure is logged and handed back
    /// for reporting, never propagated.
    pub async fn close<S>(self, service: &S) -> Option<ConvertError>
    where
        S: AgentService + ?Sized,
    {
        match service.delete_thread(&self.thread_id).await {
            Ok(()) => {
                debug!(thread_id = %self.thread_id, "session closed");
                None
            }
            Err(err) => {
                warn!(thread_id = %self.thread_id, error = %err, "could not delete thread");
                Some(err)
            }
        }
    }
}

//! Conversation threads.

use serde::{Deserialize, Serialize};

/// A conversation thread on the agent service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentThread {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

/// Response body of a thread deletion.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ThreadDeletion {
    pub id: String,
    #[serde(default)]
    pub deleted: bool,
}

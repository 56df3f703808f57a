//! Agent runs and their status state machine.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Status reported for a run.
///
/// `Queued` and `InProgress` are pending; every other status is terminal as
/// far as conversion is concerned, and only `Completed` counts as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Queued | Self::InProgress)
    }

    pub fn is_terminal(self) -> bool {
        !self.is_pending()
    }

    pub fn is_success(self) -> bool {
        self == Self::Completed
    }

    /// Whether the service still holds the thread for this run. A thread
    /// accepts no new messages while one of its runs is active.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            Self::Queued | Self::InProgress | Self::RequiresAction | Self::Cancelling
        )
    }
}

/// Error the service attached to a run that did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// A run of an agent against a thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadRun {
    pub id: String,
    pub status: RunStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<RunError>,
}

impl ThreadRun {
    /// Message to show when the run did not complete.
    pub fn failure_message(&self) -> String {
        match &self.last_error {
            Some(err) if !err.message.is_empty() => err.message.clone(),
            Some(RunError {
                code: Some(code), ..
            }) => code.clone(),
            _ => format!("run ended with status {}", self.status),
        }
    }
}

/// How much of the thread a run is allowed to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum HistoryScope {
    /// Every message accumulated on the thread so far.
    #[default]
    Thread,
    /// Only the message just appended for the current file.
    LatestMessage,
}

/// Truncation applied by the service when building the run's context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TruncationStrategy {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_messages: Option<u32>,
}

/// Body for starting a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateRunRequest {
    pub assistant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncation_strategy: Option<TruncationStrategy>,
}

impl CreateRunRequest {
    pub fn new(agent_id: impl Into<String>, scope: HistoryScope) -> Self {
        let truncation_strategy = match scope {
            HistoryScope::Thread => None,
            HistoryScope::LatestMessage => Some(TruncationStrategy {
                kind: "last_messages".into(),
                last_messages: Some(1),
            }),
        };
        Self {
            assistant_id: agent_id.into(),
            truncation_strategy,
        }
    }
}

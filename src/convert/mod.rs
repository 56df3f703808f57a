//! Conversion request driver: one file in, one agent reply out.

pub mod prompt;

pub use prompt::build_prompt;

use std::time::Duration;

use tracing::{debug, warn};

use crate::agent::AgentService;
use crate::error::{ConvertError, Result};
use crate::language::Language;
use crate::session::ConversationSession;
use crate::types::{
    CreateRunRequest, HistoryScope, ListOrder, MessageRole, RunStatus, ThreadMessage, ThreadRun,
};
use crate::util::timeout::{maybe_with_timeout, with_timeout};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// How run status is polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Wait between status fetches.
    pub interval: Duration,
    /// Upper bound on waiting for one run; `None` waits for as long as the
    /// service keeps the run pending.
    pub timeout: Option<Duration>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: None,
        }
    }
}

/// State of the one run started for a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRun {
    pub message_id: String,
    pub run_id: String,
    pub status: RunStatus,
    /// Service-reported error when the run did not complete.
    pub error: Option<String>,
}

/// Outcome of driving one file through the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub run: ConversionRun,
    /// Text of the agent message this run produced, when the run completed
    /// and the agent said anything.
    pub response: Option<String>,
}

impl RunResult {
    pub fn is_success(&self) -> bool {
        self.run.status.is_success()
    }
}

/// Drives conversions for one language pair against an agent service.
pub struct Converter<'a, S: ?Sized> {
    service: &'a S,
    source: Language,
    target: Language,
    poll: PollSettings,
    scope: HistoryScope,
}

impl<'a, S> Converter<'a, S>
where
    S: AgentService + ?Sized,
{
    pub fn new(service: &'a S, source: Language, target: Language) -> Self {
        Self {
            service,
            source,
            target,
            poll: PollSettings::default(),
            scope: HistoryScope::default(),
        }
    }

    pub fn with_poll_settings(mut self, poll: PollSettings) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_history_scope(mut self, scope: HistoryScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn source(&self) -> &Language {
        &self.source
    }

    pub fn target(&self) -> &Language {
        &self.target
    }

    /// Append one prompt for `source_text` to the session, run the agent on it
    /// and wait for the run to leave the pending states.
    ///
    /// A run that ends in any status but `completed` is a normal result, not
    /// an error; errors are transport and service failures. A run that
    /// outlives the poll timeout is cancelled before `Timeout` is returned,
    /// so the session's thread stays usable.
    pub async fn convert(
        &self,
        session: &ConversationSession,
        source_text: &str,
        file_label: &str,
    ) -> Result<RunResult> {
        let thread_id = session.thread_id();
        let prompt = build_prompt(&self.source, &self.target, file_label, source_text);

        let message = self.service.create_message(thread_id, &prompt).await?;
        let request = CreateRunRequest::new(session.agent_id(), self.scope);
        let started = self.service.create_run(thread_id, &request).await?;
        debug!(file = file_label, run_id = %started.id, status = %started.status, "run started");

        let run_id = started.id.clone();
        let waited = maybe_with_timeout(
            self.poll.timeout,
            self.wait_while(thread_id, started, RunStatus::is_pending),
        )
        .await;
        let run = match waited {
            Ok(run) => run,
            Err(err @ ConvertError::Timeout(_)) => {
                if let Some(bound) = self.poll.timeout {
                    self.cancel_stuck_run(thread_id, &run_id, bound).await;
                }
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        let mut result = RunResult {
            run: ConversionRun {
                message_id: message.id,
                run_id: run.id.clone(),
                status: run.status,
                error: None,
            },
            response: None,
        };

        if !run.status.is_success() {
            result.run.error = Some(run.failure_message());
            return Ok(result);
        }

        let messages = self.service.list_messages(thread_id, ListOrder::Desc).await?;
        result.response = reply_for_run(&messages, &run.id).map(str::to_string);
        Ok(result)
    }

    async fn wait_while(
        &self,
        thread_id: &str,
        mut run: ThreadRun,
        keep_waiting: fn(RunStatus) -> bool,
    ) -> Result<ThreadRun> {
        let mut polls: u64 = 0;
        while keep_waiting(run.status) {
            tokio::time::sleep(self.poll.interval).await;
            run = self.service.get_run(thread_id, &run.id).await?;
            polls += 1;
            debug!(run_id = %run.id, status = %run.status, polls, "polled run");
        }
        Ok(run)
    }

    /// Cancel a run that outlived the poll timeout and wait, up to `bound`,
    /// for the service to release the thread. Failures are logged only.
    async fn cancel_stuck_run(&self, thread_id: &str, run_id: &str, bound: Duration) {
        warn!(run_id, "run timed out; cancelling");
        let cancelled = match self.service.cancel_run(thread_id, run_id).await {
            Ok(run) => run,
            Err(err) => {
                warn!(run_id, error = %err, "could not cancel run");
                return;
            }
        };
        match with_timeout(bound, self.wait_while(thread_id, cancelled, RunStatus::is_active)).await {
            Ok(run) => debug!(run_id, status = %run.status, "run settled after cancel"),
            Err(err) => warn!(run_id, error = %err, "run did not settle after cancel"),
        }
    }
}

/// Text of the agent message produced by `run_id`, newest first.
///
/// When the service tags messages with their run, only this run's messages
/// count, so a run that said nothing yields `None`. Untagged listings fall
/// back to the newest agent message.
fn reply_for_run<'m>(messages: &'m [ThreadMessage], run_id: &str) -> Option<&'m str> {
    let mut agent = messages.iter().filter(|m| m.role == MessageRole::Assistant);
    if messages.iter().any(|m| m.run_id.is_some()) {
        agent
            .filter(|m| m.run_id.as_deref() == Some(run_id))
            .find_map(ThreadMessage::text)
    } else {
        agent.next().and_then(ThreadMessage::text)
    }
}

//! Shared test helpers and an in-memory agent service.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use codeport::agent::AgentService;
use codeport::error::ConvertError;
use codeport::types::*;

/// How the mock agent handles the prompt for one file.
#[derive(Debug, Clone)]
pub struct Scripted {
    /// Number of status fetches that still report `in_progress`.
    pub pending_polls: usize,
    pub status: RunStatus,
    pub reply: Option<String>,
    pub error: Option<String>,
}

impl Scripted {
    pub fn reply(text: &str) -> Self {
        Self {
            pending_polls: 0,
            status: RunStatus::Completed,
            reply: Some(text.to_string()),
            error: None,
        }
    }

    pub fn failed(message: &str) -> Self {
        Self {
            pending_polls: 0,
            status: RunStatus::Failed,
            reply: None,
            error: Some(message.to_string()),
        }
    }

    /// The run completes without posting any message.
    pub fn silent() -> Self {
        Self {
            pending_polls: 0,
            status: RunStatus::Completed,
            reply: None,
            error: None,
        }
    }

    pub fn after_polls(mut self, polls: usize) -> Self {
        self.pending_polls = polls;
        self
    }
}

struct MockRun {
    thread_id: String,
    remaining: usize,
    cancelled: bool,
    script: Scripted,
}

/// An agent service that keeps threads in memory and answers from scripts
/// keyed by the file label found in each prompt.
#[derive(Default)]
pub struct MockAgentService {
    next_id: AtomicUsize,
    threads: Mutex<HashMap<String, Vec<ThreadMessage>>>,
    runs: Mutex<HashMap<String, MockRun>>,
    scripts: Mutex<HashMap<String, Scripted>>,
    pub run_requests: Mutex<Vec<CreateRunRequest>>,
    pub prompts: Mutex<Vec<String>>,
    pub threads_created: AtomicUsize,
    pub threads_deleted: AtomicUsize,
    pub get_run_calls: AtomicUsize,
    pub cancel_calls: AtomicUsize,
    fail_create_thread: bool,
    fail_delete: bool,
}

impl MockAgentService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Thread deletion always fails.
    pub fn with_failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    /// Thread creation always fails.
    pub fn with_failing_thread_creation(mut self) -> Self {
        self.fail_create_thread = true;
        self
    }

    /// Script the agent's behavior for the file named `label`.
    pub fn script(&self, label: &str, script: Scripted) {
        self.scripts
            .lock()
            .unwrap()
            .insert(label.to_string(), script);
    }

    /// Messages of a thread, oldest first.
    pub fn thread_messages(&self, thread_id: &str) -> Vec<ThreadMessage> {
        self.threads
            .lock()
            .unwrap()
            .get(thread_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn live_threads(&self) -> usize {
        self.threads.lock().unwrap().len()
    }

    fn id(&self, prefix: &str) -> String {
        format!("{prefix}_{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn message(
        &self,
        thread_id: &str,
        run_id: Option<&str>,
        role: MessageRole,
        text: &str,
    ) -> ThreadMessage {
        ThreadMessage {
            id: self.id("msg"),
            role,
            content: vec![MessageContent::Text {
                text: TextContent {
                    value: text.to_string(),
                    annotations: vec![],
                },
            }],
            thread_id: Some(thread_id.to_string()),
            run_id: run_id.map(str::to_string),
            created_at: None,
        }
    }

    /// Default reply: a fenced java block naming the file.
    fn default_script(label: &str) -> Scripted {
        Scripted::reply(&format!(
            "Here is the converted code:\n```java\n// converted from {label}\n```\nDone."
        ))
    }

    fn finish(&self, run_id: &str, run: &MockRun) -> ThreadRun {
        if run.script.status == RunStatus::Completed {
            if let Some(reply) = &run.script.reply {
                let message =
                    self.message(&run.thread_id, Some(run_id), MessageRole::Assistant, reply);
                if let Some(messages) = self.threads.lock().unwrap().get_mut(&run.thread_id) {
                    messages.push(message);
                }
            }
        }
        ThreadRun {
            id: run_id.to_string(),
            status: run.script.status,
            thread_id: Some(run.thread_id.clone()),
            assistant_id: None,
            last_error: run.script.error.as_ref().map(|message| RunError {
                code: Some("server_error".into()),
                message: message.clone(),
            }),
        }
    }
}

fn label_in(prompt: &str) -> Option<String> {
    prompt
        .lines()
        .find_map(|line| line.split_once(" file: ").map(|(_, label)| label.trim().to_string()))
}

#[async_trait]
impl AgentService for MockAgentService {
    async fn create_thread(&self) -> Result<AgentThread, ConvertError> {
        if self.fail_create_thread {
            return Err(ConvertError::api(500, "thread creation unavailable"));
        }
        self.threads_created.fetch_add(1, Ordering::SeqCst);
        let id = self.id("thread");
        self.threads.lock().unwrap().insert(id.clone(), Vec::new());
        Ok(AgentThread {
            id,
            created_at: None,
        })
    }

    async fn delete_thread(&self, thread_id: &str) -> Result<(), ConvertError> {
        if self.fail_delete {
            return Err(ConvertError::api(503, "delete unavailable"));
        }
        self.threads
            .lock()
            .unwrap()
            .remove(thread_id)
            .ok_or_else(|| ConvertError::NotFound(thread_id.to_string()))?;
        self.threads_deleted.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn create_message(
        &self,
        thread_id: &str,
        content: &str,
    ) -> Result<ThreadMessage, ConvertError> {
        let busy = self
            .runs
            .lock()
            .unwrap()
            .values()
            .any(|run| run.thread_id == thread_id);
        if busy {
            return Err(ConvertError::api(
                400,
                "Can't add messages to thread while a run is active",
            ));
        }
        let message = self.message(thread_id, None, MessageRole::User, content);
        self.threads
            .lock()
            .unwrap()
            .get_mut(thread_id)
            .ok_or_else(|| ConvertError::NotFound(thread_id.to_string()))?
            .push(message.clone());
        self.prompts.lock().unwrap().push(content.to_string());
        Ok(message)
    }

    async fn create_run(
        &self,
        thread_id: &str,
        request: &CreateRunRequest,
    ) -> Result<ThreadRun, ConvertError> {
        self.run_requests.lock().unwrap().push(request.clone());
        let prompt = self
            .thread_messages(thread_id)
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .and_then(|m| m.text().map(str::to_string))
            .ok_or_else(|| ConvertError::InvalidState("run on a thread without a prompt".into()))?;
        let label = label_in(&prompt).unwrap_or_default();
        let script = self
            .scripts
            .lock()
            .unwrap()
            .get(&label)
            .cloned()
            .unwrap_or_else(|| Self::default_script(&label));

        let run_id = self.id("run");
        let run = MockRun {
            thread_id: thread_id.to_string(),
            remaining: script.pending_polls,
            cancelled: false,
            script,
        };

        let started = ThreadRun {
            id: run_id.clone(),
            status: RunStatus::Queued,
            thread_id: Some(thread_id.to_string()),
            assistant_id: Some(request.assistant_id.clone()),
            last_error: None,
        };
        self.runs.lock().unwrap().insert(run_id, run);
        Ok(started)
    }

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<ThreadRun, ConvertError> {
        self.get_run_calls.fetch_add(1, Ordering::SeqCst);
        let mut runs = self.runs.lock().unwrap();
        let run = runs
            .get_mut(run_id)
            .ok_or_else(|| ConvertError::NotFound(run_id.to_string()))?;
        if run.thread_id != thread_id {
            return Err(ConvertError::NotFound(run_id.to_string()));
        }
        if run.remaining > 0 {
            run.remaining -= 1;
            return Ok(ThreadRun {
                id: run_id.to_string(),
                status: if run.cancelled {
                    RunStatus::Cancelling
                } else {
                    RunStatus::InProgress
                },
                thread_id: Some(thread_id.to_string()),
                assistant_id: None,
                last_error: None,
            });
        }
        let run = runs
            .remove(run_id)
            .ok_or_else(|| ConvertError::NotFound(run_id.to_string()))?;
        drop(runs);
        Ok(self.finish(run_id, &run))
    }

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<ThreadRun, ConvertError> {
        self.cancel_calls.fetch_add(1, Ordering::SeqCst);
        let mut runs = self.runs.lock().unwrap();
        let run = runs
            .get_mut(run_id)
            .filter(|run| run.thread_id == thread_id)
            .ok_or_else(|| ConvertError::NotFound(run_id.to_string()))?;
        run.cancelled = true;
        run.remaining = 1;
        run.script = Scripted {
            pending_polls: 0,
            status: RunStatus::Cancelled,
            reply: None,
            error: None,
        };
        Ok(ThreadRun {
            id: run_id.to_string(),
            status: RunStatus::Cancelling,
            thread_id: Some(thread_id.to_string()),
            assistant_id: None,
            last_error: None,
        })
    }

    async fn list_messages(
        &self,
        thread_id: &str,
        order: ListOrder,
    ) -> Result<Vec<ThreadMessage>, ConvertError> {
        let mut messages = self.thread_messages(thread_id);
        if order == ListOrder::Desc {
            messages.reverse();
        }
        Ok(messages)
    }
}

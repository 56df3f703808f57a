//! Convenience re-exports for common use.

pub use crate::agent::{AgentService, HttpAgentService};
pub use crate::batch::{Batch, BatchEvent, BatchEventSink, BatchOptions, BatchReport, JobFailure};
pub use crate::config::ConvertConfig;
pub use crate::convert::{Converter, PollSettings, RunResult};
pub use crate::error::{ConvertError, Result};
pub use crate::extract::extract;
pub use crate::language::{Language, LanguagePreset};
pub use crate::session::ConversationSession;
pub use crate::types::{HistoryScope, RunStatus};

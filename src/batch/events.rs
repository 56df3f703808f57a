//! Progress events and the final batch report.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::types::RunStatus;

/// Callback receiving progress events as the batch advances.
pub type BatchEventSink = Arc<dyn Fn(BatchEvent) + Send + Sync>;

/// Why one file produced no output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobFailure {
    #[error("run ended with status {status}: {message}")]
    RunFailed { status: RunStatus, message: String },

    #[error("no code could be extracted from the agent's response")]
    EmptyExtraction,

    #[error("{0}")]
    Error(String),
}

impl From<crate::error::ConvertError> for JobFailure {
    fn from(err: crate::error::ConvertError) -> Self {
        Self::Error(err.to_string())
    }
}

/// Events emitted while a batch runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    /// Discovery found nothing to convert; no session is opened.
    NoInputFiles { root: PathBuf },
    FilesDiscovered { root: PathBuf, count: usize },
    FileStarted {
        index: usize,
        total: usize,
        input: PathBuf,
    },
    FileConverted { input: PathBuf, output: PathBuf },
    FileFailed { input: PathBuf, reason: JobFailure },
    /// The session thread could not be deleted. Informational only.
    CleanupFailed { error: String },
    Completed {
        output_root: PathBuf,
        converted: usize,
        failed: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedFile {
    pub input: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedFile {
    pub input: PathBuf,
    pub reason: JobFailure,
}

/// What a batch did, file by file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub discovered: usize,
    pub converted: Vec<ConvertedFile>,
    pub failed: Vec<FailedFile>,
    /// Set when the session thread could not be deleted afterwards.
    pub cleanup_error: Option<String>,
}

impl BatchReport {
    /// True when every discovered file was converted.
    pub fn all_converted(&self) -> bool {
        self.failed.is_empty() && self.converted.len() == self.discovered
    }
}

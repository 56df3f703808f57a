//! Error classification and recovery.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    RateLimit,
    Network,
    Timeout,
    Server,
    Api,
    Configuration,
    Serialization,
    Filesystem,
    Unknown,
}

/// Structured details returned by the agent service in an error body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: Option<String>,
    pub request_id: Option<String>,
}

/// Suggested recovery action, printed alongside a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RecoverySuggestion {
    #[strum(to_string = "rerun later; the service is unavailable or throttling")]
    RerunLater,
    #[strum(to_string = "check CODEPORT_API_TOKEN and that it grants access to the project")]
    CheckCredentials,
    #[strum(to_string = "check the config file, CODEPORT_* variables and command-line flags")]
    CheckConfiguration,
    #[strum(to_string = "check that the input and output directories exist and are accessible")]
    CheckPaths,
    #[strum(to_string = "raise --poll-timeout-secs or CODEPORT_REQUEST_TIMEOUT_SECS")]
    IncreaseTimeout,
    #[strum(to_string = "rerun with RUST_LOG=debug and report the output")]
    ContactSupport,
}

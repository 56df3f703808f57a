//! Configuration system (layered: CLI > env > config file > defaults).

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;

use crate::agent::client::{DEFAULT_API_VERSION, DEFAULT_REQUEST_TIMEOUT};
use crate::convert::{PollSettings, DEFAULT_POLL_INTERVAL};
use crate::error::{ConvertError, Result};
use crate::language::{Language, LanguageSpec};
use crate::types::HistoryScope;

/// File name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "codeport.toml";

/// Shape of `codeport.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub endpoint: Option<String>,
    pub api_version: Option<String>,
    pub agent_id: Option<String>,
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub source_language: Option<String>,
    pub target_language: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub poll_timeout_secs: Option<u64>,
    pub history_scope: Option<HistoryScope>,
    pub request_timeout_secs: Option<u64>,
    pub languages: HashMap<String, LanguageSpec>,
}

/// Resolved settings for a conversion run.
#[derive(Clone, PartialEq)]
pub struct ConvertConfig {
    pub endpoint: Option<String>,
    /// Bearer token for the agent service. Obtaining it is up to the operator.
    pub api_token: Option<String>,
    pub api_version: String,
    pub agent_id: Option<String>,
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub source_language: String,
    pub target_language: String,
    pub poll_interval: Duration,
    pub poll_timeout: Option<Duration>,
    pub history_scope: HistoryScope,
    pub request_timeout: Duration,
    pub languages: HashMap<String, LanguageSpec>,
}

impl fmt::Debug for ConvertConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertConfig")
            .field("endpoint", &self.endpoint)
            .field("api_token", &self.api_token.as_ref().map(|_| ".."))
            .field("api_version", &self.api_version)
            .field("agent_id", &self.agent_id)
            .field("input_dir", &self.input_dir)
            .field("output_dir", &self.output_dir)
            .field("source_language", &self.source_language)
            .field("target_language", &self.target_language)
            .field("poll_interval", &self.poll_interval)
            .field("poll_timeout", &self.poll_timeout)
            .field("history_scope", &self.history_scope)
            .field("request_timeout", &self.request_timeout)
            .field("languages", &self.languages)
            .finish()
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_token: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            agent_id: None,
            input_dir: None,
            output_dir: None,
            source_language: "scala".to_string(),
            target_language: "java".to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_timeout: None,
            history_scope: HistoryScope::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            languages: HashMap::new(),
        }
    }
}

impl ConvertConfig {
    /// Defaults, then the config file, then the process environment (with
    /// `.env` loaded if present).
    ///
    /// An explicit `path` must exist; otherwise `./codeport.toml` and the
    /// platform config file are used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv();
        let mut config = Self::default();
        if let Some(file) = Self::locate_file(path)? {
            config.apply_file(Self::read_file(&file)?);
        }
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Platform config file, e.g. `~/.config/codeport/config.toml`.
    pub fn default_file() -> Option<PathBuf> {
        ProjectDirs::from("dev", "codeport", "codeport")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    fn locate_file(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ConvertError::Configuration(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Ok(Some(path.to_path_buf()));
        }
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Ok(Some(local));
        }
        Ok(Self::default_file().filter(|p| p.is_file()))
    }

    pub fn read_file(path: &Path) -> Result<FileConfig> {
        let raw = std::fs::read_to_string(path)?;
        Self::parse_file(&raw).map_err(|err| match err {
            ConvertError::Configuration(msg) => {
                ConvertError::Configuration(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    pub fn parse_file(raw: &str) -> Result<FileConfig> {
        toml::from_str(raw).map_err(|e| ConvertError::Configuration(e.to_string()))
    }

    pub fn apply_file(&mut self, file: FileConfig) {
        if file.endpoint.is_some() {
            self.endpoint = file.endpoint;
        }
        if let Some(version) = file.api_version {
            self.api_version = version;
        }
        if file.agent_id.is_some() {
            self.agent_id = file.agent_id;
        }
        if file.input_dir.is_some() {
            self.input_dir = file.input_dir;
        }
        if file.output_dir.is_some() {
            self.output_dir = file.output_dir;
        }
        if let Some(lang) = file.source_language {
            self.source_language = lang;
        }
        if let Some(lang) = file.target_language {
            self.target_language = lang;
        }
        if let Some(ms) = file.poll_interval_ms {
            self.poll_interval = Duration::from_millis(ms);
        }
        if let Some(secs) = file.poll_timeout_secs {
            self.poll_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(scope) = file.history_scope {
            self.history_scope = scope;
        }
        if let Some(secs) = file.request_timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }
        for (name, spec) in file.languages {
            self.languages.insert(name.to_ascii_lowercase(), spec);
        }
    }

    /// Overlay values from an environment lookup. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("CODEPORT_ENDPOINT") {
            self.endpoint = Some(v);
        }
        if let Some(v) = get("CODEPORT_API_TOKEN") {
            self.api_token = Some(v);
        }
        if let Some(v) = get("CODEPORT_API_VERSION") {
            self.api_version = v;
        }
        if let Some(v) = get("CODEPORT_AGENT_ID") {
            self.agent_id = Some(v);
        }
        if let Some(v) = get("CODEPORT_INPUT_DIR") {
            self.input_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = get("CODEPORT_OUTPUT_DIR") {
            self.output_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = get("CODEPORT_SOURCE_LANGUAGE") {
            self.source_language = v;
        }
        if let Some(v) = get("CODEPORT_TARGET_LANGUAGE") {
            self.target_language = v;
        }
        if let Some(v) = get("CODEPORT_POLL_INTERVAL_MS") {
            self.poll_interval = Duration::from_millis(parse_number("CODEPORT_POLL_INTERVAL_MS", &v)?);
        }
        if let Some(v) = get("CODEPORT_POLL_TIMEOUT_SECS") {
            self.poll_timeout = Some(Duration::from_secs(parse_number(
                "CODEPORT_POLL_TIMEOUT_SECS",
                &v,
            )?));
        }
        if let Some(v) = get("CODEPORT_HISTORY_SCOPE") {
            self.history_scope = v.parse().map_err(|_| {
                ConvertError::Configuration(format!(
                    "CODEPORT_HISTORY_SCOPE must be 'thread' or 'latest-message', got '{v}'"
                ))
            })?;
        }
        if let Some(v) = get("CODEPORT_REQUEST_TIMEOUT_SECS") {
            self.request_timeout = Duration::from_secs(parse_number(
                "CODEPORT_REQUEST_TIMEOUT_SECS",
                &v,
            )?);
        }
        Ok(())
    }

    pub fn source_language(&self) -> Result<Language> {
        Language::resolve(&self.source_language, &self.languages)
    }

    pub fn target_language(&self) -> Result<Language> {
        Language::resolve(&self.target_language, &self.languages)
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: self.poll_interval,
            timeout: self.poll_timeout,
        }
    }

    /// Check everything a conversion run needs before any remote call.
    pub fn validate(&self) -> Result<()> {
        let missing = |value: &Option<String>| value.as_deref().map_or(true, |v| v.trim().is_empty());
        let missing_path = |value: &Option<PathBuf>| {
            value
                .as_deref()
                .map_or(true, |p| p.as_os_str().to_string_lossy().trim().is_empty())
        };

        if missing_path(&self.input_dir) || missing_path(&self.output_dir) {
            return Err(ConvertError::Configuration(
                "Please set both the input directory and the output directory".into(),
            ));
        }
        if missing(&self.agent_id) {
            return Err(ConvertError::Configuration(
                "Missing agent id (--agent or CODEPORT_AGENT_ID)".into(),
            ));
        }
        if missing(&self.endpoint) {
            return Err(ConvertError::Configuration(
                "Missing service endpoint (--endpoint or CODEPORT_ENDPOINT)".into(),
            ));
        }
        if missing(&self.api_token) {
            return Err(ConvertError::Authentication(
                "Missing CODEPORT_API_TOKEN".into(),
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(ConvertError::Configuration(
                "Poll interval must be greater than zero".into(),
            ));
        }
        self.source_language()?;
        self.target_language()?;
        Ok(())
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value.trim().parse().map_err(|_| {
        ConvertError::Configuration(format!("{key} must be a non-negative integer, got '{value}'"))
    })
}

//! Command-line interface.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::config::ConvertConfig;
use crate::types::HistoryScope;

/// codeport CLI
#[derive(Parser, Debug)]
#[command(
    name = "codeport",
    version,
    about = "Batch-convert source files between languages with a hosted agent"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert every matching file under the input directory
    Convert(ConvertArgs),
    /// List built-in language presets
    Languages,
}

/// Arguments for `codeport convert`. Anything left unset falls back to the
/// environment and then the config file.
#[derive(Parser, Debug, Default)]
pub struct ConvertArgs {
    /// Directory holding the source files (searched recursively)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Directory the converted files are written to
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Id of the existing agent that performs the conversion
    #[arg(short, long)]
    pub agent: Option<String>,

    /// Project endpoint of the agent service
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Source language (e.g. scala)
    #[arg(long)]
    pub from: Option<String>,

    /// Target language (e.g. java)
    #[arg(long)]
    pub to: Option<String>,

    /// Delay between run status checks, in milliseconds
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Give up on a single run after this many seconds
    #[arg(long)]
    pub poll_timeout_secs: Option<u64>,

    /// What the agent sees on each run: thread or latest-message
    #[arg(long)]
    pub history_scope: Option<HistoryScope>,

    /// Config file (defaults to ./codeport.toml, then the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// List the files that would be converted and where they would go
    #[arg(long)]
    pub dry_run: bool,
}

impl ConvertArgs {
    /// Overlay flags onto a loaded configuration.
    pub fn apply(&self, config: &mut ConvertConfig) {
        if let Some(input) = &self.input {
            config.input_dir = Some(input.clone());
        }
        if let Some(output) = &self.output {
            config.output_dir = Some(output.clone());
        }
        if let Some(agent) = &self.agent {
            config.agent_id = Some(agent.clone());
        }
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = Some(endpoint.clone());
        }
        if let Some(from) = &self.from {
            config.source_language = from.clone();
        }
        if let Some(to) = &self.to {
            config.target_language = to.clone();
        }
        if let Some(ms) = self.poll_interval_ms {
            config.poll_interval = Duration::from_millis(ms);
        }
        if let Some(secs) = self.poll_timeout_secs {
            config.poll_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(scope) = self.history_scope {
            config.history_scope = scope;
        }
    }
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

//! Batch orchestration: discover, convert sequentially in one session, write.

pub mod events;
pub mod job;

pub use events::{
    BatchEvent, BatchEventSink, BatchReport, ConvertedFile, FailedFile, JobFailure,
};
pub use job::{discover, ConversionJob};

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::agent::AgentService;
use crate::config::ConvertConfig;
use crate::convert::{Converter, PollSettings};
use crate::error::{ConvertError, Result};
use crate::extract::extract;
use crate::language::Language;
use crate::session::ConversationSession;
use crate::types::HistoryScope;

/// Everything one batch needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    pub agent_id: String,
    pub source: Language,
    pub target: Language,
    pub poll: PollSettings,
    pub history_scope: HistoryScope,
}

impl BatchOptions {
    pub fn from_config(config: &ConvertConfig) -> Result<Self> {
        Ok(Self {
            input_root: config.input_dir.clone().unwrap_or_default(),
            output_root: config.output_dir.clone().unwrap_or_default(),
            agent_id: config.agent_id.clone().unwrap_or_default(),
            source: config.source_language()?,
            target: config.target_language()?,
            poll: config.poll_settings(),
            history_scope: config.history_scope,
        })
    }

    fn validate_paths(&self) -> Result<()> {
        if is_blank(&self.input_root) || is_blank(&self.output_root) {
            return Err(ConvertError::Configuration(
                "Both an input directory and an output directory must be set".into(),
            ));
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        self.validate_paths()?;
        if self.agent_id.trim().is_empty() {
            return Err(ConvertError::Configuration("An agent id must be set".into()));
        }
        if self.poll.interval.is_zero() {
            return Err(ConvertError::Configuration(
                "Poll interval must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

fn is_blank(path: &Path) -> bool {
    path.as_os_str().to_string_lossy().trim().is_empty()
}

/// Converts every matching file under an input root through one agent session.
pub struct Batch {
    options: BatchOptions,
    event_sink: Option<BatchEventSink>,
}

impl Batch {
    pub fn new(options: BatchOptions) -> Self {
        Self {
            options,
            event_sink: None,
        }
    }

    pub fn with_event_sink(mut self, sink: BatchEventSink) -> Self {
        self.event_sink = Some(sink);
        self
    }

    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    fn emit(&self, event: BatchEvent) {
        if let Some(sink) = &self.event_sink {
            sink(event);
        }
    }

    /// Discover the jobs this batch would run, without touching the service
    /// or the output directory.
    pub fn plan(&self) -> Result<Vec<ConversionJob>> {
        self.options.validate_paths()?;
        let opts = &self.options;
        discover(&opts.input_root, &opts.source)?
            .into_iter()
            .map(|input| ConversionJob::new(&opts.input_root, &opts.output_root, input, &opts.target))
            .collect()
    }

    /// Run the batch.
    ///
    /// Returns `Err` only for failures outside a single file: bad
    /// configuration, discovery, or opening the session. Per-file failures
    /// land in the report and never stop the remaining files.
    pub async fn run<S>(&self, service: &S) -> Result<BatchReport>
    where
        S: AgentService + ?Sized,
    {
        let opts = &self.options;
        opts.validate()?;

        tokio::fs::create_dir_all(&opts.output_root).await?;

        let jobs = self.plan()?;
        let mut report = BatchReport {
            discovered: jobs.len(),
            ..Default::default()
        };

        if jobs.is_empty() {
            info!(root = %opts.input_root.display(), "no input files");
            self.emit(BatchEvent::NoInputFiles {
                root: opts.input_root.clone(),
            });
            return Ok(report);
        }

        info!(count = jobs.len(), "starting batch");
        self.emit(BatchEvent::FilesDiscovered {
            root: opts.input_root.clone(),
            count: jobs.len(),
        });

        let session = ConversationSession::open(service, &opts.agent_id).await?;
        let converter = Converter::new(service, opts.source.clone(), opts.target.clone())
            .with_poll_settings(opts.poll)
            .with_history_scope(opts.history_scope);

        let total = jobs.len();
        for (index, job) in jobs.into_iter().enumerate() {
            self.emit(BatchEvent::FileStarted {
                index: index + 1,
                total,
                input: job.input().to_path_buf(),
            });

            match self.process(&converter, &session, &job).await {
                Ok(()) => {
                    self.emit(BatchEvent::FileConverted {
                        input: job.input().to_path_buf(),
                        output: job.output().to_path_buf(),
                    });
                    report.converted.push(ConvertedFile {
                        input: job.input().to_path_buf(),
                        output: job.output().to_path_buf(),
                    });
                }
                Err(reason) => {
                    warn!(file = %job.input().display(), %reason, "conversion failed");
                    self.emit(BatchEvent::FileFailed {
                        input: job.input().to_path_buf(),
                        reason: reason.clone(),
                    });
                    report.failed.push(FailedFile {
                        input: job.input().to_path_buf(),
                        reason,
                    });
                }
            }
        }

        if let Some(err) = session.close(service).await {
            let error = err.to_string();
            self.emit(BatchEvent::CleanupFailed {
                error: error.clone(),
            });
            report.cleanup_error = Some(error);
        }

        info!(
            converted = report.converted.len(),
            failed = report.failed.len(),
            "batch finished"
        );
        self.emit(BatchEvent::Completed {
            output_root: opts.output_root.clone(),
            converted: report.converted.len(),
            failed: report.failed.len(),
        });
        Ok(report)
    }

    async fn process<S>(
        &self,
        converter: &Converter<'_, S>,
        session: &ConversationSession,
        job: &ConversionJob,
    ) -> std::result::Result<(), JobFailure>
    where
        S: AgentService + ?Sized,
    {
        let source = job.load_source().await?;
        let result = converter.convert(session, &source, &job.label()).await?;

        if !result.is_success() {
            return Err(JobFailure::RunFailed {
                status: result.run.status,
                message: result.run.error.unwrap_or_default(),
            });
        }

        let code = extract(result.response.as_deref().unwrap_or_default(), &converter.target().fence);
        if code.is_empty() {
            return Err(JobFailure::EmptyExtraction);
        }

        job.write_output(&code).await?;
        Ok(())
    }
}

//! Input discovery and per-file jobs.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::warn;

use crate::error::{ConvertError, Result};
use crate::language::Language;

/// One source file and where its conversion lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    input: PathBuf,
    relative: PathBuf,
    output: PathBuf,
}

impl ConversionJob {
    /// Map `input` (somewhere under `input_root`) to the same relative
    /// location under `output_root`, with the target extension.
    pub fn new(input_root: &Path, output_root: &Path, input: PathBuf, target: &Language) -> Result<Self> {
        let relative = input
            .strip_prefix(input_root)
            .map_err(|_| {
                ConvertError::InvalidArgument(format!(
                    "{} is not under {}",
                    input.display(),
                    input_root.display()
                ))
            })?
            .to_path_buf();
        if relative.file_name().is_none() {
            return Err(ConvertError::InvalidArgument(format!(
                "{} does not name a file",
                input.display()
            )));
        }
        let output = output_root.join(relative.with_extension(&target.extension));
        Ok(Self {
            input,
            relative,
            output,
        })
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Path relative to the input root.
    pub fn relative(&self) -> &Path {
        &self.relative
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// File name shown to the agent and the operator.
    pub fn label(&self) -> String {
        self.input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.input.display().to_string())
    }

    pub async fn load_source(&self) -> Result<String> {
        Ok(tokio::fs::read_to_string(&self.input).await?)
    }

    /// Write the converted text, creating parent directories. Overwrites.
    pub async fn write_output(&self, text: &str) -> Result<()> {
        if let Some(parent) = self.output.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.output, text).await?;
        Ok(())
    }
}

/// Every file under `root` (recursively) with the source language's extension,
/// sorted by path.
///
/// Hidden files and ignore files are not filtered; everything the filesystem
/// lists is a candidate. Symlinks are followed and keep their path under
/// `root`. Unreadable entries and link loops are logged and skipped.
pub fn discover(root: &Path, source: &Language) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(ConvertError::Configuration(format!(
            "Input directory does not exist: {}",
            root.display()
        )));
    }

    let mut builder = WalkBuilder::new(root);
    builder.standard_filters(false);
    builder.follow_links(true);

    let mut files = Vec::new();
    for entry in builder.build() {
        match entry {
            Ok(entry) => {
                if !entry
                    .file_type()
                    .map(|file_type| file_type.is_file())
                    .unwrap_or(false)
                {
                    continue;
                }
                if source.matches(entry.path()) {
                    files.push(entry.into_path());
                }
            }
            Err(error) => {
                warn!(root = %root.display(), %error, "skipping unreadable entry");
            }
        }
    }

    files.sort();
    Ok(files)
}

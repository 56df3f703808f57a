//! codeport: batch source conversion through a hosted agent.
//!
//! Files matching a source language under an input directory are sent, one at
//! a time, to an existing agent on a hosted agent service. Each reply is
//! reduced to its fenced code block and written under the output directory at
//! the same relative path with the target language's extension.
//!
//! # Quick Start
//!
//! ```no_run
//! use codeport::prelude::*;
//!
//! # async fn example() -> codeport::error::Result<()> {
//! let config = ConvertConfig::load(None)?;
//! let service = HttpAgentService::from_config(&config)?;
//! let report = Batch::new(BatchOptions::from_config(&config)?)
//!     .run(&service)
//!     .await?;
//! println!("{} converted, {} failed", report.converted.len(), report.failed.len());
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod batch;
pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod extract;
pub mod language;
pub mod prelude;
pub mod session;
pub mod types;
pub mod util;

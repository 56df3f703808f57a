//! codeport CLI binary entry point.

use std::error::Error;
use std::sync::Arc;

use codeport::agent::HttpAgentService;
use codeport::batch::{Batch, BatchEvent, BatchOptions};
use codeport::cli::{Cli, Commands, ConvertArgs};
use codeport::config::ConvertConfig;
use codeport::error::ConvertError;
use codeport::language::LanguagePreset;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Convert(args) => handle_convert(args).await,
        Commands::Languages => {
            handle_languages();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Fatal error: {e}");
        eprintln!("Trace: {e:?}");
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = cause.source();
        }
        eprintln!("Hint: {}", e.recovery_suggestion());
        std::process::exit(1);
    }
}

async fn handle_convert(args: ConvertArgs) -> Result<(), ConvertError> {
    let mut config = ConvertConfig::load(args.config.as_deref())?;
    args.apply(&mut config);

    let source = config.source_language()?;
    let target = config.target_language()?;
    println!(
        "=== {} to {} Converter ===",
        source.display_name, target.display_name
    );

    if args.dry_run {
        let batch = Batch::new(BatchOptions::from_config(&config)?);
        let jobs = batch.plan()?;
        if jobs.is_empty() {
            println!("No {} files found.", source.display_name);
        }
        for job in jobs {
            println!("{} → {}", job.input().display(), job.output().display());
        }
        return Ok(());
    }

    config.validate()?;
    let service = HttpAgentService::from_config(&config)?;
    let batch = Batch::new(BatchOptions::from_config(&config)?).with_event_sink(Arc::new(print_event));
    let report = batch.run(&service).await?;

    if !report.failed.is_empty() {
        println!("{} of {} files failed.", report.failed.len(), report.discovered);
    }
    Ok(())
}

fn print_event(event: BatchEvent) {
    match event {
        BatchEvent::NoInputFiles { root } => {
            println!("No matching files found in directory: {}", root.display());
        }
        BatchEvent::FilesDiscovered { count, .. } => {
            println!("Found {count} files to convert.");
        }
        BatchEvent::FileStarted {
            index,
            total,
            input,
        } => {
            println!("[{index}/{total}] Processing: {}", file_name(&input));
        }
        BatchEvent::FileConverted { input, output } => {
            println!("✅ Converted: {} → {}", file_name(&input), output.display());
        }
        BatchEvent::FileFailed { input, reason } => {
            println!("❌ {}: {reason}", file_name(&input));
        }
        BatchEvent::CleanupFailed { error } => {
            println!("Warning: Could not delete thread: {error}");
        }
        BatchEvent::Completed {
            output_root,
            converted,
            failed,
        } => {
            println!(
                "\n🎉 Conversion completed! {converted} converted, {failed} failed. Check output directory: {}",
                output_root.display()
            );
        }
    }
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn handle_languages() {
    for lang in LanguagePreset::all() {
        println!(
            "{:<12} .{:<8} {}",
            lang.name, lang.extension, lang.display_name
        );
    }
}

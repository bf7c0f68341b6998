//! Main organize command

use crate::engine::{MessageSink, Organizer, ProgressUpdate};
use crate::report::RunReport;
use crate::types::{OrganizeError, SkipReason, SkippedFile};
use crate::ui::ProgressReporter;
use crate::Config;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Run the organize operation.
///
/// The engine runs on a blocking worker; Ctrl-C turns into a stop request
/// so the run ends after the file it is copying.
pub fn run(config: Config) -> Result<RunReport, OrganizeError> {
    let reporter = Arc::new(if config.quiet {
        ProgressReporter::hidden(config.verbose)
    } else {
        ProgressReporter::new(config.verbose)
    });

    let progress = {
        let reporter = Arc::clone(&reporter);
        Box::new(move |update: &ProgressUpdate| reporter.update(update))
    };
    let sink: Arc<dyn MessageSink> = reporter.clone();

    let mut organizer = Organizer::new(&config.source, &config.destination)
        .with_scan_options(config.scan.clone())
        .with_progress(progress)
        .with_sink(sink);
    let stop = organizer.stop_handle();

    tracing::debug!(
        source = %config.source.display(),
        destination = %config.destination.display(),
        excludes = config.scan.exclude_patterns.len(),
        "starting organize"
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let report = runtime.block_on(async {
        let mut worker = tokio::task::spawn_blocking(move || organizer.run());

        tokio::select! {
            joined = &mut worker => joined,
            signal = tokio::signal::ctrl_c() => {
                match signal {
                    Ok(()) => {
                        reporter.warn("Interrupted, finishing the current file");
                        stop.request_stop();
                    }
                    Err(e) => reporter.warn(&format!("Cannot listen for Ctrl-C: {}", e)),
                }
                worker.await
            }
        }
    });

    let report = report
        .map_err(|e| OrganizeError::Io(std::io::Error::other(format!("Worker failed: {}", e))))??;

    tracing::info!(
        outcome = ?report.outcome,
        processed = report.processed_count(),
        skipped = report.skipped_count(),
        bytes = report.total_bytes,
        "organize finished"
    );

    let failures: Vec<&SkippedFile> = report
        .skipped
        .iter()
        .filter(|s| !s.is_duplicate())
        .collect();
    if !failures.is_empty() {
        eprintln!("{}", format_failure_summary(&failures));
    }

    if let Some(path) = &config.report_path {
        report.write_json(path)?;
        reporter.info(&format!("Report written to {}", path.display()));
    }

    Ok(report)
}

/// Group failed files by error kind, showing a few of each
fn format_failure_summary(failures: &[&SkippedFile]) -> String {
    let mut groups: BTreeMap<&str, Vec<(&SkippedFile, &str)>> = BTreeMap::new();
    for skipped in failures {
        if let SkipReason::Failed { kind, message } = &skipped.reason {
            groups
                .entry(kind.as_str())
                .or_default()
                .push((skipped, message.as_str()));
        }
    }

    let mut lines = Vec::new();
    lines.push("Failure summary:".to_string());
    for (kind, items) in groups {
        lines.push(format!("  {} ({}):", kind, items.len()));
        for (skipped, message) in items.iter().take(3) {
            lines.push(format!("    - {}", message));
            lines.push(format!("      Path: {}", skipped.source.display()));
            if let Some(hint) = suggestion(kind) {
                lines.push(format!("      Try: {}", hint));
            }
        }
        if items.len() > 3 {
            lines.push(format!("    - ... {} more", items.len() - 3));
        }
    }
    lines.join("\n")
}

fn suggestion(kind: &str) -> Option<&'static str> {
    match kind {
        "Permission denied" => {
            Some("Check file permissions or run with a user that has access.")
        }
        "Disk full" => Some("Free disk space on the destination and run again."),
        "I/O error" => Some("Run again; files already copied are skipped as duplicates."),
        _ => None,
    }
}

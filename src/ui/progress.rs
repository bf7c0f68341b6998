//! Progress reporting

use crate::engine::{MessageLevel, MessageSink, Phase, ProgressUpdate};
use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Terminal progress for an organize run.
///
/// Doubles as the run's [`MessageSink`]: warnings and errors are printed
/// above the bars, info and debug lines only at higher verbosity.
pub struct ProgressReporter {
    multi: MultiProgress,
    scan_bar: ProgressBar,
    process_bar: ProgressBar,
    verbose: u8,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new(verbose: u8) -> Self {
        Self::with_target(ProgressDrawTarget::stderr(), verbose)
    }

    /// Reporter that draws nothing but still tracks positions
    pub fn hidden(verbose: u8) -> Self {
        Self::with_target(ProgressDrawTarget::hidden(), verbose)
    }

    fn with_target(target: ProgressDrawTarget, verbose: u8) -> Self {
        let multi = MultiProgress::with_draw_target(target);

        let scan_bar = multi.add(ProgressBar::new(0));
        if let Ok(style) = ProgressStyle::with_template("{spinner} Scanning {pos}/{len} {wide_msg}") {
            scan_bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }

        let process_bar = multi.add(ProgressBar::new(0));
        if let Ok(style) =
            ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} files | {wide_msg}")
        {
            process_bar.set_style(style.progress_chars("=>-"));
        }

        Self {
            multi,
            scan_bar,
            process_bar,
            verbose,
        }
    }

    /// Apply one engine update to the bars.
    pub fn update(&self, update: &ProgressUpdate) {
        match update.phase {
            Phase::Scanning => {
                self.scan_bar.set_length(update.total as u64);
                self.scan_bar.set_position(update.current as u64);
                self.scan_bar.set_message(update.label.clone());
            }
            Phase::Processing => {
                if !self.scan_bar.is_finished() {
                    let seen = self.scan_bar.length().unwrap_or(0);
                    self.scan_bar
                        .finish_with_message(format!("done, {} entries", seen));
                }
                self.process_bar.set_length(update.total as u64);
                self.process_bar.set_position(update.current as u64);
                self.process_bar.set_message(update.label.clone());
            }
            Phase::Completed | Phase::Cancelled => {
                if !self.scan_bar.is_finished() {
                    self.scan_bar.finish();
                }
                self.process_bar.set_length(update.total as u64);
                self.process_bar.set_position(update.current as u64);
                self.process_bar.finish_with_message(update.label.clone());
            }
        }
    }

    /// Current `(position, length)` of the processing bar
    pub fn processing_position(&self) -> (u64, u64) {
        (
            self.process_bar.position(),
            self.process_bar.length().unwrap_or(0),
        )
    }

    fn wants(&self, level: MessageLevel) -> bool {
        match level {
            MessageLevel::Warn | MessageLevel::Error => true,
            MessageLevel::Info => self.verbose >= 1,
            MessageLevel::Debug => self.verbose >= 2,
        }
    }

    fn format_line(level: MessageLevel, text: &str) -> String {
        match level {
            MessageLevel::Error => format!("{} {}", style("ERROR").red().bold(), text),
            MessageLevel::Warn => format!("{} {}", style("WARN").yellow(), text),
            MessageLevel::Info => text.to_string(),
            MessageLevel::Debug => style(text).dim().to_string(),
        }
    }
}

impl MessageSink for ProgressReporter {
    fn message(&self, level: MessageLevel, text: &str) {
        if !self.wants(level) {
            return;
        }
        let line = Self::format_line(level, text);
        // a hidden target swallows println; quiet runs still need their warnings
        if self.multi.is_hidden() || self.multi.println(&line).is_err() {
            eprintln!("{}", line);
        }
    }
}

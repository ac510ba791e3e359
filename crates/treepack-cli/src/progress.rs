//! Spinner and per-file echo for packaging runs.

use crate::output::OutputFormatter;
use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use std::time::Duration;
use treepack_core::ProgressCallback;
use treepack_core::RelativePath;

/// CLI progress reporter implementing `ProgressCallback`.
///
/// Hands each entry to the formatter as it is added, records the entry
/// names for the final report, and drives a spinner when running in a TTY.
/// The total is unknown up front, so no bar or ETA is shown.
pub struct CliProgress<'a> {
    formatter: &'a dyn OutputFormatter,
    bar: Option<ProgressBar>,
    entries: Vec<String>,
    bytes_written: u64,
}

impl<'a> CliProgress<'a> {
    /// Creates a reporter, with a spinner if `show_spinner` is set.
    #[must_use]
    pub fn new(formatter: &'a dyn OutputFormatter, show_spinner: bool) -> Self {
        let bar = show_spinner.then(|| {
            let bar = ProgressBar::new_spinner();
            // Template: "⠋ Packaging 42 files (15.2 MB) GameData/Mod/icon.png"
            bar.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.cyan} Packaging {pos} files {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        });

        Self {
            formatter,
            bar,
            entries: Vec::new(),
            bytes_written: 0,
        }
    }

    /// Checks if we should show a spinner (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stdout().is_term()
    }

    /// Entry names in the order they were added.
    pub fn into_entries(mut self) -> Vec<String> {
        std::mem::take(&mut self.entries)
    }
}

impl Drop for CliProgress<'_> {
    fn drop(&mut self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl ProgressCallback for CliProgress<'_> {
    fn on_entry_start(&mut self, path: &RelativePath, _current: usize) {
        self.entries.push(path.as_str().to_string());
        match &self.bar {
            Some(bar) => {
                bar.suspend(|| self.formatter.format_entry(path));
                bar.set_message(format!("({}) {path}", humanize_bytes(self.bytes_written)));
            }
            None => self.formatter.format_entry(path),
        }
    }

    fn on_bytes_written(&mut self, bytes: u64) {
        self.bytes_written += bytes;
    }

    fn on_entry_complete(&mut self, _path: &RelativePath) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    fn on_complete(&mut self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

/// Converts bytes to human-readable format (KB, MB, GB, TB).
fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.1} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

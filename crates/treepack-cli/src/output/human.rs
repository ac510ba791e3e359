//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use std::path::Path;
use treepack_core::PackEntry;
use treepack_core::PackReport;
use treepack_core::RelativePath;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        let mut count = 0;

        for c in s.chars().rev() {
            if count == 3 {
                result.push(',');
                count = 0;
            }
            result.push(c);
            count += 1;
        }

        result.chars().rev().collect()
    }

    fn write_heading(&self, mark: &str, text: &str) {
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {text}", style(mark).green().bold()));
        } else {
            let _ = self.term.write_line(text);
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_entry(&self, path: &RelativePath) {
        if self.quiet {
            return;
        }
        let _ = self.term.write_line(path.as_str());
    }

    fn format_pack_result(&self, report: &PackReport, _entries: &[String]) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let _ = self.term.write_line("");
        self.write_heading(
            "✓",
            &format!("Archive created: {}", report.output_path.display()),
        );

        let _ = self.term.write_line("");
        let _ = self.term.write_line(&format!(
            "  Files added:      {}",
            Self::format_number(report.files_added)
        ));
        let _ = self.term.write_line(&format!(
            "  Total size:       {}",
            Self::format_size(report.bytes_read)
        ));
        let _ = self.term.write_line(&format!(
            "  Archive size:     {}",
            Self::format_size(report.archive_size)
        ));
        if report.bytes_read > 0 {
            let _ = self.term.write_line(&format!(
                "  Compression:      {:.1}%",
                report.compression_percentage()
            ));
        }

        if self.verbose {
            let _ = self.term.write_line(&format!(
                "  Replaced previous: {}",
                if report.replaced_existing { "yes" } else { "no" }
            ));
            let _ = self
                .term
                .write_line(&format!("  Duration:         {:?}", report.duration));
        }

        if report.has_warnings() {
            let _ = self.term.write_line("");
            if self.use_colors {
                let _ = self
                    .term
                    .write_line(&format!("{}", style("Warnings:").yellow().bold()));
            } else {
                let _ = self.term.write_line("Warnings:");
            }
            for warning in &report.warnings {
                let _ = self.term.write_line(&format!("  - {warning}"));
            }
        }

        Ok(())
    }

    fn format_dry_run(&self, output_path: &Path, entries: &[PackEntry]) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for entry in entries {
            if self.verbose {
                let _ = self.term.write_line(&format!(
                    "{:>10}  {}",
                    Self::format_size(entry.size),
                    entry.relative
                ));
            } else {
                let _ = self.term.write_line(entry.relative.as_str());
            }
        }

        let total: u64 = entries.iter().map(|e| e.size).sum();
        let _ = self.term.write_line("");
        self.write_heading(
            "•",
            &format!(
                "Dry run: {} files ({}) would be packaged into {}",
                Self::format_number(entries.len()),
                Self::format_size(total),
                output_path.display()
            ),
        );

        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        let term = Term::stderr();
        if self.use_colors {
            let _ = term.write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = term.write_line(&format!("ERROR: {error:?}"));
        }
    }
}

//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;
use treepack_core::PackEntry;
use treepack_core::PackReport;
use treepack_core::RelativePath;

pub struct JsonFormatter;

#[derive(Serialize)]
struct PackOutput<'a> {
    output_path: String,
    files_added: usize,
    bytes_read: u64,
    archive_size: u64,
    compression_ratio: f64,
    compression_percentage: f64,
    replaced_existing: bool,
    duration_ms: u128,
    warnings: &'a [String],
    entries: &'a [String],
}

impl<'a> PackOutput<'a> {
    fn new(report: &'a PackReport, entries: &'a [String]) -> Self {
        Self {
            output_path: report.output_path.display().to_string(),
            files_added: report.files_added,
            bytes_read: report.bytes_read,
            archive_size: report.archive_size,
            compression_ratio: report.compression_ratio(),
            compression_percentage: report.compression_percentage(),
            replaced_existing: report.replaced_existing,
            duration_ms: report.duration.as_millis(),
            warnings: &report.warnings,
            entries,
        }
    }
}

#[derive(Serialize)]
struct DryRunEntry<'a> {
    path: &'a str,
    size: u64,
}

#[derive(Serialize)]
struct DryRunOutput<'a> {
    dry_run: bool,
    output_path: String,
    files: usize,
    total_size: u64,
    entries: Vec<DryRunEntry<'a>>,
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_entry(&self, _path: &RelativePath) {}

    fn format_pack_result(&self, report: &PackReport, entries: &[String]) -> Result<()> {
        Self::output(&JsonOutput::success("pack", PackOutput::new(report, entries)))
    }

    fn format_dry_run(&self, output_path: &Path, entries: &[PackEntry]) -> Result<()> {
        let data = DryRunOutput {
            dry_run: true,
            output_path: output_path.display().to_string(),
            files: entries.len(),
            total_size: entries.iter().map(|e| e.size).sum(),
            entries: entries
                .iter()
                .map(|e| DryRunEntry {
                    path: e.relative.as_str(),
                    size: e.size,
                })
                .collect(),
        };

        Self::output(&JsonOutput::success("pack", data))
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::error("pack", format!("{error:#}"));
        let _ = Self::output(&output);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_pack_output_fields() {
        let mut report = PackReport::new();
        report.output_path = PathBuf::from("/build/Mod/Mod.zip");
        report.files_added = 2;
        report.bytes_read = 100;
        report.archive_size = 50;
        report.add_warning("a.txt changed size");
        let entries = vec!["a.txt".to_string(), "sub/c.txt".to_string()];

        let json = serde_json::to_value(JsonOutput::success(
            "pack",
            PackOutput::new(&report, &entries),
        ))
        .unwrap();

        assert_eq!(json["operation"], "pack");
        assert_eq!(json["data"]["files_added"], 2);
        assert_eq!(json["data"]["compression_ratio"], 2.0);
        assert_eq!(json["data"]["entries"][1], "sub/c.txt");
        assert_eq!(json["data"]["warnings"][0], "a.txt changed size");
    }
}

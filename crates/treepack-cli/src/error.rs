//! Error conversion utilities for CLI.
//!
//! Converts treepack-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use std::path::Path;
use treepack_core::PackError;

/// Converts `PackError` to user-friendly anyhow error with context
pub fn convert_pack_error(err: PackError, output: &Path) -> anyhow::Error {
    match err {
        PackError::SourceNotFound { path } => {
            anyhow!(
                "Source directory not found: {}\n\
                 HINT: Pass the directory to package as SOURCE, or run from the packaging root.",
                path.display()
            )
        }
        PackError::SourceNotDirectory { path } => {
            anyhow!(
                "Source is not a directory: {}\n\
                 HINT: SOURCE must be a directory; single files are not packaged on their own.",
                path.display()
            )
        }
        PackError::SourceOutsideRoot {
            source_root,
            packaging_root,
        } => {
            anyhow!(
                "Source '{}' is not inside packaging root '{}'\n\
                 HINT: Entry names are relative to the root. Use --root to pick a parent of SOURCE.",
                source_root.display(),
                packaging_root.display()
            )
        }
        PackError::InvalidPattern { pattern, reason } => {
            anyhow!(
                "Invalid exclude pattern '{pattern}': {reason}\n\
                 HINT: Patterns are globs such as '*.pdb', 'Backups' or '/Thumbs.db'."
            )
        }
        PackError::OutputIsDirectory { path } => {
            anyhow!(
                "Output path is a directory: {}\n\
                 HINT: Use --output with a file path, e.g. --output dist/Mod.zip.",
                path.display()
            )
        }
        PackError::RemoveOutput { path, source } => {
            anyhow!(
                "Cannot remove previous archive '{}': {source}\n\
                 HINT: Close any program holding the archive open and try again.",
                path.display()
            )
        }
        PackError::OutputExists { path } => {
            anyhow!(
                "Archive '{}' reappeared while packaging started\n\
                 HINT: Another process is writing the same archive. Run one packager at a time.",
                path.display()
            )
        }
        PackError::ReadFile { path, source } => {
            anyhow!(
                "Cannot read '{}': {source}\n\
                 HINT: The file may have been removed or locked during packaging. \
                 The archive at '{}' is incomplete.",
                path.display(),
                output.display()
            )
        }
        PackError::Walk { path, source } => {
            anyhow!(
                "Cannot walk '{}': {source}\n\
                 HINT: Check permissions and broken symlinks. \
                 The archive at '{}' is incomplete.",
                path.display(),
                output.display()
            )
        }
        _ => anyhow::Error::from(err)
            .context(format!("Error packaging into '{}'", output.display())),
    }
}

/// Adds context to a packaging result
pub fn add_pack_context<T>(result: Result<T, PackError>, output: &Path) -> anyhow::Result<T> {
    result.map_err(|e| convert_pack_error(e, output))
}

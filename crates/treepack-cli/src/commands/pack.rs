//! Pack command implementation.

use crate::cli::PackArgs;
use crate::error::add_pack_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Context;
use anyhow::Result;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;
use treepack_core::PackConfig;
use treepack_core::Packer;
use treepack_core::creation::config::normalize_path;
use treepack_core::creation::filters::host_case_sensitive;

pub fn execute(
    args: &PackArgs,
    formatter: &dyn OutputFormatter,
    show_progress: bool,
) -> Result<()> {
    let config = build_config(args)?;
    debug!(?config, "resolved configuration");

    let output = config.output_path.clone();
    let packer = Packer::new(&config.packaging_root).config(config);

    if args.dry_run {
        let entries = add_pack_context(packer.dry_run(), &output)?;
        return formatter.format_dry_run(&output, &entries);
    }

    let mut progress = CliProgress::new(formatter, show_progress);
    let report = add_pack_context(packer.pack_with_progress(&mut progress), &output)?;
    let entries = progress.into_entries();

    formatter.format_pack_result(&report, &entries)
}

/// Resolves command-line arguments into an absolute configuration.
pub fn build_config(args: &PackArgs) -> Result<PackConfig> {
    let root = match &args.root {
        Some(root) => absolute(root)?,
        None => normalize_path(
            &std::env::current_dir().context("cannot determine the current directory")?,
        ),
    };

    let source = match &args.source {
        Some(source) => absolute(source)?,
        None => root.clone(),
    };

    let output = match &args.output {
        Some(output) => absolute(output)?,
        None => PackConfig::default_output_path(&root, args.name.as_deref()),
    };

    let mut config = PackConfig::new(&root)
        .with_source_root(source)
        .with_output_path(output)
        .with_case_sensitive(args.case_sensitivity().unwrap_or_else(host_case_sensitive))
        .with_follow_symlinks(args.follow_symlinks)
        .with_sort_entries(!args.no_sort);

    if !args.exclude.is_empty() {
        config = config.with_exclude_patterns(args.exclude.clone());
    } else if args.no_default_excludes {
        config = config.with_exclude_patterns(Vec::new());
    }

    if let Some(level) = args.compression_level {
        config = config.with_compression_level(level);
    }

    Ok(config)
}

/// Makes `path` absolute against the current directory, then resolves `.`
/// and `..` so it compares equal to the paths the walker produces.
fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path)
        .map(|path| normalize_path(&path))
        .with_context(|| format!("cannot resolve path '{}'", path.display()))
}

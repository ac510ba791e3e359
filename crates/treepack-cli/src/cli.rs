//! CLI argument parsing using clap.

use clap::Parser;
use std::path::PathBuf;

/// Package a directory tree into a ZIP archive, skipping excluded files.
#[derive(Parser, Debug)]
#[command(name = "treepack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub pack: PackArgs,

    /// Enable verbose output and debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct PackArgs {
    /// Directory to package (default: the packaging root)
    #[arg(value_name = "SOURCE")]
    pub source: Option<PathBuf>,

    /// Packaging root; entry names are relative to it (default: current directory)
    #[arg(short, long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Output archive path (default: <ROOT>/<NAME>.zip)
    #[arg(short, long, value_name = "FILE", conflicts_with = "name")]
    pub output: Option<PathBuf>,

    /// Archive file name without extension (default: name of the packaging root)
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,

    /// Exclude pattern (glob, can be repeated; replaces the default *.pdb)
    #[arg(long = "exclude", short = 'x', value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Do not exclude anything unless --exclude is given
    #[arg(long)]
    pub no_default_excludes: bool,

    /// Compression level (1-9)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u8).range(1..=9))]
    pub compression_level: Option<u8>,

    /// Descend into symlinked directories
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Keep directory listing order instead of sorting by name
    #[arg(long)]
    pub no_sort: bool,

    /// Match exclude patterns ignoring case
    #[arg(long, conflicts_with = "case_sensitive")]
    pub case_insensitive: bool,

    /// Match exclude patterns respecting case
    #[arg(long)]
    pub case_sensitive: bool,

    /// List the files that would be packaged without writing the archive
    #[arg(long)]
    pub dry_run: bool,
}

impl PackArgs {
    /// Case sensitivity requested on the command line, if any.
    pub const fn case_sensitivity(&self) -> Option<bool> {
        if self.case_insensitive {
            Some(false)
        } else if self.case_sensitive {
            Some(true)
        } else {
            None
        }
    }
}

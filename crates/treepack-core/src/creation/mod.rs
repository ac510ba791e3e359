//! Archive creation module.
//!
//! This module walks a source tree, filters it through exclusion patterns
//! and streams the surviving files into a ZIP archive.

pub mod filters;
pub mod walker;

pub mod config;
pub mod packer;
pub mod report;
pub mod zip;

// Re-exports for public API
pub use config::PackConfig;
pub use filters::ExcludePattern;
pub use filters::ExcludeSet;
pub use packer::Packer;
pub use report::PackReport;
pub use walker::FilteredWalker;
pub use walker::PackEntry;

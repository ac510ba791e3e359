//! Directory-to-ZIP packaging library.
//!
//! `treepack-core` walks a directory tree, drops anything matching a set of
//! glob exclusion patterns (`*.pdb` by default), and streams the remaining
//! files into a Deflate-compressed ZIP archive. Entry names are the file
//! paths relative to a packaging root, always with `/` separators.
//!
//! Any archive from a previous run is deleted before the new one is
//! created, and the archive being written is never packaged into itself.
//!
//! # Examples
//!
//! ```no_run
//! use treepack_core::PackConfig;
//! use treepack_core::pack_tree;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PackConfig::new("/build/VesselAutoRenamer")
//!     .with_source_root("/build/VesselAutoRenamer/GameData");
//! let report = pack_tree(&config)?;
//! println!("Packaged {} files into {}", report.files_added, report.output_path.display());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod creation;
pub mod error;
pub mod report;
pub mod types;

// Re-export main API types
pub use api::pack_tree;
pub use api::pack_tree_with_progress;
pub use creation::FilteredWalker;
pub use creation::PackConfig;
pub use creation::PackEntry;
pub use creation::PackReport;
pub use creation::Packer;
pub use error::PackError;
pub use error::Result;
pub use report::NoopProgress;
pub use report::ProgressCallback;
pub use types::RelativePath;

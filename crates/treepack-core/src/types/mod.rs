//! Validated path types.
//!
//! Archive entry names are derived from filesystem paths once, at walk
//! time, and carried as [`RelativePath`] from then on. A `RelativePath`
//! is always relative, uses `/` separators and never contains `..`.

pub mod relative_path;

pub use relative_path::RelativePath;

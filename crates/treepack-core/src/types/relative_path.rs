//! Separator-normalized path relative to the packaging root.

use crate::PackError;
use crate::Result;
use std::fmt;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// A path relative to the packaging root, stored with `/` separators.
///
/// `RelativePath` is both the key tested against exclusion patterns and the
/// entry name written into the archive, so the same value is used for both
/// regardless of the host's native separator.
///
/// Invariants upheld by every constructor:
/// - never empty
/// - never absolute
/// - no `.` or `..` components, no empty components
/// - every component is valid UTF-8
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use treepack_core::RelativePath;
///
/// let rel = RelativePath::from_root(
///     Path::new("/pkg/GameData/Mod/plugin.dll"),
///     Path::new("/pkg"),
/// )?;
/// assert_eq!(rel.as_str(), "GameData/Mod/plugin.dll");
/// assert_eq!(rel.file_name(), "plugin.dll");
/// # Ok::<(), treepack_core::PackError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelativePath(String);

impl RelativePath {
    /// Computes the relative path of `path` beneath `root`.
    ///
    /// # Errors
    ///
    /// - `PackError::OutsideRoot` if `path` is not under `root`
    /// - `PackError::NonUtf8Path` if a component is not valid UTF-8
    /// - `PackError::InvalidRelativePath` if `path` is `root` itself or
    ///   contains `..`
    pub fn from_root(path: &Path, root: &Path) -> Result<Self> {
        let relative = path
            .strip_prefix(root)
            .map_err(|_| PackError::OutsideRoot {
                path: path.to_path_buf(),
                root: root.to_path_buf(),
            })?;

        let mut normalized = String::with_capacity(relative.as_os_str().len());
        for component in relative.components() {
            match component {
                Component::Normal(part) => {
                    let part = part.to_str().ok_or_else(|| PackError::NonUtf8Path {
                        path: path.to_path_buf(),
                    })?;
                    if !normalized.is_empty() {
                        normalized.push('/');
                    }
                    normalized.push_str(part);
                }
                Component::CurDir => {}
                Component::ParentDir => {
                    return Err(PackError::InvalidRelativePath {
                        path: relative.display().to_string(),
                        reason: "contains a parent directory component",
                    });
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(PackError::InvalidRelativePath {
                        path: relative.display().to_string(),
                        reason: "is absolute",
                    });
                }
            }
        }

        if normalized.is_empty() {
            return Err(PackError::InvalidRelativePath {
                path: relative.display().to_string(),
                reason: "is empty",
            });
        }

        Ok(Self(normalized))
    }

    /// Parses a relative path string, accepting `/` or `\` as separators.
    ///
    /// Empty and `.` components are dropped.
    ///
    /// # Errors
    ///
    /// Returns `PackError::InvalidRelativePath` if the string is empty,
    /// absolute, or contains `..`.
    ///
    /// # Examples
    ///
    /// ```
    /// use treepack_core::RelativePath;
    ///
    /// let rel = RelativePath::new(r"GameData\Mod\icon.png")?;
    /// assert_eq!(rel.as_str(), "GameData/Mod/icon.png");
    ///
    /// assert!(RelativePath::new("../outside").is_err());
    /// assert!(RelativePath::new("/etc/passwd").is_err());
    /// # Ok::<(), treepack_core::PackError>(())
    /// ```
    pub fn new(path: &str) -> Result<Self> {
        if path.starts_with(['/', '\\']) {
            return Err(PackError::InvalidRelativePath {
                path: path.to_string(),
                reason: "is absolute",
            });
        }

        let mut normalized = String::with_capacity(path.len());
        for part in path.split(['/', '\\']) {
            match part {
                "" | "." => {}
                ".." => {
                    return Err(PackError::InvalidRelativePath {
                        path: path.to_string(),
                        reason: "contains a parent directory component",
                    });
                }
                part => {
                    if !normalized.is_empty() {
                        normalized.push('/');
                    }
                    normalized.push_str(part);
                }
            }
        }

        if normalized.is_empty() {
            return Err(PackError::InvalidRelativePath {
                path: path.to_string(),
                reason: "is empty",
            });
        }

        Ok(Self(normalized))
    }

    /// Returns the path as a `/`-separated string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates over the path components.
    pub fn components(&self) -> impl DoubleEndedIterator<Item = &str> + '_ {
        self.0.split('/')
    }

    /// Returns the number of components.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.components().count()
    }

    /// Returns the final component.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Converts to a native path suitable for joining onto a root.
    #[must_use]
    pub fn to_path_buf(&self) -> PathBuf {
        self.components().collect()
    }

    /// Resolves this path against `root`.
    #[must_use]
    pub fn resolve(&self, root: &Path) -> PathBuf {
        root.join(self.to_path_buf())
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RelativePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

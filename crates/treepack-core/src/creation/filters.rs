//! Glob-based exclusion matching.
//!
//! Patterns are matched against a [`RelativePath`], which always uses `/`
//! separators, so matching behaves identically on every host. Pattern text
//! may use either `/` or `\` as a separator.
//!
//! A relative pattern is matched from the right: `*.pdb` matches `a.pdb` as
//! well as `GameData/Mod/a.pdb`, while `Mod/*.pdb` only matches `.pdb` files
//! whose parent directory is `Mod`. A pattern starting with a separator is
//! anchored at the packaging root and must match every component.
//!
//! Within a component:
//! - `*` matches any run of characters, including none
//! - `?` matches exactly one character
//! - `[abc]`, `[a-z]` match one character from the set, `[!abc]` negates it
//! - an unterminated `[` is a literal

use crate::PackError;
use crate::Result;
use crate::types::RelativePath;

/// Returns the host's default case sensitivity for pattern matching.
///
/// Windows filesystems are case-insensitive, everything else is treated as
/// case-sensitive.
#[must_use]
pub const fn host_case_sensitive() -> bool {
    !cfg!(windows)
}

/// A single compiled exclusion pattern.
///
/// # Examples
///
/// ```
/// use treepack_core::RelativePath;
/// use treepack_core::creation::filters::ExcludePattern;
///
/// let pattern = ExcludePattern::new("*.pdb", true)?;
/// assert!(pattern.matches(&RelativePath::new("b.pdb")?));
/// assert!(pattern.matches(&RelativePath::new("GameData/Mod/b.pdb")?));
/// assert!(!pattern.matches(&RelativePath::new("b.pdb.txt")?));
/// # Ok::<(), treepack_core::PackError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludePattern {
    source: String,
    anchored: bool,
    case_sensitive: bool,
    segments: Vec<Vec<Token>>,
}

impl ExcludePattern {
    /// Compiles a pattern.
    ///
    /// # Errors
    ///
    /// Returns `PackError::InvalidPattern` if the pattern is empty or has no
    /// components (for example `"/"` or `"."`).
    pub fn new(pattern: &str, case_sensitive: bool) -> Result<Self> {
        if pattern.is_empty() {
            return Err(PackError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "empty pattern",
            });
        }

        let anchored = pattern.starts_with(['/', '\\']);
        let folded;
        let text = if case_sensitive {
            pattern
        } else {
            folded = pattern.to_lowercase();
            folded.as_str()
        };

        let segments: Vec<Vec<Token>> = text
            .split(['/', '\\'])
            .filter(|part| !part.is_empty() && *part != ".")
            .map(compile_segment)
            .collect();

        if segments.is_empty() {
            return Err(PackError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "pattern has no path components",
            });
        }

        Ok(Self {
            source: pattern.to_string(),
            anchored,
            case_sensitive,
            segments,
        })
    }

    /// Returns the pattern text as given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns `true` if the pattern is anchored at the packaging root.
    #[must_use]
    pub const fn is_anchored(&self) -> bool {
        self.anchored
    }

    /// Tests a relative path against this pattern.
    #[must_use]
    pub fn matches(&self, path: &RelativePath) -> bool {
        let folded;
        let text = if self.case_sensitive {
            path.as_str()
        } else {
            folded = path.as_str().to_lowercase();
            folded.as_str()
        };

        let components: Vec<&str> = text.split('/').collect();
        if self.anchored {
            if components.len() != self.segments.len() {
                return false;
            }
        } else if components.len() < self.segments.len() {
            return false;
        }

        // Compare right-aligned: the last pattern segment against the file name.
        self.segments
            .iter()
            .rev()
            .zip(components.iter().rev())
            .all(|(segment, component)| {
                let chars: Vec<char> = component.chars().collect();
                match_segment(segment, &chars)
            })
    }
}

/// An ordered set of exclusion patterns.
///
/// A path is excluded when any pattern matches it.
///
/// # Examples
///
/// ```
/// use treepack_core::RelativePath;
/// use treepack_core::creation::filters::ExcludeSet;
///
/// let set = ExcludeSet::new(&["*.pdb", "Backups"], true)?;
/// assert!(set.matches(&RelativePath::new("GameData/Mod/Backups")?));
/// assert_eq!(
///     set.first_match(&RelativePath::new("x.pdb")?),
///     Some("*.pdb")
/// );
/// assert!(!set.matches(&RelativePath::new("readme.txt")?));
/// # Ok::<(), treepack_core::PackError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExcludeSet {
    patterns: Vec<ExcludePattern>,
}

impl ExcludeSet {
    /// Compiles every pattern, preserving order.
    ///
    /// # Errors
    ///
    /// Returns the first `PackError::InvalidPattern` encountered.
    pub fn new<S: AsRef<str>>(patterns: &[S], case_sensitive: bool) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| ExcludePattern::new(p.as_ref(), case_sensitive))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Returns `true` if any pattern matches `path`.
    #[must_use]
    pub fn matches(&self, path: &RelativePath) -> bool {
        self.first_match(path).is_some()
    }

    /// Returns the text of the first pattern that matches `path`.
    #[must_use]
    pub fn first_match(&self, path: &RelativePath) -> Option<&str> {
        self.patterns
            .iter()
            .find(|p| p.matches(path))
            .map(ExcludePattern::as_str)
    }

    /// Returns the number of patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns `true` if the set has no patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Iterates over the compiled patterns in order.
    pub fn iter(&self) -> impl Iterator<Item = &ExcludePattern> {
        self.patterns.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(char),
    AnyChar,
    AnyRun,
    Class { negated: bool, items: Vec<ClassItem> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ClassItem {
    Single(char),
    Range(char, char),
}

impl Token {
    fn matches_char(&self, c: char) -> bool {
        match self {
            Self::Literal(l) => *l == c,
            Self::AnyChar => true,
            Self::AnyRun => false,
            Self::Class { negated, items } => {
                let hit = items.iter().any(|item| match *item {
                    ClassItem::Single(s) => s == c,
                    ClassItem::Range(lo, hi) => lo <= c && c <= hi,
                });
                hit != *negated
            }
        }
    }
}

fn compile_segment(segment: &str) -> Vec<Token> {
    let chars: Vec<char> = segment.chars().collect();
    let mut tokens = Vec::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' => {
                // Consecutive stars are equivalent to one.
                if tokens.last() != Some(&Token::AnyRun) {
                    tokens.push(Token::AnyRun);
                }
                i += 1;
            }
            '?' => {
                tokens.push(Token::AnyChar);
                i += 1;
            }
            '[' => {
                if let Some((class, next)) = compile_class(&chars, i) {
                    tokens.push(class);
                    i = next;
                } else {
                    tokens.push(Token::Literal('['));
                    i += 1;
                }
            }
            c => {
                tokens.push(Token::Literal(c));
                i += 1;
            }
        }
    }

    tokens
}

/// Parses a `[...]` class starting at `start`. Returns the token and the
/// index just past the closing bracket, or `None` if the class is
/// unterminated.
fn compile_class(chars: &[char], start: usize) -> Option<(Token, usize)> {
    let mut i = start + 1;
    let negated = chars.get(i) == Some(&'!');
    if negated {
        i += 1;
    }

    let mut items = Vec::new();
    let mut first = true;
    loop {
        let c = *chars.get(i)?;
        if c == ']' && !first {
            return Some((Token::Class { negated, items }, i + 1));
        }
        first = false;

        match (chars.get(i + 1), chars.get(i + 2)) {
            (Some('-'), Some(&hi)) if hi != ']' => {
                items.push(ClassItem::Range(c, hi));
                i += 3;
            }
            _ => {
                items.push(ClassItem::Single(c));
                i += 1;
            }
        }
    }
}

fn match_segment(tokens: &[Token], text: &[char]) -> bool {
    let mut t = 0;
    let mut s = 0;
    // Position of the last `*` and the text index it currently absorbs up to.
    let mut backtrack: Option<(usize, usize)> = None;

    while s < text.len() {
        if let Some(token) = tokens.get(t) {
            if *token == Token::AnyRun {
                backtrack = Some((t, s));
                t += 1;
                continue;
            }
            if token.matches_char(text[s]) {
                t += 1;
                s += 1;
                continue;
            }
        }

        match backtrack {
            Some((star, absorbed)) => {
                t = star + 1;
                s = absorbed + 1;
                backtrack = Some((star, absorbed + 1));
            }
            None => return false,
        }
    }

    tokens[t..].iter().all(|token| *token == Token::AnyRun)
}

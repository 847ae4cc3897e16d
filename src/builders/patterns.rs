use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::Path;

use crate::core::error::{Fs42Error, Result};

/// A compiled, ordered list of gitignore-style ignore patterns.
///
/// The ruleset is built once per merge and is immutable afterwards: the
/// selector receives it by reference and only ever asks `is_ignored`.
/// Pattern semantics are those of a `.gitignore` file:
///
/// * `*` matches within one path segment, `**` across segments.
/// * A trailing `/` restricts a pattern to directories (and so to
///   everything below a matching directory).
/// * A leading `!` re-includes paths excluded by an earlier pattern.
/// * A pattern containing a `/` other than a trailing one is anchored to
///   the root directory; otherwise it matches at any depth.
#[derive(Debug, Clone)]
pub struct IgnoreRuleset {
    patterns: Vec<String>,
    matcher: Gitignore,
}

impl IgnoreRuleset {
    /// Compiles `patterns` in order. Later patterns take precedence over
    /// earlier ones, so a negation must come after the rule it overrides.
    ///
    /// # Arguments
    /// * `root`: The directory the patterns are anchored to.
    /// * `patterns`: Raw pattern lines. Blank lines and `#` comments are accepted
    ///   and match nothing.
    ///
    /// # Returns
    /// The compiled ruleset, or `Fs42Error::Pattern` naming the first
    /// pattern the glob compiler rejected.
    pub fn new<S: AsRef<str>>(root: &Path, patterns: &[S]) -> Result<Self> {
        let mut builder = GitignoreBuilder::new(root);
        let mut kept = Vec::with_capacity(patterns.len());

        for pattern in patterns {
            let pattern = pattern.as_ref();
            builder
                .add_line(None, pattern)
                .map_err(|e| Fs42Error::Pattern {
                    pattern: pattern.to_string(),
                    message: e.to_string(),
                })?;
            kept.push(pattern.to_string());
        }

        let matcher = builder.build().map_err(|e| Fs42Error::Pattern {
            pattern: kept.join(","),
            message: e.to_string(),
        })?;

        Ok(Self {
            patterns: kept,
            matcher,
        })
    }

    /// A ruleset that ignores nothing.
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            matcher: Gitignore::empty(),
        }
    }

    /// Returns `true` when `relative_path` (a file path relative to the
    /// root) is excluded, either directly or through one of its parent
    /// directories.
    pub fn is_ignored(&self, relative_path: &Path) -> bool {
        if self.matcher.is_empty() || relative_path.has_root() {
            return false;
        }
        self.matcher
            .matched_path_or_any_parents(relative_path, false)
            .is_ignore()
    }

    /// The raw patterns, in evaluation order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.matcher.is_empty()
    }
}

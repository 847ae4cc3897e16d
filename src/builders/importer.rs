use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// A source of ignore patterns that lives outside the command line.
pub trait PatternImporter {
    /// Reads the patterns stored at `file_path`, in file order.
    fn import_from_file(&self, file_path: &Path) -> Result<Vec<String>>;
}

/// Reads `.gitignore`-style files: one pattern per line.
pub struct FileImporter;

impl FileImporter {
    /// Constructs a new `FileImporter` instance.
    pub fn new() -> Self {
        Self
    }

    /// Parses the content of a `.gitignore`-style file.
    ///
    /// Empty lines and lines starting with `#` are skipped. Trailing
    /// whitespace is dropped unless escaped with a backslash, as git does;
    /// leading whitespace is significant and kept.
    ///
    /// # Arguments
    /// * `content`: The full text of the ignore file.
    ///
    /// # Returns
    /// The patterns in the order they appear.
    pub fn parse_gitignore_style(&self, content: &str) -> Vec<String> {
        content
            .lines()
            .map(trim_unescaped_trailing_whitespace)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect()
    }
}

impl Default for FileImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternImporter for FileImporter {
    fn import_from_file(&self, file_path: &Path) -> Result<Vec<String>> {
        let content = fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read ignore file {}", file_path.display()))?;
        Ok(self.parse_gitignore_style(&content))
    }
}

fn trim_unescaped_trailing_whitespace(line: &str) -> &str {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let trimmed = line.trim_end();
    if trimmed.ends_with('\\') && trimmed.len() < line.len() {
        // Keep the escaped space: `foo\ ` stays `foo\ `.
        &line[..trimmed.len() + 1]
    } else {
        trimmed
    }
}

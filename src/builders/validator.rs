use anyhow::Result;
use std::collections::HashSet;
use std::path::Path;

use crate::builders::patterns::IgnoreRuleset;
use crate::core::config;

/// The `ConfigValidator` trait defines the public interface for validating
/// an fs42 configuration.
pub trait ConfigValidator {
    /// Performs a full validation of `config` for the project rooted at
    /// `root_dir` and returns a list of issues found.
    ///
    /// # Arguments
    /// * `config`: The `Fs42Config` to be validated.
    /// * `root_dir`: The directory ignore files are resolved against.
    ///
    /// # Returns
    /// A `Result<Vec<String>>` where each string describes one issue.
    fn validate_config(&self, config: &config::Fs42Config, root_dir: &Path) -> Result<Vec<String>>;

    /// Validates a single ignore pattern and returns a list of issues.
    fn validate_pattern(&self, pattern: &str) -> Vec<String>;
}

/// Standard checks: version, ignore files, pattern syntax, duplicates and
/// patterns that would exclude every file.
pub struct StandardValidator;

impl StandardValidator {
    /// Creates a new instance of `StandardValidator`.
    pub fn new() -> Self {
        Self
    }

    /// Reports patterns listed more than once.
    fn check_duplicates(&self, patterns: &[String]) -> Vec<String> {
        let mut seen = HashSet::new();
        patterns
            .iter()
            .filter(|pattern| !seen.insert(pattern.as_str()))
            .map(|pattern| format!("Duplicate ignore pattern: {pattern}"))
            .collect()
    }
}

impl Default for StandardValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigValidator for StandardValidator {
    fn validate_config(&self, config: &config::Fs42Config, root_dir: &Path) -> Result<Vec<String>> {
        let mut issues = Vec::new();

        if config.version != config::CONFIG_VERSION {
            issues.push(format!("Unsupported config version: {}", config.version));
        }

        for ignore_file in &config.merge.ignore_files {
            if !root_dir.join(ignore_file).is_file() {
                issues.push(format!("Ignore file not found: {ignore_file}"));
            }
        }

        issues.extend(self.check_duplicates(&config.merge.ignore));

        for pattern in &config.merge.ignore {
            issues.extend(self.validate_pattern(pattern));
        }

        Ok(issues)
    }

    fn validate_pattern(&self, pattern: &str) -> Vec<String> {
        let mut issues = Vec::new();

        // Syntax: compile the pattern on its own.
        if let Err(e) = IgnoreRuleset::new(Path::new("/"), &[pattern]) {
            issues.push(e.to_string());
        }

        let body = pattern.trim();
        if body.is_empty() {
            issues.push("Empty ignore pattern will match nothing".to_string());
        } else if body.starts_with('#') {
            issues.push(format!("Pattern '{pattern}' is a comment and will match nothing"));
        }
        if matches!(body, "*" | "**" | "/**" | "**/*") {
            issues.push(format!("Pattern '{pattern}' will ignore every file"));
        }

        issues
    }
}

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::builders::importer::{FileImporter, PatternImporter};
use crate::builders::patterns::IgnoreRuleset;
use crate::builders::reporter::{FileSummary, StatusReporter};
use crate::builders::storage::{DiskStorage, MemoryStorage, StorageProvider};
use crate::core::config::{ConfigManager, ConfigProvider, Fs42Config};
use crate::core::merger::{self, MergedDocument};
use crate::core::selector::SelectOptions;
use crate::core::splitter::{PathPolicy, SplitEntry, Splitter};
use crate::utils;

/// Everything `fs42 merge` needs beyond the configuration file.
#[derive(Debug, Clone, Default)]
pub struct MergeRequest {
    pub paths: Vec<String>,
    pub ignore: Vec<String>,
    pub ignore_files: Vec<PathBuf>,
    /// Also walk into hidden entries, on top of `merge.include_hidden`.
    pub include_hidden: bool,
    /// Destination file, resolved against the working directory. `None` means stdout.
    pub output: Option<PathBuf>,
}

/// Everything `fs42 split` needs beyond the configuration file.
#[derive(Debug, Clone, Default)]
pub struct SplitRequest {
    pub output_dir: PathBuf,
    pub merge_file: PathBuf,
    /// Overrides the configured path policy with `PathPolicy::Allow`.
    pub allow_unsafe_paths: bool,
    pub dry_run: bool,
}

/// Ties configuration, command-line options and the merge/split core together.
pub struct Fs42Engine {
    config_manager: ConfigManager,
    config: Fs42Config,
    reporter: Box<dyn StatusReporter>,
}

impl Fs42Engine {
    pub fn new(config_manager: ConfigManager, reporter: Box<dyn StatusReporter>) -> Result<Self> {
        let config = config_manager.load_config()?;
        debug!(
            "Loaded configuration from {}",
            config_manager.get_config_path().display()
        );

        Ok(Self {
            config_manager,
            config,
            reporter,
        })
    }

    pub fn config(&self) -> &Fs42Config {
        &self.config
    }

    /// Assembles the ignore ruleset in precedence order: configured
    /// patterns, configured ignore files, then the request's ignore files and
    /// patterns. Later entries win, so the command line can re-include with `!`.
    pub fn build_ruleset(&self, request: &MergeRequest) -> Result<IgnoreRuleset> {
        let root = self.config_manager.get_root_dir();
        let importer = FileImporter::new();
        let mut patterns = self.config.merge.ignore.clone();

        for ignore_file in &self.config.merge.ignore_files {
            patterns.extend(importer.import_from_file(&root.join(ignore_file))?);
        }
        for ignore_file in &request.ignore_files {
            patterns.extend(importer.import_from_file(ignore_file)?);
        }
        patterns.extend(request.ignore.iter().cloned());

        debug!("Ignore patterns: {:?}", patterns);
        Ok(IgnoreRuleset::new(root, patterns.as_slice())?)
    }

    /// Merges the requested paths and delivers the document either to the
    /// requested output file or to `stdout`.
    pub fn run_merge(
        &self,
        request: &MergeRequest,
        working_dir: &Path,
        stdout: &mut dyn Write,
    ) -> Result<MergedDocument> {
        let ruleset = self.build_ruleset(request)?;
        let options = SelectOptions {
            include_hidden: request.include_hidden || self.config.merge.include_hidden,
        };
        let document = merger::merge_with(
            request.paths.as_slice(),
            self.config_manager.get_root_dir(),
            &ruleset,
            options,
        )?;
        let summaries: Vec<FileSummary> = document.entries.iter().map(FileSummary::from).collect();

        match &request.output {
            Some(output) => {
                let out_path = utils::resolve_path(working_dir, output);
                if let Some(parent) = out_path.parent() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create {}", parent.display()))?;
                }
                fs::write(&out_path, &document.text)
                    .with_context(|| format!("Failed to write {}", out_path.display()))?;

                let shown = utils::relative_to(&out_path, &utils::normalize_path(working_dir))
                    .unwrap_or_else(|| out_path.clone());
                self.reporter.merge_finished(
                    &summaries,
                    Some(&shown.display().to_string()),
                    document.text.len(),
                );
            }
            None => {
                stdout
                    .write_all(document.text.as_bytes())
                    .context("Failed to write merged document to stdout")?;
                stdout.flush()?;
                self.reporter.merge_finished(&summaries, None, document.text.len());
            }
        }

        Ok(document)
    }

    /// Splits a merged document. With `dry_run` nothing is written to disk.
    pub fn run_split(&self, request: &SplitRequest) -> Result<Vec<SplitEntry>> {
        let policy = if request.allow_unsafe_paths {
            PathPolicy::Allow
        } else {
            self.config.split.path_policy
        };
        let splitter = Splitter::new(policy);

        let mut disk = DiskStorage::new();
        let mut memory = MemoryStorage::new();
        let storage: &mut dyn StorageProvider = if request.dry_run {
            &mut memory
        } else {
            &mut disk
        };

        let entries = splitter.split_file(&request.output_dir, &request.merge_file, storage)?;
        let summaries: Vec<FileSummary> = entries.iter().map(FileSummary::from).collect();
        self.reporter.split_finished(&summaries, request.dry_run);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::reporter::ConsoleReporter;
    use tempfile::tempdir;

    fn engine_at(root: &Path) -> Fs42Engine {
        Fs42Engine::new(
            ConfigManager::new_at(root.to_path_buf()),
            Box::new(ConsoleReporter::new(false)),
        )
        .unwrap()
    }

    #[test]
    fn test_ruleset_precedence_lets_cli_reinclude() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".fs42.toml"), "[merge]\nignore = [\"*.log\"]\n").unwrap();
        fs::write(dir.path().join("extra.ignore"), "# comment\n*.tmp\n").unwrap();

        let engine = engine_at(dir.path());
        let request = MergeRequest {
            ignore: vec!["!keep.log".into()],
            ignore_files: vec![dir.path().join("extra.ignore")],
            ..Default::default()
        };
        let ruleset = engine.build_ruleset(&request).unwrap();

        assert_eq!(ruleset.patterns(), ["*.log", "*.tmp", "!keep.log"]);
        assert!(ruleset.is_ignored(Path::new("drop.log")));
        assert!(ruleset.is_ignored(Path::new("x.tmp")));
        assert!(!ruleset.is_ignored(Path::new("keep.log")));
    }

    #[test]
    fn test_merge_to_stdout_then_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "alpha\n").unwrap();
        let engine = engine_at(dir.path());

        let mut stdout = Vec::new();
        let request = MergeRequest {
            paths: vec!["a.txt".into()],
            ..Default::default()
        };
        let document = engine.run_merge(&request, dir.path(), &mut stdout).unwrap();
        assert_eq!(String::from_utf8(stdout).unwrap(), document.text);

        let request = MergeRequest {
            output: Some(PathBuf::from("out/merged.txt")),
            ..request
        };
        let mut stdout = Vec::new();
        engine.run_merge(&request, dir.path(), &mut stdout).unwrap();
        assert!(stdout.is_empty());
        let written = fs::read_to_string(dir.path().join("out/merged.txt")).unwrap();
        assert!(written.contains("// >>> a.txt\nalpha\n\n"));
    }

    #[test]
    fn test_merge_hidden_files_follow_config_and_request() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "alpha\n").unwrap();
        fs::write(dir.path().join(".hidden"), "secret\n").unwrap();

        let request = MergeRequest {
            paths: vec![".".into()],
            ..Default::default()
        };
        let engine = engine_at(dir.path());
        let document = engine.run_merge(&request, dir.path(), &mut Vec::<u8>::new()).unwrap();
        let merged: Vec<&str> = document.entries.iter().map(|e| e.relative.as_str()).collect();
        assert_eq!(merged, vec!["a.txt"]);

        let request = MergeRequest {
            include_hidden: true,
            ..request
        };
        let document = engine.run_merge(&request, dir.path(), &mut Vec::<u8>::new()).unwrap();
        let merged: Vec<&str> = document.entries.iter().map(|e| e.relative.as_str()).collect();
        assert_eq!(merged, vec![".hidden", "a.txt"]);

        fs::write(dir.path().join(".fs42.toml"), "[merge]\ninclude_hidden = true\n").unwrap();
        let engine = engine_at(dir.path());
        let request = MergeRequest {
            include_hidden: false,
            ..request
        };
        let document = engine.run_merge(&request, dir.path(), &mut Vec::<u8>::new()).unwrap();
        let merged: Vec<&str> = document.entries.iter().map(|e| e.relative.as_str()).collect();
        // The config file is a dotfile as well.
        assert_eq!(merged, vec![".fs42.toml", ".hidden", "a.txt"]);
    }

    #[test]
    fn test_split_dry_run_writes_nothing() {
        let dir = tempdir().unwrap();
        let merged = dir.path().join("merged.txt");
        fs::write(&merged, "// >>> a.txt\nalpha\n").unwrap();

        let engine = engine_at(dir.path());
        let entries = engine
            .run_split(&SplitRequest {
                output_dir: dir.path().join("restored"),
                merge_file: merged,
                dry_run: true,
                ..Default::default()
            })
            .unwrap();

        assert_eq!(entries.len(), 1);
        assert!(!dir.path().join("restored").exists());
    }

    #[test]
    fn test_split_uses_configured_policy_unless_overridden() {
        let dir = tempdir().unwrap();
        let merged = dir.path().join("merged.txt");
        fs::write(&merged, "// >>> ../escape.txt\nx\n").unwrap();
        let out = dir.path().join("out");

        let engine = engine_at(dir.path());
        let request = SplitRequest {
            output_dir: out.clone(),
            merge_file: merged,
            ..Default::default()
        };
        assert!(engine.run_split(&request).is_err());

        let request = SplitRequest {
            allow_unsafe_paths: true,
            ..request
        };
        engine.run_split(&request).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("escape.txt")).unwrap(), "x\n");
    }
}

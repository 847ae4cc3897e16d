use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

use crate::builders::marker;
use crate::builders::storage::{DiskStorage, StorageProvider};
use crate::core::error::{Fs42Error, Result};
use crate::utils;

/// What to do with a marker whose path climbs out of the output directory
/// (`// >>> ../../etc/profile`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathPolicy {
    /// Fail the split with `Fs42Error::UnsafePath`.
    #[default]
    Reject,
    /// Write wherever the marker points.
    Allow,
}

/// A file reconstructed from a merged document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitEntry {
    /// The path as written in the marker.
    pub relative: String,
    pub target: PathBuf,
    pub size: usize,
}

/// Scanner state while walking the lines of a merged document.
enum ScanState<'a> {
    /// No marker seen yet; lines are discarded.
    NoTarget,
    /// Collecting the lines that follow the marker for `path`.
    Accumulating { path: &'a str, lines: Vec<&'a str> },
}

/// Reverses a merge: cuts a merged document at its marker lines and
/// stores each segment below an output directory.
#[derive(Debug, Clone, Default)]
pub struct Splitter {
    policy: PathPolicy,
}

impl Splitter {
    pub fn new(policy: PathPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> PathPolicy {
        self.policy
    }

    /// Reads `merge_file` and writes its segments below `output_dir`.
    pub fn split_file(
        &self,
        output_dir: &Path,
        merge_file: &Path,
        storage: &mut dyn StorageProvider,
    ) -> Result<Vec<SplitEntry>> {
        info!("Reading merged file...");
        let text = fs::read_to_string(merge_file).map_err(|e| Fs42Error::read(merge_file, e))?;
        self.split_text(&text, output_dir, storage)
    }

    /// Splits `text` line by line (on `\n`) and stores every segment.
    ///
    /// A segment's content is its lines joined with `\n`, so the blank
    /// separator line written by the merger stays with the file before
    /// the next marker. Lines before the first marker, and after a marker
    /// with an empty path, are dropped.
    pub fn split_text(
        &self,
        text: &str,
        output_dir: &Path,
        storage: &mut dyn StorageProvider,
    ) -> Result<Vec<SplitEntry>> {
        info!("Processing files...");
        let mut written = Vec::new();
        let mut state = ScanState::NoTarget;

        for line in text.split('\n') {
            state = match (marker::parse_marker(line), state) {
                (Some(next), current) => {
                    if let ScanState::Accumulating { path, lines } = current {
                        written.push(self.flush(output_dir, path, &lines, storage)?);
                    }
                    // A blank marker closes the current file without opening another.
                    if next.is_empty() {
                        ScanState::NoTarget
                    } else {
                        ScanState::Accumulating {
                            path: next,
                            lines: Vec::new(),
                        }
                    }
                }
                (None, ScanState::Accumulating { path, mut lines }) => {
                    lines.push(line);
                    ScanState::Accumulating { path, lines }
                }
                (None, ScanState::NoTarget) => ScanState::NoTarget,
            };
        }

        if let ScanState::Accumulating { path, lines } = state {
            written.push(self.flush(output_dir, path, &lines, storage)?);
        }

        debug!("Split produced {} files", written.len());
        Ok(written)
    }

    fn flush(
        &self,
        output_dir: &Path,
        relative: &str,
        lines: &[&str],
        storage: &mut dyn StorageProvider,
    ) -> Result<SplitEntry> {
        let target = self.target_path(output_dir, relative)?;
        let content = lines.join("\n");
        storage.store_file(&target, &content)?;

        info!(
            "Extracted: {} ({})",
            relative,
            utils::human_size(content.len())
        );
        Ok(SplitEntry {
            relative: relative.to_string(),
            target,
            size: content.len(),
        })
    }

    /// Joins a marker path onto `output_dir`. A leading `/` does not make
    /// the marker absolute: the path always hangs off the output directory.
    fn target_path(&self, output_dir: &Path, relative: &str) -> Result<PathBuf> {
        let base = utils::normalize_path(output_dir);
        let mut joined = base.clone();
        for component in Path::new(relative).components() {
            if let Component::Normal(_) | Component::ParentDir | Component::CurDir = component {
                joined.push(component.as_os_str());
            }
        }
        let target = utils::normalize_path(&joined);

        let escapes = target == base || !target.starts_with(&base);
        if escapes {
            match self.policy {
                PathPolicy::Reject => {
                    return Err(Fs42Error::UnsafePath {
                        path: relative.to_string(),
                    });
                }
                PathPolicy::Allow => debug!("Writing outside output directory: {}", relative),
            }
        }
        Ok(target)
    }
}

/// Splits `merge_file` into files below `output_dir` with the default
/// (rejecting) path policy. Returns the number of files written.
pub fn split(output_dir: &Path, merge_file: &Path) -> Result<usize> {
    let mut storage = DiskStorage::new();
    let entries = Splitter::default().split_file(output_dir, merge_file, &mut storage)?;
    Ok(entries.len())
}

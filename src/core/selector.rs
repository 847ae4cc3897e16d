use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::builders::patterns::IgnoreRuleset;
use crate::core::error::{Fs42Error, Result};
use crate::utils;

/// One file chosen for merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub absolute: PathBuf,
    /// Path relative to the root directory, `/`-separated.
    pub relative: String,
}

/// Knobs for directory expansion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectOptions {
    /// Descend into dot-directories and keep dotfiles found while walking.
    /// Paths named explicitly are always kept.
    pub include_hidden: bool,
}

/// Expands `paths` (files or directories, relative to `root_dir`) into the
/// sorted, deduplicated list of files that survive `ruleset`, skipping
/// hidden entries below directories.
pub fn select<S: AsRef<str>>(
    paths: &[S],
    root_dir: &Path,
    ruleset: &IgnoreRuleset,
) -> Result<Vec<SelectedFile>> {
    select_with(paths, root_dir, ruleset, SelectOptions::default())
}

/// Like [`select`], with explicit [`SelectOptions`].
///
/// Directories are walked recursively without a depth limit. Symlinked
/// directories are not descended into, while symlinks pointing at files
/// are kept. The result is ordered by absolute path so repeated runs over
/// the same tree agree.
pub fn select_with<S: AsRef<str>>(
    paths: &[S],
    root_dir: &Path,
    ruleset: &IgnoreRuleset,
    options: SelectOptions,
) -> Result<Vec<SelectedFile>> {
    let root = std::path::absolute(root_dir).map_err(|source| Fs42Error::NotFound {
        path: root_dir.to_path_buf(),
        source,
    })?;
    let root = utils::normalize_path(&root);
    let mut found: HashSet<PathBuf> = HashSet::new();

    info!("Scanning files...");
    for path in paths {
        let path = path.as_ref();
        let full_path = utils::resolve_path(&root, Path::new(path));
        let metadata = fs::metadata(&full_path).map_err(|source| Fs42Error::NotFound {
            path: full_path.clone(),
            source,
        })?;

        if metadata.is_dir() {
            let files = expand_directory(&full_path, options.include_hidden)?;
            info!("Found {} files in {}", files.len(), path);
            found.extend(files);
        } else {
            found.insert(full_path);
        }
    }

    let mut selected = Vec::with_capacity(found.len());
    for absolute in found {
        let relative = utils::relative_to(&absolute, &root).ok_or_else(|| {
            Fs42Error::OutsideRoot {
                path: absolute.clone(),
                root: root.clone(),
            }
        })?;
        if ruleset.is_ignored(&relative) {
            debug!("Ignored: {}", relative.display());
            continue;
        }
        selected.push(SelectedFile {
            relative: utils::to_slash(&relative),
            absolute,
        });
    }

    selected.sort_by(|a, b| a.absolute.as_os_str().cmp(b.absolute.as_os_str()));
    Ok(selected)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Every file below `dir`, at any depth.
fn expand_directory(dir: &Path, include_hidden: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| include_hidden || e.depth() == 0 || !is_hidden(e));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            Fs42Error::read(path, e.into())
        })?;

        let is_file = if entry.path_is_symlink() {
            // `fs::metadata` follows the link; a dangling link is skipped.
            fs::metadata(entry.path())
                .map(|m| m.is_file())
                .unwrap_or(false)
        } else {
            entry.file_type().is_file()
        };

        if is_file {
            files.push(utils::normalize_path(entry.path()));
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn relatives(files: &[SelectedFile]) -> Vec<&str> {
        files.iter().map(|f| f.relative.as_str()).collect()
    }

    #[test]
    fn test_select_orders_by_absolute_path() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::create_dir_all(dir.path().join("c")).unwrap();
        fs::write(dir.path().join("c/z.txt"), "z").unwrap();

        let files = select(&["."], dir.path(), &IgnoreRuleset::empty()).unwrap();
        assert_eq!(relatives(&files), vec!["a.txt", "b.txt", "c/z.txt"]);
        assert!(files.iter().all(|f| f.absolute.is_absolute()));
    }

    #[test]
    fn test_select_skips_hidden_entries_unless_asked() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".git/objects")).unwrap();
        fs::write(dir.path().join(".git/objects/ab"), "blob").unwrap();
        fs::write(dir.path().join(".env"), "KEY=1").unwrap();
        fs::write(dir.path().join("main.rs"), "fn main() {}").unwrap();

        let files = select(&["."], dir.path(), &IgnoreRuleset::empty()).unwrap();
        assert_eq!(relatives(&files), vec!["main.rs"]);

        // Named explicitly, a hidden file or directory is still taken.
        let files = select(&[".env", ".git"], dir.path(), &IgnoreRuleset::empty()).unwrap();
        assert_eq!(relatives(&files), vec![".env", ".git/objects/ab"]);

        let options = SelectOptions {
            include_hidden: true,
        };
        let files = select_with(&["."], dir.path(), &IgnoreRuleset::empty(), options).unwrap();
        assert_eq!(relatives(&files), vec![".env", ".git/objects/ab", "main.rs"]);
    }

    #[test]
    fn test_select_resolves_relative_root_to_absolute() {
        // Unit tests run from the package directory.
        let files = select(&["."], Path::new("src/utils"), &IgnoreRuleset::empty()).unwrap();
        assert_eq!(relatives(&files), vec!["mod.rs"]);
        assert!(files[0].absolute.is_absolute());
        assert!(files[0].absolute.ends_with("src/utils/mod.rs"));

        let files = select(&["src/lib.rs"], Path::new("."), &IgnoreRuleset::empty()).unwrap();
        assert_eq!(relatives(&files), vec!["src/lib.rs"]);
        assert!(files[0].absolute.is_absolute());
    }

    #[test]
    fn test_select_missing_path_is_not_found() {
        let dir = tempdir().unwrap();
        let err = select(&["nope"], dir.path(), &IgnoreRuleset::empty()).unwrap_err();
        assert!(matches!(err, Fs42Error::NotFound { .. }));
    }

    #[test]
    fn test_select_rejects_files_outside_root() {
        let outer = tempdir().unwrap();
        let root = outer.path().join("root");
        fs::create_dir_all(&root).unwrap();
        fs::write(outer.path().join("outside.txt"), "x").unwrap();

        let err = select(&["../outside.txt"], &root, &IgnoreRuleset::empty()).unwrap_err();
        assert!(matches!(err, Fs42Error::OutsideRoot { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_select_keeps_file_symlinks_but_not_directory_symlinks() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("real")).unwrap();
        fs::write(root.join("real/data.txt"), "data").unwrap();
        std::os::unix::fs::symlink(root.join("real/data.txt"), root.join("link.txt")).unwrap();
        std::os::unix::fs::symlink(root.join("real"), root.join("linked_dir")).unwrap();

        let files = select(&["."], root, &IgnoreRuleset::empty()).unwrap();
        assert_eq!(relatives(&files), vec!["link.txt", "real/data.txt"]);
    }
}

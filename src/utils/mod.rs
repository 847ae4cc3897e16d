use std::path::{Component, Path, PathBuf};

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

/// Splits a comma-separated CLI argument into trimmed, non-empty entries.
///
/// `"src, docs/readme.md,,"` becomes `["src", "docs/readme.md"]`.
pub fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolves `path` against `base` and removes `.` and `..` components
/// lexically, without touching the filesystem.
pub fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    normalize_path(&joined)
}

/// Lexical normalisation: drops `.` components and folds `..` into the
/// preceding component. A `..` directly under the filesystem root is dropped.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    normalized.pop();
                } else if !normalized.has_root() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Returns `path` relative to `base` when `path` is `base` itself or one of
/// its descendants. Both paths are expected to be normalised.
pub fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    path.strip_prefix(base).ok().map(Path::to_path_buf)
}

/// Renders a relative path with `/` separators, whatever the host uses.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Formats a byte count the way the CLI reports sizes: kibibytes with two decimals.
pub fn human_size(bytes: usize) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}

/// Installs the stderr `tracing` subscriber.
///
/// The level comes from the CLI flags (and the config file's `verbose`
/// setting) only; the environment is not consulted.
pub fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    // A second initialisation (tests, embedding) keeps the first subscriber.
    let _ = fmt()
        .with_env_filter(EnvFilter::new(format!("fs42={level}")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_csv_trims_and_drops_empty() {
        assert_eq!(split_csv(" src , docs/a.md,,"), vec!["src", "docs/a.md"]);
        assert!(split_csv("").is_empty());
    }

    #[test]
    fn test_resolve_path_folds_parent_components() {
        let base = Path::new("/work/project");
        assert_eq!(
            resolve_path(base, Path::new("./src/../lib/mod.rs")),
            PathBuf::from("/work/project/lib/mod.rs")
        );
        assert_eq!(
            resolve_path(base, Path::new("../other")),
            PathBuf::from("/work/other")
        );
        assert_eq!(
            resolve_path(base, Path::new("/abs/file.txt")),
            PathBuf::from("/abs/file.txt")
        );
    }

    #[test]
    fn test_normalize_keeps_leading_parent_for_relative_paths() {
        assert_eq!(
            normalize_path(Path::new("../../a/./b")),
            PathBuf::from("../../a/b")
        );
        assert_eq!(normalize_path(Path::new("a/../../b")), PathBuf::from("../b"));
    }

    #[test]
    fn test_relative_to() {
        let root = Path::new("/r");
        assert_eq!(
            relative_to(Path::new("/r/sub/deep/file.txt"), root),
            Some(PathBuf::from("sub/deep/file.txt"))
        );
        assert_eq!(relative_to(Path::new("/elsewhere/x"), root), None);
    }

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(0), "0.00 KB");
        assert_eq!(human_size(1536), "1.50 KB");
    }
}

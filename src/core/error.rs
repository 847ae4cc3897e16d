use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the selection, merge and split operations.
///
/// Every variant aborts the command it was raised from. Files already
/// written by a split before the failure stay on disk.
#[derive(Debug, Error)]
pub enum Fs42Error {
    /// A root path handed to the selector does not exist.
    #[error("Path not found: {}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A selected file or the merge file could not be read as UTF-8 text.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An output file or one of its parent directories could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An ignore pattern was rejected by the glob compiler.
    #[error("Invalid ignore pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    /// A selected file lies outside the root directory.
    #[error("{} is not under root directory {}", path.display(), root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },

    /// A marker in a merged document would write outside the output directory.
    #[error("Refusing to write outside the output directory: {path}")]
    UnsafePath { path: String },
}

impl Fs42Error {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Fs42Error::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Fs42Error::Write {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Fs42Error>;

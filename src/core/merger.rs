use chrono::{DateTime, SecondsFormat, Utc};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::builders::marker;
use crate::builders::patterns::IgnoreRuleset;
use crate::core::error::{Fs42Error, Result};
use crate::core::selector::{self, SelectOptions, SelectedFile};
use crate::utils;

/// Name written into the header of every merged document.
pub const TOOL_NAME: &str = "fs42";

/// A file as it was written into a merged document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedEntry {
    pub relative: String,
    /// Size of the original content in bytes.
    pub size: usize,
}

/// The result of a merge: the full text plus what went into it.
#[derive(Debug, Clone)]
pub struct MergedDocument {
    pub text: String,
    pub entries: Vec<MergedEntry>,
}

/// Renders the comment block that opens every merged document.
///
/// None of its lines starts with `//`, so the splitter never mistakes the
/// header for a marker.
pub fn render_header(generated_at: DateTime<Utc>) -> String {
    [
        "/**".to_string(),
        format!(
            " * Generated by {TOOL_NAME} on {}",
            generated_at.to_rfc3339_opts(SecondsFormat::Millis, true)
        ),
        " * Notes:".to_string(),
        format!(" *  - File path marker: `{} <relative_path>`", marker::MARKER_PREFIX),
        " *  - Use the same marker format for output file paths and content".to_string(),
        " *  - All paths are relative to module root".to_string(),
        " */".to_string(),
        String::new(),
        String::new(),
    ]
    .join("\n")
}

/// Selects the files under `paths` and concatenates them into one document.
///
/// Each file contributes its marker line, its content verbatim (newline
/// terminated) and one blank separator line. The first unreadable file
/// aborts the merge; no partial document is returned.
pub fn merge<S: AsRef<str>>(
    paths: &[S],
    root_dir: &Path,
    ruleset: &IgnoreRuleset,
) -> Result<MergedDocument> {
    merge_with(paths, root_dir, ruleset, SelectOptions::default())
}

/// Like [`merge`], passing `options` through to the selector.
pub fn merge_with<S: AsRef<str>>(
    paths: &[S],
    root_dir: &Path,
    ruleset: &IgnoreRuleset,
    options: SelectOptions,
) -> Result<MergedDocument> {
    let files = selector::select_with(paths, root_dir, ruleset, options)?;
    merge_files(&files, Utc::now())
}

/// Concatenates already-selected files, in the order given.
pub fn merge_files(files: &[SelectedFile], generated_at: DateTime<Utc>) -> Result<MergedDocument> {
    info!("Processing {} files...", files.len());

    let mut text = render_header(generated_at);
    let mut entries = Vec::with_capacity(files.len());

    for file in files {
        let content =
            fs::read_to_string(&file.absolute).map_err(|e| Fs42Error::read(&file.absolute, e))?;

        text.push_str(&marker::format_marker(&file.relative));
        text.push('\n');
        text.push_str(&content);
        if !content.ends_with('\n') {
            text.push('\n');
        }
        text.push('\n');

        info!(
            "Processed: {} ({})",
            file.relative,
            utils::human_size(content.len())
        );
        entries.push(MergedEntry {
            relative: file.relative.clone(),
            size: content.len(),
        });
    }

    Ok(MergedDocument { text, entries })
}

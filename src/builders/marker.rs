use regex::Regex;
use std::sync::LazyLock;

/// The literal prefix written in front of every file in a merged document.
pub const MARKER_PREFIX: &str = "// >>>";

/// Recognises a marker line. Whitespace around `>>>` is optional so that
/// hand-edited documents (`//>>> a.rs`, `//   >>>   a.rs`) still split.
static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^//\s*>>>\s*(.+)$").expect("marker regex is valid")
});

/// Formats the marker line (without trailing newline) for a root-relative path.
pub fn format_marker(relative_path: &str) -> String {
    format!("{MARKER_PREFIX} {relative_path}")
}

/// Returns the trimmed path carried by `line` if it is a marker line.
///
/// A marker with only whitespace after `>>>` still counts as a marker and
/// yields an empty path; the splitter closes the open file on it and has
/// nowhere to put the lines that follow. A trailing `\r` is trimmed with
/// the rest of the whitespace, so markers in CRLF documents are recognised.
pub fn parse_marker(line: &str) -> Option<&str> {
    let captures = MARKER_RE.captures(line)?;
    Some(captures.get(1)?.as_str().trim())
}

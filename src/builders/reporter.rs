use colored::Colorize;

use crate::builders::tree::FileTree;
use crate::core::merger::MergedEntry;
use crate::core::splitter::SplitEntry;
use crate::utils;

/// A file line in a report: where it went and how large it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub path: String,
    pub size: usize,
}

impl From<&MergedEntry> for FileSummary {
    fn from(entry: &MergedEntry) -> Self {
        Self {
            path: entry.relative.clone(),
            size: entry.size,
        }
    }
}

impl From<&SplitEntry> for FileSummary {
    fn from(entry: &SplitEntry) -> Self {
        Self {
            path: entry.relative.clone(),
            size: entry.size,
        }
    }
}

/// Reports the outcome of a merge or split to the user.
pub trait StatusReporter {
    /// Called once a merge has been written. `destination` is `None` when the
    /// document went to stdout.
    fn merge_finished(&self, files: &[FileSummary], destination: Option<&str>, total_bytes: usize);

    /// Called once a split has stored all of its files.
    fn split_finished(&self, files: &[FileSummary], dry_run: bool);
}

/// Prints reports to stderr so they never mix with a merged document on stdout.
pub struct ConsoleReporter {
    show_tree: bool,
}

impl ConsoleReporter {
    pub fn new(show_tree: bool) -> Self {
        Self { show_tree }
    }

    /// Builds the size-annotated tree of `files`.
    ///
    /// # Returns
    /// The rendered tree, including the trailing `N directories, M files` line.
    pub fn render_tree(files: &[FileSummary]) -> String {
        let mut tree = FileTree::new();
        for file in files {
            tree.add_path(&file.path, Some(utils::human_size(file.size)));
        }
        tree.render()
    }

    fn print_tree(&self, files: &[FileSummary]) {
        if self.show_tree && !files.is_empty() {
            eprintln!();
            eprint!("{}", Self::render_tree(files).dimmed());
        }
    }
}

impl StatusReporter for ConsoleReporter {
    fn merge_finished(&self, files: &[FileSummary], destination: Option<&str>, total_bytes: usize) {
        self.print_tree(files);
        if let Some(destination) = destination {
            eprintln!(
                "{}",
                format!(
                    "Merged file written to {}, total: {}",
                    destination,
                    utils::human_size(total_bytes)
                )
                .green()
            );
        }
    }

    fn split_finished(&self, files: &[FileSummary], dry_run: bool) {
        self.print_tree(files);
        if dry_run {
            eprintln!(
                "{}",
                format!("Dry run: {} files would be created", files.len()).yellow()
            );
        } else {
            eprintln!("{}", "\nFile splitting completed successfully!".green());
            eprintln!("{}", format!("Total files created: {}", files.len()).green());
        }
    }
}

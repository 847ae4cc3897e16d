//! fs42 concatenates a set of files into one text document, each file
//! introduced by a `// >>> <relative_path>` marker line, and splits such a
//! document back into files.
//!
//! ```no_run
//! use fs42::builders::patterns::IgnoreRuleset;
//! use fs42::core::{merger, splitter};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let root = Path::new("/work/project");
//! let rules = IgnoreRuleset::new(root, &["target/", "*.log"])?;
//! let document = merger::merge(&["src", "Cargo.toml"], root, &rules)?;
//! std::fs::write("/tmp/project.txt", &document.text)?;
//!
//! let count = splitter::split(Path::new("/tmp/restored"), Path::new("/tmp/project.txt"))?;
//! println!("{count} files restored");
//! # Ok(())
//! # }
//! ```

pub mod builders;
pub mod core;
pub mod utils;

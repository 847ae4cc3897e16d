// This file is the module declaration file for the `core` module.
// It groups the operations fs42 is built around: choosing files, merging
// them into one document, and splitting such a document back into files.

// `config` module:
// Loads and saves the optional `.fs42.toml` file found in the root
// directory (default ignore patterns, ignore files, split path policy).
pub mod config;

// `engine` module:
// Glue used by the command line: builds the ignore ruleset from config and
// flags, runs a merge or split, writes the output and reports the result.
pub mod engine;

// `error` module:
// The typed errors shared by the selector, merger and splitter.
pub mod error;

// `merger` module:
// Renders the header block and concatenates the selected files, each
// preceded by its `// >>> <relative_path>` marker line.
pub mod merger;

// `selector` module:
// Expands paths and directories under the root, drops ignored files and
// returns a deduplicated list sorted by absolute path.
pub mod selector;

// `splitter` module:
// The inverse of `merger`: scans a merged document marker by marker and
// stores every segment below an output directory.
pub mod splitter;

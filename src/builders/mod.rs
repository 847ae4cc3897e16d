// This file is the module declaration file for the `builders` module.
// It declares and makes public the supporting pieces the `core` operations
// are assembled from.

// `importer` module:
// Reads ignore patterns from `.gitignore`-style files.
pub mod importer;

// `marker` module:
// Formats and recognises the `// >>> <relative_path>` marker lines that
// delimit files inside a merged document.
pub mod marker;

// `patterns` module:
// Compiles gitignore-style patterns into an immutable `IgnoreRuleset`
// that the selector queries with root-relative paths.
pub mod patterns;

// `reporter` module:
// Prints merge and split summaries, optionally as a size-annotated tree.
pub mod reporter;

// `storage` module:
// Where split files end up: on disk, or in memory for dry runs and tests.
pub mod storage;

// `tree` module:
// Builds and renders a `tree(1)`-style view of a list of paths.
pub mod tree;

// `validator` module:
// Checks a configuration for unsupported versions, missing ignore files
// and malformed, duplicated or all-matching patterns.
pub mod validator;

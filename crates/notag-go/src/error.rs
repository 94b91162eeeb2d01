//! Errors raised by the Go front end.

use std::path::PathBuf;

/// Errors while discovering, reading, or parsing Go sources.
#[derive(Debug, thiserror::Error)]
pub enum GoError {
    /// IO error reading a source file.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The Go grammar could not be loaded into the parser.
    #[error("failed to load Go grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// Tree-sitter returned no tree.
    #[error("failed to parse {path}")]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
    },

    /// Directory walk failed.
    #[error("directory walk failed: {0}")]
    Walk(#[from] ignore::Error),

    /// Invalid exclude pattern.
    #[error("invalid exclude pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

//! Errors raised while loading a corpus or misspelling table.
use std::path::PathBuf;

/// Errors that can occur while building a [`Lexicon`](crate::lexicon::Lexicon)
/// or an [`ErrorTable`](crate::error_table::ErrorTable).
///
/// All of these are fatal: a corrector is never built from partial data.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LoadError {
    /// The input file could not be opened or read
    #[error("I/O error reading '{0}'")]
    Io(PathBuf, #[source] std::io::Error),

    /// A table line is missing the `": "` separator
    #[error("{path}:{line}: missing ': ' separator in {content:?}")]
    Parse {
        /// file the line came from
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// the offending line
        content: String,
    },

    /// A `*weight` suffix is not a non-negative integer
    #[error("{path}:{line}: invalid weight {value:?}")]
    InvalidWeight {
        /// file the line came from
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// the text after `*`
        value: String,
        /// underlying integer parse failure
        #[source]
        source: std::num::ParseIntError,
    },
}

use std::path::PathBuf;

/// Errors raised while reading or parsing a GEDCOM file.
#[derive(Debug, thiserror::Error)]
pub enum GedcomError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Only raised in strict mode; lenient parsing folds bad lines into the
    /// previous element.
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
}

/// Errors raised while parsing an anchor criteria string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CriteriaError {
    #[error("criteria string is empty")]
    Empty,

    #[error("malformed criterion '{0}' (expected key=value)")]
    Malformed(String),
}

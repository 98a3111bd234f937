use std::path::PathBuf;
use thiserror::Error;

/// A construction attempt that cannot satisfy a semantic constraint.
///
/// Rejections never leave the factory that triggered them: the retry loop
/// discards the partial construction and redraws.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("no relation visible in scope")]
    EmptyScope,

    #[error("relation '{relation}' has no columns")]
    NoColumns { relation: String },

    #[error("no operator for ({left}, {right}) -> {result}")]
    NoOperator {
        left: String,
        right: String,
        result: String,
    },

    #[error("no column of type '{column_type}' on join partner '{relation}'")]
    NoJoinColumn {
        relation: String,
        column_type: String,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Construction rejected: {0}")]
    Rejected(#[from] Rejection),

    #[error("The catalog contains no tables; nothing to select from")]
    EmptyCatalog,

    #[error("Gave up building {production} after {attempts} attempts")]
    RetriesExhausted {
        production: &'static str,
        attempts: usize,
    },

    #[error("Failed to read catalog file: {path}\n{source}")]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog definition:\n  {0}")]
    CatalogParse(#[from] serde_yaml::Error),
}

impl Error {
    /// Whether the retry loop may discard this failure and redraw.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Rejected(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

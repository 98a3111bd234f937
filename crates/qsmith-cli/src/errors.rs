use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to load catalog file: {path}\n{source}")]
    CatalogLoadError {
        path: PathBuf,
        #[source]
        source: qsmith_grammar::Error,
    },

    #[error("Catalog {path} contains no tables.\nHint: a catalog needs at least one table with columns to generate queries.")]
    EmptyCatalog { path: PathBuf },

    #[error("Worker {worker} (seed {seed}) failed after {generated} statement(s):\n  {source}")]
    GenerationError {
        worker: usize,
        seed: u64,
        generated: usize,
        #[source]
        source: qsmith_grammar::Error,
    },
}

pub mod batch;
pub mod errors;

pub use batch::{generate_batch, load_catalog, Batch, BatchOptions};
pub use errors::CliError;

use crate::errors::CliError;
use anyhow::Result;
use qsmith_grammar::visitor::{Accept, NodeStats};
use qsmith_grammar::{derive_seeds, Generator, GeneratorConfig, NameCounters, Schema};
use rayon::prelude::*;
use std::path::Path;
use std::sync::Arc;

/// Load a catalog file and reject catalogs nothing can be selected from.
pub fn load_catalog(path: &Path) -> Result<Arc<Schema>> {
    let schema = Schema::load(path).map_err(|e| CliError::CatalogLoadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    if schema.tables().is_empty() {
        return Err(CliError::EmptyCatalog {
            path: path.to_path_buf(),
        }
        .into());
    }
    schema.summary();
    Ok(Arc::new(schema))
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub seed: u64,
    pub count: usize,
    pub jobs: usize,
    pub max_retries: usize,
}

/// Statements in output order plus node counts over all of them.
#[derive(Debug, Default)]
pub struct Batch {
    pub statements: Vec<String>,
    pub stats: NodeStats,
}

struct WorkerPlan {
    worker: usize,
    workers: usize,
    seed: u64,
    count: usize,
}

/// Split `count` statements over the workers. A single worker uses the root
/// seed as is; several workers each get a derived seed, their own generator
/// and a disjoint partition of the alias and column names.
fn plan(options: &BatchOptions) -> Vec<WorkerPlan> {
    let jobs = options.jobs.max(1);
    let seeds = if jobs == 1 {
        vec![options.seed]
    } else {
        derive_seeds(options.seed, jobs)
    };
    let base = options.count / jobs;
    let extra = options.count % jobs;

    seeds
        .into_iter()
        .enumerate()
        .map(|(worker, seed)| WorkerPlan {
            worker,
            workers: jobs,
            seed,
            count: base + usize::from(worker < extra),
        })
        .collect()
}

fn run_worker(schema: &Arc<Schema>, plan: &WorkerPlan, max_retries: usize) -> Result<Batch> {
    let config = GeneratorConfig::with_seed(plan.seed).max_retries(max_retries);
    let mut generator = Generator::new(Arc::clone(schema), config)
        .with_names(NameCounters::partitioned(plan.worker, plan.workers));
    let mut batch = Batch::default();

    for generated in 0..plan.count {
        let query = generator
            .generate()
            .map_err(|e| CliError::GenerationError {
                worker: plan.worker,
                seed: plan.seed,
                generated,
                source: e,
            })?;
        query.accept(&mut batch.stats);
        batch.statements.push(query.to_string());
    }

    tracing::debug!(
        worker = plan.worker,
        seed = plan.seed,
        statements = batch.statements.len(),
        "Worker finished"
    );
    Ok(batch)
}

/// Generate a batch of statements, in parallel when `jobs > 1`.
///
/// Output order is by worker, then by generation order, so a given seed,
/// job count and catalog always print the same text.
pub fn generate_batch(schema: Arc<Schema>, options: &BatchOptions) -> Result<Batch> {
    let plans = plan(options);

    let results: Vec<Result<Batch>> = plans
        .par_iter()
        .map(|p| run_worker(&schema, p, options.max_retries))
        .collect();

    let mut batch = Batch::default();
    for result in results {
        let worker = result?;
        batch.stats.merge(&worker.stats);
        batch.statements.extend(worker.statements);
    }
    Ok(batch)
}

//! Generation run state: dice, catalog, name counters.

use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::grammar::QuerySpec;
use crate::naming::NameCounters;
use crate::random::{pick_from, RandomSource, SeededRandom};
use crate::schema::{Literals, Operator, Schema};
use std::sync::Arc;

/// One generation run.
///
/// Productions borrow the generator mutably while they build, so the random
/// source and the name counters are threaded through the whole tree. Two
/// generators built from the same catalog and seed produce byte-identical
/// SQL.
pub struct Generator {
    schema: Arc<Schema>,
    rng: Box<dyn RandomSource + Send>,
    names: NameCounters,
    config: GeneratorConfig,
    queries: u64,
}

impl Generator {
    pub fn new(schema: Arc<Schema>, config: GeneratorConfig) -> Self {
        let rng = SeededRandom::new(config.seed);
        Self::with_random_source(schema, config, rng)
    }

    /// Use a caller-provided random source instead of seeding from the config.
    pub fn with_random_source(
        schema: Arc<Schema>,
        config: GeneratorConfig,
        rng: impl RandomSource + Send + 'static,
    ) -> Self {
        Self {
            schema,
            rng: Box::new(rng),
            names: NameCounters::new(),
            config,
            queries: 0,
        }
    }

    /// Replace the name counters, e.g. with one partition of a run split
    /// over several workers.
    pub fn with_names(mut self, names: NameCounters) -> Self {
        self.names = names;
        self
    }

    /// Build one top-level query.
    pub fn generate(&mut self) -> Result<QuerySpec> {
        if self.schema.tables().is_empty() {
            return Err(Error::EmptyCatalog);
        }
        let query = QuerySpec::root(self)?;
        self.queries += 1;
        tracing::debug!(query = self.queries, level = query.level(), "Generated query");
        Ok(query)
    }

    /// Build one top-level query and render it.
    pub fn generate_sql(&mut self) -> Result<String> {
        Ok(self.generate()?.to_string())
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn names(&self) -> &NameCounters {
        &self.names
    }

    pub(crate) fn names_mut(&mut self) -> &mut NameCounters {
        &mut self.names
    }

    pub(crate) fn literals(&self) -> &Literals {
        self.schema.literals()
    }

    pub(crate) fn roll(&mut self, sides: usize) -> usize {
        self.rng.roll(sides)
    }

    pub(crate) fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        pick_from(self.rng.as_mut(), items)
    }

    pub(crate) fn find_operator(&mut self, left: &str, right: &str, result: &str) -> Option<Operator> {
        self.schema
            .find_operator(self.rng.as_mut(), left, right, result)
            .cloned()
    }

    /// Run `build` until it stops rejecting, discarding every failed attempt.
    ///
    /// Rejections are retried up to `max_retries` attempts (at least one);
    /// any other error aborts immediately.
    pub(crate) fn retry<T>(
        &mut self,
        production: &'static str,
        mut build: impl FnMut(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match build(self) {
                Ok(value) => return Ok(value),
                Err(Error::Rejected(reason)) => {
                    if attempts >= self.config.max_retries {
                        tracing::warn!(production, attempts, %reason, "Retry budget exhausted");
                        return Err(Error::RetriesExhausted {
                            production,
                            attempts,
                        });
                    }
                    tracing::trace!(production, attempts, %reason, "Redrawing");
                }
                Err(e) => return Err(e),
            }
        }
    }
}

//! Alias and derived-column name counters.
//!
//! Names are unique within a generation run. Each [`crate::Generator`] owns
//! its counters. A run split over several workers gives every worker a
//! [`NameCounters::partitioned`] set: worker `w` of `n` hands out the
//! indices `w, w + n, w + 2n, ...`, so no two workers ever share a name.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCounters {
    table_alias: u64,
    subquery: u64,
    column: u64,
    start: u64,
    stride: u64,
}

impl Default for NameCounters {
    fn default() -> Self {
        Self::partitioned(0, 1)
    }
}

impl NameCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters for worker `worker` of `workers`.
    ///
    /// `workers == 0` is treated as one worker.
    pub fn partitioned(worker: usize, workers: usize) -> Self {
        let start = worker as u64;
        Self {
            table_alias: start,
            subquery: start,
            column: start,
            start,
            stride: workers.max(1) as u64,
        }
    }

    /// `rel0`, `rel1`, ...
    pub fn next_table_alias(&mut self) -> String {
        let name = format!("rel{}", self.table_alias);
        self.table_alias += self.stride;
        name
    }

    /// `subq_0`, `subq_1`, ...
    pub fn next_subquery_alias(&mut self) -> String {
        let name = format!("subq_{}", self.subquery);
        self.subquery += self.stride;
        name
    }

    /// `c0`, `c1`, ...
    pub fn next_column(&mut self) -> String {
        let name = format!("c{}", self.column);
        self.column += self.stride;
        name
    }

    /// Start a new run in the same partition. Never call this while a run is
    /// in progress.
    pub fn reset(&mut self) {
        self.table_alias = self.start;
        self.subquery = self.start;
        self.column = self.start;
    }
}

use super::TableRef;
use crate::error::Result;
use crate::generator::Generator;
use crate::relmodel::Scope;
use std::fmt::{self, Display};
use std::sync::Arc;

/// A FROM clause with exactly one table reference.
#[derive(Debug, Clone)]
pub struct FromClause {
    table_ref: TableRef,
    level: usize,
}

impl FromClause {
    /// Build the table reference tree, then publish every relation it
    /// introduces into `scope`.
    pub fn new(gen: &mut Generator, scope: &mut Scope, parent_level: usize) -> Result<Self> {
        let level = parent_level + 1;
        let table_ref = TableRef::factory(gen, scope, level)?;
        for relation in table_ref.refs() {
            scope.push_ref(Arc::clone(relation));
        }
        Ok(Self { table_ref, level })
    }

    pub fn table_ref(&self) -> &TableRef {
        &self.table_ref
    }

    pub fn level(&self) -> usize {
        self.level
    }
}

impl Display for FromClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n from {}", self.table_ref)
    }
}

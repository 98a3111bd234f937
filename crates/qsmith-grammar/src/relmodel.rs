//! Relations and the scopes that make them visible.

use crate::schema::{Column, Schema, Table};
use std::fmt;
use std::sync::Arc;

/// Anything with an identity and an ordered list of typed columns.
pub trait NamedRelation: fmt::Debug + Send + Sync {
    fn ident(&self) -> &str;
    fn columns(&self) -> &[Column];
}

impl NamedRelation for Table {
    fn ident(&self) -> &str {
        &self.name
    }

    fn columns(&self) -> &[Column] {
        &self.columns
    }
}

/// Output shape of a select list, usable as a FROM-clause source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedRelation {
    columns: Vec<Column>,
}

impl DerivedRelation {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn push(&mut self, column: Column) {
        self.columns.push(column);
    }
}

impl NamedRelation for DerivedRelation {
    fn ident(&self) -> &str {
        "derived_table"
    }

    fn columns(&self) -> &[Column] {
        &self.columns
    }
}

/// A relation exposed under an alias by a table reference.
#[derive(Debug, Clone)]
pub struct AliasedRelation {
    alias: String,
    relation: Arc<dyn NamedRelation>,
}

impl AliasedRelation {
    pub fn new(alias: impl Into<String>, relation: Arc<dyn NamedRelation>) -> Self {
        Self {
            alias: alias.into(),
            relation,
        }
    }

    /// The alias; column references are qualified with it.
    pub fn ident(&self) -> &str {
        &self.alias
    }

    pub fn relation(&self) -> &Arc<dyn NamedRelation> {
        &self.relation
    }

    pub fn columns(&self) -> &[Column] {
        self.relation.columns()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns().iter().find(|c| c.name == name)
    }
}

/// Tables and aliased relations visible at one nesting level.
///
/// `tables` is shared with every ancestor and never changes. `refs` belongs to
/// this level alone: it is filled by the level's FROM clause once its table
/// reference tree is built. A correlated child starts out with its parent's
/// refs passed through; the first `inherited` entries are those.
#[derive(Debug, Clone)]
pub struct Scope {
    tables: Arc<[Arc<Table>]>,
    refs: Vec<Arc<AliasedRelation>>,
    inherited: usize,
}

impl Scope {
    pub fn root(schema: &Schema) -> Self {
        Self {
            tables: schema.tables().iter().cloned().collect(),
            refs: Vec::new(),
            inherited: 0,
        }
    }

    /// A nested scope that sees the table catalog but none of our aliases.
    pub fn child(&self) -> Self {
        Self {
            tables: Arc::clone(&self.tables),
            refs: Vec::new(),
            inherited: 0,
        }
    }

    /// A nested scope that can also reference every alias visible here.
    pub fn correlated(&self) -> Self {
        Self {
            tables: Arc::clone(&self.tables),
            refs: self.refs.clone(),
            inherited: self.refs.len(),
        }
    }

    pub fn tables(&self) -> &[Arc<Table>] {
        &self.tables
    }

    pub fn refs(&self) -> &[Arc<AliasedRelation>] {
        &self.refs
    }

    /// Relations introduced by this level's own FROM clause.
    pub fn local_refs(&self) -> &[Arc<AliasedRelation>] {
        &self.refs[self.inherited..]
    }

    pub fn push_ref(&mut self, relation: Arc<AliasedRelation>) {
        self.refs.push(relation);
    }

    /// Whether `alias.column` names a column visible in this scope.
    pub fn resolves(&self, alias: &str, column: &str) -> bool {
        self.refs
            .iter()
            .any(|r| r.ident() == alias && r.column(column).is_some())
    }
}

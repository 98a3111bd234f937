//! The resolved catalog the grammar draws from.
//!
//! Loading a catalog from a live database is somebody else's job; this module
//! only consumes the result, either built in code or read from a YAML file:
//!
//! ```yaml
//! tables:
//!   - name: t1
//!     columns:
//!       - { name: id, type: integer }
//!       - { name: x, type: text }
//! operators:
//!   - { name: "=", left: integer, right: integer, result: boolean }
//! ```

use crate::error::{Error, Result};
use crate::random::{pick_from, RandomSource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Result type every predicate operator must produce.
pub const BOOLEAN: &str = "boolean";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Table {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }
}

/// A binary operator with its type signature and infix symbol.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Operator {
    pub name: String,
    pub left: String,
    pub right: String,
    pub result: String,
}

impl Operator {
    pub fn new(
        name: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
        result: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            left: left.into(),
            right: right.into(),
            result: result.into(),
        }
    }

    pub fn key(&self) -> TypeKey {
        (self.left.clone(), self.right.clone(), self.result.clone())
    }
}

/// `(left, right, result)` type triple.
pub type TypeKey = (String, String, String);

/// How literals are typed and spelled in the target dialect.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Literals {
    #[serde(default = "default_literal_type")]
    pub literal_type: String,
    #[serde(default = "default_true_literal")]
    pub true_literal: String,
    #[serde(default = "default_false_literal")]
    pub false_literal: String,
}

fn default_literal_type() -> String {
    "integer".to_string()
}

fn default_true_literal() -> String {
    "true".to_string()
}

fn default_false_literal() -> String {
    "false".to_string()
}

impl Default for Literals {
    fn default() -> Self {
        Self {
            literal_type: default_literal_type(),
            true_literal: default_true_literal(),
            false_literal: default_false_literal(),
        }
    }
}

/// Serialized form of a catalog snapshot.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Catalog {
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub operators: Vec<Operator>,
    #[serde(default)]
    pub literals: Literals,
}

/// Tables and operators available to the generator. Immutable once
/// generation starts; share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    tables: Vec<Arc<Table>>,
    operators: Vec<Operator>,
    index: BTreeMap<TypeKey, Vec<Operator>>,
    literals: Literals,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_catalog(catalog: Catalog) -> Self {
        let mut schema = Schema {
            literals: catalog.literals,
            ..Schema::default()
        };
        for table in catalog.tables {
            schema.add_table(table);
        }
        for op in catalog.operators {
            schema.register_operator(op);
        }
        schema
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let catalog: Catalog = serde_yaml::from_str(yaml)?;
        Ok(Self::from_catalog(catalog))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::CatalogRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn add_table(&mut self, table: Table) -> &mut Self {
        self.tables.push(Arc::new(table));
        self
    }

    pub fn register_operator(&mut self, op: Operator) -> &mut Self {
        self.index.entry(op.key()).or_default().push(op.clone());
        self.operators.push(op);
        self
    }

    pub fn with_literals(&mut self, literals: Literals) -> &mut Self {
        self.literals = literals;
        self
    }

    /// Pick uniformly among the operators registered under the triple.
    pub fn find_operator(
        &self,
        rng: &mut dyn RandomSource,
        left: &str,
        right: &str,
        result: &str,
    ) -> Option<&Operator> {
        let key = (left.to_string(), right.to_string(), result.to_string());
        let candidates = self.index.get(&key)?;
        pick_from(rng, candidates)
    }

    /// Every operator registered under the triple, in registration order.
    pub fn operators_for(&self, left: &str, right: &str, result: &str) -> &[Operator] {
        let key = (left.to_string(), right.to_string(), result.to_string());
        self.index.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn tables(&self) -> &[Arc<Table>] {
        &self.tables
    }

    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    pub fn literals(&self) -> &Literals {
        &self.literals
    }

    pub fn summary(&self) {
        tracing::info!(
            tables = self.tables.len(),
            operators = self.operators.len(),
            "Found {} table(s) and {} operator(s) in catalog",
            self.tables.len(),
            self.operators.len()
        );
    }
}

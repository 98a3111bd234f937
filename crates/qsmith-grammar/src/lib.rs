//! Schema-aware random SQL query generation.
//!
//! This crate builds well-typed `select` statements by randomly expanding a
//! query grammar against a resolved catalog, for fuzzing relational database
//! engines. Generation is deterministic: the same catalog and seed always
//! produce the same SQL text.
//!
//! # Quick Start
//!
//! ```rust
//! use qsmith_grammar::{Generator, GeneratorConfig, Schema};
//! use std::sync::Arc;
//!
//! let schema = Schema::from_yaml_str(r#"
//! tables:
//!   - name: t
//!     columns:
//!       - { name: a, type: integer }
//!       - { name: b, type: text }
//! operators:
//!   - { name: "=", left: integer, right: integer, result: boolean }
//!   - { name: "=", left: text, right: text, result: boolean }
//! "#).unwrap();
//!
//! let mut generator = Generator::new(Arc::new(schema), GeneratorConfig::with_seed(7));
//! let sql = generator.generate_sql().unwrap();
//! assert!(sql.starts_with("select "));
//! ```
//!
//! # Walking a tree
//!
//! ```rust
//! # use qsmith_grammar::{Generator, GeneratorConfig, Schema};
//! # use std::sync::Arc;
//! use qsmith_grammar::visitor::{Accept, NodeStats};
//! # let schema = Schema::from_yaml_str(r#"
//! # tables: [{ name: t, columns: [{ name: a, type: integer }] }]
//! # operators: [{ name: "=", left: integer, right: integer, result: boolean }]
//! # "#).unwrap();
//! # let mut generator = Generator::new(Arc::new(schema), GeneratorConfig::default());
//!
//! let query = generator.generate().unwrap();
//! let mut stats = NodeStats::new();
//! query.accept(&mut stats);
//! assert!(stats.count("query_spec") >= 1);
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod grammar;
pub mod naming;
pub mod random;
pub mod relmodel;
pub mod schema;
pub mod visitor;

pub use config::GeneratorConfig;
pub use error::{Error, Rejection, Result};
pub use generator::Generator;
pub use grammar::{BoolExpr, FromClause, QuerySpec, SelectList, TableRef, ValueExpr};
pub use naming::NameCounters;
pub use random::{derive_seeds, RandomSource, ScriptedRandom, SeededRandom};
pub use relmodel::{AliasedRelation, DerivedRelation, NamedRelation, Scope};
pub use schema::{Catalog, Column, Literals, Operator, Schema, Table};
pub use visitor::{Accept, NodeStats, Production, SubqueryCollector, Visitor};

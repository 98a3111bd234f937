//! Production nodes of the query grammar.
//!
//! Every node is built by a constructor that draws from the [`Generator`]
//! and either returns a fully valid subtree or an error; nothing partially
//! built is ever linked into a parent. Each node records its nesting level
//! (parent level + 1, the root query is level 0) and renders itself through
//! `Display`.
//!
//! [`Generator`]: crate::Generator

pub mod bool_expr;
pub mod from_clause;
pub mod query_spec;
pub mod select_list;
pub mod table_ref;
pub mod value_expr;

pub use bool_expr::{
    BoolExpr, BoolOp, BoolTerm, ComparisonOp, ExistsPredicate, NullPredicate, TruthValue,
};
pub use from_clause::FromClause;
pub use query_spec::QuerySpec;
pub use select_list::SelectList;
pub use table_ref::{BaseTableRef, JoinCondition, JoinKind, JoinedTableRef, SubqueryRef, TableRef};
pub use value_expr::{ColumnRef, ConstExpr, ValueExpr};

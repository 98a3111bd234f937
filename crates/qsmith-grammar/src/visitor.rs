//! Traversal over generated trees.
//!
//! Every node visits itself before its children, except [`SubqueryRef`],
//! which descends into its nested query first and visits itself last.
//! [`ExistsPredicate`] is the opposite: itself first, then its subquery.
//! Consumers such as [`SubqueryCollector`] depend on this order.

use crate::grammar::*;
use std::collections::BTreeMap;
use std::fmt::{self, Display};

/// A borrowed production node.
#[derive(Debug, Clone, Copy)]
pub enum Production<'a> {
    QuerySpec(&'a QuerySpec),
    FromClause(&'a FromClause),
    BaseTableRef(&'a BaseTableRef),
    SubqueryRef(&'a SubqueryRef),
    JoinedTableRef(&'a JoinedTableRef),
    SelectList(&'a SelectList),
    ConstExpr(&'a ConstExpr),
    ColumnRef(&'a ColumnRef),
    ComparisonOp(&'a ComparisonOp),
    BoolTerm(&'a BoolTerm),
    NullPredicate(&'a NullPredicate),
    TruthValue(&'a TruthValue),
    ExistsPredicate(&'a ExistsPredicate),
}

impl<'a> Production<'a> {
    pub fn kind(&self) -> &'static str {
        match self {
            Production::QuerySpec(_) => "query_spec",
            Production::FromClause(_) => "from_clause",
            Production::BaseTableRef(_) => "table_or_query_name",
            Production::SubqueryRef(_) => "table_subquery",
            Production::JoinedTableRef(_) => "joined_table",
            Production::SelectList(_) => "select_list",
            Production::ConstExpr(_) => "const_expr",
            Production::ColumnRef(_) => "column_reference",
            Production::ComparisonOp(_) => "comparison_op",
            Production::BoolTerm(_) => "bool_term",
            Production::NullPredicate(_) => "null_predicate",
            Production::TruthValue(_) => "truth_value",
            Production::ExistsPredicate(_) => "exists_predicate",
        }
    }

    pub fn level(&self) -> usize {
        match self {
            Production::QuerySpec(p) => p.level(),
            Production::FromClause(p) => p.level(),
            Production::BaseTableRef(p) => p.level(),
            Production::SubqueryRef(p) => p.level(),
            Production::JoinedTableRef(p) => p.level(),
            Production::SelectList(p) => p.level(),
            Production::ConstExpr(p) => p.level(),
            Production::ColumnRef(p) => p.level(),
            Production::ComparisonOp(p) => p.level(),
            Production::BoolTerm(p) => p.level(),
            Production::NullPredicate(p) => p.level(),
            Production::TruthValue(p) => p.level(),
            Production::ExistsPredicate(p) => p.level(),
        }
    }
}

pub trait Visitor<'a> {
    fn visit(&mut self, production: Production<'a>);
}

pub trait Accept {
    fn accept<'a>(&'a self, visitor: &mut dyn Visitor<'a>);
}

impl Accept for QuerySpec {
    fn accept<'a>(&'a self, visitor: &mut dyn Visitor<'a>) {
        visitor.visit(Production::QuerySpec(self));
        self.from_clause().accept(visitor);
        self.select_list().accept(visitor);
        self.search().accept(visitor);
    }
}

impl Accept for FromClause {
    fn accept<'a>(&'a self, visitor: &mut dyn Visitor<'a>) {
        visitor.visit(Production::FromClause(self));
        self.table_ref().accept(visitor);
    }
}

impl Accept for TableRef {
    fn accept<'a>(&'a self, visitor: &mut dyn Visitor<'a>) {
        match self {
            TableRef::Base(t) => visitor.visit(Production::BaseTableRef(t)),
            TableRef::Subquery(t) => {
                t.query().accept(visitor);
                visitor.visit(Production::SubqueryRef(t));
            }
            TableRef::Joined(t) => {
                visitor.visit(Production::JoinedTableRef(t));
                t.lhs().accept(visitor);
                t.rhs().accept(visitor);
            }
        }
    }
}

impl Accept for SelectList {
    fn accept<'a>(&'a self, visitor: &mut dyn Visitor<'a>) {
        visitor.visit(Production::SelectList(self));
        for expr in self.exprs() {
            expr.accept(visitor);
        }
    }
}

impl Accept for ValueExpr {
    fn accept<'a>(&'a self, visitor: &mut dyn Visitor<'a>) {
        match self {
            ValueExpr::Const(e) => visitor.visit(Production::ConstExpr(e)),
            ValueExpr::Column(e) => visitor.visit(Production::ColumnRef(e)),
        }
    }
}

impl Accept for BoolExpr {
    fn accept<'a>(&'a self, visitor: &mut dyn Visitor<'a>) {
        match self {
            BoolExpr::Comparison(e) => {
                visitor.visit(Production::ComparisonOp(e));
                e.lhs().accept(visitor);
                e.rhs().accept(visitor);
            }
            BoolExpr::Term(e) => {
                visitor.visit(Production::BoolTerm(e));
                e.lhs().accept(visitor);
                e.rhs().accept(visitor);
            }
            BoolExpr::Null(e) => {
                visitor.visit(Production::NullPredicate(e));
                e.expr().accept(visitor);
            }
            BoolExpr::Truth(e) => visitor.visit(Production::TruthValue(e)),
            BoolExpr::Exists(e) => {
                visitor.visit(Production::ExistsPredicate(e));
                e.subquery().accept(visitor);
            }
        }
    }
}

/// Node counts per production kind.
#[derive(Debug, Clone, Default)]
pub struct NodeStats {
    counts: BTreeMap<&'static str, usize>,
    max_level: usize,
    nodes: usize,
}

impl NodeStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, kind: &str) -> usize {
        self.counts.get(kind).copied().unwrap_or(0)
    }

    pub fn nodes(&self) -> usize {
        self.nodes
    }

    pub fn max_level(&self) -> usize {
        self.max_level
    }

    /// Fold another tally into this one.
    pub fn merge(&mut self, other: &NodeStats) {
        for (kind, n) in &other.counts {
            *self.counts.entry(*kind).or_default() += n;
        }
        self.nodes += other.nodes;
        self.max_level = self.max_level.max(other.max_level);
    }
}

impl<'a> Visitor<'a> for NodeStats {
    fn visit(&mut self, production: Production<'a>) {
        *self.counts.entry(production.kind()).or_default() += 1;
        self.nodes += 1;
        self.max_level = self.max_level.max(production.level());
    }
}

impl Display for NodeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} nodes, max level {}", self.nodes, self.max_level)?;
        for (kind, n) in &self.counts {
            writeln!(f, "  {:<20} {}", kind, n)?;
        }
        Ok(())
    }
}

/// Nested queries (derived tables and EXISTS subqueries) in visit order.
#[derive(Debug, Default)]
pub struct SubqueryCollector<'a> {
    pub subqueries: Vec<&'a QuerySpec>,
}

impl<'a> SubqueryCollector<'a> {
    pub fn new() -> Self {
        Self {
            subqueries: Vec::new(),
        }
    }
}

impl<'a> Visitor<'a> for SubqueryCollector<'a> {
    fn visit(&mut self, production: Production<'a>) {
        match production {
            Production::SubqueryRef(t) => self.subqueries.push(t.query()),
            Production::ExistsPredicate(e) => self.subqueries.push(e.subquery()),
            _ => {}
        }
    }
}

//! FROM-clause items: base tables, derived tables and joins.

use super::QuerySpec;
use crate::error::{Error, Rejection, Result};
use crate::generator::Generator;
use crate::relmodel::{AliasedRelation, NamedRelation, Scope};
use crate::schema::{Column, Table};
use std::fmt::{self, Display};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum TableRef {
    Base(BaseTableRef),
    Subquery(SubqueryRef),
    Joined(JoinedTableRef),
}

impl TableRef {
    /// Draw a table reference below a node at `parent_level`.
    ///
    /// The deeper the parent, the likelier the terminal base-table variant,
    /// which keeps the recursion finite in practice.
    pub fn factory(gen: &mut Generator, scope: &Scope, parent_level: usize) -> Result<Self> {
        if parent_level < gen.roll(6) {
            if gen.roll(6) <= 3 {
                Ok(TableRef::Subquery(SubqueryRef::new(gen, scope, parent_level)?))
            } else {
                Ok(TableRef::Joined(JoinedTableRef::new(gen, scope, parent_level)?))
            }
        } else {
            Ok(TableRef::Base(BaseTableRef::new(gen, scope, parent_level)?))
        }
    }

    /// Every relation this item introduces, left to right.
    pub fn refs(&self) -> &[Arc<AliasedRelation>] {
        match self {
            TableRef::Base(t) => std::slice::from_ref(&t.alias),
            TableRef::Subquery(t) => std::slice::from_ref(&t.alias),
            TableRef::Joined(t) => &t.refs,
        }
    }

    /// The leftmost relation. Every variant introduces at least one.
    pub fn primary(&self) -> &Arc<AliasedRelation> {
        match self {
            TableRef::Base(t) => &t.alias,
            TableRef::Subquery(t) => &t.alias,
            TableRef::Joined(t) => t.lhs.primary(),
        }
    }

    pub fn level(&self) -> usize {
        match self {
            TableRef::Base(t) => t.level,
            TableRef::Subquery(t) => t.level,
            TableRef::Joined(t) => t.level,
        }
    }
}

impl Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableRef::Base(t) => write!(f, "{}", t),
            TableRef::Subquery(t) => write!(f, "{}", t),
            TableRef::Joined(t) => write!(f, "{}", t),
        }
    }
}

/// A catalog table under a fresh `relN` alias.
#[derive(Debug, Clone)]
pub struct BaseTableRef {
    table: Arc<Table>,
    alias: Arc<AliasedRelation>,
    level: usize,
}

impl BaseTableRef {
    pub fn new(gen: &mut Generator, scope: &Scope, parent_level: usize) -> Result<Self> {
        let table = gen.pick(scope.tables()).cloned().ok_or(Error::EmptyCatalog)?;
        let alias = gen.names_mut().next_table_alias();
        let relation: Arc<dyn NamedRelation> = table.clone();
        Ok(Self {
            alias: Arc::new(AliasedRelation::new(alias, relation)),
            table,
            level: parent_level + 1,
        })
    }

    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    pub fn alias(&self) -> &Arc<AliasedRelation> {
        &self.alias
    }

    pub fn level(&self) -> usize {
        self.level
    }
}

impl Display for BaseTableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} as {}", self.table.name, self.alias.ident())
    }
}

/// A nested query in the FROM clause, exposed as its select list's shape.
///
/// The nested query sees the table catalog but none of the enclosing
/// query's aliases.
#[derive(Debug, Clone)]
pub struct SubqueryRef {
    query: Box<QuerySpec>,
    alias: Arc<AliasedRelation>,
    level: usize,
}

impl SubqueryRef {
    pub fn new(gen: &mut Generator, scope: &Scope, parent_level: usize) -> Result<Self> {
        let level = parent_level + 1;
        let alias = gen.names_mut().next_subquery_alias();
        let query = QuerySpec::nested(gen, scope.child(), parent_level)?;
        let derived: Arc<dyn NamedRelation> = query.select_list().derived_table().clone();
        Ok(Self {
            alias: Arc::new(AliasedRelation::new(alias, derived)),
            query: Box::new(query),
            level,
        })
    }

    pub fn query(&self) -> &QuerySpec {
        &self.query
    }

    pub fn alias(&self) -> &Arc<AliasedRelation> {
        &self.alias
    }

    pub fn level(&self) -> usize {
        self.level
    }
}

impl Display for SubqueryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) as {}", self.query, self.alias.ident())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
}

impl JoinKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinKind::Inner => "inner",
            JoinKind::Left => "left",
            JoinKind::Right => "right",
        }
    }
}

/// Equality between two columns of the same type.
#[derive(Debug, Clone)]
pub struct JoinCondition {
    pub lhs: Arc<AliasedRelation>,
    pub lhs_column: Column,
    pub rhs: Arc<AliasedRelation>,
    pub rhs_column: Column,
}

impl Display for JoinCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} = {}.{}",
            self.lhs.ident(),
            self.lhs_column.name,
            self.rhs.ident(),
            self.rhs_column.name
        )
    }
}

#[derive(Debug, Clone)]
pub struct JoinedTableRef {
    lhs: Box<TableRef>,
    rhs: Box<TableRef>,
    kind: JoinKind,
    condition: JoinCondition,
    refs: Vec<Arc<AliasedRelation>>,
    level: usize,
}

impl JoinedTableRef {
    /// Join two freshly drawn table references.
    ///
    /// A random column of the left side's first relation is matched against
    /// the first column of the same type on the right side's first relation.
    /// When the left side has no columns or the right side has no match, both
    /// sides are thrown away and redrawn. Catalogs without any type-compatible
    /// column pair therefore end in `RetriesExhausted`.
    pub fn new(gen: &mut Generator, scope: &Scope, parent_level: usize) -> Result<Self> {
        let level = parent_level + 1;

        let (lhs, rhs, condition) = gen.retry("joined_table", |gen| {
            let lhs = TableRef::factory(gen, scope, level)?;
            let rhs = TableRef::factory(gen, scope, level)?;

            let left = Arc::clone(lhs.primary());
            let lhs_column = gen
                .pick(left.columns())
                .cloned()
                .ok_or_else(|| Rejection::NoColumns {
                    relation: left.ident().to_string(),
                })?;

            let right = Arc::clone(rhs.primary());
            let rhs_column = right
                .columns()
                .iter()
                .find(|c| c.ty == lhs_column.ty)
                .cloned()
                .ok_or_else(|| Rejection::NoJoinColumn {
                    relation: right.ident().to_string(),
                    column_type: lhs_column.ty.clone(),
                })?;

            let condition = JoinCondition {
                lhs: left,
                lhs_column,
                rhs: right,
                rhs_column,
            };
            Ok((lhs, rhs, condition))
        })?;

        let kind = if gen.roll(6) < 4 {
            JoinKind::Inner
        } else if gen.roll(6) < 4 {
            JoinKind::Left
        } else {
            JoinKind::Right
        };

        let refs = lhs.refs().iter().chain(rhs.refs()).cloned().collect();

        Ok(Self {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            kind,
            condition,
            refs,
            level,
        })
    }

    pub fn lhs(&self) -> &TableRef {
        &self.lhs
    }

    pub fn rhs(&self) -> &TableRef {
        &self.rhs
    }

    pub fn kind(&self) -> JoinKind {
        self.kind
    }

    pub fn condition(&self) -> &JoinCondition {
        &self.condition
    }

    pub fn refs(&self) -> &[Arc<AliasedRelation>] {
        &self.refs
    }

    pub fn level(&self) -> usize {
        self.level
    }
}

impl Display for JoinedTableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} join {} on ({})",
            self.lhs,
            self.kind.as_str(),
            self.rhs,
            self.condition
        )
    }
}

use super::{BoolExpr, FromClause, SelectList};
use crate::error::Result;
use crate::generator::Generator;
use crate::relmodel::Scope;
use std::fmt::{self, Display};

/// A complete `select` statement.
///
/// Built strictly in order: FROM clause (fills the scope), select list and
/// search condition (both draw from the filled scope), then the optional
/// row limit.
#[derive(Debug, Clone)]
pub struct QuerySpec {
    scope: Scope,
    from_clause: FromClause,
    select_list: SelectList,
    set_quantifier: String,
    search: BoolExpr,
    limit: Option<usize>,
    level: usize,
}

impl QuerySpec {
    /// Top-level query over the generator's whole catalog.
    pub fn root(gen: &mut Generator) -> Result<Self> {
        let scope = Scope::root(gen.schema());
        Self::build(gen, scope, 0)
    }

    /// Query at `parent_level + 1`, owning `scope`. A derived table or EXISTS
    /// subquery passes its own parent level, so the nested query sits at the
    /// same level as the node holding it.
    pub fn nested(gen: &mut Generator, scope: Scope, parent_level: usize) -> Result<Self> {
        Self::build(gen, scope, parent_level + 1)
    }

    fn build(gen: &mut Generator, mut scope: Scope, level: usize) -> Result<Self> {
        let from_clause = FromClause::new(gen, &mut scope, level)?;
        let select_list = SelectList::new(gen, &scope, level)?;
        // DISTINCT is never drawn
        let set_quantifier = String::new();
        let search = BoolExpr::factory(gen, &scope, level)?;

        let limit = if gen.roll(6) > 2 {
            Some(gen.roll(100) + gen.roll(100))
        } else {
            None
        };

        Ok(Self {
            scope,
            from_clause,
            select_list,
            set_quantifier,
            search,
            limit,
            level,
        })
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn from_clause(&self) -> &FromClause {
        &self.from_clause
    }

    pub fn select_list(&self) -> &SelectList {
        &self.select_list
    }

    pub fn set_quantifier(&self) -> &str {
        &self.set_quantifier
    }

    pub fn search(&self) -> &BoolExpr {
        &self.search
    }

    /// Row count of the `fetch first` clause, in `[2, 200]` when present.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn level(&self) -> usize {
        self.level
    }
}

impl Display for QuerySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "select {} {} {} where {} ",
            self.set_quantifier, self.select_list, self.from_clause, self.search
        )?;
        if let Some(rows) = self.limit {
            write!(f, "fetch first {} rows only", rows)?;
        }
        Ok(())
    }
}

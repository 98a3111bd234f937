use super::ValueExpr;
use crate::error::Result;
use crate::generator::Generator;
use crate::relmodel::{DerivedRelation, NamedRelation, Scope};
use crate::schema::Column;
use std::fmt::{self, Display};
use std::sync::Arc;

/// `expr as cN, ...` plus the relation shape those columns form.
#[derive(Debug, Clone)]
pub struct SelectList {
    exprs: Vec<ValueExpr>,
    derived_table: Arc<DerivedRelation>,
    level: usize,
}

impl SelectList {
    /// At least one expression; after each, another follows five times in six.
    pub fn new(gen: &mut Generator, scope: &Scope, parent_level: usize) -> Result<Self> {
        let level = parent_level + 1;
        let mut exprs = Vec::new();
        let mut derived = DerivedRelation::default();

        loop {
            let expr = ValueExpr::factory(gen, scope, level)?;
            let name = gen.names_mut().next_column();
            derived.push(Column::new(name, expr.ty()));
            exprs.push(expr);
            if gen.roll(6) == 1 {
                break;
            }
        }

        Ok(Self {
            exprs,
            derived_table: Arc::new(derived),
            level,
        })
    }

    pub fn exprs(&self) -> &[ValueExpr] {
        &self.exprs
    }

    pub fn derived_table(&self) -> &Arc<DerivedRelation> {
        &self.derived_table
    }

    /// Output column names, in select-list order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.derived_table.columns().iter().map(|c| c.name.as_str())
    }

    pub fn level(&self) -> usize {
        self.level
    }
}

impl Display for SelectList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (expr, name)) in self.exprs.iter().zip(self.names()).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} as {}", expr, name)?;
        }
        Ok(())
    }
}

//! Scalar expressions.

use crate::error::{Rejection, Result};
use crate::generator::Generator;
use crate::relmodel::{AliasedRelation, Scope};
use crate::schema::Column;
use std::fmt::{self, Display};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum ValueExpr {
    Const(ConstExpr),
    Column(ColumnRef),
}

impl ValueExpr {
    /// One time in 42 a literal, otherwise a column visible in `scope`.
    ///
    /// A column draw fails when the scope has no relations or the chosen
    /// relation has no columns; the whole draw is then repeated.
    pub fn factory(gen: &mut Generator, scope: &Scope, parent_level: usize) -> Result<Self> {
        gen.retry("value_expr", |gen| {
            if gen.roll(42) == 1 {
                Ok(ValueExpr::Const(ConstExpr::new(gen, parent_level)))
            } else {
                Ok(ValueExpr::Column(ColumnRef::new(gen, scope, parent_level)?))
            }
        })
    }

    /// Type tag of the value.
    pub fn ty(&self) -> &str {
        match self {
            ValueExpr::Const(c) => &c.ty,
            ValueExpr::Column(c) => &c.column.ty,
        }
    }

    pub fn level(&self) -> usize {
        match self {
            ValueExpr::Const(c) => c.level,
            ValueExpr::Column(c) => c.level,
        }
    }
}

impl Display for ValueExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueExpr::Const(c) => write!(f, "{}", c),
            ValueExpr::Column(c) => write!(f, "{}", c),
        }
    }
}

/// An integer literal typed with the catalog's literal type.
#[derive(Debug, Clone)]
pub struct ConstExpr {
    ty: String,
    value: i64,
    level: usize,
}

impl ConstExpr {
    pub fn new(gen: &mut Generator, parent_level: usize) -> Self {
        let ty = gen.literals().literal_type.clone();
        let value = gen.roll(100) as i64 - 1;
        Self {
            ty,
            value,
            level: parent_level + 1,
        }
    }

    pub fn ty(&self) -> &str {
        &self.ty
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn level(&self) -> usize {
        self.level
    }
}

impl Display for ConstExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// `alias.column`, resolved against the scope at construction time.
#[derive(Debug, Clone)]
pub struct ColumnRef {
    relation: Arc<AliasedRelation>,
    column: Column,
    level: usize,
}

impl ColumnRef {
    pub fn new(gen: &mut Generator, scope: &Scope, parent_level: usize) -> Result<Self> {
        let relation = gen
            .pick(scope.refs())
            .cloned()
            .ok_or(Rejection::EmptyScope)?;
        let column = gen
            .pick(relation.columns())
            .cloned()
            .ok_or_else(|| Rejection::NoColumns {
                relation: relation.ident().to_string(),
            })?;
        Ok(Self {
            relation,
            column,
            level: parent_level + 1,
        })
    }

    pub fn relation(&self) -> &Arc<AliasedRelation> {
        &self.relation
    }

    pub fn column(&self) -> &Column {
        &self.column
    }

    pub fn level(&self) -> usize {
        self.level
    }
}

impl Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.relation.ident(), self.column.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::random::ScriptedRandom;
    use crate::relmodel::NamedRelation;
    use crate::schema::{Schema, Table};

    fn generator(rolls: Vec<usize>) -> (Generator, Scope) {
        let mut schema = Schema::new();
        schema.add_table(Table::new(
            "t",
            vec![Column::new("a", "integer"), Column::new("b", "text")],
        ));
        schema.add_table(Table::new("hollow", vec![]));
        let schema = Arc::new(schema);
        let scope = Scope::root(&schema);
        let gen = Generator::with_random_source(
            schema,
            GeneratorConfig::default(),
            ScriptedRandom::new(rolls),
        );
        (gen, scope)
    }

    fn alias(scope: &mut Scope, alias: &str, table: &Arc<Table>) {
        let relation: Arc<dyn NamedRelation> = table.clone();
        scope.push_ref(Arc::new(AliasedRelation::new(alias, relation)));
    }

    #[test]
    fn test_column_ref_adopts_column_type() {
        // not a literal, first relation, second column
        let (mut gen, mut scope) = generator(vec![2, 1, 2]);
        let t = scope.tables()[0].clone();
        alias(&mut scope, "rel0", &t);

        let expr = ValueExpr::factory(&mut gen, &scope, 3).unwrap();
        assert_eq!(expr.to_string(), "rel0.b");
        assert_eq!(expr.ty(), "text");
        assert_eq!(expr.level(), 4);
    }

    #[test]
    fn test_literal_uses_catalog_literal_type() {
        let (mut gen, scope) = generator(vec![1, 8]);
        let expr = ValueExpr::factory(&mut gen, &scope, 0).unwrap();
        assert!(matches!(expr, ValueExpr::Const(_)));
        assert_eq!(expr.to_string(), "7");
        assert_eq!(expr.ty(), "integer");
    }

    #[test]
    fn test_empty_relation_is_redrawn() {
        // column attempt on the hollow relation fails, second attempt hits t.a
        let (mut gen, mut scope) = generator(vec![2, 2, 2, 1, 1]);
        let t = scope.tables()[0].clone();
        let hollow = scope.tables()[1].clone();
        alias(&mut scope, "rel0", &t);
        alias(&mut scope, "rel1", &hollow);

        let expr = ValueExpr::factory(&mut gen, &scope, 0).unwrap();
        assert_eq!(expr.to_string(), "rel0.a");
    }

    #[test]
    fn test_empty_scope_is_rejected() {
        let (mut gen, scope) = generator(vec![2]);
        let err = ColumnRef::new(&mut gen, &scope, 0).unwrap_err();
        assert!(err.is_recoverable());
    }
}

//! Predicates.

use super::{QuerySpec, ValueExpr};
use crate::error::{Rejection, Result};
use crate::generator::Generator;
use crate::relmodel::Scope;
use crate::schema::{Operator, BOOLEAN};
use std::fmt::{self, Display};

#[derive(Debug, Clone)]
pub enum BoolExpr {
    Comparison(ComparisonOp),
    Term(BoolTerm),
    Null(NullPredicate),
    Truth(TruthValue),
    Exists(ExistsPredicate),
}

impl BoolExpr {
    /// Draw a predicate.
    ///
    /// The variant is chosen by a cascade of coin flips, each taking half of
    /// what is left: comparison 1/2, and/or term 1/4, null test 1/8, truth
    /// value 1/16, EXISTS 1/16.
    pub fn factory(gen: &mut Generator, scope: &Scope, parent_level: usize) -> Result<Self> {
        if gen.roll(6) < 4 {
            Ok(BoolExpr::Comparison(ComparisonOp::new(gen, scope, parent_level)?))
        } else if gen.roll(6) < 4 {
            Ok(BoolExpr::Term(BoolTerm::new(gen, scope, parent_level)?))
        } else if gen.roll(6) < 4 {
            Ok(BoolExpr::Null(NullPredicate::new(gen, scope, parent_level)?))
        } else if gen.roll(6) < 4 {
            Ok(BoolExpr::Truth(TruthValue::new(gen, parent_level)))
        } else {
            Ok(BoolExpr::Exists(ExistsPredicate::new(gen, scope, parent_level)?))
        }
    }

    pub fn level(&self) -> usize {
        match self {
            BoolExpr::Comparison(e) => e.level,
            BoolExpr::Term(e) => e.level,
            BoolExpr::Null(e) => e.level,
            BoolExpr::Truth(e) => e.level,
            BoolExpr::Exists(e) => e.level,
        }
    }
}

impl Display for BoolExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoolExpr::Comparison(e) => write!(f, "{}", e),
            BoolExpr::Term(e) => write!(f, "{}", e),
            BoolExpr::Null(e) => write!(f, "{}", e),
            BoolExpr::Truth(e) => write!(f, "{}", e),
            BoolExpr::Exists(e) => write!(f, "{}", e),
        }
    }
}

/// `lhs <op> rhs` with a boolean-valued catalog operator.
#[derive(Debug, Clone)]
pub struct ComparisonOp {
    lhs: ValueExpr,
    rhs: ValueExpr,
    op: Operator,
    level: usize,
}

impl ComparisonOp {
    /// Both operands are redrawn until the catalog has an operator for
    /// `(lhs type, rhs type) -> boolean`.
    pub fn new(gen: &mut Generator, scope: &Scope, parent_level: usize) -> Result<Self> {
        let level = parent_level + 1;
        gen.retry("comparison_op", |gen| {
            let lhs = ValueExpr::factory(gen, scope, level)?;
            let rhs = ValueExpr::factory(gen, scope, level)?;
            let op = gen
                .find_operator(lhs.ty(), rhs.ty(), BOOLEAN)
                .ok_or_else(|| Rejection::NoOperator {
                    left: lhs.ty().to_string(),
                    right: rhs.ty().to_string(),
                    result: BOOLEAN.to_string(),
                })?;
            Ok(Self {
                lhs,
                rhs,
                op,
                level,
            })
        })
    }

    pub fn lhs(&self) -> &ValueExpr {
        &self.lhs
    }

    pub fn rhs(&self) -> &ValueExpr {
        &self.rhs
    }

    pub fn operator(&self) -> &Operator {
        &self.op
    }

    pub fn level(&self) -> usize {
        self.level
    }
}

impl Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.op.name, self.rhs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

impl BoolOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoolOp::And => "and",
            BoolOp::Or => "or",
        }
    }
}

/// `(lhs) and|or (rhs)`.
#[derive(Debug, Clone)]
pub struct BoolTerm {
    op: BoolOp,
    lhs: Box<BoolExpr>,
    rhs: Box<BoolExpr>,
    level: usize,
}

impl BoolTerm {
    pub fn new(gen: &mut Generator, scope: &Scope, parent_level: usize) -> Result<Self> {
        let level = parent_level + 1;
        let op = if gen.roll(6) < 4 { BoolOp::Or } else { BoolOp::And };
        let lhs = BoolExpr::factory(gen, scope, level)?;
        let rhs = BoolExpr::factory(gen, scope, level)?;
        Ok(Self {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            level,
        })
    }

    pub fn op(&self) -> BoolOp {
        self.op
    }

    pub fn lhs(&self) -> &BoolExpr {
        &self.lhs
    }

    pub fn rhs(&self) -> &BoolExpr {
        &self.rhs
    }

    pub fn level(&self) -> usize {
        self.level
    }
}

impl Display for BoolTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {} ({})", self.lhs, self.op.as_str(), self.rhs)
    }
}

/// `expr is [not] null`.
#[derive(Debug, Clone)]
pub struct NullPredicate {
    expr: ValueExpr,
    negated: bool,
    level: usize,
}

impl NullPredicate {
    pub fn new(gen: &mut Generator, scope: &Scope, parent_level: usize) -> Result<Self> {
        let level = parent_level + 1;
        let expr = ValueExpr::factory(gen, scope, level)?;
        let negated = gen.roll(6) < 4;
        Ok(Self {
            expr,
            negated,
            level,
        })
    }

    pub fn expr(&self) -> &ValueExpr {
        &self.expr
    }

    pub fn negated(&self) -> bool {
        self.negated
    }

    pub fn level(&self) -> usize {
        self.level
    }
}

impl Display for NullPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "{} is not null", self.expr)
        } else {
            write!(f, "{} is null", self.expr)
        }
    }
}

/// A constant truth literal, spelled the way the catalog says.
#[derive(Debug, Clone)]
pub struct TruthValue {
    value: bool,
    literal: String,
    level: usize,
}

impl TruthValue {
    pub fn new(gen: &mut Generator, parent_level: usize) -> Self {
        let value = gen.roll(6) < 4;
        let literals = gen.literals();
        let literal = if value {
            literals.true_literal.clone()
        } else {
            literals.false_literal.clone()
        };
        Self {
            value,
            literal,
            level: parent_level + 1,
        }
    }

    pub fn value(&self) -> bool {
        self.value
    }

    pub fn level(&self) -> usize {
        self.level
    }
}

impl Display for TruthValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.literal)
    }
}

/// `EXISTS (subquery)`; the subquery may reference the enclosing aliases.
#[derive(Debug, Clone)]
pub struct ExistsPredicate {
    subquery: Box<QuerySpec>,
    level: usize,
}

impl ExistsPredicate {
    pub fn new(gen: &mut Generator, scope: &Scope, parent_level: usize) -> Result<Self> {
        let level = parent_level + 1;
        let subquery = QuerySpec::nested(gen, scope.correlated(), parent_level)?;
        Ok(Self {
            subquery: Box::new(subquery),
            level,
        })
    }

    pub fn subquery(&self) -> &QuerySpec {
        &self.subquery
    }

    pub fn level(&self) -> usize {
        self.level
    }
}

impl Display for ExistsPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EXISTS ({})", self.subquery)
    }
}

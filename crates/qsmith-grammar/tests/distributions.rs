//! Statistical checks on the weighted choices of the grammar.
//!
//! All draws use fixed seeds, so the observed counts are reproducible; the
//! tolerances are five standard deviations of the respective binomial.

use qsmith_grammar::grammar::{BoolExpr, JoinKind, JoinedTableRef, TableRef};
use qsmith_grammar::{
    AliasedRelation, Generator, GeneratorConfig, NamedRelation, Schema, Scope,
};
use std::sync::Arc;

const CATALOG: &str = r#"
tables:
  - name: t1
    columns:
      - { name: id, type: integer }
      - { name: x, type: text }
  - name: t2
    columns:
      - { name: id, type: integer }
      - { name: y, type: text }
operators:
  - { name: "=", left: integer, right: integer, result: boolean }
  - { name: "=", left: text, right: text, result: boolean }
"#;

fn setup(seed: u64) -> (Generator, Scope) {
    let schema = Arc::new(Schema::from_yaml_str(CATALOG).unwrap());
    let mut scope = Scope::root(&schema);
    for (i, table) in schema.tables().iter().enumerate() {
        let relation: Arc<dyn NamedRelation> = table.clone();
        scope.push_ref(Arc::new(AliasedRelation::new(format!("outer{}", i), relation)));
    }
    let gen = Generator::new(schema, GeneratorConfig::with_seed(seed));
    (gen, scope)
}

fn assert_share(label: &str, observed: usize, total: usize, p: f64) {
    let expected = total as f64 * p;
    let sigma = (total as f64 * p * (1.0 - p)).sqrt();
    let delta = (observed as f64 - expected).abs();
    assert!(
        delta <= 5.0 * sigma,
        "{}: observed {} of {}, expected {:.1} +/- {:.1}",
        label,
        observed,
        total,
        expected,
        5.0 * sigma
    );
}

#[test]
fn test_bool_expr_cascade_ratios() {
    let (mut gen, scope) = setup(2024);
    let draws = 10_000;
    let mut counts = [0usize; 5];

    for _ in 0..draws {
        let idx = match BoolExpr::factory(&mut gen, &scope, 0).unwrap() {
            BoolExpr::Comparison(_) => 0,
            BoolExpr::Term(_) => 1,
            BoolExpr::Null(_) => 2,
            BoolExpr::Truth(_) => 3,
            BoolExpr::Exists(_) => 4,
        };
        counts[idx] += 1;
    }

    assert_share("comparison", counts[0], draws, 1.0 / 2.0);
    assert_share("bool term", counts[1], draws, 1.0 / 4.0);
    assert_share("null predicate", counts[2], draws, 1.0 / 8.0);
    assert_share("truth value", counts[3], draws, 1.0 / 16.0);
    assert_share("exists", counts[4], draws, 1.0 / 16.0);
}

#[test]
fn test_join_kind_ratios() {
    let (mut gen, scope) = setup(7);
    let draws = 4_000;
    let mut inner = 0;
    let mut left = 0;

    for _ in 0..draws {
        // Deep enough that both sides are always base tables
        let join = JoinedTableRef::new(&mut gen, &scope, 10).unwrap();
        match join.kind() {
            JoinKind::Inner => inner += 1,
            JoinKind::Left => left += 1,
            JoinKind::Right => {}
        }
        assert_eq!(join.condition().lhs_column.ty, join.condition().rhs_column.ty);
    }

    assert_share("inner", inner, draws, 0.5);
    assert_share("left", left, draws, 0.25);
    assert_share("right", draws - inner - left, draws, 0.25);
}

#[test]
fn test_deep_table_refs_are_terminal() {
    let (mut gen, scope) = setup(11);
    for level in [6, 7, 20] {
        for _ in 0..200 {
            let t = TableRef::factory(&mut gen, &scope, level).unwrap();
            assert!(matches!(t, TableRef::Base(_)), "level {} recursed", level);
        }
    }
}

#[test]
fn test_shallow_table_refs_recurse() {
    let (mut gen, scope) = setup(12);
    let draws = 3_000;
    let mut recursive = 0;
    let mut subqueries = 0;
    for _ in 0..draws {
        match TableRef::factory(&mut gen, &scope, 1).unwrap() {
            TableRef::Base(_) => {}
            TableRef::Subquery(_) => {
                recursive += 1;
                subqueries += 1;
            }
            TableRef::Joined(_) => recursive += 1,
        }
    }
    assert_share("recursive", recursive, draws, 5.0 / 6.0);
    assert_share("subquery", subqueries, recursive, 0.5);
}

#[test]
fn test_select_list_length_and_limits() {
    let (mut gen, _) = setup(99);
    let queries = 2_000;
    let mut columns = 0usize;
    let mut limited = 0usize;
    let mut limit_sum = 0usize;

    for _ in 0..queries {
        let query = gen.generate().unwrap();
        let n = query.select_list().exprs().len();
        assert!(n >= 1);
        columns += n;
        if let Some(rows) = query.limit() {
            assert!((2..=200).contains(&rows));
            limited += 1;
            limit_sum += rows;
        }
    }

    // Geometric with stop chance 1/6: mean 6, variance 30
    let mean = columns as f64 / queries as f64;
    let tolerance = 5.0 * (30.0 / queries as f64).sqrt();
    assert!((mean - 6.0).abs() <= tolerance, "mean select list length {}", mean);

    assert_share("limit present", limited, queries, 2.0 / 3.0);

    // Sum of two d100: mean 101, variance 2 * (100^2 - 1) / 12
    let limit_mean = limit_sum as f64 / limited as f64;
    let limit_sigma = (2.0 * 9999.0 / 12.0 / limited as f64).sqrt();
    assert!(
        (limit_mean - 101.0).abs() <= 5.0 * limit_sigma,
        "mean limit {}",
        limit_mean
    );
}

#[test]
fn test_derived_table_from_recurses_at_its_own_depth() {
    let (mut gen, _) = setup(31);
    let mut derived = 0usize;
    let mut recursive = 0usize;

    while derived < 2_000 {
        let query = gen.generate().unwrap();
        let TableRef::Subquery(sub) = query.from_clause().table_ref() else {
            continue;
        };
        assert_eq!(sub.query().level(), sub.level());
        derived += 1;
        if !matches!(sub.query().from_clause().table_ref(), TableRef::Base(_)) {
            recursive += 1;
        }
    }

    // Subquery at level 2, nested FROM at 3: recursion iff 3 < d6
    assert_share("nested recursion", recursive, derived, 0.5);
}

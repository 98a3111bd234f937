//! Forced derivations replayed from scripted dice.
//!
//! Each script lists the rolls in the order the grammar consumes them.

use qsmith_grammar::grammar::{BoolExpr, JoinKind, TableRef};
use qsmith_grammar::visitor::{Accept, Production, SubqueryCollector, Visitor};
use qsmith_grammar::{Error, Generator, GeneratorConfig, Schema, ScriptedRandom};
use std::sync::Arc;

const SINGLE_TABLE: &str = r#"
tables:
  - name: t
    columns:
      - { name: a, type: integer }
      - { name: b, type: text }
operators:
  - { name: "=", left: integer, right: integer, result: boolean }
  - { name: "=", left: text, right: text, result: boolean }
"#;

const TWO_TABLES: &str = r#"
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
"#;

fn generator(catalog: &str, rolls: Vec<usize>) -> Generator {
    let schema = Schema::from_yaml_str(catalog).expect("catalog should parse");
    Generator::with_random_source(
        Arc::new(schema),
        GeneratorConfig::default(),
        ScriptedRandom::new(rolls),
    )
}

/// Records production kinds in visit order.
#[derive(Default)]
struct Kinds(Vec<&'static str>);

impl<'a> Visitor<'a> for Kinds {
    fn visit(&mut self, production: Production<'a>) {
        self.0.push(production.kind());
    }
}

#[test]
fn test_single_table_no_join_no_limit() {
    let rolls = vec![
        1, // from: terminal table reference
        1, // pick t
        2, 1, 1, // select list: column, rel0, a
        1, // select list ends
        1, // where: comparison
        2, 1, 1, // lhs rel0.a
        2, 1, 1, // rhs rel0.a
        1, // only integer "="
        1, // no limit
    ];
    let mut gen = generator(SINGLE_TABLE, rolls);
    let query = gen.generate().unwrap();

    assert_eq!(
        query.to_string(),
        "select  rel0.a as c0 \n from t as rel0 where rel0.a = rel0.a "
    );
    assert_eq!(query.limit(), None);
    assert_eq!(query.select_list().exprs().len(), 1);
    assert!(matches!(query.search(), BoolExpr::Comparison(_)));
}

#[test]
fn test_inner_join_on_matching_column() {
    let rolls = vec![
        6, 4, // from: recursive, join
        1, 1, // lhs: terminal, t1
        1, 2, // rhs: terminal, t2
        1, // lhs column id
        1, // inner
        2, 1, 1, // select rel0.id
        1, // select list ends
        4, 4, 4, 1, // where: truth value
        1, // true
        6, 50, 50, // limit 100
    ];
    let mut gen = generator(TWO_TABLES, rolls);
    let query = gen.generate().unwrap();

    let from = query.from_clause().to_string();
    assert_eq!(
        from,
        "\n from t1 as rel0 inner join t2 as rel1 on (rel0.id = rel1.id)"
    );
    assert_eq!(query.limit(), Some(100));
    assert!(query
        .to_string()
        .ends_with("where true fetch first 100 rows only"));

    let TableRef::Joined(join) = query.from_clause().table_ref() else {
        panic!("expected a join");
    };
    assert_eq!(join.kind(), JoinKind::Inner);
    assert_eq!(join.level(), 2);
    assert_eq!(query.scope().refs().len(), 2);
}

#[test]
fn test_join_without_matching_column_is_redrawn() {
    let catalog = r#"
tables:
  - name: t1
    columns:
      - { name: id, type: integer }
      - { name: x, type: text }
  - name: t2
    columns:
      - { name: y, type: text }
operators:
  - { name: "=", left: text, right: text, result: boolean }
"#;
    let rolls = vec![
        6, 4, // from: recursive, join
        1, 1, 1, 2, // t1 as rel0, t2 as rel1
        1, // integer id has no partner on t2: redraw
        1, 1, 1, 2, // t1 as rel2, t2 as rel3
        2, // text x matches y
        5, 4, // right join
        2, 1, 2, // select rel2.x
        1, // select list ends
        4, 4, 4, 1, // truth value
        5, // false
        2, // no limit
    ];
    let mut gen = generator(catalog, rolls);
    let query = gen.generate().unwrap();

    assert_eq!(
        query.to_string(),
        "select  rel2.x as c0 \n from t1 as rel2 right join t2 as rel3 on (rel2.x = rel3.y) where false "
    );
    // Aliases of the discarded attempt are never handed out again
    assert!(!query.scope().refs().iter().any(|r| r.ident() == "rel0"));
}

#[test]
fn test_subquery_and_exists_traversal_order() {
    let catalog = r#"
tables:
  - name: t
    columns:
      - { name: a, type: integer }
operators:
  - { name: "=", left: integer, right: integer, result: boolean }
"#;
    let rolls = vec![
        6, 1, // from: recursive, subquery
        // derived table query
        1, 1, // t as rel0
        2, 1, 1, 1, // select rel0.a as c0, ends
        4, 4, 4, 1, 1, // where true
        1, // no limit
        // outer query
        2, 1, 1, 1, // select subq_0.c0 as c1, ends
        4, 4, 4, 4, // where EXISTS
        // exists subquery, correlated
        1, 1, // t as rel1
        2, 1, 1, 1, // select subq_0.c0 as c2, ends
        1, // comparison
        2, 2, 1, // lhs rel1.a
        2, 1, 1, // rhs subq_0.c0
        1, // "="
        1, // no limit
        // outer limit
        3, 1, 1,
    ];
    let mut gen = generator(catalog, rolls);
    let query = gen.generate().unwrap();

    assert_eq!(
        query.to_string(),
        "select  subq_0.c0 as c1 \n from (select  rel0.a as c0 \n from t as rel0 where true ) as subq_0 \
         where EXISTS (select  subq_0.c0 as c2 \n from t as rel1 where rel1.a = subq_0.c0 ) \
         fetch first 2 rows only"
    );

    let mut kinds = Kinds::default();
    query.accept(&mut kinds);
    assert_eq!(
        kinds.0,
        vec![
            "query_spec",
            "from_clause",
            "query_spec",
            "from_clause",
            "table_or_query_name",
            "select_list",
            "column_reference",
            "truth_value",
            "table_subquery",
            "select_list",
            "column_reference",
            "exists_predicate",
            "query_spec",
            "from_clause",
            "table_or_query_name",
            "select_list",
            "column_reference",
            "comparison_op",
            "column_reference",
            "column_reference",
        ]
    );

    let mut collector = SubqueryCollector::new();
    query.accept(&mut collector);
    assert_eq!(collector.subqueries.len(), 2);
    assert!(collector.subqueries[0].to_string().contains("from t as rel0"));
    assert!(collector.subqueries[1].to_string().contains("from t as rel1"));

    // The EXISTS subquery sees the outer alias but only introduced its own
    let BoolExpr::Exists(exists) = query.search() else {
        panic!("expected EXISTS");
    };
    let inner_scope = exists.subquery().scope();
    assert!(inner_scope.resolves("subq_0", "c0"));
    assert_eq!(inner_scope.local_refs().len(), 1);
    assert_eq!(inner_scope.local_refs()[0].ident(), "rel1");

    // The derived table does not see the outer scope at all
    let TableRef::Subquery(subquery) = query.from_clause().table_ref() else {
        panic!("expected a derived table");
    };
    assert_eq!(subquery.query().scope().refs().len(), 1);
    // A nested query sits at the level of the node holding it
    assert_eq!(subquery.level(), 2);
    assert_eq!(subquery.query().level(), 2);
    assert_eq!(exists.level(), 1);
    assert_eq!(exists.subquery().level(), 1);
}

#[test]
fn test_no_boolean_operator_exhausts_retries() {
    let catalog = r#"
tables:
  - name: t
    columns:
      - { name: a, type: integer }
operators:
  - { name: "+", left: integer, right: integer, result: integer }
"#;
    let schema = Schema::from_yaml_str(catalog).unwrap();
    // 1 everywhere: terminal tables, single-column lists, comparisons
    let config = GeneratorConfig::default().max_retries(10);
    let mut gen =
        Generator::with_random_source(Arc::new(schema), config, ScriptedRandom::new([]));

    let err = gen.generate().unwrap_err();
    assert!(matches!(
        err,
        Error::RetriesExhausted {
            production: "comparison_op",
            attempts: 10
        }
    ));
}

//! LIMIT / OFFSET tests, including both SQL Server pagination modes.

use crate::ast::*;
use crate::compiler::Compiler;
use crate::config::CompilerConfig;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn uints(values: &[u64]) -> Vec<Value> {
    values.iter().copied().map(Value::UInt).collect()
}

#[rstest]
#[case::limit_only(10, 0, "SELECT * FROM \"t\" LIMIT ?", &[10])]
#[case::offset_only(0, 20, "SELECT * FROM \"t\" OFFSET ?", &[20])]
#[case::both(5, 20, "SELECT * FROM \"t\" LIMIT ? OFFSET ?", &[5, 20])]
#[case::neither(0, 0, "SELECT * FROM \"t\"", &[])]
fn test_generic_limits(
    #[case] limit: u64,
    #[case] offset: u64,
    #[case] expected: &str,
    #[case] bindings: &[u64],
) {
    let query = Query::table("t").limit(limit).offset(offset);
    let result = Compiler::generic().compile(&query).unwrap();
    assert_eq!(result.raw_sql, expected);
    assert_eq!(result.bindings, uints(bindings));
}

#[test]
fn test_mysql_offset_only() {
    let query = Query::table("t").offset(20);
    let result = Compiler::mysql().compile(&query).unwrap();
    assert_eq!(result.raw_sql, "SELECT * FROM `t` LIMIT 18446744073709551615 OFFSET ?");
    assert_eq!(result.bindings, uints(&[20]));
}

#[test]
fn test_mysql_limit_and_offset() {
    let query = Query::table("t").limit(5).offset(20);
    let result = Compiler::mysql().compile(&query).unwrap();
    assert_eq!(result.raw_sql, "SELECT * FROM `t` LIMIT ? OFFSET ?");
    assert_eq!(result.bindings, uints(&[5, 20]));
}

#[test]
fn test_sqlite_offset_only() {
    let query = Query::table("t").offset(20);
    let result = Compiler::sqlite().compile(&query).unwrap();
    assert_eq!(result.raw_sql, "SELECT * FROM \"t\" LIMIT -1 OFFSET ?");
    assert_eq!(result.bindings, uints(&[20]));
}

#[test]
fn test_for_page() {
    let query = Query::table("t").for_page(3, 10);
    let result = Compiler::generic().compile(&query).unwrap();
    assert_eq!(result.raw_sql, "SELECT * FROM \"t\" LIMIT ? OFFSET ?");
    assert_eq!(result.bindings, uints(&[10, 20]));

    let first = Query::table("t").for_page(1, 10);
    assert_eq!(
        Compiler::generic().compile(&first).unwrap().raw_sql,
        "SELECT * FROM \"t\" LIMIT ?"
    );
}

#[test]
fn test_for_page_saturates() {
    let query = Query::table("t").for_page(u64::MAX, 10);
    assert_eq!(query.get_limit(None).unwrap(), 10);
    assert_eq!(query.get_offset(None).unwrap(), u64::MAX);
}

#[test]
fn test_zero_clears_limit() {
    let query = Query::table("t").limit(10).limit(0).take(0).skip(0);
    assert_eq!(
        Compiler::generic().compile(&query).unwrap().raw_sql,
        "SELECT * FROM \"t\""
    );
}

#[test]
fn test_engine_scoped_limit() {
    let query = Query::table("t")
        .limit(10)
        .for_engine(Engine::MySql, |q| q.limit(5));
    assert_eq!(
        Compiler::generic().compile(&query).unwrap().bindings,
        uints(&[10])
    );
    assert_eq!(Compiler::mysql().compile(&query).unwrap().bindings, uints(&[5]));
}

fn modern() -> Compiler {
    Compiler::sqlserver().legacy_pagination(false)
}

#[test]
fn test_sqlserver_modern_limit_only() {
    let query = Query::table("t").limit(10);
    let result = modern().compile(&query).unwrap();
    assert_eq!(
        result.raw_sql,
        "SELECT * FROM [t] ORDER BY (SELECT 0) OFFSET ? ROWS FETCH NEXT ? ROWS ONLY"
    );
    assert_eq!(result.bindings, uints(&[0, 10]));
}

#[test]
fn test_sqlserver_modern_with_order() {
    let query = Query::table("t").order_by(["id"]).limit(10).offset(5);
    let result = modern().compile(&query).unwrap();
    assert_eq!(
        result.raw_sql,
        "SELECT * FROM [t] ORDER BY [id] OFFSET ? ROWS FETCH NEXT ? ROWS ONLY"
    );
    assert_eq!(result.bindings, uints(&[5, 10]));
}

#[test]
fn test_sqlserver_modern_offset_only() {
    let query = Query::table("t").offset(5);
    let result = modern().compile(&query).unwrap();
    assert_eq!(result.raw_sql, "SELECT * FROM [t] ORDER BY (SELECT 0) OFFSET ? ROWS");
    assert_eq!(result.bindings, uints(&[5]));
}

#[test]
fn test_sqlserver_modern_from_config() {
    let config = CompilerConfig::from_toml_str("legacy_pagination = false").unwrap();
    let compiler = Compiler::with_config(Engine::SqlServer, &config);
    assert!(!compiler.uses_legacy_pagination());
    assert_eq!(
        compiler.compile(&Query::table("t").limit(1)).unwrap().raw_sql,
        "SELECT * FROM [t] ORDER BY (SELECT 0) OFFSET ? ROWS FETCH NEXT ? ROWS ONLY"
    );
}

#[test]
fn test_sqlserver_legacy_top() {
    let query = Query::table("t").where_eq("a", 1).limit(10);
    let result = Compiler::sqlserver().compile(&query).unwrap();
    assert_eq!(result.raw_sql, "SELECT TOP (?) * FROM [t] WHERE [a] = ?");
    assert_eq!(result.bindings, vec![Value::UInt(10), Value::Int(1)]);
    assert_eq!(result.sql, "SELECT TOP (@p0) * FROM [t] WHERE [a] = @p1");
}

#[test]
fn test_sqlserver_legacy_distinct_top() {
    let query = Query::table("t").distinct().select(["a"]).limit(3);
    assert_eq!(
        Compiler::sqlserver().compile(&query).unwrap().raw_sql,
        "SELECT DISTINCT TOP (?) [a] FROM [t]"
    );
}

#[test]
fn test_sqlserver_legacy_row_number() {
    let query = Query::table("t").limit(5).offset(20);
    let result = Compiler::sqlserver().compile(&query).unwrap();
    assert_eq!(
        result.raw_sql,
        "SELECT * FROM (SELECT *, ROW_NUMBER() OVER (ORDER BY (SELECT 0)) AS [row_num] FROM [t]) \
         AS [results_wrapper] WHERE [row_num] BETWEEN ? AND ?"
    );
    assert_eq!(result.bindings, uints(&[21, 25]));
}

#[test]
fn test_sqlserver_legacy_offset_only_keeps_order() {
    let query = Query::table("t").where_eq("a", 1).order_by(["id"]).offset(10);
    let result = Compiler::sqlserver().compile(&query).unwrap();
    assert_eq!(
        result.raw_sql,
        "SELECT * FROM (SELECT *, ROW_NUMBER() OVER (ORDER BY [id]) AS [row_num] FROM [t] WHERE [a] = ?) \
         AS [results_wrapper] WHERE [row_num] >= ?"
    );
    assert_eq!(result.bindings, vec![Value::Int(1), Value::UInt(11)]);
}

#[test]
fn test_sqlserver_legacy_keeps_selected_columns() {
    let query = Query::table("t").select(["id", "name"]).limit(10).offset(10);
    assert_eq!(
        Compiler::sqlserver().compile(&query).unwrap().raw_sql,
        "SELECT * FROM (SELECT [id], [name], ROW_NUMBER() OVER (ORDER BY (SELECT 0)) AS [row_num] FROM [t]) \
         AS [results_wrapper] WHERE [row_num] BETWEEN ? AND ?"
    );
}

#[rstest]
#[case::offset_only(Query::table("t").offset(u64::MAX), uints(&[u64::MAX]))]
#[case::limit_and_offset(Query::table("t").limit(u64::MAX).offset(1), uints(&[2, u64::MAX]))]
fn test_sqlserver_legacy_bounds_saturate(#[case] query: Query, #[case] expected: Vec<Value>) {
    let result = Compiler::sqlserver().compile(&query).unwrap();
    assert_eq!(result.bindings, expected);
}

#[test]
fn test_nested_statement_is_paginated() {
    let inner = Query::table("users").order_by(["id"]).limit(10);
    let query = Query::new().from_query_as(inner, "u").offset(5);
    let result = Compiler::postgres().compile(&query).unwrap();
    assert_eq!(
        result.raw_sql,
        "SELECT * FROM (SELECT * FROM \"users\" ORDER BY \"id\" LIMIT ?) AS \"u\" OFFSET ?"
    );
    assert_eq!(result.bindings, uints(&[10, 5]));
}

//! Core SELECT tests.

use crate::ast::*;
use crate::compiler::{Compiler, ToSql};
use crate::config::CompilerConfig;
use crate::error::ComposeError;
use pretty_assertions::assert_eq;

fn generic(query: &Query) -> String {
    Compiler::generic().compile(query).unwrap().raw_sql
}

#[test]
fn test_select_star() {
    let query = Query::table("users");
    let result = Compiler::generic().compile(&query).unwrap();
    assert_eq!(result.raw_sql, "SELECT * FROM \"users\"");
    assert!(result.bindings.is_empty());
    assert!(result.named_bindings.is_empty());
}

#[test]
fn test_select_columns() {
    let query = Query::table("users").select(["id", "name"]);
    assert_eq!(generic(&query), "SELECT \"id\", \"name\" FROM \"users\"");
}

#[test]
fn test_select_with_aliases() {
    let query = Query::table("users as u").select(["u.id as user_id", "u.name"]);
    assert_eq!(
        generic(&query),
        "SELECT \"u\".\"id\" AS \"user_id\", \"u\".\"name\" FROM \"users\" AS \"u\""
    );
}

#[test]
fn test_select_brace_expansion() {
    let query = Query::table("users").select(["users.{id, name}"]);
    assert_eq!(
        generic(&query),
        "SELECT \"users\".\"id\", \"users\".\"name\" FROM \"users\""
    );
}

#[test]
fn test_distinct() {
    let query = Query::table("users").distinct().select(["city"]);
    assert_eq!(generic(&query), "SELECT DISTINCT \"city\" FROM \"users\"");
}

#[test]
fn test_select_raw_with_bindings() {
    let query = Query::table("products").select_raw("price * ? as {gross}", [Value::Float(1.2)]);
    let result = Compiler::generic().compile(&query).unwrap();
    assert_eq!(result.raw_sql, "SELECT price * ? as \"gross\" FROM \"products\"");
    assert_eq!(result.bindings, vec![Value::Float(1.2)]);
}

#[test]
fn test_raw_expression_escapes_delimiters() {
    let query = Query::table("t").select_raw("{a} + \\{b\\}", NO_BINDINGS);
    let result = Compiler::sqlserver().compile(&query).unwrap();
    assert_eq!(result.raw_sql, "SELECT [a] + {b} FROM [t]");
}

#[test]
fn test_named_markers() {
    let query = Query::table("users").where_eq("a", 1).or_where_eq("b", "x");
    let result = Compiler::generic().compile(&query).unwrap();
    assert_eq!(result.raw_sql, "SELECT * FROM \"users\" WHERE \"a\" = ? OR \"b\" = ?");
    assert_eq!(result.sql, "SELECT * FROM \"users\" WHERE \"a\" = @p0 OR \"b\" = @p1");
    assert_eq!(
        result.named_bindings.keys().collect::<Vec<_>>(),
        vec!["@p0", "@p1"]
    );
    assert_eq!(result.named_bindings["@p1"], Value::from("x"));
}

#[test]
fn test_custom_parameter_prefix() {
    let config = CompilerConfig {
        parameter_prefix: Some(":v".to_string()),
        ..Default::default()
    };
    let compiler = Compiler::with_config(Engine::Postgres, &config);
    let result = compiler.compile(&Query::table("t").where_eq("id", 7)).unwrap();
    assert_eq!(result.sql, "SELECT * FROM \"t\" WHERE \"id\" = :v0");
}

#[test]
fn test_array_binding_expands_markers() {
    let query = Query::table("users").where_raw("{id} in (?)", [array([1, 2, 3])]);
    let result = Compiler::generic().compile(&query).unwrap();
    assert_eq!(result.raw_sql, "SELECT * FROM \"users\" WHERE \"id\" in (?,?,?)");
    assert_eq!(result.sql, "SELECT * FROM \"users\" WHERE \"id\" in (@p0,@p1,@p2)");
    assert_eq!(result.bindings.len(), 1);
    assert_eq!(result.flat_bindings(), vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    assert_eq!(result.named_bindings.len(), 3);
}

#[test]
fn test_marker_count_matches_bindings() {
    let query = Query::table("orders")
        .select_raw("sum(?) as total", [1])
        .where_in("status", ["paid", "sent"])
        .where_raw("{tags} && (?)", [array(["a", "b"])])
        .where_between("created", 10, 20)
        .limit(5);
    let result = Compiler::postgres().compile(&query).unwrap();
    let markers = result.raw_sql.matches('?').count();
    assert_eq!(markers, result.flat_bindings().len());
    assert_eq!(markers, result.named_bindings.len());
}

#[test]
fn test_absent_clauses_render_nothing() {
    let query = Query::table("users");
    let compiler = Compiler::generic();
    let mut ctx = crate::compiler::SqlContext::new(&query, &[]);
    assert_eq!(compiler.compile_wheres(&mut ctx).unwrap(), None);
    assert_eq!(compiler.compile_orders(&mut ctx).unwrap(), None);
    assert_eq!(compiler.compile_joins(&mut ctx).unwrap(), None);
    assert_eq!(compiler.base_limit(&mut ctx).unwrap(), None);
    assert!(ctx.bindings.is_empty());
}

#[test]
fn test_clone_compiles_identically() {
    let query = Query::table("users")
        .where_eq("active", true)
        .where_in("role", ["admin", "staff"])
        .order_by(["name"])
        .limit(10);
    let compiler = Compiler::mysql();
    let original = compiler.compile(&query).unwrap();
    let copy = compiler.compile(&query.clone()).unwrap();
    assert_eq!(original.raw_sql, copy.raw_sql);
    assert_eq!(original.bindings, copy.bindings);
}

#[test]
fn test_joins() {
    let query = Query::table("users")
        .join("orders", "users.id", "=", "orders.user_id")
        .left_join("profiles", "profiles.user_id", "=", "users.id")
        .cross_join("regions");
    assert_eq!(
        generic(&query),
        "SELECT * FROM \"users\" \n\
         INNER JOIN \"orders\" ON \"users\".\"id\" = \"orders\".\"user_id\"\n\
         LEFT JOIN \"profiles\" ON \"profiles\".\"user_id\" = \"users\".\"id\"\n\
         CROSS JOIN \"regions\""
    );
}

#[test]
fn test_join_with_constraints() {
    let query = Query::table("users").join_with(JoinKind::Left, "orders as o", |j| {
        j.on("o.user_id", "=", "users.id")
            .constrain(|q| q.where_eq("o.status", "paid"))
    });
    let result = Compiler::generic().compile(&query).unwrap();
    assert_eq!(
        result.raw_sql,
        "SELECT * FROM \"users\" \nLEFT JOIN \"orders\" AS \"o\" ON \"o\".\"user_id\" = \"users\".\"id\" AND \"o\".\"status\" = ?"
    );
    assert_eq!(result.bindings, vec![Value::from("paid")]);
}

#[test]
fn test_join_subquery() {
    let latest = Query::table("orders").select(["user_id"]).where_eq("year", 2024);
    let query = Query::table("users")
        .join_clause(Join::sub(JoinKind::Inner, latest, "o").on("o.user_id", "=", "users.id"));
    assert_eq!(
        generic(&query),
        "SELECT * FROM \"users\" \nINNER JOIN (SELECT \"user_id\" FROM \"orders\" WHERE \"year\" = ?) AS \"o\" ON \"o\".\"user_id\" = \"users\".\"id\""
    );
}

#[test]
fn test_group_by_having() {
    let query = Query::table("orders")
        .select(["user_id"])
        .select_raw("count(*) as total", NO_BINDINGS)
        .group_by(["user_id"])
        .having_op("total", ">", 5);
    let result = Compiler::generic().compile(&query).unwrap();
    assert_eq!(
        result.raw_sql,
        "SELECT \"user_id\", count(*) as total FROM \"orders\" GROUP BY \"user_id\" HAVING \"total\" > ?"
    );
    assert_eq!(result.bindings, vec![Value::Int(5)]);
}

#[test]
fn test_order_by() {
    let query = Query::table("users")
        .order_by(["name"])
        .order_by_desc(["created_at"])
        .order_by_raw("length({bio})", NO_BINDINGS);
    assert_eq!(
        generic(&query),
        "SELECT * FROM \"users\" ORDER BY \"name\", \"created_at\" DESC, length(\"bio\")"
    );
}

#[test]
fn test_set_operations() {
    let query = Query::table("a")
        .union(Query::table("b"))
        .union_all(Query::table("c").where_eq("x", 1))
        .except(Query::table("d"))
        .intersect_all(Query::table("e"));
    let result = Compiler::generic().compile(&query).unwrap();
    assert_eq!(
        result.raw_sql,
        "SELECT * FROM \"a\" UNION SELECT * FROM \"b\" UNION ALL SELECT * FROM \"c\" WHERE \"x\" = ? \
         EXCEPT SELECT * FROM \"d\" INTERSECT ALL SELECT * FROM \"e\""
    );
    assert_eq!(result.bindings, vec![Value::Int(1)]);
}

#[test]
fn test_combine_raw() {
    let query = Query::table("a").combine_raw("UNION SELECT * FROM {b} WHERE {id} = ?", [3]);
    assert_eq!(
        generic(&query),
        "SELECT * FROM \"a\" UNION SELECT * FROM \"b\" WHERE \"id\" = ?"
    );
}

#[test]
fn test_select_subquery_column() {
    let orders = Query::table("orders")
        .select_raw("count(*)", NO_BINDINGS)
        .where_columns("orders.user_id", "=", "users.id");
    let query = Query::table("users").select(["id"]).select_query(orders, "order_count");
    assert_eq!(
        generic(&query),
        "SELECT \"id\", (SELECT count(*) FROM \"orders\" WHERE \"orders\".\"user_id\" = \"users\".\"id\") AS \"order_count\" FROM \"users\""
    );
}

#[test]
fn test_from_subquery() {
    let active = Query::table("users").where_eq("active", true);
    let query = Query::new().from_query_as(active, "u").select(["u.id"]);
    let result = Compiler::generic().compile(&query).unwrap();
    assert_eq!(
        result.raw_sql,
        "SELECT \"u\".\"id\" FROM (SELECT * FROM \"users\" WHERE \"active\" = ?) AS \"u\""
    );
    assert_eq!(result.bindings, vec![Value::Bool(true)]);
}

#[test]
fn test_from_raw() {
    let query = Query::new().from_raw("{users} tablesample system (?)", [10]);
    let result = Compiler::generic().compile(&query).unwrap();
    assert_eq!(result.raw_sql, "SELECT * FROM \"users\" tablesample system (?)");
    assert_eq!(result.bindings, vec![Value::Int(10)]);
}

#[test]
fn test_missing_table() {
    let err = Compiler::generic()
        .compile(&Query::new().select(["id"]))
        .unwrap_err();
    assert!(matches!(err, ComposeError::MissingTable { operation: "select" }));
    assert_eq!(err.to_string(), "No table set to select");
}

#[test]
fn test_invalid_operator() {
    let query = Query::table("users").where_op("name", "~~~", "a");
    let err = Compiler::generic().compile(&query).unwrap_err();
    assert!(matches!(err, ComposeError::InvalidOperator(ref op) if op == "~~~"));
}

#[test]
fn test_operator_is_lowercased() {
    let query = Query::table("users").where_op("name", "LIKE", "a%");
    assert_eq!(generic(&query), "SELECT * FROM \"users\" WHERE \"name\" like ?");
}

#[test]
fn test_whitelisted_operator() {
    let query = Query::table("users").where_op("name", "~~*", "a%");
    let mut compiler = Compiler::postgres();
    assert!(compiler.compile(&query).is_err());

    compiler.whitelist(["~~*"]);
    let result = compiler.compile(&query).unwrap();
    assert_eq!(result.raw_sql, "SELECT * FROM \"users\" WHERE \"name\" ~~* ?");
}

#[test]
fn test_whitelist_from_config() {
    let config = CompilerConfig {
        operators: vec!["@>".to_string()],
        ..Default::default()
    };
    let compiler = Compiler::with_config(Engine::Postgres, &config);
    let query = Query::table("docs").where_op("tags", "@>", "{a}");
    assert_eq!(
        compiler.compile(&query).unwrap().raw_sql,
        "SELECT * FROM \"docs\" WHERE \"tags\" @> ?"
    );
}

#[test]
fn test_variables() {
    let query = Query::table("users")
        .define("min_age", 18)
        .where_op("age", ">=", Value::variable("min_age"));
    let result = Compiler::generic().compile(&query).unwrap();
    assert_eq!(result.raw_sql, "SELECT * FROM \"users\" WHERE \"age\" >= ?");
    assert_eq!(result.bindings, vec![Value::Int(18)]);
}

#[test]
fn test_variable_from_enclosing_statement() {
    let orders = Query::table("orders")
        .select(["user_id"])
        .where_eq("status", Value::variable("status"));
    let query = Query::table("users")
        .define("status", "active")
        .where_in_query("id", orders);
    let result = Compiler::generic().compile(&query).unwrap();
    assert_eq!(
        result.raw_sql,
        "SELECT * FROM \"users\" WHERE \"id\" IN (SELECT \"user_id\" FROM \"orders\" WHERE \"status\" = ?)"
    );
    assert_eq!(result.bindings, vec![Value::from("active")]);
}

#[test]
fn test_undefined_variable() {
    let query = Query::table("users").where_eq("age", Value::variable("missing"));
    let err = Compiler::generic().compile(&query).unwrap_err();
    assert!(matches!(err, ComposeError::UndefinedVariable(ref name) if name == "missing"));
}

#[test]
fn test_raw_value_is_inlined() {
    let query = Query::table("events").where_op("created_at", ">", Value::raw("NOW()"));
    let result = Compiler::generic().compile(&query).unwrap();
    assert_eq!(result.raw_sql, "SELECT * FROM \"events\" WHERE \"created_at\" > NOW()");
    assert!(result.bindings.is_empty());
}

#[test]
fn test_engine_scoped_clauses() {
    let query = Query::table("users").for_engine(Engine::Postgres, |q| q.where_eq("pg_only", 1));
    assert_eq!(generic(&query), "SELECT * FROM \"users\"");
    assert_eq!(
        Compiler::postgres().compile(&query).unwrap().raw_sql,
        "SELECT * FROM \"users\" WHERE \"pg_only\" = ?"
    );
}

#[test]
fn test_display_inlines_bindings() {
    let query = Query::table("users").where_eq("name", "O'Brien").limit(5);
    let result = Compiler::generic().compile(&query).unwrap();
    assert_eq!(
        result.to_string(),
        "SELECT * FROM \"users\" WHERE \"name\" = 'O''Brien' LIMIT 5"
    );
}

#[test]
fn test_compile_many() {
    let first = Query::table("a").where_eq("x", 1);
    let second = Query::table("b").where_eq("y", 2);
    let result = Compiler::generic().compile_many([&first, &second]).unwrap();
    assert_eq!(
        result.raw_sql,
        "SELECT * FROM \"a\" WHERE \"x\" = ?;\nSELECT * FROM \"b\" WHERE \"y\" = ?"
    );
    assert_eq!(
        result.sql,
        "SELECT * FROM \"a\" WHERE \"x\" = @p0;\nSELECT * FROM \"b\" WHERE \"y\" = @p1"
    );
    assert_eq!(result.bindings, vec![Value::Int(1), Value::Int(2)]);
    assert!(result.query.is_none());
}

#[test]
fn test_result_keeps_statement() {
    let query = Query::table("users").where_eq("id", 1);
    let result = Compiler::generic().compile(&query).unwrap();
    assert_eq!(result.query, Some(query));
}

#[test]
fn test_to_sql_trait() {
    let query = Query::table("users").select(["id"]);
    assert_eq!(query.to_sql().unwrap().raw_sql, "SELECT \"id\" FROM \"users\"");
    assert_eq!(
        query.to_sql_with_engine(Engine::MySql).unwrap().raw_sql,
        "SELECT `id` FROM `users`"
    );
}

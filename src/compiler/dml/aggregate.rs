//! Aggregate statement rewrite.

use crate::ast::{AggregateClause, ClauseKind, Component, Method, Query};
use crate::compiler::Compiler;
use crate::error::ComposeResult;

/// Prepare an aggregate statement for select rendering.
///
/// Limit, order and group are dropped. A single column without DISTINCT
/// renders directly as `SELECT FN(col) AS "fn"`. Otherwise the statement
/// becomes an inner select (projecting the columns when DISTINCT, filtering
/// each column with IS NOT NULL when not) wrapped by
/// `SELECT FN(*) AS "fn" FROM (...) AS "fnQuery"`.
pub fn transform(compiler: &Compiler, query: &Query) -> ComposeResult<Query> {
    let engine = Some(compiler.engine());
    let query = query
        .clone()
        .clear_component(Component::Limit, None)
        .clear_component(Component::Order, None)
        .clear_component(Component::Group, None);

    let Some(clause) = query
        .get_one_component::<AggregateClause>(Component::Aggregate, engine)?
        .cloned()
    else {
        return Ok(query);
    };

    if clause.columns.len() == 1 && !query.distinct {
        return Ok(query);
    }

    let mut inner = query.clear_component(Component::Aggregate, engine);
    inner.method = Method::Select;
    let inner = if inner.distinct {
        inner
            .clear_component(Component::Select, engine)
            .select(&clause.columns)
    } else {
        clause
            .columns
            .iter()
            .fold(inner, |q, column| q.where_not_null(column))
    };

    let mut outer = Query::new()
        .add_component(
            Component::Aggregate,
            ClauseKind::Aggregate(AggregateClause {
                function: clause.function.clone(),
                columns: vec!["*".to_string()],
            }),
        )
        .from_query_as(inner, format!("{}Query", clause.function));
    outer.method = Method::Aggregate;
    Ok(outer)
}

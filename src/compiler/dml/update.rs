//! UPDATE SQL generation, shared by the `update` and `set` methods.

use super::{make_table, where_suffix};
use crate::ast::{Component, InsertClause, Query};
use crate::compiler::Compiler;
use crate::compiler::context::{Fragment, SqlContext};
use crate::error::{ComposeError, ComposeResult};

/// Generate `UPDATE t SET a = ?, b = ? [WHERE ...]` from the assignments in
/// `component` (`update` or `set`). Assignment bindings precede WHERE
/// bindings.
pub fn build_update(compiler: &Compiler, query: &Query, component: Component) -> ComposeResult<Fragment> {
    let mut ctx = SqlContext::new(query, &[]);
    let table = make_table(compiler, &mut ctx, "update")?;

    let clause = query
        .get_one_component::<InsertClause>(component, Some(compiler.engine()))?
        .ok_or(ComposeError::EmptyValues {
            component: component.name(),
        })?;

    let (columns, values) = match clause {
        InsertClause::Values { columns, values, .. } => (columns, values),
        InsertClause::Query { .. } => {
            return Err(ComposeError::invalid_clause(component.name(), "InsertQueryClause"));
        }
    };

    if columns.is_empty() || values.is_empty() {
        return Err(ComposeError::EmptyValues {
            component: component.name(),
        });
    }
    if columns.len() != values.len() {
        return Err(ComposeError::arity(component.name(), columns.len(), values.len()));
    }

    let mut sets = Vec::with_capacity(columns.len());
    for (column, value) in columns.iter().zip(values) {
        let marker = compiler.parameter(&mut ctx, value)?;
        sets.push(format!("{} = {}", compiler.wrap(column), marker));
    }

    let wheres = where_suffix(compiler, &mut ctx)?;
    let sql = format!("UPDATE {} SET {}{}", table, sets.join(", "), wheres);
    Ok(ctx.into_fragment(sql))
}

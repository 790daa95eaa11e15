//! INSERT SQL generation.

use super::make_table;
use crate::ast::{Component, InsertClause, Query, Value};
use crate::compiler::Compiler;
use crate::compiler::context::{Fragment, SqlContext};
use crate::error::{ComposeError, ComposeResult};

fn check_row(columns: &[String], values: &[Value]) -> ComposeResult<()> {
    if columns.is_empty() || values.is_empty() {
        return Err(ComposeError::EmptyValues { component: "insert" });
    }
    if columns.len() != values.len() {
        return Err(ComposeError::arity("insert", columns.len(), values.len()));
    }
    Ok(())
}

/// Generate INSERT SQL.
///
/// - Single row: `INSERT INTO t (a, b) VALUES (?, ?)`.
/// - Multi row: each extra insert clause appends `, (?, ?)`.
/// - The dialect's last-id statement, when the first row requests it, comes
///   after the last row.
/// - From select: `INSERT INTO t (a, b) SELECT ...`.
pub fn build_insert(compiler: &Compiler, query: &Query) -> ComposeResult<Fragment> {
    let mut ctx = SqlContext::new(query, &[]);
    let table = make_table(compiler, &mut ctx, "insert")?;

    let inserts = query.get_components::<InsertClause>(Component::Insert, Some(compiler.engine()))?;
    let Some((first, rest)) = inserts.split_first() else {
        return Err(ComposeError::EmptyValues { component: "insert" });
    };

    let mut return_id = false;
    let mut sql = match first {
        InsertClause::Values {
            columns,
            values,
            return_id: wants_id,
        } => {
            check_row(columns, values)?;
            return_id = *wants_id;
            let columns = compiler.wrap_array(columns).join(", ");
            let markers = compiler.parameterize(&mut ctx, values)?;
            format!("INSERT INTO {} ({}) VALUES ({})", table, columns, markers)
        }
        InsertClause::Query { columns, query: source } => {
            let sub = compiler.compile_select(source, &ctx.scopes())?;
            ctx.bindings.extend(sub.bindings);
            if columns.is_empty() {
                format!("INSERT INTO {} {}", table, sub.sql)
            } else {
                let columns = compiler.wrap_array(columns).join(", ");
                format!("INSERT INTO {} ({}) {}", table, columns, sub.sql)
            }
        }
    };

    for insert in rest {
        match insert {
            InsertClause::Values { columns, values, .. } => {
                check_row(columns, values)?;
                let markers = compiler.parameterize(&mut ctx, values)?;
                sql.push_str(&format!(", ({})", markers));
            }
            InsertClause::Query { .. } => {
                return Err(ComposeError::invalid_clause("insert", "InsertQueryClause"));
            }
        }
    }

    // the last-id statement follows every row
    let last_id = compiler.dialect().last_id;
    if return_id && !last_id.is_empty() {
        sql.push(';');
        sql.push_str(last_id);
    }

    Ok(ctx.into_fragment(sql))
}

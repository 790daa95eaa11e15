//! DML (Data Manipulation Language) SQL generation.
//!
//! Select rendering lives on [`Compiler`](super::Compiler) so dialect hooks
//! can reuse its pieces; insert, update, delete and the aggregate rewrite
//! are plain `build_*` functions.

pub mod aggregate;
pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

use super::Compiler;
use super::context::SqlContext;
use crate::ast::{Component, FromClause};
use crate::error::{ComposeError, ComposeResult};

/// Target table of an insert/update/delete. Derived tables are rejected.
pub(crate) fn make_table<'a>(
    compiler: &Compiler,
    ctx: &mut SqlContext<'a>,
    operation: &'static str,
) -> ComposeResult<String> {
    let query = ctx.query;
    let from = query
        .get_one_component::<FromClause>(Component::From, Some(compiler.engine()))?
        .ok_or(ComposeError::MissingTable { operation })?;

    match from {
        FromClause::Table { table } => Ok(compiler.wrap(table)),
        FromClause::Raw {
            expression,
            bindings,
            ..
        } => {
            ctx.bindings.extend(bindings.iter().cloned());
            Ok(compiler.wrap_identifiers(expression))
        }
        FromClause::Query { .. } => Err(ComposeError::UnsupportedTarget { operation }),
    }
}

/// `" WHERE ..."` or an empty string.
pub(crate) fn where_suffix(compiler: &Compiler, ctx: &mut SqlContext<'_>) -> ComposeResult<String> {
    Ok(compiler
        .compile_wheres(ctx)?
        .map(|w| format!(" {}", w))
        .unwrap_or_default())
}

//! DELETE SQL generation.

use super::{make_table, where_suffix};
use crate::ast::Query;
use crate::compiler::Compiler;
use crate::compiler::context::{Fragment, SqlContext};
use crate::error::ComposeResult;

/// Generate `DELETE FROM t [WHERE ...]`.
pub fn build_delete(compiler: &Compiler, query: &Query) -> ComposeResult<Fragment> {
    let mut ctx = SqlContext::new(query, &[]);
    let table = make_table(compiler, &mut ctx, "delete")?;
    let wheres = where_suffix(compiler, &mut ctx)?;
    let sql = format!("DELETE FROM {}{}", table, wheres);
    Ok(ctx.into_fragment(sql))
}

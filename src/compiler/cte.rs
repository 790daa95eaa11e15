//! Common table expression ordering and the `WITH` prologue.

use super::Compiler;
use super::context::Fragment;
use crate::ast::{Component, Engine, FromClause, Query};
use crate::error::{ComposeError, ComposeResult};
use std::collections::HashSet;

/// Collects the CTEs of a statement in emission order.
///
/// CTEs declared inside a CTE body are placed right before that CTE, at any
/// depth, so every definition precedes its dependents. An alias is emitted
/// once, at its first sighting. Statements own their nested statements, so
/// the graph walked here is a tree; the seen-alias set additionally stops a
/// body from re-declaring an enclosing alias.
pub struct CteFinder<'a> {
    query: &'a Query,
    engine: Engine,
    ordered: Option<Vec<&'a FromClause>>,
}

impl<'a> CteFinder<'a> {
    pub fn new(query: &'a Query, engine: Engine) -> Self {
        Self {
            query,
            engine,
            ordered: None,
        }
    }

    /// Resolved list, computed on the first call.
    pub fn find(&mut self) -> ComposeResult<&[&'a FromClause]> {
        if self.ordered.is_none() {
            let mut seen = HashSet::new();
            let ordered = Self::find_internal(self.query, self.engine, &mut seen)?;
            self.ordered = Some(ordered);
        }
        Ok(self.ordered.as_deref().unwrap_or(&[]))
    }

    fn find_internal(
        query: &'a Query,
        engine: Engine,
        seen: &mut HashSet<&'a str>,
    ) -> ComposeResult<Vec<&'a FromClause>> {
        let mut result = Vec::new();
        for cte in query.get_components::<FromClause>(Component::Cte, Some(engine))? {
            let alias = cte.alias().unwrap_or_default();
            if !seen.insert(alias) {
                continue;
            }
            if let FromClause::Query { query: body, .. } = cte {
                result.extend(Self::find_internal(body, engine, seen)?);
            }
            result.push(cte);
        }
        Ok(result)
    }
}

/// Prefix `fragment` with `WITH a AS (...),\nb AS (...)\n`; CTE bindings
/// go before the statement's own.
pub(crate) fn prepend_ctes(compiler: &Compiler, query: &Query, fragment: Fragment) -> ComposeResult<Fragment> {
    let mut finder = CteFinder::new(query, compiler.engine());
    let ctes = finder.find()?;
    if ctes.is_empty() {
        return Ok(fragment);
    }

    tracing::trace!(
        order = ?ctes.iter().filter_map(|c| c.alias()).collect::<Vec<_>>(),
        "resolved CTE order"
    );

    let mut definitions = Vec::with_capacity(ctes.len());
    let mut bindings = Vec::new();
    for cte in ctes {
        let compiled = compiler.compile_cte(query, cte)?;
        definitions.push(compiled.sql.trim().to_string());
        bindings.extend(compiled.bindings);
    }
    bindings.extend(fragment.bindings);

    let sql = format!("WITH {}\n{}", definitions.join(",\n"), fragment.sql);
    Ok(Fragment::new(sql, bindings))
}

impl Compiler {
    /// `alias AS (body)` for one CTE of `root`.
    pub fn compile_cte(&self, root: &Query, cte: &FromClause) -> ComposeResult<Fragment> {
        let alias = cte
            .alias()
            .filter(|a| !a.is_empty())
            .ok_or_else(|| ComposeError::InvalidValue("CTE without an alias".to_string()))?;

        match cte {
            FromClause::Raw {
                expression,
                bindings,
                ..
            } => Ok(Fragment::new(
                format!("{} AS ({})", self.wrap_value(alias), self.wrap_identifiers(expression)),
                bindings.clone(),
            )),
            FromClause::Query { query, .. } => {
                let sub = self.compile_select(query, &[root])?;
                Ok(Fragment::new(
                    format!("{} AS ({})", self.wrap_value(alias), sub.sql),
                    sub.bindings,
                ))
            }
            FromClause::Table { .. } => Err(ComposeError::invalid_clause("cte", "FromClause")),
        }
    }
}

use crate::ast::{Component, Engine, Query, Value};
use crate::compiler::Compiler;
use crate::compiler::conditions::DateCondition;
use crate::compiler::context::{Fragment, SqlContext};
use crate::compiler::traits::{DialectConfig, SqlGenerator};
use crate::error::ComposeResult;

static CONFIG: DialectConfig = DialectConfig {
    opening_identifier: "[",
    closing_identifier: "]",
    last_id: "SELECT scope_identity() as Id",
    ..DialectConfig::BASE
};

const SAFE_ORDER: &str = "ORDER BY (SELECT 0)";

/// SQL Server Generator.
///
/// Legacy pagination (the default) uses `TOP (?)` for limit-only pages and a
/// `ROW_NUMBER()` wrapper once an offset is present. Modern pagination uses
/// `OFFSET ? ROWS FETCH NEXT ? ROWS ONLY`.
pub struct SqlServerGenerator;

impl SqlGenerator for SqlServerGenerator {
    fn engine(&self) -> Engine {
        Engine::SqlServer
    }

    fn config(&self) -> &'static DialectConfig {
        &CONFIG
    }

    fn compile_true(&self) -> &'static str {
        "cast(1 as bit)"
    }

    fn compile_false(&self) -> &'static str {
        "cast(0 as bit)"
    }

    fn compile_random(&self, _seed: &str) -> String {
        "NEWID()".to_string()
    }

    fn compile_columns(&self, compiler: &Compiler, ctx: &mut SqlContext<'_>) -> ComposeResult<String> {
        let compiled = compiler.base_columns(ctx)?;
        if !compiler.uses_legacy_pagination() {
            return Ok(compiled);
        }

        let engine = Some(self.engine());
        let limit = ctx.query.get_limit(engine)?;
        let offset = ctx.query.get_offset(engine)?;
        if limit == 0 || offset > 0 {
            return Ok(compiled);
        }

        // TOP precedes every other marker of the statement
        ctx.bindings.insert(0, Value::UInt(limit));

        let top = match compiled.strip_prefix("SELECT DISTINCT") {
            Some(rest) => format!("SELECT DISTINCT TOP (?){}", rest),
            None => format!("SELECT TOP (?){}", compiled.strip_prefix("SELECT").unwrap_or(&compiled)),
        };
        Ok(top)
    }

    fn compile_limit(
        &self,
        compiler: &Compiler,
        ctx: &mut SqlContext<'_>,
    ) -> ComposeResult<Option<String>> {
        if compiler.uses_legacy_pagination() {
            return Ok(None);
        }

        let engine = Some(self.engine());
        let limit = ctx.query.get_limit(engine)?;
        let offset = ctx.query.get_offset(engine)?;
        if limit == 0 && offset == 0 {
            return Ok(None);
        }

        let safe_order = if ctx.query.has_component(Component::Order, engine) {
            String::new()
        } else {
            format!("{} ", SAFE_ORDER)
        };

        ctx.bindings.push(Value::UInt(offset));
        if limit == 0 {
            return Ok(Some(format!("{}OFFSET ? ROWS", safe_order)));
        }
        ctx.bindings.push(Value::UInt(limit));
        Ok(Some(format!("{}OFFSET ? ROWS FETCH NEXT ? ROWS ONLY", safe_order)))
    }

    fn compile_date_condition(
        &self,
        compiler: &Compiler,
        ctx: &mut SqlContext<'_>,
        condition: &DateCondition<'_>,
    ) -> ComposeResult<String> {
        let column = compiler.wrap(condition.column);
        let part = condition.part.to_uppercase();
        let left = if part == "TIME" || part == "DATE" {
            format!("CAST({} AS {})", column, part)
        } else {
            format!("DATEPART({}, {})", part, column)
        };
        let value = compiler.parameter(ctx, condition.value)?;
        Ok(condition.negate(format!("{} {} {}", left, condition.operator, value)))
    }

    fn compile_select(
        &self,
        compiler: &Compiler,
        query: &Query,
        parents: &[&Query],
    ) -> ComposeResult<Fragment> {
        let engine = Some(self.engine());
        if !compiler.uses_legacy_pagination() || !query.has_offset(engine)? {
            return compiler.base_select(query, parents);
        }

        let limit = query.get_limit(engine)?;
        let offset = query.get_offset(engine)?;

        let mut paged = query.clone();
        if !paged.has_component(Component::Select, engine) {
            paged = paged.select(["*"]);
        }

        let (order, order_bindings) = {
            let mut ctx = SqlContext::new(&paged, parents);
            let order = compiler.compile_orders(&mut ctx)?;
            (order.unwrap_or_else(|| SAFE_ORDER.to_string()), ctx.bindings)
        };

        let paged = paged
            .select_raw(format!("ROW_NUMBER() OVER ({}) AS [row_num]", order), order_bindings)
            .clear_component(Component::Order, None);

        let inner = compiler.base_select(&paged, parents)?;
        let mut bindings = inner.bindings;
        bindings.push(Value::UInt(offset.saturating_add(1)));

        let sql = if limit == 0 {
            format!(
                "SELECT * FROM ({}) AS [results_wrapper] WHERE [row_num] >= ?",
                inner.sql
            )
        } else {
            bindings.push(Value::UInt(limit.saturating_add(offset)));
            format!(
                "SELECT * FROM ({}) AS [results_wrapper] WHERE [row_num] BETWEEN ? AND ?",
                inner.sql
            )
        };

        tracing::trace!(limit, offset, "rewrote select for ROW_NUMBER pagination");
        Ok(Fragment::new(sql, bindings))
    }
}

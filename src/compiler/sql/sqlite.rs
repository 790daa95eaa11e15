use crate::ast::{Engine, Value};
use crate::compiler::Compiler;
use crate::compiler::conditions::DateCondition;
use crate::compiler::context::SqlContext;
use crate::compiler::traits::{DialectConfig, SqlGenerator};
use crate::error::ComposeResult;

static CONFIG: DialectConfig = DialectConfig {
    last_id: "select last_insert_rowid() as id",
    ..DialectConfig::BASE
};

/// strftime format for each supported date part.
fn date_format(part: &str) -> Option<&'static str> {
    match part {
        "date" => Some("%Y-%m-%d"),
        "time" => Some("%H:%M:%S"),
        "year" => Some("%Y"),
        "month" => Some("%m"),
        "day" => Some("%d"),
        "hour" => Some("%H"),
        "minute" => Some("%M"),
        _ => None,
    }
}

/// SQLite Generator.
pub struct SqliteGenerator;

impl SqlGenerator for SqliteGenerator {
    fn engine(&self) -> Engine {
        Engine::Sqlite
    }

    fn config(&self) -> &'static DialectConfig {
        &CONFIG
    }

    fn compile_true(&self) -> &'static str {
        "1"
    }

    fn compile_false(&self) -> &'static str {
        "0"
    }

    fn compile_limit(
        &self,
        compiler: &Compiler,
        ctx: &mut SqlContext<'_>,
    ) -> ComposeResult<Option<String>> {
        let engine = Some(self.engine());
        let limit = ctx.query.get_limit(engine)?;
        let offset = ctx.query.get_offset(engine)?;

        // SQLite needs a LIMIT token before OFFSET
        if limit == 0 && offset > 0 {
            ctx.bindings.push(Value::UInt(offset));
            return Ok(Some("LIMIT -1 OFFSET ?".to_string()));
        }

        compiler.base_limit(ctx)
    }

    fn compile_date_condition(
        &self,
        compiler: &Compiler,
        ctx: &mut SqlContext<'_>,
        condition: &DateCondition<'_>,
    ) -> ComposeResult<String> {
        let column = compiler.wrap(condition.column);
        let value = compiler.parameter(ctx, condition.value)?;

        let Some(format) = date_format(condition.part) else {
            return Ok(format!("{} {} {}", column, condition.operator, value));
        };

        Ok(condition.negate(format!(
            "strftime('{}', {}) {} cast({} as text)",
            format, column, condition.operator, value
        )))
    }
}

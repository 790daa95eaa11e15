use crate::ast::Engine;
use crate::compiler::Compiler;
use crate::compiler::conditions::DateCondition;
use crate::compiler::context::SqlContext;
use crate::compiler::traits::{DialectConfig, SqlGenerator};
use crate::error::ComposeResult;

static CONFIG: DialectConfig = DialectConfig {
    last_id: "SELECT lastval() AS id",
    ..DialectConfig::BASE
};

/// PostgreSQL Generator.
pub struct PostgresGenerator;

impl SqlGenerator for PostgresGenerator {
    fn engine(&self) -> Engine {
        Engine::Postgres
    }

    fn config(&self) -> &'static DialectConfig {
        &CONFIG
    }

    fn compile_date_condition(
        &self,
        compiler: &Compiler,
        ctx: &mut SqlContext<'_>,
        condition: &DateCondition<'_>,
    ) -> ComposeResult<String> {
        let column = compiler.wrap(condition.column);
        let left = match condition.part {
            "time" => format!("{}::time", column),
            "date" => format!("{}::date", column),
            part => format!("DATE_PART('{}', {})", part.to_uppercase(), column),
        };
        let value = compiler.parameter(ctx, condition.value)?;
        Ok(condition.negate(format!("{} {} {}", left, condition.operator, value)))
    }
}

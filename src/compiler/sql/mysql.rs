use crate::ast::{Engine, Value};
use crate::compiler::Compiler;
use crate::compiler::context::SqlContext;
use crate::compiler::traits::{DialectConfig, SqlGenerator};
use crate::error::ComposeResult;

/// MySQL rejects a bare OFFSET, so offset-only pages use the largest row count.
const MAX_LIMIT: &str = "18446744073709551615";

static CONFIG: DialectConfig = DialectConfig {
    opening_identifier: "`",
    closing_identifier: "`",
    last_id: "SELECT last_insert_id() as Id",
    ..DialectConfig::BASE
};

/// MySQL Generator.
pub struct MysqlGenerator;

impl SqlGenerator for MysqlGenerator {
    fn engine(&self) -> Engine {
        Engine::MySql
    }

    fn config(&self) -> &'static DialectConfig {
        &CONFIG
    }

    fn compile_random(&self, seed: &str) -> String {
        format!("RAND({})", seed)
    }

    fn compile_limit(
        &self,
        compiler: &Compiler,
        ctx: &mut SqlContext<'_>,
    ) -> ComposeResult<Option<String>> {
        let engine = Some(self.engine());
        let limit = ctx.query.get_limit(engine)?;
        let offset = ctx.query.get_offset(engine)?;

        if limit == 0 && offset > 0 {
            ctx.bindings.push(Value::UInt(offset));
            return Ok(Some(format!("LIMIT {} OFFSET ?", MAX_LIMIT)));
        }

        compiler.base_limit(ctx)
    }
}

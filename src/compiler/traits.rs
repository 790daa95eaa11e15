//! Dialect hook trait and the per-dialect text configuration.

use super::Compiler;
use super::conditions::DateCondition;
use super::context::{Fragment, SqlContext};
use crate::ast::{Engine, Query};
use crate::error::ComposeResult;

/// Identifier delimiters, keywords and statement texts that differ per
/// dialect. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectConfig {
    pub opening_identifier: &'static str,
    pub closing_identifier: &'static str,
    pub column_as: &'static str,
    pub table_as: &'static str,
    /// Statement appended after an insert that asked for the generated id.
    pub last_id: &'static str,
    /// Escapes one `{`, `}`, `[` or `]` in raw expressions.
    pub escape: &'static str,
    pub placeholder: &'static str,
    pub parameter_prefix: &'static str,
}

impl DialectConfig {
    pub const BASE: DialectConfig = DialectConfig {
        opening_identifier: "\"",
        closing_identifier: "\"",
        column_as: "AS ",
        table_as: "AS ",
        last_id: "",
        escape: "\\",
        placeholder: "?",
        parameter_prefix: "@p",
    };
}

impl Default for DialectConfig {
    fn default() -> Self {
        Self::BASE
    }
}

/// Trait for dialect-specific SQL generation.
///
/// A dialect only replaces hooks; traversal stays in [`Compiler`]. Hooks
/// with a default delegate to the compiler's `base_*` rendering.
pub trait SqlGenerator: Send + Sync {
    fn engine(&self) -> Engine;

    fn config(&self) -> &'static DialectConfig {
        &DialectConfig::BASE
    }

    /// Wrap one identifier segment, doubling embedded closing delimiters.
    fn wrap_value(&self, value: &str) -> String {
        if value == "*" {
            return value.to_string();
        }
        let config = self.config();
        let closing = config.closing_identifier;
        format!(
            "{}{}{}",
            config.opening_identifier,
            value.replace(closing, &closing.repeat(2)),
            closing
        )
    }

    fn compile_true(&self) -> &'static str {
        "true"
    }

    fn compile_false(&self) -> &'static str {
        "false"
    }

    fn compile_random(&self, _seed: &str) -> String {
        "RANDOM()".to_string()
    }

    /// The `SELECT ...` column list.
    fn compile_columns(&self, compiler: &Compiler, ctx: &mut SqlContext<'_>) -> ComposeResult<String> {
        compiler.base_columns(ctx)
    }

    /// Limit/offset clause; `None` when neither is set.
    fn compile_limit(
        &self,
        compiler: &Compiler,
        ctx: &mut SqlContext<'_>,
    ) -> ComposeResult<Option<String>> {
        compiler.base_limit(ctx)
    }

    fn compile_date_condition(
        &self,
        compiler: &Compiler,
        ctx: &mut SqlContext<'_>,
        condition: &DateCondition<'_>,
    ) -> ComposeResult<String> {
        compiler.base_date_condition(ctx, condition)
    }

    /// Render a whole select statement. Overridden only when pagination
    /// needs to rewrite the statement around the base rendering.
    fn compile_select(
        &self,
        compiler: &Compiler,
        query: &Query,
        parents: &[&Query],
    ) -> ComposeResult<Fragment> {
        compiler.base_select(query, parents)
    }
}

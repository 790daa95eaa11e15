//! SQL compiler for statements built with [`Query`].
//!
//! Renders a statement into dialect-correct SQL with positional markers,
//! expands array bindings, then names every marker for the final SQL.

pub mod conditions;
pub mod context;
pub mod cte;
pub mod dialect;
pub mod dml;
pub mod registry;
pub mod result;
pub mod sql;
pub mod traits;

#[cfg(test)]
mod tests;

use crate::ast::*;
use crate::ast::clauses::find_as_keyword;
use crate::config::CompilerConfig;
use crate::error::{ComposeError, ComposeResult};
use crate::helper;
use std::collections::HashSet;
use std::fmt;

pub use context::{Fragment, SqlContext};
pub use cte::CteFinder;
pub use registry::CompilerRegistry;
pub use result::CompileResult;
pub use traits::{DialectConfig, SqlGenerator};

/// Trait for compiling statements to SQL.
pub trait ToSql {
    /// Compile with the dialect-neutral compiler.
    fn to_sql(&self) -> ComposeResult<CompileResult> {
        self.to_sql_with_engine(Engine::Generic)
    }
    /// Compile for a specific engine with its default configuration.
    fn to_sql_with_engine(&self, engine: Engine) -> ComposeResult<CompileResult>;
}

impl ToSql for Query {
    fn to_sql_with_engine(&self, engine: Engine) -> ComposeResult<CompileResult> {
        Compiler::new(engine).compile(self)
    }
}

/// Compiles statements for one engine.
///
/// Configuration is fixed at construction; compiling takes `&self`, so one
/// compiler can be shared across threads. Extending the operator whitelist
/// needs `&mut self`.
pub struct Compiler {
    engine: Engine,
    generator: Box<dyn SqlGenerator>,
    legacy_pagination: bool,
    parameter_prefix: String,
    user_operators: HashSet<String>,
}

impl fmt::Debug for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compiler")
            .field("engine", &self.engine)
            .field("legacy_pagination", &self.legacy_pagination)
            .field("parameter_prefix", &self.parameter_prefix)
            .field("user_operators", &self.user_operators)
            .finish()
    }
}

impl Compiler {
    pub fn new(engine: Engine) -> Self {
        Self::with_config(engine, &CompilerConfig::default())
    }

    pub fn with_config(engine: Engine, config: &CompilerConfig) -> Self {
        let generator = engine.generator();
        let parameter_prefix = config
            .parameter_prefix
            .clone()
            .unwrap_or_else(|| generator.config().parameter_prefix.to_string());
        Self {
            engine,
            generator,
            legacy_pagination: config.legacy_pagination,
            parameter_prefix,
            user_operators: config.operators.iter().map(|op| op.to_lowercase()).collect(),
        }
    }

    pub fn generic() -> Self {
        Self::new(Engine::Generic)
    }

    pub fn mysql() -> Self {
        Self::new(Engine::MySql)
    }

    pub fn postgres() -> Self {
        Self::new(Engine::Postgres)
    }

    pub fn sqlserver() -> Self {
        Self::new(Engine::SqlServer)
    }

    pub fn sqlite() -> Self {
        Self::new(Engine::Sqlite)
    }

    pub fn firebird() -> Self {
        Self::new(Engine::Firebird)
    }

    /// SQL Server pagination mode; ignored by other engines.
    pub fn legacy_pagination(mut self, enabled: bool) -> Self {
        self.legacy_pagination = enabled;
        self
    }

    pub fn engine(&self) -> Engine {
        self.engine
    }

    pub fn engine_code(&self) -> &'static str {
        self.engine.code()
    }

    pub fn uses_legacy_pagination(&self) -> bool {
        self.legacy_pagination
    }

    pub fn dialect(&self) -> &'static DialectConfig {
        self.generator.config()
    }

    pub(crate) fn generator(&self) -> &dyn SqlGenerator {
        self.generator.as_ref()
    }

    /// Accept extra operators in WHERE/HAVING comparisons.
    pub fn whitelist<I, S>(&mut self, operators: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for op in operators {
            self.user_operators.insert(op.as_ref().to_lowercase());
        }
        self
    }

    /// Compile one statement.
    pub fn compile(&self, query: &Query) -> ComposeResult<CompileResult> {
        let fragment = self.compile_raw(query)?;
        Ok(self.prepare_result(Some(query.clone()), fragment))
    }

    /// Compile several statements into one batch: SQL joined with `;\n`,
    /// bindings concatenated in order.
    pub fn compile_many<'q, I>(&self, queries: I) -> ComposeResult<CompileResult>
    where
        I: IntoIterator<Item = &'q Query>,
    {
        let mut statements = Vec::new();
        let mut bindings = Vec::new();
        for query in queries {
            let fragment = self.compile_raw(query)?;
            statements.push(fragment.sql);
            bindings.extend(fragment.bindings);
        }
        Ok(self.prepare_result(None, Fragment::new(statements.join(";\n"), bindings)))
    }

    /// Raw SQL with positional markers, arrays already expanded.
    pub fn compile_raw(&self, query: &Query) -> ComposeResult<Fragment> {
        let mut fragment = match query.method {
            Method::Insert => dml::insert::build_insert(self, query)?,
            Method::Update => dml::update::build_update(self, query, Component::Update)?,
            Method::Set => dml::update::build_update(self, query, Component::Set)?,
            Method::Delete => dml::delete::build_delete(self, query)?,
            Method::Aggregate => {
                let rewritten = dml::aggregate::transform(self, query)?;
                self.compile_select(&rewritten, &[])?
            }
            Method::Select => self.compile_select(query, &[])?,
        };

        if query.has_component(Component::Cte, Some(self.engine)) {
            fragment = cte::prepend_ctes(self, query, fragment)?;
        }

        let placeholder = self.dialect().placeholder;
        fragment.sql = helper::expand_parameters(&fragment.sql, placeholder, &fragment.bindings)?;

        tracing::debug!(
            engine = self.engine_code(),
            method = %query.method,
            bindings = fragment.bindings.len(),
            "compiled statement"
        );
        Ok(fragment)
    }

    fn prepare_result(&self, query: Option<Query>, fragment: Fragment) -> CompileResult {
        let placeholder = self.dialect().placeholder;
        let prefix = &self.parameter_prefix;
        let named_bindings = helper::flatten(&fragment.bindings)
            .into_iter()
            .enumerate()
            .map(|(i, value)| (format!("{}{}", prefix, i), value))
            .collect();
        let sql = helper::replace_all(&fragment.sql, placeholder, |i| format!("{}{}", prefix, i));

        CompileResult {
            query,
            raw_sql: fragment.sql,
            sql,
            bindings: fragment.bindings,
            named_bindings,
        }
    }

    /// Render a nested or top-level select through the dialect hook.
    pub fn compile_select(&self, query: &Query, parents: &[&Query]) -> ComposeResult<Fragment> {
        self.generator.compile_select(self, query, parents)
    }

    /// Lower-cases the operator and checks it against the whitelist.
    pub fn check_operator(&self, op: &str) -> ComposeResult<String> {
        let op = op.to_lowercase();
        if SAFE_OPERATORS.contains(&op.as_str()) || self.user_operators.contains(&op) {
            Ok(op)
        } else {
            Err(ComposeError::InvalidOperator(op))
        }
    }

    /// Wrap an identifier: `a as b`, `schema.table.column` and `*` aware.
    pub fn wrap(&self, value: &str) -> String {
        if let Some(index) = find_as_keyword(value) {
            let before = &value[..index];
            let after = &value[index + 4..];
            return format!(
                "{} {}{}",
                self.wrap(before),
                self.dialect().column_as,
                self.wrap_value(after)
            );
        }

        if value.contains('.') {
            return value
                .split('.')
                .map(|segment| self.wrap_value(segment))
                .collect::<Vec<_>>()
                .join(".");
        }

        self.wrap_value(value)
    }

    pub fn wrap_value(&self, value: &str) -> String {
        self.generator.wrap_value(value)
    }

    pub fn wrap_array(&self, values: &[String]) -> Vec<String> {
        values.iter().map(|v| self.wrap(v)).collect()
    }

    /// Convert `{ }` and `[ ]` in a raw expression to the dialect's
    /// identifier delimiters.
    pub fn wrap_identifiers(&self, input: &str) -> String {
        let config = self.dialect();
        let escape = config.escape;
        let out = helper::replace_identifier_unless_escaped(input, escape, "{", config.opening_identifier);
        let out = helper::replace_identifier_unless_escaped(&out, escape, "}", config.closing_identifier);
        let out = helper::replace_identifier_unless_escaped(&out, escape, "[", config.opening_identifier);
        helper::replace_identifier_unless_escaped(&out, escape, "]", config.closing_identifier)
    }

    /// Bind `value` and return its marker. Unsafe literals are inlined and
    /// variables are looked up before binding.
    pub fn parameter(&self, ctx: &mut SqlContext<'_>, value: &Value) -> ComposeResult<String> {
        match value {
            Value::Raw(sql) => {
                tracing::warn!(literal = %sql, "inlining unsafe literal");
                Ok(sql.clone())
            }
            Value::Variable(name) => {
                let resolved = ctx
                    .find_variable(name)
                    .ok_or_else(|| ComposeError::UndefinedVariable(name.clone()))?
                    .clone();
                ctx.bindings.push(resolved);
                Ok(self.dialect().placeholder.to_string())
            }
            other => {
                ctx.bindings.push(other.clone());
                Ok(self.dialect().placeholder.to_string())
            }
        }
    }

    pub fn parameterize(&self, ctx: &mut SqlContext<'_>, values: &[Value]) -> ComposeResult<String> {
        let markers = values
            .iter()
            .map(|v| self.parameter(ctx, v))
            .collect::<ComposeResult<Vec<_>>>()?;
        Ok(markers.join(", "))
    }

    /// Value as it would be bound, without binding it.
    pub fn resolve(&self, ctx: &SqlContext<'_>, value: &Value) -> ComposeResult<Value> {
        match value {
            Value::Variable(name) => ctx
                .find_variable(name)
                .cloned()
                .ok_or_else(|| ComposeError::UndefinedVariable(name.clone())),
            other => Ok(other.clone()),
        }
    }
}

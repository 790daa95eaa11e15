use crate::ast::{Query, Value};
use crate::helper;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Output of one `compile` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompileResult {
    /// The statement that was compiled; `None` for a batch.
    pub query: Option<Query>,
    /// SQL with positional `?` markers, arrays expanded.
    pub raw_sql: String,
    /// SQL with dialect-named markers (`@p0`, `@p1`, ...).
    pub sql: String,
    /// One binding per marker before array expansion.
    pub bindings: Vec<Value>,
    /// Flattened bindings keyed by their marker name in `sql`.
    pub named_bindings: IndexMap<String, Value>,
}

impl CompileResult {
    /// Bindings aligned one-to-one with the markers of `raw_sql`.
    pub fn flat_bindings(&self) -> Vec<Value> {
        helper::flatten(&self.bindings)
    }
}

/// Raw SQL with the bindings inlined as literals. For logs only.
impl fmt::Display for CompileResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flat = self.flat_bindings();
        let sql = helper::replace_all(&self.raw_sql, "?", |i| {
            flat.get(i).map_or_else(|| "?".to_string(), Value::to_string)
        });
        f.write_str(&sql)
    }
}

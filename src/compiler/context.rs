//! Per-statement compile state.

use crate::ast::{Query, Value};

/// Rendered SQL plus the bindings for its positional markers, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub sql: String,
    pub bindings: Vec<Value>,
}

impl Fragment {
    pub fn new(sql: impl Into<String>, bindings: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            bindings,
        }
    }
}

/// State for rendering one select (or insert/update/delete) statement.
///
/// `parents` are the statements this one is nested in, outermost first;
/// variables not defined locally are looked up there.
#[derive(Debug)]
pub struct SqlContext<'a> {
    pub query: &'a Query,
    parents: Vec<&'a Query>,
    pub bindings: Vec<Value>,
}

impl<'a> SqlContext<'a> {
    pub fn new(query: &'a Query, parents: &[&'a Query]) -> Self {
        Self {
            query,
            parents: parents.to_vec(),
            bindings: Vec::new(),
        }
    }

    /// Scope chain handed to statements nested in this one.
    pub fn scopes(&self) -> Vec<&'a Query> {
        let mut scopes = self.parents.clone();
        scopes.push(self.query);
        scopes
    }

    pub fn find_variable(&self, name: &str) -> Option<&'a Value> {
        self.query.find_variable(name).or_else(|| {
            self.parents
                .iter()
                .rev()
                .find_map(|parent| parent.find_variable(name))
        })
    }

    pub fn into_fragment(self, sql: String) -> Fragment {
        Fragment::new(sql, self.bindings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_falls_back_to_parents() {
        let outer = Query::table("a").define("min", 10).define("max", 20);
        let inner = Query::table("b").define("max", 5);
        let ctx = SqlContext::new(&inner, &[&outer]);
        assert_eq!(ctx.find_variable("max"), Some(&Value::Int(5)));
        assert_eq!(ctx.find_variable("min"), Some(&Value::Int(10)));
        assert_eq!(ctx.find_variable("missing"), None);
    }
}

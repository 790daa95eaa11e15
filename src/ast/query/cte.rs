//! Common table expressions attached to a statement.

use crate::ast::{ClauseKind, Component, FromClause, Query, Value};

impl Query {
    /// Attach `query` as a CTE named `alias`. The first definition of an
    /// alias wins when CTEs are collected across nested statements.
    pub fn with(mut self, alias: impl Into<String>, query: Query) -> Self {
        let alias = alias.into();
        self.push_component(
            Component::Cte,
            ClauseKind::From(FromClause::Query {
                query: Box::new(query.alias(alias.clone())),
                alias: Some(alias),
            }),
        );
        self
    }

    /// Attach a raw CTE body: `alias AS (sql)`.
    pub fn with_raw<B>(mut self, alias: impl Into<String>, sql: impl Into<String>, bindings: B) -> Self
    where
        B: IntoIterator,
        B::Item: Into<Value>,
    {
        self.push_component(
            Component::Cte,
            ClauseKind::From(FromClause::Raw {
                expression: sql.into(),
                bindings: bindings.into_iter().map(Into::into).collect(),
                alias: Some(alias.into()),
            }),
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cte_aliases() {
        let q = Query::table("t")
            .with("a", Query::table("x"))
            .with_raw("b", "select 1", [Value::Int(1)]);
        let ctes = q.get_components::<FromClause>(Component::Cte, None).unwrap();
        let aliases: Vec<_> = ctes.iter().filter_map(|c| c.alias()).collect();
        assert_eq!(aliases, vec!["a", "b"]);
    }
}

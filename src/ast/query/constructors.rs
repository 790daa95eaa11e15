//! Statement constructors and method switches.
//!
//! Methods like table(), as_insert(), as_update(), as_delete(), as_count().

use crate::ast::{AggregateClause, ClauseKind, Component, InsertClause, Method, Query, Value};

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// A select over `table`. Accepts `"table as alias"`.
    pub fn table(table: impl Into<String>) -> Self {
        Self::new().from(table)
    }

    /// Alias used when this statement is nested in another one.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn as_insert<C, S, V, T>(self, columns: C, values: V) -> Self
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
        V: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.insert_row(columns, values, false)
    }

    /// Insert one row and append the dialect's "last generated id" statement.
    pub fn as_insert_returning_id<C, S, V, T>(self, columns: C, values: V) -> Self
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
        V: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.insert_row(columns, values, true)
    }

    fn insert_row<C, S, V, T>(mut self, columns: C, values: V, return_id: bool) -> Self
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
        V: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.method = Method::Insert;
        self.remove_component(Component::Insert, None);
        self.push_component(
            Component::Insert,
            ClauseKind::Insert(InsertClause::Values {
                columns: columns.into_iter().map(Into::into).collect(),
                values: values.into_iter().map(Into::into).collect(),
                return_id,
            }),
        );
        self
    }

    /// Insert from `(column, value)` pairs.
    pub fn as_insert_pairs<I, S, T>(self, data: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<Value>,
    {
        let (columns, values): (Vec<String>, Vec<Value>) = data
            .into_iter()
            .map(|(c, v)| (c.into(), v.into()))
            .unzip();
        self.as_insert(columns, values)
    }

    /// Multi-row insert: one insert clause per row, sharing the column list.
    pub fn as_insert_many<C, S, R, V, T>(mut self, columns: C, rows: R) -> Self
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
        R: IntoIterator<Item = V>,
        V: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        self.method = Method::Insert;
        self.remove_component(Component::Insert, None);
        for row in rows {
            self.push_component(
                Component::Insert,
                ClauseKind::Insert(InsertClause::Values {
                    columns: columns.clone(),
                    values: row.into_iter().map(Into::into).collect(),
                    return_id: false,
                }),
            );
        }
        self
    }

    /// `INSERT INTO t (cols) SELECT ...`
    pub fn as_insert_query<C, S>(mut self, columns: C, query: Query) -> Self
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.method = Method::Insert;
        self.remove_component(Component::Insert, None);
        self.push_component(
            Component::Insert,
            ClauseKind::Insert(InsertClause::Query {
                columns: columns.into_iter().map(Into::into).collect(),
                query: Box::new(query),
            }),
        );
        self
    }

    pub fn as_update<C, S, V, T>(self, columns: C, values: V) -> Self
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
        V: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.assign(Method::Update, Component::Update, columns, values)
    }

    pub fn as_update_pairs<I, S, T>(self, data: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<Value>,
    {
        let (columns, values): (Vec<String>, Vec<Value>) = data
            .into_iter()
            .map(|(c, v)| (c.into(), v.into()))
            .unzip();
        self.as_update(columns, values)
    }

    /// Assignments stored in the `set` bucket; compiled as an UPDATE.
    pub fn as_set<C, S, V, T>(self, columns: C, values: V) -> Self
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
        V: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.assign(Method::Set, Component::Set, columns, values)
    }

    fn assign<C, S, V, T>(mut self, method: Method, component: Component, columns: C, values: V) -> Self
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
        V: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.method = method;
        self.remove_component(component, None);
        self.push_component(
            component,
            ClauseKind::Insert(InsertClause::Values {
                columns: columns.into_iter().map(Into::into).collect(),
                values: values.into_iter().map(Into::into).collect(),
                return_id: false,
            }),
        );
        self
    }

    pub fn as_delete(mut self) -> Self {
        self.method = Method::Delete;
        self
    }

    /// Aggregate over one or more columns. Several columns (or a DISTINCT
    /// statement) compile through an inner statement.
    pub fn as_aggregate<C, S>(mut self, function: impl Into<String>, columns: C) -> Self
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            columns.push("*".to_string());
        }
        self.method = Method::Aggregate;
        self.remove_component(Component::Aggregate, None);
        self.push_component(
            Component::Aggregate,
            ClauseKind::Aggregate(AggregateClause {
                function: function.into(),
                columns,
            }),
        );
        self
    }

    pub fn as_count<C, S>(self, columns: C) -> Self
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.as_aggregate("count", columns)
    }

    pub fn as_avg(self, column: impl Into<String>) -> Self {
        self.as_aggregate("avg", [column.into()])
    }

    pub fn as_sum(self, column: impl Into<String>) -> Self {
        self.as_aggregate("sum", [column.into()])
    }

    pub fn as_max(self, column: impl Into<String>) -> Self {
        self.as_aggregate("max", [column.into()])
    }

    pub fn as_min(self, column: impl Into<String>) -> Self {
        self.as_aggregate("min", [column.into()])
    }
}

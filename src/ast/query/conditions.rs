//! WHERE and HAVING builders.
//!
//! Every builder appends one [`Condition`] to the bucket, consuming any
//! pending `or()` / `not()` prefix.

use crate::ast::{ClauseKind, Component, Condition, ConditionKind, Query, Value, NO_BINDINGS};

impl Query {
    fn push_condition(mut self, component: Component, kind: ConditionKind) -> Self {
        let (is_or, is_not) = self.take_flags();
        self.push_component(
            component,
            ClauseKind::Condition(Condition::new(kind).or(is_or).not(is_not)),
        );
        self
    }

    fn comparison(self, component: Component, column: &str, op: &str, value: Value) -> Self {
        if value.is_null() {
            let negated = matches!(op, "!=" | "<>");
            let q = if negated { self.not() } else { self };
            return q.push_condition(
                component,
                ConditionKind::Null {
                    column: column.to_string(),
                },
            );
        }
        self.push_condition(
            component,
            ConditionKind::Basic {
                column: column.to_string(),
                operator: op.to_string(),
                value,
            },
        )
    }

    /// `column op ?`. A NULL value with `=` becomes `IS NULL`, with `!=` or
    /// `<>` becomes `IS NOT NULL`.
    pub fn where_op(self, column: &str, op: &str, value: impl Into<Value>) -> Self {
        self.comparison(Component::Where, column, op, value.into())
    }

    pub fn where_eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.where_op(column, "=", value)
    }

    pub fn or_where_op(self, column: &str, op: &str, value: impl Into<Value>) -> Self {
        self.or().where_op(column, op, value)
    }

    pub fn or_where_eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.or().where_eq(column, value)
    }

    pub fn where_not(self, column: &str, op: &str, value: impl Into<Value>) -> Self {
        self.not().where_op(column, op, value)
    }

    pub fn where_null(self, column: &str) -> Self {
        self.push_condition(
            Component::Where,
            ConditionKind::Null {
                column: column.to_string(),
            },
        )
    }

    pub fn where_not_null(self, column: &str) -> Self {
        self.not().where_null(column)
    }

    pub fn or_where_null(self, column: &str) -> Self {
        self.or().where_null(column)
    }

    pub fn or_where_not_null(self, column: &str) -> Self {
        self.or().not().where_null(column)
    }

    pub fn where_true(self, column: &str) -> Self {
        self.push_condition(
            Component::Where,
            ConditionKind::Boolean {
                column: column.to_string(),
                value: true,
            },
        )
    }

    pub fn where_false(self, column: &str) -> Self {
        self.push_condition(
            Component::Where,
            ConditionKind::Boolean {
                column: column.to_string(),
                value: false,
            },
        )
    }

    pub fn where_in<I, T>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.push_condition(
            Component::Where,
            ConditionKind::In {
                column: column.to_string(),
                values: values.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn where_not_in<I, T>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.not().where_in(column, values)
    }

    pub fn or_where_in<I, T>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.or().where_in(column, values)
    }

    pub fn where_in_query(self, column: &str, query: Query) -> Self {
        self.push_condition(
            Component::Where,
            ConditionKind::InQuery {
                column: column.to_string(),
                query: Box::new(query),
            },
        )
    }

    pub fn where_not_in_query(self, column: &str, query: Query) -> Self {
        self.not().where_in_query(column, query)
    }

    pub fn where_between(
        self,
        column: &str,
        lower: impl Into<Value>,
        higher: impl Into<Value>,
    ) -> Self {
        self.push_condition(
            Component::Where,
            ConditionKind::Between {
                column: column.to_string(),
                lower: lower.into(),
                higher: higher.into(),
            },
        )
    }

    pub fn where_not_between(
        self,
        column: &str,
        lower: impl Into<Value>,
        higher: impl Into<Value>,
    ) -> Self {
        self.not().where_between(column, lower, higher)
    }

    /// String comparison. `starts`, `ends` and `contains` compile to LIKE
    /// with the matching `%` wildcards; any other operator is used as is.
    pub fn where_string(
        self,
        column: &str,
        operator: &str,
        value: impl Into<Value>,
        case_sensitive: bool,
        escape: Option<char>,
    ) -> Self {
        self.push_condition(
            Component::Where,
            ConditionKind::Like {
                column: column.to_string(),
                operator: operator.to_string(),
                value: value.into(),
                case_sensitive,
                escape,
            },
        )
    }

    pub fn where_like(self, column: &str, value: impl Into<Value>) -> Self {
        self.where_string(column, "like", value, false, None)
    }

    pub fn where_not_like(self, column: &str, value: impl Into<Value>) -> Self {
        self.not().where_like(column, value)
    }

    pub fn where_starts(self, column: &str, value: impl Into<Value>) -> Self {
        self.where_string(column, "starts", value, false, None)
    }

    pub fn where_ends(self, column: &str, value: impl Into<Value>) -> Self {
        self.where_string(column, "ends", value, false, None)
    }

    pub fn where_contains(self, column: &str, value: impl Into<Value>) -> Self {
        self.where_string(column, "contains", value, false, None)
    }

    /// Compare one part of a temporal column (`year`, `month`, `date`, ...).
    pub fn where_date_part(
        self,
        part: &str,
        column: &str,
        op: &str,
        value: impl Into<Value>,
    ) -> Self {
        self.push_condition(
            Component::Where,
            ConditionKind::Date {
                part: part.to_lowercase(),
                column: column.to_string(),
                operator: op.to_string(),
                value: value.into(),
            },
        )
    }

    pub fn where_date(self, column: &str, op: &str, value: impl Into<Value>) -> Self {
        self.where_date_part("date", column, op, value)
    }

    pub fn where_time(self, column: &str, op: &str, value: impl Into<Value>) -> Self {
        self.where_date_part("time", column, op, value)
    }

    pub fn where_columns(self, first: &str, op: &str, second: &str) -> Self {
        self.push_condition(
            Component::Where,
            ConditionKind::Columns {
                first: first.to_string(),
                operator: op.to_string(),
                second: second.to_string(),
            },
        )
    }

    pub fn where_raw<B>(self, expression: impl Into<String>, bindings: B) -> Self
    where
        B: IntoIterator,
        B::Item: Into<Value>,
    {
        self.push_condition(
            Component::Where,
            ConditionKind::Raw {
                expression: expression.into(),
                bindings: bindings.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn or_where_raw<B>(self, expression: impl Into<String>, bindings: B) -> Self
    where
        B: IntoIterator,
        B::Item: Into<Value>,
    {
        self.or().where_raw(expression, bindings)
    }

    /// `EXISTS (SELECT 1 FROM ...)`; the nested select list is replaced.
    pub fn where_exists(self, query: Query) -> Self {
        let query = query
            .clear_component(Component::Select, None)
            .select_raw("1", NO_BINDINGS);
        self.push_condition(
            Component::Where,
            ConditionKind::Exists {
                query: Box::new(query),
            },
        )
    }

    pub fn where_not_exists(self, query: Query) -> Self {
        self.not().where_exists(query)
    }

    /// Parenthesized group of the conditions built by `f`.
    pub fn where_nested(self, f: impl FnOnce(Query) -> Query) -> Self {
        let nested = f(Query::new());
        self.push_condition(
            Component::Where,
            ConditionKind::Nested {
                query: Box::new(nested),
            },
        )
    }

    pub fn or_where_nested(self, f: impl FnOnce(Query) -> Query) -> Self {
        self.or().where_nested(f)
    }

    /// `(subquery) op ?`
    pub fn where_sub(self, query: Query, op: &str, value: impl Into<Value>) -> Self {
        self.push_condition(
            Component::Where,
            ConditionKind::SubQuery {
                query: Box::new(query),
                operator: op.to_string(),
                value: value.into(),
            },
        )
    }

    /// `column op (subquery)`
    pub fn where_column_query(self, column: &str, op: &str, query: Query) -> Self {
        self.push_condition(
            Component::Where,
            ConditionKind::ColumnQuery {
                column: column.to_string(),
                operator: op.to_string(),
                query: Box::new(query),
            },
        )
    }

    pub fn having_op(self, column: &str, op: &str, value: impl Into<Value>) -> Self {
        self.comparison(Component::Having, column, op, value.into())
    }

    pub fn or_having_op(self, column: &str, op: &str, value: impl Into<Value>) -> Self {
        self.or().having_op(column, op, value)
    }

    pub fn having_raw<B>(self, expression: impl Into<String>, bindings: B) -> Self
    where
        B: IntoIterator,
        B::Item: Into<Value>,
    {
        self.push_condition(
            Component::Having,
            ConditionKind::Raw {
                expression: expression.into(),
                bindings: bindings.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn or_having_raw<B>(self, expression: impl Into<String>, bindings: B) -> Self
    where
        B: IntoIterator,
        B::Item: Into<Value>,
    {
        self.or().having_raw(expression, bindings)
    }
}

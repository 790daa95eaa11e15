//! Fluent builders for select columns, table expressions, joins, grouping,
//! ordering, pagination and set operations.

use crate::ast::{
    ClauseKind, Column, Combine, Component, FromClause, Join, JoinKind, LimitClause, OffsetClause,
    OrderBy, Query, SetOp, Value,
};
use crate::helper::expand_expression;

impl Query {
    /// Select columns. `"users.{id, name}"` expands to `users.id, users.name`.
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for column in columns {
            for expanded in expand_expression(column.as_ref()) {
                self.push_component(Component::Select, ClauseKind::Column(Column::Named(expanded)));
            }
        }
        self
    }

    pub fn select_raw<B>(mut self, expression: impl Into<String>, bindings: B) -> Self
    where
        B: IntoIterator,
        B::Item: Into<Value>,
    {
        self.push_component(
            Component::Select,
            ClauseKind::Column(Column::Raw {
                expression: expression.into(),
                bindings: bindings.into_iter().map(Into::into).collect(),
            }),
        );
        self
    }

    /// Scalar subquery column: `(SELECT ...) AS alias`.
    pub fn select_query(mut self, query: Query, alias: impl Into<String>) -> Self {
        self.push_component(
            Component::Select,
            ClauseKind::Column(Column::Query {
                query: Box::new(query),
                alias: Some(alias.into()),
            }),
        );
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn from(self, table: impl Into<String>) -> Self {
        self.add_or_replace_component(Component::From, ClauseKind::From(FromClause::table(table)))
    }

    pub fn from_raw<B>(self, expression: impl Into<String>, bindings: B) -> Self
    where
        B: IntoIterator,
        B::Item: Into<Value>,
    {
        self.add_or_replace_component(
            Component::From,
            ClauseKind::From(FromClause::Raw {
                expression: expression.into(),
                bindings: bindings.into_iter().map(Into::into).collect(),
                alias: None,
            }),
        )
    }

    /// Select from a derived table using the nested statement's own alias.
    pub fn from_query(self, query: Query) -> Self {
        self.add_or_replace_component(
            Component::From,
            ClauseKind::From(FromClause::Query {
                query: Box::new(query),
                alias: None,
            }),
        )
    }

    pub fn from_query_as(self, query: Query, alias: impl Into<String>) -> Self {
        self.from_query(query.alias(alias))
    }

    pub fn join(self, table: impl Into<String>, first: &str, op: &str, second: &str) -> Self {
        self.join_clause(Join::new(JoinKind::Inner, table).on(first, op, second))
    }

    pub fn left_join(self, table: impl Into<String>, first: &str, op: &str, second: &str) -> Self {
        self.join_clause(Join::new(JoinKind::Left, table).on(first, op, second))
    }

    pub fn right_join(self, table: impl Into<String>, first: &str, op: &str, second: &str) -> Self {
        self.join_clause(Join::new(JoinKind::Right, table).on(first, op, second))
    }

    pub fn cross_join(self, table: impl Into<String>) -> Self {
        self.join_clause(Join::new(JoinKind::Cross, table))
    }

    /// Join with constraints built on the [`Join`].
    pub fn join_with(
        self,
        kind: JoinKind,
        table: impl Into<String>,
        f: impl FnOnce(Join) -> Join,
    ) -> Self {
        self.join_clause(f(Join::new(kind, table)))
    }

    pub fn join_clause(mut self, join: Join) -> Self {
        self.push_component(Component::Join, ClauseKind::Join(join));
        self
    }

    pub fn group_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for column in columns {
            self.push_component(Component::Group, ClauseKind::Column(Column::Named(column.into())));
        }
        self
    }

    pub fn group_by_raw<B>(mut self, expression: impl Into<String>, bindings: B) -> Self
    where
        B: IntoIterator,
        B::Item: Into<Value>,
    {
        self.push_component(
            Component::Group,
            ClauseKind::Column(Column::Raw {
                expression: expression.into(),
                bindings: bindings.into_iter().map(Into::into).collect(),
            }),
        );
        self
    }

    pub fn order_by<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order(columns, true)
    }

    pub fn order_by_desc<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order(columns, false)
    }

    fn order<I, S>(mut self, columns: I, ascending: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for column in columns {
            self.push_component(
                Component::Order,
                ClauseKind::Order(OrderBy::Column {
                    column: column.into(),
                    ascending,
                }),
            );
        }
        self
    }

    pub fn order_by_raw<B>(mut self, expression: impl Into<String>, bindings: B) -> Self
    where
        B: IntoIterator,
        B::Item: Into<Value>,
    {
        self.push_component(
            Component::Order,
            ClauseKind::Order(OrderBy::Raw {
                expression: expression.into(),
                bindings: bindings.into_iter().map(Into::into).collect(),
            }),
        );
        self
    }

    pub fn order_by_random(mut self, seed: impl Into<String>) -> Self {
        self.push_component(Component::Order, ClauseKind::Order(OrderBy::Random { seed: seed.into() }));
        self
    }

    /// Zero clears the limit for the active engine scope.
    pub fn limit(self, n: u64) -> Self {
        self.add_or_replace_component(Component::Limit, ClauseKind::Limit(LimitClause(n)))
    }

    /// Zero clears the offset for the active engine scope.
    pub fn offset(self, n: u64) -> Self {
        self.add_or_replace_component(Component::Offset, ClauseKind::Offset(OffsetClause(n)))
    }

    pub fn take(self, n: u64) -> Self {
        self.limit(n)
    }

    pub fn skip(self, n: u64) -> Self {
        self.offset(n)
    }

    /// One-based page of `per_page` rows.
    pub fn for_page(self, page: u64, per_page: u64) -> Self {
        self.limit(per_page)
            .offset(page.saturating_sub(1).saturating_mul(per_page))
    }

    pub fn union(self, query: Query) -> Self {
        self.combine(SetOp::Union, false, query)
    }

    pub fn union_all(self, query: Query) -> Self {
        self.combine(SetOp::Union, true, query)
    }

    pub fn except(self, query: Query) -> Self {
        self.combine(SetOp::Except, false, query)
    }

    pub fn except_all(self, query: Query) -> Self {
        self.combine(SetOp::Except, true, query)
    }

    pub fn intersect(self, query: Query) -> Self {
        self.combine(SetOp::Intersect, false, query)
    }

    pub fn intersect_all(self, query: Query) -> Self {
        self.combine(SetOp::Intersect, true, query)
    }

    pub fn combine(mut self, operation: SetOp, all: bool, query: Query) -> Self {
        self.push_component(
            Component::Combine,
            ClauseKind::Combine(Combine::Query {
                operation,
                all,
                query: Box::new(query),
            }),
        );
        self
    }

    pub fn combine_raw<B>(mut self, expression: impl Into<String>, bindings: B) -> Self
    where
        B: IntoIterator,
        B::Item: Into<Value>,
    {
        self.push_component(
            Component::Combine,
            ClauseKind::Combine(Combine::Raw {
                expression: expression.into(),
                bindings: bindings.into_iter().map(Into::into).collect(),
            }),
        );
        self
    }
}

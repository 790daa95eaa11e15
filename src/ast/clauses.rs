//! Closed clause families stored in a statement's component buckets.

use crate::ast::{Component, Engine, JoinKind, Query, SetOp, Value};
use serde::{Deserialize, Serialize};

/// A table expression (FROM target, join target or CTE body).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FromClause {
    /// Physical table, optionally aliased inline: `"users as u"`.
    Table { table: String },
    Raw {
        expression: String,
        bindings: Vec<Value>,
        alias: Option<String>,
    },
    /// Derived table. The alias defaults to the nested statement's own alias.
    Query {
        query: Box<Query>,
        alias: Option<String>,
    },
}

impl FromClause {
    pub fn table(table: impl Into<String>) -> Self {
        FromClause::Table {
            table: table.into(),
        }
    }

    /// Name this table expression is referred to by.
    pub fn alias(&self) -> Option<&str> {
        match self {
            FromClause::Table { table } => {
                if find_as_keyword(table).is_some() {
                    table.split_whitespace().nth(2).or(Some(table.as_str()))
                } else {
                    Some(table)
                }
            }
            FromClause::Raw { alias, .. } => alias.as_deref(),
            FromClause::Query { query, alias } => alias.as_deref().or(query.alias.as_deref()),
        }
    }
}

/// Byte index of a case-insensitive `" as "` separator, if any.
pub(crate) fn find_as_keyword(value: &str) -> Option<usize> {
    value.to_ascii_lowercase().find(" as ")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Column {
    Named(String),
    Raw {
        expression: String,
        bindings: Vec<Value>,
    },
    /// Scalar subquery column.
    Query {
        query: Box<Query>,
        alias: Option<String>,
    },
}

/// One condition in a flat, ordered WHERE/HAVING/ON list.
///
/// `is_or` joins this condition to the previous sibling; the first
/// condition of a list ignores it. Grouping is expressed with
/// [`ConditionKind::Nested`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub kind: ConditionKind,
    #[serde(default)]
    pub is_or: bool,
    #[serde(default)]
    pub is_not: bool,
}

impl Condition {
    pub fn new(kind: ConditionKind) -> Self {
        Self {
            kind,
            is_or: false,
            is_not: false,
        }
    }

    pub fn or(mut self, is_or: bool) -> Self {
        self.is_or = is_or;
        self
    }

    pub fn not(mut self, is_not: bool) -> Self {
        self.is_not = is_not;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConditionKind {
    Basic {
        column: String,
        operator: String,
        value: Value,
    },
    /// LIKE family: `like`, `starts`, `ends`, `contains` or any white-listed operator.
    Like {
        column: String,
        operator: String,
        value: Value,
        case_sensitive: bool,
        escape: Option<char>,
    },
    /// Compare one part (`date`, `time`, `year`, ...) of a temporal column.
    Date {
        part: String,
        column: String,
        operator: String,
        value: Value,
    },
    Columns {
        first: String,
        operator: String,
        second: String,
    },
    Null {
        column: String,
    },
    Boolean {
        column: String,
        value: bool,
    },
    In {
        column: String,
        values: Vec<Value>,
    },
    InQuery {
        column: String,
        query: Box<Query>,
    },
    Between {
        column: String,
        lower: Value,
        higher: Value,
    },
    Exists {
        query: Box<Query>,
    },
    /// `column op (subquery)`
    ColumnQuery {
        column: String,
        operator: String,
        query: Box<Query>,
    },
    /// `(subquery) op value`
    SubQuery {
        query: Box<Query>,
        operator: String,
        value: Value,
    },
    /// Parenthesized group built from the nested statement's WHERE bucket.
    Nested {
        query: Box<Query>,
    },
    Raw {
        expression: String,
        bindings: Vec<Value>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Combine {
    Query {
        operation: SetOp,
        all: bool,
        query: Box<Query>,
    },
    Raw {
        expression: String,
        bindings: Vec<Value>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OrderBy {
    Column { column: String, ascending: bool },
    Raw {
        expression: String,
        bindings: Vec<Value>,
    },
    Random { seed: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InsertClause {
    /// Parallel column/value lists. Several of these on one statement form a
    /// multi-row insert.
    Values {
        columns: Vec<String>,
        values: Vec<Value>,
        return_id: bool,
    },
    /// `INSERT INTO t (cols) SELECT ...`
    Query { columns: Vec<String>, query: Box<Query> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateClause {
    pub function: String,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitClause(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetClause(pub u64);

/// A join: the target table lives in the inner statement's FROM bucket and
/// the ON constraints in its WHERE bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub kind: JoinKind,
    pub query: Box<Query>,
}

impl Join {
    pub fn new(kind: JoinKind, table: impl Into<String>) -> Self {
        Self {
            kind,
            query: Box::new(Query::table(table)),
        }
    }

    /// Join a derived table.
    pub fn sub(kind: JoinKind, query: Query, alias: impl Into<String>) -> Self {
        Self {
            kind,
            query: Box::new(Query::new().from_query_as(query, alias)),
        }
    }

    pub fn on(mut self, first: &str, op: &str, second: &str) -> Self {
        self.query = Box::new(self.query.where_columns(first, op, second));
        self
    }

    pub fn or_on(mut self, first: &str, op: &str, second: &str) -> Self {
        self.query = Box::new(self.query.or().where_columns(first, op, second));
        self
    }

    /// Add any condition to the ON clause through the statement builders.
    pub fn constrain(mut self, f: impl FnOnce(Query) -> Query) -> Self {
        self.query = Box::new(f(*self.query));
        self
    }
}

/// A clause stored in a component bucket, optionally scoped to one engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    pub component: Component,
    #[serde(default)]
    pub engine: Option<Engine>,
    pub kind: ClauseKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClauseKind {
    From(FromClause),
    Column(Column),
    Condition(Condition),
    Join(Join),
    Order(OrderBy),
    Combine(Combine),
    Insert(InsertClause),
    Aggregate(AggregateClause),
    Limit(LimitClause),
    Offset(OffsetClause),
}

impl ClauseKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ClauseKind::From(_) => "FromClause",
            ClauseKind::Column(_) => "Column",
            ClauseKind::Condition(_) => "Condition",
            ClauseKind::Join(_) => "Join",
            ClauseKind::Order(_) => "OrderBy",
            ClauseKind::Combine(_) => "Combine",
            ClauseKind::Insert(_) => "InsertClause",
            ClauseKind::Aggregate(_) => "AggregateClause",
            ClauseKind::Limit(_) => "LimitClause",
            ClauseKind::Offset(_) => "OffsetClause",
        }
    }
}

/// Typed view over [`ClauseKind`], used by `Query::get_components`.
pub trait ClauseVariant: Sized {
    fn from_kind(kind: &ClauseKind) -> Option<&Self>;
}

macro_rules! clause_variant {
    ($ty:ty, $variant:ident) => {
        impl ClauseVariant for $ty {
            fn from_kind(kind: &ClauseKind) -> Option<&Self> {
                match kind {
                    ClauseKind::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

clause_variant!(FromClause, From);
clause_variant!(Column, Column);
clause_variant!(Condition, Condition);
clause_variant!(Join, Join);
clause_variant!(OrderBy, Order);
clause_variant!(Combine, Combine);
clause_variant!(InsertClause, Insert);
clause_variant!(AggregateClause, Aggregate);
clause_variant!(LimitClause, Limit);
clause_variant!(OffsetClause, Offset);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_alias_split() {
        assert_eq!(FromClause::table("users as u").alias(), Some("u"));
        assert_eq!(FromClause::table("users AS u").alias(), Some("u"));
        assert_eq!(FromClause::table("users").alias(), Some("users"));
    }

    #[test]
    fn test_derived_alias_falls_back_to_query() {
        let from = FromClause::Query {
            query: Box::new(Query::table("users").alias("active")),
            alias: None,
        };
        assert_eq!(from.alias(), Some("active"));

        let from = FromClause::Query {
            query: Box::new(Query::table("users").alias("active")),
            alias: Some("override".to_string()),
        };
        assert_eq!(from.alias(), Some("override"));
    }
}

pub mod clauses;
pub mod operators;
pub mod query;
pub mod values;

pub use self::clauses::{
    AggregateClause, Clause, ClauseKind, ClauseVariant, Column, Combine, Condition, ConditionKind,
    FromClause, InsertClause, Join, LimitClause, OffsetClause, OrderBy,
};
pub use self::operators::{Component, Engine, JoinKind, Method, SAFE_OPERATORS, SetOp};
pub use self::query::Query;
pub use self::values::{NO_BINDINGS, Value, array};

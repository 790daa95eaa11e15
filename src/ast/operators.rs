use serde::{Deserialize, Serialize};

/// The statement kind, selecting which renderer the compiler dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Method {
    #[default]
    Select,
    Insert,
    Update,
    Delete,
    Aggregate,
    Set,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Select => write!(f, "select"),
            Method::Insert => write!(f, "insert"),
            Method::Update => write!(f, "update"),
            Method::Delete => write!(f, "delete"),
            Method::Aggregate => write!(f, "aggregate"),
            Method::Set => write!(f, "set"),
        }
    }
}

/// Named component bucket of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Component {
    From,
    Select,
    Where,
    Join,
    Group,
    Having,
    Order,
    Limit,
    Offset,
    Combine,
    Insert,
    Update,
    Set,
    Cte,
    Aggregate,
}

impl Component {
    pub fn name(&self) -> &'static str {
        match self {
            Component::From => "from",
            Component::Select => "select",
            Component::Where => "where",
            Component::Join => "join",
            Component::Group => "group",
            Component::Having => "having",
            Component::Order => "order",
            Component::Limit => "limit",
            Component::Offset => "offset",
            Component::Combine => "combine",
            Component::Insert => "insert",
            Component::Update => "update",
            Component::Set => "set",
            Component::Cte => "cte",
            Component::Aggregate => "aggregate",
        }
    }
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Target SQL engine. The short code scopes clauses and keys the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Engine {
    Generic,
    MySql,
    Postgres,
    SqlServer,
    Sqlite,
    Firebird,
}

impl Engine {
    pub const ALL: [Engine; 6] = [
        Engine::Generic,
        Engine::MySql,
        Engine::Postgres,
        Engine::SqlServer,
        Engine::Sqlite,
        Engine::Firebird,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Engine::Generic => "generic",
            Engine::MySql => "mysql",
            Engine::Postgres => "postgres",
            Engine::SqlServer => "sqlsrv",
            Engine::Sqlite => "sqlite",
            Engine::Firebird => "firebird",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Engine::ALL.into_iter().find(|e| e.code() == code)
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
    Right,
    Cross,
}

impl std::fmt::Display for JoinKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinKind::Inner => write!(f, "INNER JOIN"),
            JoinKind::Left => write!(f, "LEFT JOIN"),
            JoinKind::Right => write!(f, "RIGHT JOIN"),
            JoinKind::Cross => write!(f, "CROSS JOIN"),
        }
    }
}

/// Set operation for combining statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetOp {
    Union,
    Except,
    Intersect,
}

impl std::fmt::Display for SetOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SetOp::Union => write!(f, "UNION"),
            SetOp::Except => write!(f, "EXCEPT"),
            SetOp::Intersect => write!(f, "INTERSECT"),
        }
    }
}

/// Operators accepted in comparisons without explicit white listing.
pub const SAFE_OPERATORS: &[&str] = &[
    "=",
    "<",
    ">",
    "<=",
    ">=",
    "<>",
    "!=",
    "<=>",
    "like",
    "not like",
    "ilike",
    "not ilike",
    "like binary",
    "not like binary",
    "rlike",
    "not rlike",
    "regexp",
    "not regexp",
    "similar to",
    "not similar to",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_codes_round_trip() {
        for engine in Engine::ALL {
            assert_eq!(Engine::from_code(engine.code()), Some(engine));
        }
        assert_eq!(Engine::from_code("oracle"), None);
    }
}

//! Error types for statement compilation.

use thiserror::Error;

/// The main error type for building and compiling statements.
///
/// Every variant is fatal: the compiler returns it before producing any SQL.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// A select/insert/update/delete without a table expression.
    #[error("No table set to {operation}")]
    MissingTable { operation: &'static str },

    /// Update or delete targeting a derived table (nested statement in FROM).
    #[error("Cannot {operation} a derived table, use a concrete or raw table expression")]
    UnsupportedTarget { operation: &'static str },

    #[error("Columns and values cannot be empty in the '{component}' clause")]
    EmptyValues { component: &'static str },

    #[error("Columns count ({columns}) should be equal to values count ({values}) in the '{component}' clause")]
    ArityMismatch {
        component: &'static str,
        columns: usize,
        values: usize,
    },

    #[error("The operator '{0}' cannot be used. Please consider white listing it before using it.")]
    InvalidOperator(String),

    /// A component bucket held a clause outside the closed set its hook expects.
    #[error("Invalid type \"{found}\" provided for the \"{section}\" clause.")]
    InvalidClause {
        section: &'static str,
        found: &'static str,
    },

    #[error("Variable '{0}' not found")]
    UndefinedVariable(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Positional markers in the raw SQL do not line up with the bindings.
    #[error("Found {markers} parameter markers but {bindings} bindings")]
    MarkerMismatch { markers: usize, bindings: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ComposeError {
    pub fn invalid_clause(section: &'static str, found: &'static str) -> Self {
        Self::InvalidClause { section, found }
    }

    pub fn arity(component: &'static str, columns: usize, values: usize) -> Self {
        Self::ArityMismatch {
            component,
            columns,
            values,
        }
    }
}

/// Result type alias for statement compilation.
pub type ComposeResult<T> = Result<T, ComposeError>;

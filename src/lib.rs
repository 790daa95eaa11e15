//! # sqlcompose
//!
//! Build SQL statements as values, compile them for any supported engine.
//!
//! A [`Query`](ast::Query) is an engine-agnostic description of one
//! statement. A [`Compiler`](compiler::Compiler) turns it into SQL text with
//! parameter markers and an ordered binding list.
//!
//! ## Quick Example
//!
//! ```rust
//! use sqlcompose::prelude::*;
//!
//! let query = Query::table("users")
//!     .select(["id", "email"])
//!     .where_eq("active", true)
//!     .order_by_desc(["created_at"])
//!     .limit(10);
//!
//! let result = Compiler::postgres().compile(&query).unwrap();
//! assert_eq!(
//!     result.sql,
//!     r#"SELECT "id", "email" FROM "users" WHERE "active" = @p0 ORDER BY "created_at" DESC LIMIT @p1"#
//! );
//! ```
//!
//! ## Engines
//!
//! | Engine     | Code       | Identifiers | Offset without limit          |
//! |------------|------------|-------------|-------------------------------|
//! | Generic    | `generic`  | `"x"`       | `OFFSET ?`                    |
//! | MySQL      | `mysql`    | `` `x` ``   | `LIMIT 18446744073709551615 OFFSET ?` |
//! | PostgreSQL | `postgres` | `"x"`       | `OFFSET ?`                    |
//! | SQL Server | `sqlsrv`   | `[x]`       | `ROW_NUMBER()` or `OFFSET ? ROWS` |
//! | SQLite     | `sqlite`   | `"x"`       | `LIMIT -1 OFFSET ?`           |
//! | Firebird   | `firebird` | `"X"`       | `OFFSET ?`                    |

pub mod ast;
pub mod compiler;
pub mod config;
pub mod error;
pub mod helper;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::compiler::{CompileResult, Compiler, CompilerRegistry, ToSql};
    pub use crate::config::CompilerConfig;
    pub use crate::error::*;
}

pub use ast::{Engine, Query, Value};
pub use compiler::{CompileResult, Compiler};
pub use error::{ComposeError, ComposeResult};
